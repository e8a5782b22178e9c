//! CLI interface for serp-flights

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serp_flights::render::{render_error, render_error_json, render_json, render_outcome};
use serp_flights::{
    build_params, search_flights, ApiKey, SearchError, SearchRequest, SerpApiClient,
    DEFAULT_ENDPOINT,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "serp-flights")]
#[command(about = "Find flights fully operated by one airline via SerpApi's Google Flights engine")]
#[command(version)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Also write JSON logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search one-way flights and keep those operated entirely by one airline
    Search {
        /// Origin airport IATA code
        #[arg(short, long)]
        from: String,
        /// Destination airport IATA code
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Number of passengers (1-9)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=9))]
        passengers: u8,
        /// IATA code of the airline that must operate every leg (e.g. AR, LA, FO)
        #[arg(short, long)]
        airline: String,
        /// SerpApi key
        #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Search endpoint
        #[arg(long, env = "SERPAPI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Print the full request URL, API key included
        #[arg(long)]
        show_url: bool,
        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Stderr logging, plus JSON file logging when a directory is given
fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "serp-flights.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .json(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Validate the form inputs and build the client; any failure is reported like a search error
fn prepare_search(
    from: &str,
    to: &str,
    date: NaiveDate,
    passengers: u8,
    airline: &str,
    api_key: String,
    endpoint: &str,
) -> Result<(SearchRequest, ApiKey, SerpApiClient), SearchError> {
    let request = SearchRequest::new(from, to, date, passengers, airline)?;
    let api_key = ApiKey::new(api_key)?;
    let client = SerpApiClient::with_endpoint(endpoint)?;
    Ok((request, api_key, client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Search {
            from,
            to,
            date,
            passengers,
            airline,
            api_key,
            endpoint,
            show_url,
            json,
            output,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let result = match prepare_search(&from, &to, date, passengers, &airline, api_key, &endpoint) {
                Ok((request, api_key, client)) => {
                    if show_url {
                        let params = build_params(&request, &api_key);
                        println!("Request URL: {}", params.request_url(client.endpoint()));
                    }

                    info!(
                        origin = request.origin(),
                        destination = request.destination(),
                        date = %request.date(),
                        airline = request.airline(),
                        "Searching for flights"
                    );

                    search_flights(&client, &request, &api_key)
                        .await
                        .map(|outcome| (request, outcome))
                }
                Err(e) => Err(e),
            };

            match result {
                Ok((request, outcome)) => {
                    let json_value = render_json(&outcome, &request);

                    if let Some(output_file) = output {
                        fs::write(&output_file, serde_json::to_string_pretty(&json_value)?)?;
                        eprintln!("Results saved to {}", output_file.display());
                    }

                    if json {
                        println!("{}", serde_json::to_string_pretty(&json_value)?);
                    } else {
                        print!("{}", render_outcome(&outcome, &request));
                    }
                }
                Err(e) => {
                    error!(error = %e, "Flight search failed");
                    if json {
                        println!("{}", serde_json::to_string_pretty(&render_error_json(&e))?);
                    } else {
                        eprintln!("{}", render_error(&e));
                    }
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
