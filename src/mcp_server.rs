// src/mcp_server.rs

use rmcp::{
    ServerHandler, ServiceExt,
    model::{ServerCapabilities, ServerInfo},
    schemars, tool,
    transport::stdio,
};
use serp_flights::render::{render_error_json, render_json};
use serp_flights::{search_flights, ApiKey, SearchError, SearchRequest, SerpApiClient, DEFAULT_ENDPOINT};
use serde::Deserialize;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{info, warn, error, debug};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::path::PathBuf;

const API_KEY_ENV: &str = "SERPAPI_API_KEY";
const ENDPOINT_ENV: &str = "SERPAPI_ENDPOINT";

/// Airline flight search MCP server
#[derive(Default, Clone)]
pub struct AirlineFlightServer;

impl AirlineFlightServer {
    pub fn new() -> Self {
        Self
    }

    /// Initialize logging to file; stdout carries the protocol
    fn init_logging() -> Result<()> {
        let log_dir = PathBuf::from("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, "serp-flights-mcp.log");

        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info"))
                    .add_directive("serp_flights=debug".parse()?),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
            )
            .init();

        info!("Logging initialized - logs will be written to logs/serp-flights-mcp.log.*");
        Ok(())
    }
}

/// Airline search parameters
#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct AirlineSearchParams {
    #[schemars(description = "Origin airport IATA code (e.g., AEP)")]
    pub from_airport: String,
    #[schemars(description = "Destination airport IATA code (e.g., MDZ)")]
    pub to_airport: String,
    #[schemars(description = "Departure date in YYYY-MM-DD format (default: today)")]
    pub departure_date: Option<String>,
    #[schemars(description = "Number of passengers, 1-9 (default: 1)")]
    pub passengers: Option<u8>,
    #[schemars(description = "IATA code of the airline that must operate every leg (e.g., AR, LA, FO)")]
    pub airline: String,
    #[schemars(description = "SerpApi key; falls back to the SERPAPI_API_KEY environment variable")]
    pub api_key: Option<String>,
}

#[tool(tool_box)]
impl AirlineFlightServer {
    /// Search one-way flights fully operated by a single airline
    #[tool(description = "Search one-way flights between two airports and return only itineraries where every leg is operated by the given airline. Results are sorted by total duration.")]
    async fn search_airline_flights(
        &self,
        #[tool(aggr)] params: AirlineSearchParams,
    ) -> String {
        info!(
            from_airport = params.from_airport,
            to_airport = params.to_airport,
            departure_date = params.departure_date.as_deref(),
            passengers = params.passengers.unwrap_or(1),
            airline = params.airline,
            "Airline flight search request received"
        );

        let (request, api_key) = match build_search(params) {
            Ok(built) => {
                debug!("Built airline search request successfully");
                built
            }
            Err(e) => {
                warn!(error = %e, "Invalid airline search parameters");
                return render_error_json(&e).to_string();
            }
        };

        let endpoint = std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let client = match SerpApiClient::with_endpoint(&endpoint) {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Error creating SerpApi client");
                return render_error_json(&SearchError::from(e)).to_string();
            }
        };

        match search_flights(&client, &request, &api_key).await {
            Ok(outcome) => {
                info!(
                    itineraries_found = outcome.records().len(),
                    "Airline flight search completed successfully"
                );
                serde_json::to_string_pretty(&render_json(&outcome, &request)).unwrap_or_else(|e| {
                    format!(r#"{{"error": "Failed to serialize results: {}"}}"#, e)
                })
            }
            Err(e) => {
                error!("Airline flight search failed: {}", e);
                render_error_json(&e).to_string()
            }
        }
    }
}

fn build_search(params: AirlineSearchParams) -> Result<(SearchRequest, ApiKey), SearchError> {
    let date = match params.departure_date.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| SearchError::InvalidRequest(format!("Invalid departure date {:?}: {}", date, e)))?,
        None => Local::now().date_naive(),
    };

    let request = SearchRequest::new(
        &params.from_airport,
        &params.to_airport,
        date,
        params.passengers.unwrap_or(1),
        &params.airline,
    )?;

    // The key is never defaulted: either the caller passes it or the environment provides it
    let key = match params.api_key {
        Some(key) => key,
        None => std::env::var(API_KEY_ENV).map_err(|_| {
            SearchError::InvalidRequest(format!("api_key not provided and {} is not set", API_KEY_ENV))
        })?,
    };

    Ok((request, ApiKey::new(key)?))
}

#[tool(tool_box)]
impl ServerHandler for AirlineFlightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("A flight search server backed by SerpApi's Google Flights engine. Returns itineraries where every leg is operated by the requested airline, as JSON records sorted by total duration.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = AirlineFlightServer::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting MCP airline flight server");

    let server = AirlineFlightServer::new();
    let transport = stdio();

    let service = server.serve(transport).await?;

    info!("MCP service started, waiting for requests");

    service.waiting().await?;

    info!("MCP service shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AirlineSearchParams {
        AirlineSearchParams {
            from_airport: "aep".to_string(),
            to_airport: "mdz".to_string(),
            departure_date: Some("2025-08-15".to_string()),
            passengers: Some(2),
            airline: "ar".to_string(),
            api_key: Some("key".to_string()),
        }
    }

    #[test]
    fn test_build_search() {
        let (request, key) = build_search(params()).unwrap();
        assert_eq!(request.origin(), "AEP");
        assert_eq!(request.airline(), "AR");
        assert_eq!(request.passengers(), 2);
        assert_eq!(key.expose(), "key");
    }

    #[test]
    fn test_build_search_rejects_bad_date() {
        let mut bad = params();
        bad.departure_date = Some("15/08/2025".to_string());
        assert!(matches!(build_search(bad), Err(SearchError::InvalidRequest(_))));
    }

    #[test]
    fn test_build_search_rejects_blank_key() {
        let mut bad = params();
        bad.api_key = Some("  ".to_string());
        assert!(build_search(bad).is_err());
    }
}
