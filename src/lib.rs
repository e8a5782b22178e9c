//! # Serp Flights Library
//!
//! Searches SerpApi's Google Flights endpoint for one-way itineraries and keeps
//! only those where every leg is operated by a single airline. Each stage of the
//! pipeline (query building, fetching, filtering, field derivation, rendering)
//! is exposed on its own so callers can drive or test them separately.

pub mod client;
pub mod derive;
pub mod filter;
pub mod query;
pub mod render;
pub mod response;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, instrument};

// Re-export main types for convenience
pub use client::{ApiError, SerpApiClient, DEFAULT_ENDPOINT};
pub use derive::{derive_records, format_duration, DisplayRecord, SummaryRow};
pub use filter::{filter_itineraries, matches_airline};
pub use query::{build_params, SearchParams};
pub use response::{AirportStop, FlightsResponse, Leg, RawItinerary};

static AIRPORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid airport code pattern"));
static AIRLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2}$").expect("valid airline code pattern"));

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 9;

/// Error types for the search pipeline
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid time format: {0}")]
    TimeParse(String),
}

/// Trip type, mapped onto SerpApi's `type` parameter. Only one-way searches are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripType {
    #[default]
    OneWay,
}

impl TripType {
    /// SerpApi code for the `type` query parameter
    pub fn code(self) -> &'static str {
        match self {
            TripType::OneWay => "2",
        }
    }
}

/// SerpApi credential. Always supplied by the caller, never defaulted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, SearchError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(SearchError::InvalidRequest("API key must not be empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// One validated form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    origin: String,
    destination: String,
    date: NaiveDate,
    passengers: u8,
    airline: String,
    trip_type: TripType,
}

impl SearchRequest {
    /// Normalize and validate the raw form inputs.
    ///
    /// Codes are trimmed and uppercased; airports must be three letters and the
    /// airline two letters or digits. Passenger count must be within 1..=9.
    pub fn new(
        origin: &str,
        destination: &str,
        date: NaiveDate,
        passengers: u8,
        airline: &str,
    ) -> Result<Self, SearchError> {
        let origin = normalize_code(origin);
        let destination = normalize_code(destination);
        let airline = normalize_code(airline);

        if !AIRPORT_CODE.is_match(&origin) {
            return Err(SearchError::InvalidRequest(format!(
                "origin must be a 3-letter IATA airport code, got {:?}",
                origin
            )));
        }
        if !AIRPORT_CODE.is_match(&destination) {
            return Err(SearchError::InvalidRequest(format!(
                "destination must be a 3-letter IATA airport code, got {:?}",
                destination
            )));
        }
        if origin == destination {
            return Err(SearchError::InvalidRequest(format!(
                "origin and destination are both {}",
                origin
            )));
        }
        if !AIRLINE_CODE.is_match(&airline) {
            return Err(SearchError::InvalidRequest(format!(
                "airline must be a 2-character IATA airline code, got {:?}",
                airline
            )));
        }
        if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&passengers) {
            return Err(SearchError::InvalidRequest(format!(
                "passengers must be {}-{}, got {}",
                MIN_PASSENGERS, MAX_PASSENGERS, passengers
            )));
        }

        Ok(Self {
            origin,
            destination,
            date,
            passengers,
            airline,
            trip_type: TripType::OneWay,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn passengers(&self) -> u8 {
        self.passengers
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn trip_type(&self) -> TripType {
        self.trip_type
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Result of one successful request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// At least one itinerary survived the airline filter
    Found { records: Vec<DisplayRecord> },
    /// The request succeeded but nothing matched. Informational, not an error.
    Empty,
}

impl SearchOutcome {
    pub fn from_records(records: Vec<DisplayRecord>) -> Self {
        if records.is_empty() {
            SearchOutcome::Empty
        } else {
            SearchOutcome::Found { records }
        }
    }

    pub fn records(&self) -> &[DisplayRecord] {
        match self {
            SearchOutcome::Found { records } => records,
            SearchOutcome::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::Empty)
    }
}

/// Run the whole pipeline for one submission: build parameters, fetch, filter, derive.
#[instrument(level = "info", skip(client, api_key), fields(origin = request.origin(), destination = request.destination(), airline = request.airline()))]
pub async fn search_flights(
    client: &SerpApiClient,
    request: &SearchRequest,
    api_key: &ApiKey,
) -> Result<SearchOutcome, SearchError> {
    let params = build_params(request, api_key);
    debug!(url = %params.redacted_url(client.endpoint()), "Built SerpApi request");

    let response = client.fetch(&params).await?;
    process_response(response, request)
}

/// Post-fetch half of the pipeline: flatten, filter by airline, derive and sort.
pub fn process_response(
    response: FlightsResponse,
    request: &SearchRequest,
) -> Result<SearchOutcome, SearchError> {
    let itineraries = response.into_itineraries();
    let total = itineraries.len();

    let matching = filter_itineraries(itineraries, request.airline());
    info!(
        itineraries_received = total,
        itineraries_matching = matching.len(),
        airline = request.airline(),
        "Applied airline filter"
    );

    let records = derive_records(&matching, request.passengers())?;
    Ok(SearchOutcome::from_records(records))
}
