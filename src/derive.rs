//! Display fields derived from filtered itineraries

use crate::response::{AirportStop, Leg, RawItinerary};
use crate::SearchError;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

/// Timestamp format of `departure_airport.time` / `arrival_airport.time`
pub const LEG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Sort key for itineraries without `total_duration`, so they sort last
pub const MISSING_DURATION_SORT_KEY: i64 = 9999;

/// One itinerary ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub flights: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub connection_time: String,
    pub passengers: u8,
    pub logo: Option<String>,
    pub price: Option<i64>,
    pub legs: Vec<String>,
    #[serde(skip)]
    pub sort_key: i64,
    /// No `total_duration` in the payload; such records sort after all others
    #[serde(skip)]
    pub missing_duration: bool,
}

/// Tabular projection of a record: no logo, leg lines or sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub flights: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub connection_time: String,
    pub passengers: u8,
}

impl DisplayRecord {
    pub fn summary(&self) -> SummaryRow {
        SummaryRow {
            flights: self.flights.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
            duration: self.duration.clone(),
            connection_time: self.connection_time.clone(),
            passengers: self.passengers,
        }
    }
}

/// `125` -> `"2h 5m"`. Floor division, so negative input keeps `0 <= m < 60`.
pub fn format_duration(minutes: i64) -> String {
    format!("{}h {}m", minutes.div_euclid(60), minutes.rem_euclid(60))
}

fn parse_leg_time(value: &str) -> Result<NaiveDateTime, SearchError> {
    NaiveDateTime::parse_from_str(value, LEG_TIME_FORMAT)
        .map_err(|e| SearchError::TimeParse(format!("{:?}: {}", value, e)))
}

/// Minutes between the first leg's arrival and the second leg's departure.
///
/// `None` for single-leg itineraries. A negative gap means unordered or bad
/// data and is clamped to zero.
pub fn connection_minutes(legs: &[Leg]) -> Result<Option<i64>, SearchError> {
    let [first, second, ..] = legs else {
        return Ok(None);
    };

    let arrival = parse_leg_time(&first.arrival_airport.time)?;
    let departure = parse_leg_time(&second.departure_airport.time)?;
    let minutes = (departure - arrival).num_minutes();

    if minutes < 0 {
        warn!(
            arrival = %arrival,
            departure = %departure,
            minutes,
            "Connecting flight departs before arrival, clamping connection time to zero"
        );
        return Ok(Some(0));
    }

    Ok(Some(minutes))
}

/// `- Flight AR 1234: AEP (2025-08-15 06:00) → COR (2025-08-15 07:20)`
pub fn leg_line(leg: &Leg) -> String {
    format!(
        "- Flight {}: {} ({}) → {} ({})",
        leg.flight_number.as_deref().unwrap_or("?"),
        leg.departure_airport.id,
        leg.departure_airport.time,
        leg.arrival_airport.id,
        leg.arrival_airport.time
    )
}

fn describe_stop(stop: &AirportStop) -> String {
    format!("{} ({}) - {}", stop.name, stop.id, stop.time)
}

/// Build the display record for one itinerary that passed the filter
pub fn derive_record(itinerary: &RawItinerary, passengers: u8) -> Result<DisplayRecord, SearchError> {
    let legs = &itinerary.flights;

    let connection_time = connection_minutes(legs)?
        .map(format_duration)
        .unwrap_or_default();

    let flights = legs
        .iter()
        .map(|leg| leg.flight_number.as_deref().unwrap_or("?"))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(DisplayRecord {
        flights,
        departure: legs
            .first()
            .map(|leg| describe_stop(&leg.departure_airport))
            .unwrap_or_default(),
        arrival: legs
            .last()
            .map(|leg| describe_stop(&leg.arrival_airport))
            .unwrap_or_default(),
        duration: format_duration(itinerary.total_duration.unwrap_or(0)),
        connection_time,
        passengers,
        logo: itinerary.airline_logo.clone(),
        price: itinerary.price,
        legs: legs.iter().map(leg_line).collect(),
        sort_key: itinerary.total_duration.unwrap_or(MISSING_DURATION_SORT_KEY),
        missing_duration: itinerary.total_duration.is_none(),
    })
}

/// Derive every record, then sort by total duration (stable, ascending, missing last).
/// One bad itinerary fails the batch.
pub fn derive_records(
    itineraries: &[RawItinerary],
    passengers: u8,
) -> Result<Vec<DisplayRecord>, SearchError> {
    let mut records = itineraries
        .iter()
        .map(|itinerary| derive_record(itinerary, passengers))
        .collect::<Result<Vec<_>, _>>()?;

    records.sort_by_key(|record| (record.missing_duration, record.sort_key));
    Ok(records)
}
