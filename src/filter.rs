//! Airline filter over itineraries.
//!
//! An itinerary is kept only when every one of its legs carries a flight
//! number starting with the requested airline code. Partially matching
//! itineraries (codeshares, connections on another carrier) are dropped
//! entirely.

use crate::response::{Leg, RawItinerary};
use tracing::debug;

/// True iff the itinerary has legs and all of them are flown under `airline_code`.
pub fn matches_airline(itinerary: &RawItinerary, airline_code: &str) -> bool {
    let code = airline_code.trim().to_uppercase();
    !itinerary.flights.is_empty() && itinerary.flights.iter().all(|leg| leg_matches(leg, &code))
}

fn leg_matches(leg: &Leg, code: &str) -> bool {
    leg.flight_number
        .as_deref()
        .is_some_and(|number| number.to_uppercase().starts_with(code))
}

/// Keep matching itineraries, preserving input order
pub fn filter_itineraries(itineraries: Vec<RawItinerary>, airline_code: &str) -> Vec<RawItinerary> {
    itineraries
        .into_iter()
        .filter(|itinerary| {
            let keep = matches_airline(itinerary, airline_code);
            if !keep {
                debug!(
                    flights = ?itinerary
                        .flights
                        .iter()
                        .map(|leg| leg.flight_number.as_deref().unwrap_or("?"))
                        .collect::<Vec<_>>(),
                    "Dropping itinerary not fully operated by airline"
                );
            }
            keep
        })
        .collect()
}
