//! Inbound JSON shape of SerpApi's Google Flights results.
//!
//! Only the fields the search uses are modelled; everything else in the payload
//! is ignored by serde.

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightsResponse {
    #[serde(default)]
    pub best_flights: Vec<RawItinerary>,
    #[serde(default)]
    pub other_flights: Vec<RawItinerary>,
}

impl FlightsResponse {
    /// Best flights first, then the rest, each group in API order.
    pub fn into_itineraries(self) -> Vec<RawItinerary> {
        let mut itineraries = self.best_flights;
        itineraries.extend(self.other_flights);
        itineraries
    }
}

/// One travel option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItinerary {
    #[serde(default)]
    pub flights: Vec<Leg>,
    pub total_duration: Option<i64>,
    pub price: Option<i64>,
    pub airline_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layovers: Vec<Layover>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// One flight segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    #[serde(default)]
    pub departure_airport: AirportStop,
    #[serde(default)]
    pub arrival_airport: AirportStop,
    pub duration: Option<i64>,
    pub airplane: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportStop {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Local time, `YYYY-MM-DD HH:MM`
    #[serde(default)]
    pub time: String,
}

/// Layover as reported by the API. Carried through for JSON output only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layover {
    pub id: Option<String>,
    pub name: Option<String>,
    pub duration: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let response: FlightsResponse = serde_json::from_str(r#"{"search_metadata": {}}"#).unwrap();
        assert!(response.best_flights.is_empty());
        assert!(response.other_flights.is_empty());
    }

    #[test]
    fn test_best_flights_come_first() {
        let json = r#"{
            "best_flights": [{"flights": [{"flight_number": "AR 1"}], "total_duration": 10}],
            "other_flights": [{"flights": [{"flight_number": "AR 2"}], "total_duration": 5}]
        }"#;
        let response: FlightsResponse = serde_json::from_str(json).unwrap();
        let numbers: Vec<_> = response
            .into_itineraries()
            .into_iter()
            .map(|i| i.flights[0].flight_number.clone().unwrap())
            .collect();
        assert_eq!(numbers, vec!["AR 1", "AR 2"]);
    }

    #[test]
    fn test_itinerary_fields() {
        let json = r#"{
            "flights": [{
                "departure_airport": {"name": "Aeroparque", "id": "AEP", "time": "2025-08-15 06:10"},
                "arrival_airport": {"name": "El Plumerillo", "id": "MDZ", "time": "2025-08-15 08:05"},
                "duration": 115,
                "airplane": "Boeing 737",
                "airline": "Aerolineas Argentinas",
                "flight_number": "AR 1402",
                "legroom": "31 in"
            }],
            "total_duration": 115,
            "price": 98000,
            "type": "One way",
            "airline_logo": "https://www.gstatic.com/flights/airline_logos/70px/AR.png"
        }"#;
        let itinerary: RawItinerary = serde_json::from_str(json).unwrap();
        assert_eq!(itinerary.total_duration, Some(115));
        assert_eq!(itinerary.price, Some(98000));
        assert_eq!(itinerary.kind.as_deref(), Some("One way"));
        assert_eq!(itinerary.flights[0].departure_airport.id, "AEP");
        assert_eq!(itinerary.flights[0].arrival_airport.time, "2025-08-15 08:05");
        assert!(itinerary.layovers.is_empty());
    }

    #[test]
    fn test_missing_optional_fields() {
        let itinerary: RawItinerary = serde_json::from_str(r#"{"flights": [{}]}"#).unwrap();
        assert_eq!(itinerary.total_duration, None);
        assert_eq!(itinerary.airline_logo, None);
        assert_eq!(itinerary.flights[0].flight_number, None);
        assert_eq!(itinerary.flights[0].departure_airport, AirportStop::default());
    }
}
