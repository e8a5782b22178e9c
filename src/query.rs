//! Query parameters for the SerpApi Google Flights engine

use crate::{ApiKey, SearchRequest};
use reqwest::Url;

pub const ENGINE: &str = "google_flights";
pub const CURRENCY: &str = "ARS";
const API_KEY_PARAM: &str = "api_key";

/// Ordered `(name, value)` pairs sent as the query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(&'static str, String)>,
}

impl SearchParams {
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Full request URL, credential included. Only shown on explicit request.
    pub fn request_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.pairs.iter());
        url
    }

    /// Request URL with the API key masked, safe for logs
    pub fn redacted_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.pairs.iter().map(|(key, value)| {
            if *key == API_KEY_PARAM {
                (*key, "***")
            } else {
                (*key, value.as_str())
            }
        }));
        url
    }
}

/// Build the query parameters for one search
pub fn build_params(request: &SearchRequest, api_key: &ApiKey) -> SearchParams {
    let pairs = vec![
        ("engine", ENGINE.to_string()),
        ("departure_id", request.origin().to_string()),
        ("arrival_id", request.destination().to_string()),
        ("outbound_date", request.date().format("%Y-%m-%d").to_string()),
        ("adults", request.passengers().to_string()),
        ("currency", CURRENCY.to_string()),
        ("type", request.trip_type().code().to_string()),
        (API_KEY_PARAM, api_key.expose().to_string()),
    ];

    SearchParams { pairs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn params() -> SearchParams {
        let request = SearchRequest::new(
            "aep",
            "mdz",
            NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
            3,
            "ar",
        )
        .unwrap();
        build_params(&request, &ApiKey::new("k3y").unwrap())
    }

    #[test]
    fn test_build_params_order_and_values() {
        let params = params();
        let names: Vec<_> = params.pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec!["engine", "departure_id", "arrival_id", "outbound_date", "adults", "currency", "type", "api_key"]
        );
        assert_eq!(params.get("engine"), Some("google_flights"));
        assert_eq!(params.get("departure_id"), Some("AEP"));
        assert_eq!(params.get("arrival_id"), Some("MDZ"));
        assert_eq!(params.get("outbound_date"), Some("2025-08-05"));
        assert_eq!(params.get("adults"), Some("3"));
        assert_eq!(params.get("currency"), Some("ARS"));
        assert_eq!(params.get("type"), Some("2"));
        assert_eq!(params.get("api_key"), Some("k3y"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_request_url() {
        let endpoint = Url::parse("https://serpapi.com/search").unwrap();
        let url = params().request_url(&endpoint);
        assert_eq!(
            url.as_str(),
            "https://serpapi.com/search?engine=google_flights&departure_id=AEP&arrival_id=MDZ\
             &outbound_date=2025-08-05&adults=3&currency=ARS&type=2&api_key=k3y"
        );
    }

    #[test]
    fn test_redacted_url_hides_key() {
        let endpoint = Url::parse("https://serpapi.com/search").unwrap();
        let url = params().redacted_url(&endpoint).to_string();
        assert!(!url.contains("k3y"));
        assert!(url.ends_with("api_key=***"));
    }
}
