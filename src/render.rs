//! Text and JSON presentation of search outcomes.
//!
//! Pure string building; nothing here touches the filtering or derivation
//! logic.

use crate::{ApiError, DisplayRecord, SearchError, SearchOutcome, SearchRequest, SummaryRow};
use serde_json::json;

const TABLE_HEADERS: [&str; 6] = ["Flights", "Departure", "Arrival", "Duration", "Connection", "Passengers"];

/// Text block for one record
pub fn render_record(record: &DisplayRecord) -> String {
    let mut lines = vec![
        format!("Flights: {}", record.flights),
        format!("Departure: {}", record.departure),
        format!("Arrival: {}", record.arrival),
        format!("Duration: {}", record.duration),
    ];
    if !record.connection_time.is_empty() {
        lines.push(format!("Connection time: {}", record.connection_time));
    }
    lines.push(format!("Passengers: {}", record.passengers));
    if let Some(price) = record.price {
        lines.push(format!("Price: {} ARS", price));
    }
    if let Some(logo) = &record.logo {
        lines.push(format!("Logo: {}", logo));
    }
    lines.push("Legs:".to_string());
    lines.extend(record.legs.iter().cloned());
    lines.push("---".to_string());

    lines.join("\n") + "\n"
}

fn row_cells(row: &SummaryRow) -> [String; 6] {
    [
        row.flights.clone(),
        row.departure.clone(),
        row.arrival.clone(),
        row.duration.clone(),
        row.connection_time.clone(),
        row.passengers.to_string(),
    ]
}

/// Fixed-width summary table of the records
pub fn render_table(records: &[DisplayRecord]) -> String {
    let rows: Vec<[String; 6]> = records.iter().map(|r| row_cells(&r.summary())).collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let headers: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");

    let mut lines = vec![format_line(&headers[..]), separator];
    lines.extend(rows.iter().map(|row| format_line(&row[..])));

    lines.join("\n") + "\n"
}

/// Message shown when the request succeeded but nothing matched
pub fn empty_message(request: &SearchRequest) -> String {
    format!(
        "No itineraries found with every leg operated by {}.",
        request.airline()
    )
}

/// Complete text output for a successful request
pub fn render_outcome(outcome: &SearchOutcome, request: &SearchRequest) -> String {
    match outcome {
        SearchOutcome::Empty => format!("{}\n", empty_message(request)),
        SearchOutcome::Found { records } => {
            let mut out = format!(
                "Found {} itineraries fully operated by {} on {}:\n\n",
                records.len(),
                request.airline(),
                request.date().format("%d/%m/%Y")
            );
            for record in records {
                out.push_str(&render_record(record));
            }
            out.push('\n');
            out.push_str(&render_table(records));
            out
        }
    }
}

/// JSON projection of the outcome
pub fn render_json(outcome: &SearchOutcome, request: &SearchRequest) -> serde_json::Value {
    let mut value = json!({
        "origin": request.origin(),
        "destination": request.destination(),
        "date": request.date().format("%Y-%m-%d").to_string(),
        "airline": request.airline(),
        "passengers": request.passengers(),
        "total": outcome.records().len(),
        "records": outcome.records(),
    });
    if outcome.is_empty() {
        value["message"] = json!(empty_message(request));
    }
    value
}

/// User-facing error line
pub fn render_error(error: &SearchError) -> String {
    format!("Error: {}", error)
}

/// JSON error payload; HTTP failures keep their status and body
pub fn render_error_json(error: &SearchError) -> serde_json::Value {
    match error {
        SearchError::Api(ApiError::Http { status, body }) => json!({
            "error": error.to_string(),
            "status": status,
            "body": body,
        }),
        _ => json!({ "error": error.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> SearchRequest {
        SearchRequest::new("AEP", "MDZ", NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(), 1, "AR").unwrap()
    }

    fn record(flights: &str, connection: &str) -> DisplayRecord {
        DisplayRecord {
            flights: flights.to_string(),
            departure: "Aeroparque (AEP) - 2025-08-15 06:00".to_string(),
            arrival: "El Plumerillo (MDZ) - 2025-08-15 09:05".to_string(),
            duration: "3h 5m".to_string(),
            connection_time: connection.to_string(),
            passengers: 1,
            logo: None,
            price: Some(98000),
            legs: vec!["- Flight AR 1: AEP (2025-08-15 06:00) → MDZ (2025-08-15 09:05)".to_string()],
            sort_key: 185,
            missing_duration: false,
        }
    }

    #[test]
    fn test_record_block_hides_empty_connection() {
        let text = render_record(&record("AR 1", ""));
        assert!(!text.contains("Connection time"));
        assert!(text.contains("Price: 98000 ARS"));
        assert!(!text.contains("Logo"));
        assert!(text.ends_with("---\n"));

        let text = render_record(&record("AR 1, AR 2", "0h 40m"));
        assert!(text.contains("Connection time: 0h 40m"));
    }

    #[test]
    fn test_record_block_layout() {
        let mut connecting = record("AR 1, AR 2", "0h 40m");
        connecting.logo = Some("https://example.com/AR.png".to_string());
        assert_eq!(
            render_record(&connecting),
            "Flights: AR 1, AR 2\n\
             Departure: Aeroparque (AEP) - 2025-08-15 06:00\n\
             Arrival: El Plumerillo (MDZ) - 2025-08-15 09:05\n\
             Duration: 3h 5m\n\
             Connection time: 0h 40m\n\
             Passengers: 1\n\
             Price: 98000 ARS\n\
             Logo: https://example.com/AR.png\n\
             Legs:\n\
             - Flight AR 1: AEP (2025-08-15 06:00) → MDZ (2025-08-15 09:05)\n\
             ---\n"
        );
    }

    #[test]
    fn test_table_columns_align() {
        let table = render_table(&[record("AR 1", ""), record("AR 1234, AR 5678", "0h 40m")]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(&format!("{:<16} | Departure", "Flights")));
        assert!(lines[3].starts_with("AR 1234, AR 5678 | "));
        assert!(!table.contains("Legs"));
        assert!(!table.contains("→"));
    }

    #[test]
    fn test_render_outcome_found() {
        let outcome = SearchOutcome::Found { records: vec![record("AR 1", "")] };
        let text = render_outcome(&outcome, &request());
        assert!(text.starts_with("Found 1 itineraries fully operated by AR on 15/08/2025:"));
    }

    #[test]
    fn test_render_outcome_empty() {
        let text = render_outcome(&SearchOutcome::Empty, &request());
        assert_eq!(text, "No itineraries found with every leg operated by AR.\n");
    }

    #[test]
    fn test_render_json() {
        let value = render_json(&SearchOutcome::Empty, &request());
        assert_eq!(value["total"], 0);
        assert_eq!(value["date"], "2025-08-15");
        assert!(value["message"].is_string());

        let outcome = SearchOutcome::Found { records: vec![record("AR 1", "")] };
        let value = render_json(&outcome, &request());
        assert_eq!(value["total"], 1);
        assert_eq!(value["records"][0]["flights"], "AR 1");
        assert!(value["records"][0].get("sort_key").is_none());
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_render_http_error() {
        let error = SearchError::Api(ApiError::Http { status: 401, body: "Invalid API key".to_string() });
        assert_eq!(render_error(&error), "Error: Request failed: 401 - Invalid API key");
        let value = render_error_json(&error);
        assert_eq!(value["status"], 401);
        assert_eq!(value["body"], "Invalid API key");
    }
}
