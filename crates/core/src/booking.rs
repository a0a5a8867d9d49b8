//! Train Booking Status Processor
//!
//! Classifies each passenger of a booking by their current status code and
//! builds the dashboard view: formatted reference, train summary line,
//! per-passenger records and aggregate counts.
//!
//! Unlike the other pipelines no passenger is ever dropped; each one is
//! transformed into a [`PassengerStatus`].

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::{parse_document, Outcome, PipelineError};
use crate::schema::{self, scalar_text, Field, Kind, Schema, Violation};

pub const BOOKING: Schema = Schema {
    name: "booking",
    fields: &[
        Field::required("bookingRef", Kind::Digits(10)),
        Field::required("train", Kind::Object),
        Field::required("passengers", Kind::Rows),
        Field::optional("classBooked", Kind::Text),
    ],
};

const NAME_WIDTH: usize = 20;

static BOOKING_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})(\d{3})(\d{4})$").unwrap());

/// Passenger status derived from the current status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLabel {
    Confirmed,
    Waitlisted,
    Cancelled,
    Standby,
    /// No rule matched
    Unknown,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Pattern {
    fn matches(&self, code: &str) -> bool {
        match self {
            Pattern::Exact(s) => code == *s,
            Pattern::Prefix(p) => code.starts_with(p),
        }
    }
}

/// Evaluated top to bottom; the more specific codes come before the
/// single-letter prefixes they would otherwise match.
const STATUS_RULES: &[(Pattern, StatusLabel)] = &[
    (Pattern::Exact("CXL"), StatusLabel::Cancelled),
    (Pattern::Prefix("STBY"), StatusLabel::Standby),
    (Pattern::Prefix("WL"), StatusLabel::Waitlisted),
    (Pattern::Prefix("C"), StatusLabel::Confirmed),
    (Pattern::Prefix("S"), StatusLabel::Confirmed),
];

/// Classify a current status code such as `"C1"`, `"WL3"` or `"CXL"`
pub fn classify(code: &str) -> StatusLabel {
    STATUS_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(code))
        .map(|(_, label)| *label)
        .unwrap_or(StatusLabel::Unknown)
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerStatus {
    pub formatted_name: String,
    pub booking_status: String,
    pub current_status: String,
    pub status_label: StatusLabel,
    pub is_confirmed: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub total_passengers: usize,
    pub confirmed: usize,
    pub waitlisted: usize,
    pub cancelled: usize,
    pub standby: usize,
    pub all_confirmed: bool,
    pub any_waitlisted: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatus {
    pub booking_ref_formatted: String,
    pub train_info: String,
    pub passengers: Vec<PassengerStatus>,
    pub summary: BookingSummary,
    /// Every passenger who is not cancelled holds a confirmed seat
    pub chart_prepared: bool,
}

/// `"1234567890"` becomes `"123-456-7890"`; anything else is returned unchanged
pub fn format_booking_ref(booking_ref: &str) -> String {
    BOOKING_REF_RE
        .replace(booking_ref, "$1-$2-$3")
        .into_owned()
}

/// `"Train: {number} - {name} | {from} -> {to} | Class: {classBooked}"`
pub fn format_train_info(train: &Map<String, Value>, class_booked: &str) -> String {
    format!(
        "Train: {} - {} | {} -> {} | Class: {}",
        scalar_text(train.get("number")),
        scalar_text(train.get("name")),
        scalar_text(train.get("from")),
        scalar_text(train.get("to")),
        class_booked
    )
}

/// Derive the status record of one passenger
pub fn passenger_status(passenger: &Map<String, Value>) -> PassengerStatus {
    let current_status = scalar_text(passenger.get("current"));
    let status_label = classify(&current_status);

    PassengerStatus {
        formatted_name: format!(
            "{:<width$}({}/{})",
            scalar_text(passenger.get("name")),
            scalar_text(passenger.get("age")),
            scalar_text(passenger.get("gender")),
            width = NAME_WIDTH
        ),
        booking_status: scalar_text(passenger.get("booking")),
        current_status,
        status_label,
        is_confirmed: status_label == StatusLabel::Confirmed,
    }
}

fn summarize(passengers: &[PassengerStatus]) -> BookingSummary {
    let count = |label: StatusLabel| {
        passengers
            .iter()
            .filter(|p| p.status_label == label)
            .count()
    };

    let confirmed = count(StatusLabel::Confirmed);
    let waitlisted = count(StatusLabel::Waitlisted);

    BookingSummary {
        total_passengers: passengers.len(),
        confirmed,
        waitlisted,
        cancelled: count(StatusLabel::Cancelled),
        standby: count(StatusLabel::Standby),
        all_confirmed: confirmed == passengers.len(),
        any_waitlisted: waitlisted > 0,
    }
}

/// Process a booking into its status view
///
/// Fails when the booking is not an object, `bookingRef` is not a 10-digit
/// string, `train` is not an object, or `passengers` is not a non-empty
/// sequence of objects.
pub fn process_train_booking(booking: &Value) -> Outcome<BookingStatus> {
    let map = BOOKING
        .check(booking)
        .map_err(|v| PipelineError::malformed(BOOKING.name, v))?;

    let records = map
        .get("passengers")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let passenger_maps = records
        .iter()
        .map(Value::as_object)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            PipelineError::malformed(
                BOOKING.name,
                Violation::WrongKind {
                    field: "passengers",
                    expected: "a sequence of objects".to_string(),
                },
            )
        })?;

    let train = map
        .get("train")
        .and_then(Value::as_object)
        .ok_or_else(|| PipelineError::malformed(BOOKING.name, Violation::Missing("train")))?;
    let booking_ref = schema::text(map, "bookingRef").unwrap_or_default();
    let class_booked = schema::text(map, "classBooked").unwrap_or_default();

    let passengers: Vec<PassengerStatus> = passenger_maps
        .into_iter()
        .map(passenger_status)
        .collect();
    let summary = summarize(&passengers);
    let chart_prepared = passengers
        .iter()
        .filter(|p| p.status_label != StatusLabel::Cancelled)
        .all(|p| p.is_confirmed);

    Ok(BookingStatus {
        booking_ref_formatted: format_booking_ref(booking_ref),
        train_info: format_train_info(train, class_booked),
        passengers,
        summary,
        chart_prepared,
    })
}

/// Parse a booking document and process it
pub fn process_train_booking_json(input: &str) -> Outcome<BookingStatus> {
    let booking = parse_document(input)?;
    process_train_booking(&booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking(passengers: Value) -> Value {
        json!({
            "bookingRef": "1234567890",
            "train": {"number": "1201", "name": "Northeast Express", "from": "NYP", "to": "BOS"},
            "classBooked": "Business",
            "passengers": passengers
        })
    }

    fn passenger(name: &str, current: &str) -> Value {
        json!({"name": name, "age": 30, "gender": "F", "booking": "WL1", "current": current})
    }

    // ============================================================================
    // classify tests
    // ============================================================================

    #[test]
    fn test_classify_confirmed_prefixes() {
        assert_eq!(classify("C1"), StatusLabel::Confirmed);
        assert_eq!(classify("S5"), StatusLabel::Confirmed);
        assert_eq!(classify("S"), StatusLabel::Confirmed);
    }

    #[test]
    fn test_classify_specific_codes_win_over_single_letters() {
        assert_eq!(classify("CXL"), StatusLabel::Cancelled);
        assert_eq!(classify("STBY"), StatusLabel::Standby);
        assert_eq!(classify("STBY2"), StatusLabel::Standby);
    }

    #[test]
    fn test_classify_waitlisted() {
        assert_eq!(classify("WL12"), StatusLabel::Waitlisted);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(""), StatusLabel::Unknown);
        assert_eq!(classify("RAC4"), StatusLabel::Unknown);
        assert_eq!(classify("cxl"), StatusLabel::Unknown);
    }

    // ============================================================================
    // Formatter tests
    // ============================================================================

    #[test]
    fn test_format_booking_ref() {
        assert_eq!(format_booking_ref("1234567890"), "123-456-7890");
        assert_eq!(format_booking_ref("12345"), "12345");
    }

    #[test]
    fn test_format_train_info_with_numeric_train_number() {
        let train = json!({"number": 1201, "name": "Acela", "from": "WAS", "to": "NYP"});
        assert_eq!(
            format_train_info(train.as_object().unwrap(), "Coach"),
            "Train: 1201 - Acela | WAS -> NYP | Class: Coach"
        );
    }

    #[test]
    fn test_formatted_name_is_padded() {
        let record = json!({"name": "Alex Kim", "age": 28, "gender": "M", "booking": "C1", "current": "C1"});
        let status = passenger_status(record.as_object().unwrap());
        assert_eq!(status.formatted_name, "Alex Kim            (28/M)");
    }

    #[test]
    fn test_formatted_name_longer_than_width_is_kept_whole() {
        let record = json!({"name": "Maximilian Alexander Long", "age": 41, "gender": "M"});
        let status = passenger_status(record.as_object().unwrap());
        assert_eq!(status.formatted_name, "Maximilian Alexander Long(41/M)");
        assert_eq!(status.status_label, StatusLabel::Unknown);
    }

    // ============================================================================
    // process_train_booking tests
    // ============================================================================

    #[test]
    fn test_process_train_booking_basic() {
        let input = booking(json!([
            {"name": "Alex Kim", "age": 28, "gender": "M", "booking": "C1", "current": "C1"},
            {"name": "Sam Lee", "age": 34, "gender": "F", "booking": "WL2", "current": "S5"}
        ]));
        let status = process_train_booking(&input).unwrap();

        assert_eq!(status.booking_ref_formatted, "123-456-7890");
        assert_eq!(
            status.train_info,
            "Train: 1201 - Northeast Express | NYP -> BOS | Class: Business"
        );
        assert_eq!(status.passengers.len(), 2);
        assert_eq!(status.passengers[1].booking_status, "WL2");
        assert_eq!(status.passengers[1].current_status, "S5");
        assert!(status.passengers[1].is_confirmed);
        assert!(status.summary.all_confirmed);
        assert!(!status.summary.any_waitlisted);
        assert!(status.chart_prepared);
    }

    #[test]
    fn test_summary_counts() {
        let input = booking(json!([
            passenger("A", "C1"),
            passenger("B", "WL3"),
            passenger("C", "CXL"),
            passenger("D", "STBY1"),
            passenger("E", "S2")
        ]));
        let summary = process_train_booking(&input).unwrap().summary;

        assert_eq!(
            summary,
            BookingSummary {
                total_passengers: 5,
                confirmed: 2,
                waitlisted: 1,
                cancelled: 1,
                standby: 1,
                all_confirmed: false,
                any_waitlisted: true,
            }
        );
    }

    #[test]
    fn test_chart_prepared_ignores_cancelled_passengers() {
        let input = booking(json!([passenger("A", "C1"), passenger("B", "CXL")]));
        let status = process_train_booking(&input).unwrap();

        assert!(status.chart_prepared);
        assert!(!status.summary.all_confirmed);
    }

    #[test]
    fn test_chart_not_prepared_with_waitlist_or_unknown() {
        let waitlisted = booking(json!([passenger("A", "C1"), passenger("B", "WL1")]));
        assert!(!process_train_booking(&waitlisted).unwrap().chart_prepared);

        let unknown = booking(json!([passenger("A", "C1"), passenger("B", "RAC1")]));
        assert!(!process_train_booking(&unknown).unwrap().chart_prepared);
    }

    #[test]
    fn test_all_cancelled_is_chart_prepared() {
        let input = booking(json!([passenger("A", "CXL")]));
        let status = process_train_booking(&input).unwrap();
        assert!(status.chart_prepared);
        assert_eq!(status.summary.confirmed, 0);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let input = booking(json!([passenger("A", "C1"), passenger("B", "WL4")]));
        let before = input.clone();

        let first = process_train_booking(&input).unwrap();
        let second = process_train_booking(&input).unwrap();

        assert_eq!(first, second);
        assert_eq!(input, before);
    }

    #[test]
    fn test_missing_class_renders_empty() {
        let mut input = booking(json!([passenger("A", "C1")]));
        input.as_object_mut().unwrap().remove("classBooked");
        let status = process_train_booking(&input).unwrap();
        assert!(status.train_info.ends_with("| Class: "));
    }

    // ============================================================================
    // Validation tests
    // ============================================================================

    #[test]
    fn test_booking_must_be_object() {
        assert_eq!(
            process_train_booking(&Value::Null),
            Err(PipelineError::malformed("booking", Violation::NotAnObject))
        );
        assert!(process_train_booking(&json!([])).is_err());
    }

    #[test]
    fn test_booking_ref_must_be_ten_digit_string() {
        for booking_ref in [json!("123456789"), json!("12345678901"), json!("12345abcde"), json!(1234567890)] {
            let mut input = booking(json!([passenger("A", "C1")]));
            input["bookingRef"] = booking_ref;
            assert!(matches!(
                process_train_booking(&input),
                Err(PipelineError::Malformed {
                    violation: Violation::WrongKind {
                        field: "bookingRef",
                        ..
                    },
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_train_must_be_object() {
        let mut input = booking(json!([passenger("A", "C1")]));
        input["train"] = json!("1201");
        assert!(process_train_booking(&input).is_err());

        input.as_object_mut().unwrap().remove("train");
        assert_eq!(
            process_train_booking(&input),
            Err(PipelineError::malformed("booking", Violation::Missing("train")))
        );
    }

    #[test]
    fn test_passengers_must_be_non_empty_sequence_of_objects() {
        assert_eq!(
            process_train_booking(&booking(json!([]))),
            Err(PipelineError::malformed(
                "booking",
                Violation::Empty("passengers")
            ))
        );
        assert!(process_train_booking(&booking(json!({"name": "A"}))).is_err());
        assert!(process_train_booking(&booking(json!([passenger("A", "C1"), "B"]))).is_err());
    }

    #[test]
    fn test_output_field_names() {
        let input = booking(json!([passenger("A", "WL1")]));
        let output = serde_json::to_value(process_train_booking(&input).unwrap()).unwrap();

        assert_eq!(output["bookingRefFormatted"], "123-456-7890");
        assert_eq!(output["passengers"][0]["statusLabel"], "WAITLISTED");
        assert_eq!(output["passengers"][0]["isConfirmed"], false);
        assert_eq!(output["summary"]["anyWaitlisted"], true);
        assert_eq!(output["chartPrepared"], false);
    }

    #[test]
    fn test_process_train_booking_json() {
        let input = serde_json::to_string(&booking(json!([passenger("A", "C1")]))).unwrap();
        let status = process_train_booking_json(&input).unwrap();
        assert_eq!(status.summary.total_passengers, 1);
        assert!(process_train_booking_json("").is_err());
    }
}
