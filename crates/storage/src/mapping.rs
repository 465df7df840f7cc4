//! Lenient conversion between persisted JSON and domain records.
//!
//! Persisted data may come from older app versions or be hand-edited, so
//! decoding never rejects a single entry outright. Drill results are
//! defaulted field by field; weekly-test entries that cannot be dated or
//! measured are dropped.

use brain_core::model::{
    CountingTestResult, DrillResult, LEGACY_DEFAULT_COUNT, Medal, ResultId, StroopTestResult,
    WeeklyTestData, WeeklyTestKind, WordMemoryTestResult,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::kv::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Persisted shape of a drill result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillResultRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub time_in_seconds: f64,
    pub problem_count: u32,
    pub correct_count: u32,
    pub medal: Medal,
}

impl DrillResultRecord {
    #[must_use]
    pub fn from_result(result: &DrillResult) -> Self {
        Self {
            id: result.id().to_string(),
            date: result
                .date()
                .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            time_in_seconds: result.time_in_seconds(),
            problem_count: result.problem_count(),
            correct_count: result.correct_count(),
            medal: result.medal(),
        }
    }
}

/// A decoded collection together with how many entries needed repair.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub repaired: usize,
}

/// Serialize drill results in log order.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_results(results: &[DrillResult]) -> Result<String, StorageError> {
    let records: Vec<DrillResultRecord> = results.iter().map(DrillResultRecord::from_result).collect();
    serde_json::to_string(&records).map_err(ser)
}

/// Parse a persisted drill-result array, defaulting malformed fields.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if `raw` is not a JSON array.
pub fn decode_results(raw: &str) -> Result<Decoded<Vec<DrillResult>>, StorageError> {
    let value: Value = serde_json::from_str(raw).map_err(ser)?;
    let Value::Array(entries) = value else {
        return Err(StorageError::Serialization(
            "drill results are not an array".into(),
        ));
    };

    let mut repaired = 0;
    let results = entries
        .iter()
        .map(|entry| {
            let (result, clean) = result_from_value(entry);
            if !clean {
                repaired += 1;
            }
            result
        })
        .collect();

    Ok(Decoded {
        value: results,
        repaired,
    })
}

/// Returns the result and whether every field was present and valid.
fn result_from_value(entry: &Value) -> (DrillResult, bool) {
    let empty = Map::new();
    let fields = entry.as_object().unwrap_or(&empty);
    let mut clean = entry.is_object();

    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ResultId>().ok())
        .unwrap_or_else(|| {
            clean = false;
            ResultId::generate()
        });

    let date = match fields.get("date").and_then(parse_date) {
        Some(date) => Some(date),
        None => {
            clean = false;
            fields.get("timestamp").and_then(parse_date)
        }
    };

    let time_in_seconds = fields
        .get("timeInSeconds")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| {
            clean = false;
            0.0
        });

    let mut count = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or_else(|| {
                clean = false;
                LEGACY_DEFAULT_COUNT
            })
    };
    let problem_count = count("problemCount");
    let correct_count = count("correctCount");

    let medal = fields
        .get("medal")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Medal>().ok())
        .unwrap_or_else(|| {
            clean = false;
            Medal::None
        });

    let result = DrillResult::from_persisted(
        id,
        date,
        time_in_seconds,
        problem_count,
        correct_count,
        medal,
    );
    (result, clean)
}

/// Accepts ISO-8601 strings and epoch milliseconds.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Serialize weekly-test data.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_weekly(data: &WeeklyTestData) -> Result<String, StorageError> {
    serde_json::to_string(data).map_err(ser)
}

/// Parse persisted weekly-test data, dropping entries that cannot be read.
///
/// A missing or non-array stream reads as empty.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if `raw` is not a JSON object.
pub fn decode_weekly(raw: &str) -> Result<Decoded<WeeklyTestData>, StorageError> {
    let value: Value = serde_json::from_str(raw).map_err(ser)?;
    let Value::Object(fields) = value else {
        return Err(StorageError::Serialization(
            "weekly tests are not an object".into(),
        ));
    };

    let mut repaired = 0;
    let data = WeeklyTestData {
        counting_test: decode_stream(&fields, WeeklyTestKind::Counting, &mut repaired, |e| {
            timed(e).map(|(date, time)| CountingTestResult { date, time })
        }),
        word_memory_test: decode_stream(
            &fields,
            WeeklyTestKind::WordMemory,
            &mut repaired,
            word_memory,
        ),
        stroop_test: decode_stream(&fields, WeeklyTestKind::Stroop, &mut repaired, |e| {
            timed(e).map(|(date, time)| StroopTestResult { date, time })
        }),
    };

    Ok(Decoded {
        value: data,
        repaired,
    })
}

fn decode_stream<T>(
    fields: &Map<String, Value>,
    kind: WeeklyTestKind,
    repaired: &mut usize,
    parse: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    let entries = match fields.get(kind.storage_field()) {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            *repaired += 1;
            return Vec::new();
        }
        None => return Vec::new(),
    };
    let parsed: Vec<T> = entries.iter().filter_map(&parse).collect();
    *repaired += entries.len() - parsed.len();
    parsed
}

fn timed(entry: &Value) -> Option<(DateTime<Utc>, f64)> {
    let date = entry.get("date").and_then(parse_date)?;
    let time = entry.get("time").and_then(Value::as_f64)?;
    Some((date, time))
}

fn word_memory(entry: &Value) -> Option<WordMemoryTestResult> {
    let count = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    Some(WordMemoryTestResult {
        date: entry.get("date").and_then(parse_date)?,
        words_presented_count: count("wordsPresentedCount")?,
        words_recalled_count: count("wordsRecalledCount")?,
    })
}
