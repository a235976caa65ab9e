use crate::{
    error::Result,
    payload::{self, Row},
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a return estimate came from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Synthesized placeholder series, not real data
    FallbackMock,
    /// WDFW Salmonid Population Indicators, via the `/api/wdfw` proxy
    Wdfw,
}

impl DataSource {
    pub fn is_mock(&self) -> bool {
        matches!(self, DataSource::FallbackMock)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::FallbackMock => f.write_str("FALLBACK_MOCK"),
            DataSource::Wdfw => f.write_str("WDFW"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

/// A spawner return estimate for one (watershed, species, year).
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub watershed_id: String,
    pub species_id: String,
    pub year: i32,
    pub count_estimate: u64,
    pub source: DataSource,
    pub confidence: Confidence,
}

/// Inclusive year bounds; either side may be open.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start.map_or(true, |s| year >= s) && self.end.map_or(true, |e| year <= e)
    }
}

fn row_to_record(row: &Row) -> Option<ReturnRecord> {
    let watershed_id = payload::string(row, &["watershedId", "watershed_id"])?;
    let species_id = payload::string(row, &["speciesId", "species_id", "species"])?.to_lowercase();
    let year = i32::try_from(payload::integer(row, &["year"])?).ok()?;
    let count_estimate = u64::try_from(payload::integer(row, &["countEstimate", "count_estimate"])?).ok()?;
    let confidence = payload::string(row, &["confidence"])
        .and_then(|c| Confidence::parse(&c))
        .unwrap_or(Confidence::Medium);
    Some(ReturnRecord {
        watershed_id,
        species_id,
        year,
        count_estimate,
        source: DataSource::Wdfw,
        confidence,
    })
}

/// Convert a `/api/wdfw` response body into return records.
///
/// Rows without a watershed, species, whole year, or non-negative whole
/// count are dropped. Confidence defaults to medium when absent.
pub fn parse_return_payload(body: &str) -> Result<Vec<ReturnRecord>> {
    let rows = payload::parse_rows(body, "/api/wdfw")?;
    let total = rows.len();
    let records: Vec<ReturnRecord> = rows.iter().filter_map(row_to_record).collect();
    if records.len() < total {
        warn!(
            "[PSS] wdfw: dropped {} of {} malformed return rows",
            total - records.len(),
            total
        );
    }
    Ok(records)
}
