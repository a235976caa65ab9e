//! What the renderer draws: labels, the aggregated series and the
//! "Current Status" metric cards.

use pss_core::{returns::ReturnRecord, selection::SelectionState};
use pss_data::aggregation::{five_year_change, latest, trend, trend_of_change, AggregatedYearPoint, Trend};
use pss_utils::{
    format::{format_count, format_fahrenheit, format_signed_percent},
    PLACEHOLDER,
};
use serde::Serialize;

/// Provenance of the records behind a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSource {
    Mock,
    Live,
    Mixed,
    Empty,
}

impl SeriesSource {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a ReturnRecord>) -> Self {
        let (mut mock, mut live) = (false, false);
        for r in records {
            if r.source.is_mock() {
                mock = true;
            } else {
                live = true;
            }
        }
        match (mock, live) {
            (false, false) => SeriesSource::Empty,
            (true, false) => SeriesSource::Mock,
            (false, true) => SeriesSource::Live,
            (true, true) => SeriesSource::Mixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub unit: Option<&'static str>,
    pub trend: Trend,
    pub tooltip: &'static str,
}

impl MetricCard {
    pub fn latest_return(series: &[AggregatedYearPoint]) -> Self {
        Self {
            label: "Latest Return Estimate",
            value: latest(series)
                .map(|p| format_count(p.value))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            unit: Some("fish"),
            trend: trend(series),
            tooltip: "Most recent population count for selected watershed and species",
        }
    }

    pub fn five_year_trend(series: &[AggregatedYearPoint]) -> Self {
        let change = five_year_change(series);
        Self {
            label: "5-Year Trend",
            value: format_signed_percent(change),
            unit: None,
            trend: trend_of_change(change),
            tooltip: "Change in returns between five years ago and the latest year",
        }
    }

    /// `median_celsius` is `None` while readings are pending or unavailable.
    pub fn water_temperature(median_celsius: Option<f64>) -> Self {
        Self {
            label: "Water Temperature",
            value: format_fahrenheit(median_celsius),
            unit: median_celsius.map(|_| "°F"),
            trend: Trend::Stable,
            tooltip: "Median stream temperature across stations in the selected watershed",
        }
    }
}

/// A complete, render-ready snapshot for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: SelectionState,
    pub watershed_label: String,
    pub species_label: String,
    pub series: Vec<AggregatedYearPoint>,
    pub source: SeriesSource,
    pub cards: Vec<MetricCard>,
    /// Stations the temperature median was taken over
    pub stations_used: usize,
    /// Passage barriers in the selected area, when barrier data is loaded
    pub barrier_count: Option<usize>,
    /// No records match the current filters
    pub zero_state: bool,
    /// Human-readable notes about unavailable or placeholder data
    pub notices: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pss_core::returns::{Confidence, DataSource};

    fn points(pairs: &[(i32, u64)]) -> Vec<AggregatedYearPoint> {
        pairs
            .iter()
            .map(|&(year, value)| AggregatedYearPoint { year, value })
            .collect()
    }

    #[test]
    fn test_latest_return_card() {
        let card = MetricCard::latest_return(&points(&[(2022, 2500), (2023, 2847)]));
        assert_eq!(card.value, "2,847");
        assert_eq!(card.unit, Some("fish"));
        assert_eq!(card.trend, Trend::Up);

        let empty = MetricCard::latest_return(&[]);
        assert_eq!(empty.value, "—");
        assert_eq!(empty.trend, Trend::Stable);
    }

    #[test]
    fn test_five_year_card() {
        let card = MetricCard::five_year_trend(&points(&[(2018, 1000), (2020, 900), (2023, 1120)]));
        assert_eq!(card.value, "+12%");
        assert_eq!(card.trend, Trend::Up);

        let gap = MetricCard::five_year_trend(&points(&[(2019, 1000), (2023, 1120)]));
        assert_eq!(gap.value, "—");
        assert_eq!(gap.trend, Trend::Stable);
    }

    #[test]
    fn test_temperature_card() {
        let card = MetricCard::water_temperature(Some(14.55));
        assert_eq!(card.value, "58.2");
        assert_eq!(card.unit, Some("°F"));
        let missing = MetricCard::water_temperature(None);
        assert_eq!(missing.value, "—");
        assert_eq!(missing.unit, None);
    }

    #[test]
    fn test_card_json() {
        let card = MetricCard::water_temperature(None);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["label"], "Water Temperature");
        assert_eq!(json["unit"], serde_json::Value::Null);
        assert_eq!(json["trend"], "stable");
        assert_eq!(serde_json::to_value(SeriesSource::Mock).unwrap(), "mock");
    }

    #[test]
    fn test_series_source() {
        let rec = |source| ReturnRecord {
            watershed_id: "skagit".to_string(),
            species_id: "chinook".to_string(),
            year: 2023,
            count_estimate: 1,
            source,
            confidence: Confidence::Low,
        };
        let mock = rec(DataSource::FallbackMock);
        let live = rec(DataSource::Wdfw);
        assert_eq!(SeriesSource::of(Vec::<&ReturnRecord>::new()), SeriesSource::Empty);
        assert_eq!(SeriesSource::of([&mock]), SeriesSource::Mock);
        assert_eq!(SeriesSource::of([&live]), SeriesSource::Live);
        assert_eq!(SeriesSource::of([&mock, &live]), SeriesSource::Mixed);
    }
}
