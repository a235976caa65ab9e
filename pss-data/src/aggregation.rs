//! Per-year aggregation of return estimates and the metrics derived from it.

use pss_core::{
    error::{DashboardError, Result},
    returns::ReturnRecord,
    selection::SelectionState,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Total return estimate for one year across the filtered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregatedYearPoint {
    pub year: i32,
    pub value: u64,
}

/// Direction of the latest movement in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Records whose watershed and species pass the selection; "all" bypasses
/// a dimension.
pub fn filter_records<'a>(
    records: &'a [ReturnRecord],
    selection: &SelectionState,
) -> Vec<&'a ReturnRecord> {
    records
        .iter()
        .filter(|r| selection.watershed.matches(&r.watershed_id))
        .filter(|r| selection.species.matches(&r.species_id))
        .collect()
}

/// Sum `count_estimate` per year. One point per distinct year, ascending,
/// gaps left unfilled.
pub fn aggregate_by_year<'a, I>(records: I) -> Vec<AggregatedYearPoint>
where
    I: IntoIterator<Item = &'a ReturnRecord>,
{
    let mut totals: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.year).or_default() += record.count_estimate;
    }
    totals
        .into_iter()
        .map(|(year, value)| AggregatedYearPoint { year, value })
        .collect()
}

/// Compare the last two points. Fewer than two points is stable.
pub fn trend(series: &[AggregatedYearPoint]) -> Trend {
    match series {
        [.., prev, last] if last.value > prev.value => Trend::Up,
        [.., prev, last] if last.value < prev.value => Trend::Down,
        _ => Trend::Stable,
    }
}

/// Direction implied by a percent change; absent is stable.
pub fn trend_of_change(pct: Option<f64>) -> Trend {
    match pct {
        Some(p) if p > 0.0 => Trend::Up,
        Some(p) if p < 0.0 => Trend::Down,
        _ => Trend::Stable,
    }
}

pub fn latest(series: &[AggregatedYearPoint]) -> Option<&AggregatedYearPoint> {
    series.last()
}

/// Change from `from_year` to the latest point, in percent.
///
/// `None` when the series is empty, `from_year` has no point, or its
/// value is zero.
pub fn percent_change(series: &[AggregatedYearPoint], from_year: i32) -> Option<f64> {
    let last = latest(series)?;
    let base = series.iter().find(|p| p.year == from_year)?;
    if base.value == 0 {
        return None;
    }
    let base_value = base.value as f64;
    Some((last.value as f64 - base_value) / base_value * 100.0)
}

/// Percent change over the five years leading up to the latest point.
pub fn five_year_change(series: &[AggregatedYearPoint]) -> Option<f64> {
    let last = latest(series)?;
    percent_change(series, last.year - 5)
}

/// Zero-state check for callers that want `?`.
pub fn require_points(series: &[AggregatedYearPoint]) -> Result<&[AggregatedYearPoint]> {
    if series.is_empty() {
        Err(DashboardError::EmptyAggregation)
    } else {
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use pss_core::{
        returns::{Confidence, DataSource},
        selection::Filter,
    };
    use pss_utils::format::format_signed_percent;

    fn record(watershed: &str, species: &str, year: i32, count: u64) -> ReturnRecord {
        ReturnRecord {
            watershed_id: watershed.to_string(),
            species_id: species.to_string(),
            year,
            count_estimate: count,
            source: DataSource::FallbackMock,
            confidence: Confidence::Low,
        }
    }

    fn points(pairs: &[(i32, u64)]) -> Vec<AggregatedYearPoint> {
        pairs
            .iter()
            .map(|&(year, value)| AggregatedYearPoint { year, value })
            .collect()
    }

    #[test]
    fn test_aggregate_sums_per_year_ascending() {
        let records = vec![
            record("skagit", "chinook", 2021, 100),
            record("green", "chinook", 2019, 40),
            record("skagit", "coho", 2021, 25),
            record("green", "chinook", 2023, 60),
        ];
        let series = aggregate_by_year(&records);
        assert_eq!(series, points(&[(2019, 40), (2021, 125), (2023, 60)]));
    }

    #[test]
    fn test_filter_records() {
        let records = vec![
            record("skagit", "chinook", 2021, 100),
            record("skagit", "coho", 2021, 25),
            record("green", "chinook", 2021, 60),
        ];
        let all = SelectionState::default();
        assert_eq!(filter_records(&records, &all).len(), 3);

        let skagit = SelectionState::new("skagit", "all");
        assert_eq!(aggregate_by_year(filter_records(&records, &skagit)), points(&[(2021, 125)]));

        let chinook = SelectionState::new("all", "chinook");
        assert_eq!(aggregate_by_year(filter_records(&records, &chinook)), points(&[(2021, 160)]));

        let nothing = SelectionState {
            watershed: Filter::only("elwha"),
            species: Filter::All,
        };
        assert!(filter_records(&records, &nothing).is_empty());
    }

    #[test]
    fn test_trend() {
        assert_eq!(trend(&[]), Trend::Stable);
        assert_eq!(trend(&points(&[(2020, 5)])), Trend::Stable);
        assert_eq!(trend(&points(&[(2020, 5), (2021, 5)])), Trend::Stable);
        assert_eq!(trend(&points(&[(2019, 1), (2020, 5), (2021, 6)])), Trend::Up);
        assert_eq!(trend(&points(&[(2019, 9), (2020, 5), (2021, 4)])), Trend::Down);
    }

    #[test]
    fn test_percent_change_scenarios() {
        let series = points(&[(2019, 900), (2024, 1200)]);
        let pct = percent_change(&series, 2019);
        assert!((pct.unwrap() - 33.333).abs() < 0.001);
        assert_eq!(format_signed_percent(pct), "+33%");

        let zero_base = points(&[(2019, 0), (2024, 500)]);
        assert_eq!(percent_change(&zero_base, 2019), None);
    }

    #[test]
    fn test_percent_change_missing_endpoints() {
        assert_eq!(percent_change(&[], 2019), None);
        let series = points(&[(2020, 900), (2024, 1200)]);
        assert_eq!(percent_change(&series, 2019), None);
    }

    #[test]
    fn test_percent_change_negative() {
        let series = points(&[(2018, 1000), (2023, 750)]);
        assert_eq!(percent_change(&series, 2018), Some(-25.0));
        assert_eq!(five_year_change(&series), Some(-25.0));
        assert_eq!(trend_of_change(five_year_change(&series)), Trend::Down);
    }

    #[test]
    fn test_require_points() {
        assert_eq!(require_points(&[]), Err(DashboardError::EmptyAggregation));
        assert!(require_points(&points(&[(2020, 1)])).is_ok());
    }

    proptest! {
        #[test]
        fn prop_years_strictly_increasing(
            raw in prop::collection::vec((0usize..3, 0usize..3, 2000i32..2030, 0u64..50_000), 0..200),
            w in 0usize..4,
            s in 0usize..4,
        ) {
            const WATERSHEDS: [&str; 3] = ["skagit", "green", "cedar"];
            const SPECIES: [&str; 3] = ["chinook", "coho", "chum"];
            let records: Vec<ReturnRecord> = raw
                .iter()
                .map(|&(wi, si, year, count)| record(WATERSHEDS[wi], SPECIES[si], year, count))
                .collect();
            // index 3 stands for "all"
            let selection = SelectionState::new(
                WATERSHEDS.get(w).copied().unwrap_or("all"),
                SPECIES.get(s).copied().unwrap_or("all"),
            );
            let filtered = filter_records(&records, &selection);
            let expected_total: u64 = filtered.iter().map(|r| r.count_estimate).sum();
            let series = aggregate_by_year(filtered);
            prop_assert!(series.windows(2).all(|p| p[0].year < p[1].year));
            prop_assert_eq!(series.iter().map(|p| p.value).sum::<u64>(), expected_total);
        }
    }
}
