//! Station reading statistics.

use log::debug;
use pss_core::{station::StationReading, watershed::Watershed};

/// Readings inside the watershed's bounding box (inclusive on every edge).
pub fn filter_by_watershed<'a>(
    stations: &'a [StationReading],
    watershed: &Watershed,
) -> Vec<&'a StationReading> {
    stations
        .iter()
        .filter(|s| watershed.bounding_box.contains_point(*s))
        .collect()
}

/// Readings to summarize for a watershed.
///
/// Falls back to the full set when the box holds no stations, and when the
/// watershed is unknown, so the temperature card never goes blank while any
/// live data exists.
// NOTE: the fallback may only exist because the station feed is sparse;
// kept for compatibility, see DESIGN.md.
pub fn readings_for_watershed<'a>(
    stations: &'a [StationReading],
    watershed: Option<&Watershed>,
) -> Vec<&'a StationReading> {
    let Some(watershed) = watershed else {
        return stations.iter().collect();
    };
    let inside = filter_by_watershed(stations, watershed);
    if inside.is_empty() {
        debug!(
            "[PSS] stations: none inside {}, using all {} readings",
            watershed.id,
            stations.len()
        );
        stations.iter().collect()
    } else {
        inside
    }
}

/// Median of a set of values; the mean of the two central values for even
/// lengths. `None` for empty input. Non-finite values are ignored.
pub fn median_of(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median water temperature (°C) across the given readings.
pub fn median<'a, I>(stations: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a StationReading>,
{
    median_of(stations.into_iter().map(|s| s.temperature_celsius))
}
