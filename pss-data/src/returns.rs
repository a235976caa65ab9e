//! Return-series provider.
//!
//! Until live WDFW data is wired up for every watershed, each watershed's
//! series is synthesized from its latest known population: a ten-year
//! window ending at `latest_year`, ±20% uniform noise per year, and a
//! ×1.05 bump on the final two years. Synthesized records are tagged
//! `FALLBACK_MOCK` / low confidence.
//!
//! Series are computed on first use and kept for the lifetime of the
//! provider, so a chart re-rendered within one session never changes shape.

use log::{debug, info};
use pss_core::{
    returns::{Confidence, DataSource, ReturnRecord, YearRange},
    species::CHINOOK,
    watershed::{Watershed, WatershedCatalog},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
};

/// Number of years in a synthesized series.
pub const SERIES_YEARS: i32 = 10;
/// Floor applied to every synthesized estimate.
pub const MIN_ESTIMATE: u64 = 50;

const NOISE_LOW: f64 = 0.8;
const NOISE_HIGH: f64 = 1.2;
const RECENT_YEARS: i32 = 2;
const RECENT_MULTIPLIER: f64 = 1.05;

/// Per-watershed return series, memoized for the provider's lifetime.
///
/// Single-threaded by construction (`RefCell`); the dashboard session is
/// its only owner.
pub struct ReturnSeriesProvider {
    catalog: WatershedCatalog,
    cache: RefCell<HashMap<String, Vec<ReturnRecord>>>,
    rng: RefCell<StdRng>,
}

impl ReturnSeriesProvider {
    /// A fixed `seed` makes the synthesized series reproducible.
    pub fn new(catalog: WatershedCatalog, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            cache: RefCell::new(HashMap::new()),
            rng: RefCell::new(rng),
        }
    }

    pub fn catalog(&self) -> &WatershedCatalog {
        &self.catalog
    }

    /// Records for the given watershed, species and years. `None` skips
    /// filtering on that dimension.
    ///
    /// Output is ordered by catalog order of watersheds (live-only ids
    /// after, lexically), then species, then ascending year.
    pub fn query(
        &self,
        watershed_id: Option<&str>,
        species_id: Option<&str>,
        years: YearRange,
    ) -> Vec<ReturnRecord> {
        let ids = match watershed_id {
            Some(id) => vec![id.to_string()],
            None => self.watershed_ids(),
        };
        let mut results = Vec::new();
        for id in &ids {
            let Some(series) = self.series_for(id) else {
                debug!("[PSS] returns: no series for watershed {}", id);
                continue;
            };
            results.extend(series.into_iter().filter(|r| {
                species_id.map_or(true, |s| r.species_id == s) && years.contains(r.year)
            }));
        }
        results
    }

    /// Merge live records into the cached series.
    ///
    /// Replacement is per (watershed, species): a live response covering
    /// coho in one watershed leaves that watershed's other species, and
    /// every watershed it does not mention, untouched. Returns the number
    /// of (watershed, species) series replaced.
    pub fn ingest_live(&mut self, records: Vec<ReturnRecord>) -> usize {
        let mut grouped: BTreeMap<String, Vec<ReturnRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.watershed_id.clone()).or_default().push(record);
        }
        let mut replaced = 0;
        for (id, live) in grouped {
            let covered: BTreeSet<String> = live.iter().map(|r| r.species_id.clone()).collect();
            replaced += covered.len();
            let mut series = self.series_for(&id).unwrap_or_default();
            series.retain(|r| !covered.contains(&r.species_id));
            series.extend(live);
            series.sort_by(|a, b| (&a.species_id, a.year).cmp(&(&b.species_id, b.year)));
            series.dedup_by(|a, b| a.species_id == b.species_id && a.year == b.year);
            info!(
                "[PSS] returns: live {:?} for {}, {} records cached",
                covered,
                id,
                series.len()
            );
            self.cache.get_mut().insert(id, series);
        }
        replaced
    }

    fn watershed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.catalog.list().iter().map(|w| w.id.clone()).collect();
        let mut extra: Vec<String> = self
            .cache
            .borrow()
            .keys()
            .filter(|k| self.catalog.by_id(k).is_none())
            .cloned()
            .collect();
        extra.sort();
        ids.extend(extra);
        ids
    }

    fn series_for(&self, watershed_id: &str) -> Option<Vec<ReturnRecord>> {
        if let Some(series) = self.cache.borrow().get(watershed_id) {
            return Some(series.clone());
        }
        let watershed = self.catalog.by_id(watershed_id)?;
        let series = self.synthesize(watershed);
        debug!(
            "[PSS] returns: synthesized {} mock records for {}",
            series.len(),
            watershed_id
        );
        self.cache
            .borrow_mut()
            .insert(watershed_id.to_string(), series.clone());
        Some(series)
    }

    fn synthesize(&self, watershed: &Watershed) -> Vec<ReturnRecord> {
        let mut rng = self.rng.borrow_mut();
        let end_year = watershed.latest_year;
        let start_year = end_year - (SERIES_YEARS - 1);
        (start_year..=end_year)
            .map(|year| {
                let noise: f64 = rng.gen_range(NOISE_LOW..=NOISE_HIGH);
                let multiplier = if year > end_year - RECENT_YEARS {
                    RECENT_MULTIPLIER
                } else {
                    1.0
                };
                let estimate = (watershed.population as f64 * multiplier * noise).round() as u64;
                ReturnRecord {
                    watershed_id: watershed.id.clone(),
                    species_id: CHINOOK.to_string(),
                    year,
                    count_estimate: estimate.max(MIN_ESTIMATE),
                    source: DataSource::FallbackMock,
                    confidence: Confidence::Low,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(seed: u64) -> ReturnSeriesProvider {
        ReturnSeriesProvider::new(WatershedCatalog::puget_sound().unwrap(), Some(seed))
    }

    fn live(watershed: &str, year: i32, count: u64) -> ReturnRecord {
        ReturnRecord {
            watershed_id: watershed.to_string(),
            species_id: CHINOOK.to_string(),
            year,
            count_estimate: count,
            source: DataSource::Wdfw,
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_mock_series_shape() {
        let p = provider(7);
        let skagit = p.query(Some("skagit"), None, YearRange::default());
        assert_eq!(skagit.len(), SERIES_YEARS as usize);
        let years: Vec<i32> = skagit.iter().map(|r| r.year).collect();
        assert_eq!(years, (2014..=2023).collect::<Vec<i32>>());
        for r in &skagit {
            assert_eq!(r.source, DataSource::FallbackMock);
            assert_eq!(r.confidence, Confidence::Low);
            assert_eq!(r.species_id, CHINOOK);
            assert!(r.count_estimate >= MIN_ESTIMATE);
        }
    }

    #[test]
    fn test_mock_noise_is_bounded() {
        let p = provider(11);
        for r in p.query(None, None, YearRange::default()) {
            let w = p.catalog().by_id(&r.watershed_id).unwrap();
            let pop = w.population as f64;
            let upper = (pop * NOISE_HIGH * RECENT_MULTIPLIER).round() as u64;
            let lower = ((pop * NOISE_LOW).round() as u64).max(MIN_ESTIMATE);
            assert!(r.count_estimate <= upper, "{:?}", r);
            assert!(r.count_estimate >= lower, "{:?}", r);
        }
    }

    #[test]
    fn test_memoized_within_provider() {
        let p = provider(3);
        let first = p.query(Some("green"), None, YearRange::default());
        let _others = p.query(None, None, YearRange::default());
        let second = p.query(Some("green"), None, YearRange::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = provider(42).query(None, None, YearRange::default());
        let b = provider(42).query(None, None, YearRange::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_filters() {
        let p = provider(1);
        assert_eq!(p.query(None, None, YearRange::default()).len(), 8 * SERIES_YEARS as usize);
        assert!(p.query(None, Some("coho"), YearRange::default()).is_empty());
        assert_eq!(p.query(None, Some(CHINOOK), YearRange::default()).len(), 80);
        let recent = p.query(Some("cedar"), None, YearRange::new(Some(2021), None));
        assert_eq!(recent.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2021, 2022, 2023]);
        assert!(p.query(Some("elwha"), None, YearRange::default()).is_empty());
    }

    #[test]
    fn test_query_keeps_catalog_order() {
        let p = provider(5);
        let records = p.query(None, None, YearRange::default());
        assert_eq!(records.first().unwrap().watershed_id, "skagit");
        assert_eq!(records.last().unwrap().watershed_id, "nisqually");
    }

    #[test]
    fn test_ingest_live_replaces_only_covered_watersheds() {
        let mut p = provider(9);
        let mock_green = p.query(Some("green"), None, YearRange::default());
        let replaced = p.ingest_live(vec![live("skagit", 2024, 11184), live("skagit", 2023, 10400)]);
        assert_eq!(replaced, 1);

        let skagit = p.query(Some("skagit"), None, YearRange::default());
        assert_eq!(skagit.len(), 2);
        assert_eq!(skagit[0].year, 2023);
        assert_eq!(skagit[1].count_estimate, 11184);
        assert!(skagit.iter().all(|r| r.source == DataSource::Wdfw));
        assert_eq!(p.query(Some("green"), None, YearRange::default()), mock_green);
    }

    #[test]
    fn test_ingest_live_keeps_other_species() {
        let mut p = provider(9);
        let mock_chinook = p.query(Some("skagit"), Some(CHINOOK), YearRange::default());
        let coho = ReturnRecord {
            species_id: "coho".to_string(),
            ..live("skagit", 2023, 5200)
        };
        assert_eq!(p.ingest_live(vec![coho.clone()]), 1);

        assert_eq!(p.query(Some("skagit"), Some(CHINOOK), YearRange::default()), mock_chinook);
        assert_eq!(p.query(Some("skagit"), Some("coho"), YearRange::default()), vec![coho]);
        // watersheds never queried before still synthesize their chinook series
        let mut fresh = provider(9);
        fresh.ingest_live(vec![ReturnRecord {
            species_id: "coho".to_string(),
            ..live("cedar", 2023, 300)
        }]);
        assert_eq!(fresh.query(Some("cedar"), Some(CHINOOK), YearRange::default()).len(), 10);
    }

    #[test]
    fn test_live_only_watershed_listed_after_catalog() {
        let mut p = provider(9);
        p.ingest_live(vec![live("elwha", 2023, 4000)]);
        let records = p.query(None, None, YearRange::default());
        assert_eq!(records.last().unwrap().watershed_id, "elwha");
        assert_eq!(records.len(), 8 * SERIES_YEARS as usize + 1);
    }
}
