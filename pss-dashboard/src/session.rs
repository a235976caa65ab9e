//! The dashboard session: one owner for catalogs, caches, live snapshots
//! and the selection.

use crate::{
    fetch::{FetchTicket, FetchTracker},
    selection::SelectionController,
    view::{DashboardView, MetricCard, SeriesSource},
};
use log::{info, warn};
use pss_core::{
    barrier::{barriers_in_watershed, BarrierSite},
    error::Result,
    returns::{ReturnRecord, YearRange},
    selection::{Filter, SelectionState},
    species::SpeciesCatalog,
    station::StationReading,
    watershed::{Watershed, WatershedCatalog},
};
use pss_data::{
    aggregation::{aggregate_by_year, filter_records},
    returns::ReturnSeriesProvider,
    stations::{median, readings_for_watershed},
};

/// State of a data set that arrives from the proxy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Snapshot<T> {
    #[default]
    Pending,
    Unavailable(String),
    Ready(T),
}

impl<T> Snapshot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Snapshot::Ready(value) => Some(value),
            _ => None,
        }
    }

    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Snapshot::Ready(value),
            Err(e) => Snapshot::Unavailable(e.to_string()),
        }
    }
}

pub struct DashboardSession {
    species: SpeciesCatalog,
    provider: ReturnSeriesProvider,
    selection: SelectionController,
    stations: Snapshot<Vec<StationReading>>,
    barriers: Snapshot<Vec<BarrierSite>>,
    /// (watershed, species) series replaced by the last accepted live fetch
    live_returns: Snapshot<usize>,
    station_fetches: FetchTracker,
    return_fetches: FetchTracker,
    barrier_fetches: FetchTracker,
}

impl DashboardSession {
    pub fn new(watersheds: WatershedCatalog, species: SpeciesCatalog, seed: Option<u64>) -> Self {
        Self {
            species,
            provider: ReturnSeriesProvider::new(watersheds, seed),
            selection: SelectionController::default(),
            stations: Snapshot::Pending,
            barriers: Snapshot::Pending,
            live_returns: Snapshot::Pending,
            station_fetches: FetchTracker::new("usgs"),
            return_fetches: FetchTracker::new("wdfw"),
            barrier_fetches: FetchTracker::new("barriers"),
        }
    }

    /// Session over the embedded Puget Sound watersheds and salmon species.
    pub fn puget_sound(seed: Option<u64>) -> anyhow::Result<Self> {
        Ok(Self::new(
            WatershedCatalog::puget_sound()?,
            SpeciesCatalog::pacific_salmon()?,
            seed,
        ))
    }

    pub fn watersheds(&self) -> &WatershedCatalog {
        self.provider.catalog()
    }

    pub fn species(&self) -> &SpeciesCatalog {
        &self.species
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn select_watershed(&self, watershed: impl Into<Filter>) {
        self.selection.set_watershed(watershed);
    }

    pub fn select_species(&self, species: impl Into<Filter>) {
        self.selection.set_species(species);
    }

    pub fn stations(&self) -> &Snapshot<Vec<StationReading>> {
        &self.stations
    }

    pub fn barriers(&self) -> &Snapshot<Vec<BarrierSite>> {
        &self.barriers
    }

    pub fn live_returns(&self) -> &Snapshot<usize> {
        &self.live_returns
    }

    pub fn begin_station_fetch(&mut self) -> FetchTicket<()> {
        self.station_fetches.issue(())
    }

    /// Apply a station response. Returns false when the ticket is stale.
    pub fn complete_station_fetch(
        &mut self,
        ticket: &FetchTicket<()>,
        result: Result<Vec<StationReading>>,
    ) -> bool {
        if !self.station_fetches.accept(ticket, &()) {
            return false;
        }
        match &result {
            Ok(readings) => info!("[PSS] session: {} station readings", readings.len()),
            Err(e) => warn!("[PSS] session: station readings unavailable: {}", e),
        }
        self.stations = Snapshot::from_result(result);
        true
    }

    /// Start a returns fetch for the current selection. The selection is
    /// what the response will be checked against.
    pub fn begin_returns_fetch(&mut self) -> FetchTicket<SelectionState> {
        let current = self.selection.current();
        self.return_fetches.issue(current)
    }

    /// Apply a returns response if it is the newest and the selection has
    /// not moved since it was issued. A failure leaves mock series in place.
    pub fn complete_returns_fetch(
        &mut self,
        ticket: &FetchTicket<SelectionState>,
        result: Result<Vec<ReturnRecord>>,
    ) -> bool {
        let current = self.selection.current();
        if !self.return_fetches.accept(ticket, &current) {
            return false;
        }
        self.live_returns = match result {
            Ok(records) => Snapshot::Ready(self.provider.ingest_live(records)),
            Err(e) => {
                warn!("[PSS] session: live returns unavailable, keeping mock: {}", e);
                Snapshot::Unavailable(e.to_string())
            }
        };
        true
    }

    pub fn begin_barrier_fetch(&mut self) -> FetchTicket<()> {
        self.barrier_fetches.issue(())
    }

    pub fn complete_barrier_fetch(
        &mut self,
        ticket: &FetchTicket<()>,
        result: Result<Vec<BarrierSite>>,
    ) -> bool {
        if !self.barrier_fetches.accept(ticket, &()) {
            return false;
        }
        if let Err(e) = &result {
            warn!("[PSS] session: barrier sites unavailable: {}", e);
        }
        self.barriers = Snapshot::from_result(result);
        true
    }

    /// Return records matching the current selection, in provider order.
    pub fn records(&self) -> Vec<ReturnRecord> {
        let selection = self.resolved_selection();
        let all = self.provider.query(None, None, YearRange::default());
        filter_records(&all, &selection).into_iter().cloned().collect()
    }

    /// Build everything the renderer needs for the current selection.
    pub fn view(&self) -> DashboardView {
        let selection = self.selection.current();
        let watershed = self.watersheds().resolve(&selection.watershed);
        let records = self.records();
        let series = aggregate_by_year(&records);

        let station_set = self
            .stations
            .ready()
            .map(|all| readings_for_watershed(all, watershed));
        let temperature = station_set.as_ref().and_then(|set| median(set.iter().copied()));
        let stations_used = station_set.as_ref().map_or(0, Vec::len);

        let mut notices = Vec::new();
        if self.return_fetches.in_flight() {
            notices.push("Live return data loading".to_string());
        }
        if let Snapshot::Unavailable(reason) = &self.live_returns {
            notices.push(format!("Live return data unavailable, showing estimates ({})", reason));
        }
        match &self.stations {
            Snapshot::Pending => notices.push("Stream temperatures loading".to_string()),
            Snapshot::Unavailable(reason) => {
                notices.push(format!("Stream temperatures unavailable ({})", reason))
            }
            Snapshot::Ready(_) => {}
        }
        if let Snapshot::Unavailable(reason) = &self.barriers {
            notices.push(format!("Barrier data unavailable ({})", reason));
        }

        DashboardView {
            watershed_label: self.watersheds().display_name(&selection.watershed),
            species_label: self.species.display_name(&selection.species),
            source: SeriesSource::of(&records),
            cards: vec![
                MetricCard::latest_return(&series),
                MetricCard::five_year_trend(&series),
                MetricCard::water_temperature(temperature),
            ],
            stations_used,
            barrier_count: self.barrier_count(&selection.watershed, watershed),
            zero_state: series.is_empty(),
            notices,
            series,
            selection,
        }
    }

    /// Blocking barriers in the selected watershed, or across the whole
    /// region for "all". `None` until barrier data arrives, and for ids the
    /// catalog does not know.
    fn barrier_count(&self, filter: &Filter, watershed: Option<&Watershed>) -> Option<usize> {
        let sites = self.barriers.ready()?;
        match (filter, watershed) {
            (Filter::All, _) => Some(sites.iter().filter(|s| s.passability.blocks_passage()).count()),
            (_, Some(w)) => Some(barriers_in_watershed(sites, w).len()),
            (_, None) => None,
        }
    }

    /// The selection with slugs mapped onto catalog ids. Unknown values are
    /// kept as-is and simply match nothing.
    fn resolved_selection(&self) -> SelectionState {
        let current = self.selection.current();
        let watershed = match self.watersheds().resolve(&current.watershed) {
            Some(w) => Filter::only(&w.id),
            None => current.watershed,
        };
        let species = match current.species.id() {
            Some(key) => match self.species.by_id(key).or_else(|| self.species.by_slug(key)) {
                Some(s) => Filter::only(&s.id),
                None => current.species.clone(),
            },
            None => Filter::All,
        };
        SelectionState { watershed, species }
    }
}
