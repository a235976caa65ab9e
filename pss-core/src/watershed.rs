use crate::{
    error::{DashboardError, Result},
    geo::BoundingBox,
    selection::Filter,
};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Embedded CSV data for the Puget Sound Chinook watersheds.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/watersheds.csv");

/// Label used when the watershed filter is "all".
pub const ALL_WATERSHEDS_LABEL: &str = "All Puget Sound";

/// Map health status of a watershed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatershedStatus {
    Healthy,
    Caution,
    Concern,
}

impl WatershedStatus {
    /// Fill colour on the watershed map.
    pub fn color(&self) -> &'static str {
        match self {
            WatershedStatus::Healthy => "#22c55e",
            WatershedStatus::Caution => "#ca8a04",
            WatershedStatus::Concern => "#dc2626",
        }
    }

    /// Legend label on the watershed map.
    pub fn label(&self) -> &'static str {
        match self {
            WatershedStatus::Healthy => "Stable",
            WatershedStatus::Caution => "Threatened",
            WatershedStatus::Concern => "Critical",
        }
    }
}

impl FromStr for WatershedStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Ok(WatershedStatus::Healthy),
            "caution" => Ok(WatershedStatus::Caution),
            "concern" => Ok(WatershedStatus::Concern),
            other => anyhow::bail!("unknown watershed status: {}", other),
        }
    }
}

/// A Puget Sound drainage basin tracked as a unit of analysis.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Watershed {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub region: String,
    pub status: WatershedStatus,
    /// Latest known spawner count
    pub population: u64,
    /// Spawner count at which the population is considered recovered
    pub recovery_target: u64,
    /// Year of the latest population estimate
    pub latest_year: i32,
    /// Year the recovery target should be reached
    pub target_year: i32,
    pub bounding_box: BoundingBox,
}

/// Static, ordered list of watersheds.
#[derive(Debug, Clone, PartialEq)]
pub struct WatershedCatalog {
    watersheds: Vec<Watershed>,
}

impl WatershedCatalog {
    /// Catalog built from the embedded CSV.
    pub fn puget_sound() -> anyhow::Result<Self> {
        Self::from_csv(CSV_OBJECT)
    }

    pub fn from_csv(csv_object: &str) -> anyhow::Result<Self> {
        Ok(Self {
            watersheds: parse_watershed_csv(csv_object)?,
        })
    }

    pub fn new(watersheds: Vec<Watershed>) -> Self {
        Self { watersheds }
    }

    /// Watersheds in insertion order.
    pub fn list(&self) -> &[Watershed] {
        &self.watersheds
    }

    pub fn len(&self) -> usize {
        self.watersheds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watersheds.is_empty()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Watershed> {
        self.watersheds.iter().find(|w| w.slug == slug)
    }

    pub fn by_id(&self, id: &str) -> Option<&Watershed> {
        self.watersheds.iter().find(|w| w.id == id)
    }

    /// Like [`by_slug`](Self::by_slug) but as a `NotFound` error.
    pub fn require_slug(&self, slug: &str) -> Result<&Watershed> {
        self.by_slug(slug)
            .ok_or_else(|| DashboardError::NotFound(slug.to_string()))
    }

    /// Resolve a filter value, trying ids first then slugs.
    pub fn resolve(&self, filter: &Filter) -> Option<&Watershed> {
        let key = filter.id()?;
        self.by_id(key).or_else(|| self.by_slug(key))
    }

    /// Human label for a watershed filter. Unknown ids are shown verbatim.
    pub fn display_name(&self, filter: &Filter) -> String {
        match filter {
            Filter::All => ALL_WATERSHEDS_LABEL.to_string(),
            Filter::Only(id) => self
                .resolve(filter)
                .map(|w| w.name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }
}

fn parse_field<T>(record: &csv::StringRecord, idx: usize, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("missing column {} ({})", idx, name))?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("bad {} {:?}: {}", name, raw, e))
}

/// Parse a CSV string of watershed data.
///
/// Expected CSV columns: id, slug, name, region, status, population,
/// recovery_target, latest_year, target_year, min_lat, max_lat, min_lon, max_lon
pub fn parse_watershed_csv(csv_object: &str) -> anyhow::Result<Vec<Watershed>> {
    let mut watershed_list: Vec<Watershed> = Vec::new();
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(csv_object.as_bytes());
    for row in rdr.records() {
        let rho = row?;
        let watershed = Watershed {
            id: parse_field(&rho, 0, "id")?,
            slug: parse_field(&rho, 1, "slug")?,
            name: parse_field(&rho, 2, "name")?,
            region: parse_field(&rho, 3, "region")?,
            status: parse_field(&rho, 4, "status")?,
            population: parse_field(&rho, 5, "population")?,
            recovery_target: parse_field(&rho, 6, "recovery_target")?,
            latest_year: parse_field(&rho, 7, "latest_year")?,
            target_year: parse_field(&rho, 8, "target_year")?,
            bounding_box: BoundingBox {
                min_lat: parse_field(&rho, 9, "min_lat")?,
                max_lat: parse_field(&rho, 10, "max_lat")?,
                min_lon: parse_field(&rho, 11, "min_lon")?,
                max_lon: parse_field(&rho, 12, "max_lon")?,
            },
        };
        watershed_list.push(watershed);
    }
    Ok(watershed_list)
}
