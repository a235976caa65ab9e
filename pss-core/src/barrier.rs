use crate::{
    error::Result,
    geo::Located,
    payload::{self, Row},
    watershed::Watershed,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// How passable a culvert or dam is for migrating fish (WSDOT inventory).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Passability {
    Barrier,
    Partial,
    Passable,
    Unknown,
}

impl Passability {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "barrier" | "total" | "0" => Passability::Barrier,
            "partial" | "33" | "67" => Passability::Partial,
            "passable" | "100" => Passability::Passable,
            _ => Passability::Unknown,
        }
    }

    /// Counts toward the watershed's barrier total.
    pub fn blocks_passage(&self) -> bool {
        matches!(self, Passability::Barrier | Passability::Partial)
    }
}

/// A fish-passage barrier site from the `/api/barriers` proxy.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BarrierSite {
    pub site_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub passability: Passability,
}

impl Located for BarrierSite {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn row_to_barrier(row: &Row) -> Option<BarrierSite> {
    Some(BarrierSite {
        site_id: payload::string(row, &["siteId", "site_id"]).unwrap_or_default(),
        latitude: payload::number(row, &["latitude", "lat"])?,
        longitude: payload::number(row, &["longitude", "lon", "lng"])?,
        passability: payload::string(row, &["passability"])
            .map(|p| Passability::parse(&p))
            .unwrap_or(Passability::Unknown),
    })
}

/// Convert a `/api/barriers` response body into barrier sites.
pub fn parse_barrier_payload(body: &str) -> Result<Vec<BarrierSite>> {
    let rows = payload::parse_rows(body, "/api/barriers")?;
    let total = rows.len();
    let sites: Vec<BarrierSite> = rows.iter().filter_map(row_to_barrier).collect();
    if sites.len() < total {
        warn!(
            "[PSS] barriers: dropped {} of {} rows without coordinates",
            total - sites.len(),
            total
        );
    }
    Ok(sites)
}

/// Sites inside the watershed's bounding box that block passage.
///
/// Unlike station readings there is no fallback: zero barriers is a
/// meaningful answer.
pub fn barriers_in_watershed<'a>(
    sites: &'a [BarrierSite],
    watershed: &Watershed,
) -> Vec<&'a BarrierSite> {
    sites
        .iter()
        .filter(|s| s.passability.blocks_passage())
        .filter(|s| watershed.bounding_box.contains_point(*s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watershed::WatershedCatalog;

    const BODY: &str = r#"[
        {"siteId":"991203","latitude":48.52,"longitude":-122.21,"passability":"barrier"},
        {"siteId":"991204","latitude":48.60,"longitude":-122.10,"passability":"67"},
        {"siteId":"991205","latitude":48.61,"longitude":-122.11,"passability":"passable"},
        {"siteId":"994410","latitude":47.05,"longitude":-122.00,"passability":"barrier"},
        {"siteId":"994411","passability":"barrier"}
    ]"#;

    #[test]
    fn test_parse_barrier_payload() {
        let sites = parse_barrier_payload(BODY).unwrap();
        assert_eq!(sites.len(), 4);
        assert_eq!(sites[1].passability, Passability::Partial);
        assert_eq!(sites[2].passability, Passability::Passable);
    }

    #[test]
    fn test_barriers_in_watershed() {
        let catalog = WatershedCatalog::puget_sound().unwrap();
        let sites = parse_barrier_payload(BODY).unwrap();
        let skagit = catalog.by_id("skagit").unwrap();
        assert_eq!(barriers_in_watershed(&sites, skagit).len(), 2);
        let cedar = catalog.by_id("cedar").unwrap();
        assert!(barriers_in_watershed(&sites, cedar).is_empty());
    }
}
