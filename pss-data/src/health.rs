//! Population health relative to recovery targets.

use pss_core::watershed::{Watershed, WatershedCatalog};
use serde::Serialize;

/// Population as a percentage of its recovery target.
///
/// `None` when either value is non-finite or the target is not positive.
pub fn percent_of_target(population: f64, target: f64) -> Option<f64> {
    if !population.is_finite() || !target.is_finite() || target <= 0.0 {
        return None;
    }
    Some(population / target * 100.0)
}

/// Health bucket by percent of recovery target: under 5% critical,
/// under 10% endangered, under 25% threatened, otherwise stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Critical,
    Endangered,
    Threatened,
    Stable,
    Unknown,
}

impl HealthStatus {
    pub fn from_percent(pct: Option<f64>) -> Self {
        match pct {
            None => HealthStatus::Unknown,
            Some(p) if p < 5.0 => HealthStatus::Critical,
            Some(p) if p < 10.0 => HealthStatus::Endangered,
            Some(p) if p < 25.0 => HealthStatus::Threatened,
            Some(_) => HealthStatus::Stable,
        }
    }

    pub fn of(population: f64, target: f64) -> Self {
        Self::from_percent(percent_of_target(population, target))
    }

    pub fn color(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "#dc2626",
            HealthStatus::Endangered => "#ea580c",
            HealthStatus::Threatened => "#ca8a04",
            HealthStatus::Stable => "#22c55e",
            HealthStatus::Unknown => "#94a3b8",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "Critical",
            HealthStatus::Endangered => "Endangered",
            HealthStatus::Threatened => "Threatened",
            HealthStatus::Stable => "Stable",
            HealthStatus::Unknown => "Data unavailable",
        }
    }
}

/// Health of one watershed against its recovery target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatershedHealth {
    pub watershed_id: String,
    pub name: String,
    pub population: u64,
    pub recovery_target: u64,
    pub percent_of_target: Option<f64>,
    pub status: HealthStatus,
}

impl WatershedHealth {
    pub fn of(watershed: &Watershed) -> Self {
        let pct = percent_of_target(watershed.population as f64, watershed.recovery_target as f64);
        Self {
            watershed_id: watershed.id.clone(),
            name: watershed.name.clone(),
            population: watershed.population,
            recovery_target: watershed.recovery_target,
            percent_of_target: pct,
            status: HealthStatus::from_percent(pct),
        }
    }
}

/// Regional roll-up across every watershed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub watershed_count: usize,
    pub total_population: u64,
    pub total_target: u64,
    pub percent_of_target: Option<f64>,
    /// Additional spawners needed to reach the combined target
    pub recovery_gap: u64,
    pub status: HealthStatus,
    pub watersheds: Vec<WatershedHealth>,
}

impl RegionSummary {
    pub fn of(catalog: &WatershedCatalog) -> Self {
        let total_population: u64 = catalog.list().iter().map(|w| w.population).sum();
        let total_target: u64 = catalog.list().iter().map(|w| w.recovery_target).sum();
        let pct = percent_of_target(total_population as f64, total_target as f64);
        Self {
            watershed_count: catalog.len(),
            total_population,
            total_target,
            percent_of_target: pct,
            recovery_gap: total_target.saturating_sub(total_population),
            status: HealthStatus::from_percent(pct),
            watersheds: catalog.list().iter().map(WatershedHealth::of).collect(),
        }
    }
}
