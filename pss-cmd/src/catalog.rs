//! Catalog browsing: watershed list, single basin, regional summary.

use pss_core::{error::DashboardError, watershed::WatershedCatalog};
use pss_data::health::{RegionSummary, WatershedHealth};
use pss_utils::{
    format::{format_count, format_percent},
    PLACEHOLDER,
};

pub fn run_watersheds(json: bool) -> anyhow::Result<()> {
    let catalog = WatershedCatalog::puget_sound()?;
    let health: Vec<WatershedHealth> = catalog.list().iter().map(WatershedHealth::of).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }
    println!(
        "{:<16} {:<18} {:>10} {:>10} {:>8}  {}",
        "SLUG", "NAME", "POPULATION", "TARGET", "PCT", "STATUS"
    );
    for (watershed, h) in catalog.list().iter().zip(&health) {
        println!("{}", health_row(&watershed.slug, h));
    }
    Ok(())
}

pub fn run_basin(slug: &str) -> anyhow::Result<()> {
    let catalog = WatershedCatalog::puget_sound()?;
    let watershed = match catalog.require_slug(slug) {
        Ok(w) => w,
        Err(DashboardError::NotFound(missing)) => {
            println!("{}: {}", missing, PLACEHOLDER);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let health = WatershedHealth::of(watershed);
    let bbox = &watershed.bounding_box;
    println!("{} ({})", watershed.name, watershed.region);
    println!("  status:          {}", watershed.status.label());
    println!(
        "  population:      {} ({})",
        format_count(watershed.population),
        watershed.latest_year
    );
    println!(
        "  recovery target: {} by {}",
        format_count(watershed.recovery_target),
        watershed.target_year
    );
    println!(
        "  health:          {} of target, {}",
        format_percent(health.percent_of_target),
        health.status.label()
    );
    println!(
        "  bounds:          {:.2}..{:.2} N, {:.2}..{:.2} E",
        bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
    );
    Ok(())
}

pub fn run_summary(json: bool) -> anyhow::Result<()> {
    let catalog = WatershedCatalog::puget_sound()?;
    let summary = RegionSummary::of(&catalog);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Puget Sound: {} watersheds", summary.watershed_count);
    println!("  population:   {}", format_count(summary.total_population));
    println!("  target:       {}", format_count(summary.total_target));
    println!("  of target:    {}", format_percent(summary.percent_of_target));
    println!("  recovery gap: {}", format_count(summary.recovery_gap));
    println!("  status:       {}", summary.status.label());
    Ok(())
}

fn health_row(slug: &str, h: &WatershedHealth) -> String {
    format!(
        "{:<16} {:<18} {:>10} {:>10} {:>8}  {}",
        slug,
        h.name,
        format_count(h.population),
        format_count(h.recovery_target),
        format_percent(h.percent_of_target),
        h.status.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_row() {
        let catalog = WatershedCatalog::puget_sound().unwrap();
        let skagit = catalog.require_slug("skagit").unwrap();
        let row = health_row(&skagit.slug, &WatershedHealth::of(skagit));
        assert!(row.starts_with("skagit"));
        assert!(row.contains("8,500"));
        assert!(row.contains("35,000"));
        assert!(row.ends_with("Threatened"));
    }

    #[test]
    fn test_unknown_basin_is_not_an_error() {
        assert!(run_basin("elwha").is_ok());
    }
}
