//! Live commands: station temperatures and the full dashboard.

use crate::GlobalOpts;
use log::info;
use pss_core::{api::ProxyClient, selection::Filter, watershed::WatershedCatalog};
use pss_dashboard::{session::DashboardSession, view::DashboardView};
use pss_data::stations::{median, readings_for_watershed};
use pss_utils::format::{format_count, format_fahrenheit};

pub async fn run_stations(opts: &GlobalOpts, watershed: &str) -> anyhow::Result<()> {
    let catalog = WatershedCatalog::puget_sound()?;
    let selected = catalog.resolve(&Filter::from(watershed));
    let client = ProxyClient::new(&opts.proxy_config())?;

    let stations = match client.fetch_stations().await {
        Ok(s) => s,
        Err(e) => {
            println!("Stream temperatures unavailable: {}", e);
            return Ok(());
        }
    };
    let used = readings_for_watershed(&stations, selected);
    for s in &used {
        println!(
            "{:<16} {:>9.4} {:>10.4} {:>6}°F  {}",
            s.site_code,
            s.latitude,
            s.longitude,
            format_fahrenheit(Some(s.temperature_celsius)),
            s.observed_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!(
        "{}: median {}°F across {} of {} stations",
        catalog.display_name(&Filter::from(watershed)),
        format_fahrenheit(median(used.iter().copied())),
        used.len(),
        stations.len()
    );
    Ok(())
}

/// Fetch stations, returns and barriers concurrently, then print the view.
pub async fn run_dashboard(
    opts: &GlobalOpts,
    watershed: &str,
    species: &str,
    offline: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = DashboardSession::puget_sound(opts.seed)?;
    session.select_watershed(watershed);
    session.select_species(species);

    if !offline {
        let client = ProxyClient::new(&opts.proxy_config())?;
        let selection = session.selection().current();
        let station_ticket = session.begin_station_fetch();
        let returns_ticket = session.begin_returns_fetch();
        let barrier_ticket = session.begin_barrier_fetch();
        info!("Fetching live data from {}", opts.api_base);
        let (stations, returns, barriers) = tokio::join!(
            client.fetch_stations(),
            client.fetch_returns(&selection),
            client.fetch_barriers()
        );
        session.complete_station_fetch(&station_ticket, stations);
        session.complete_returns_fetch(&returns_ticket, returns);
        session.complete_barrier_fetch(&barrier_ticket, barriers);
    }

    let view = session.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&view));
    }
    Ok(())
}

fn render(view: &DashboardView) -> String {
    let mut out = format!("{} / {}\n", view.watershed_label, view.species_label);
    if view.zero_state {
        out.push_str("No return data matches the current filters.\n");
    }
    for card in &view.cards {
        let unit = card.unit.map(|u| format!(" {}", u)).unwrap_or_default();
        out.push_str(&format!(
            "  {:<24} {}{} ({:?})\n",
            card.label, card.value, unit, card.trend
        ));
    }
    if let Some(count) = view.barrier_count {
        out.push_str(&format!("  {:<24} {}\n", "Passage Barriers", format_count(count as u64)));
    }
    if !view.series.is_empty() {
        out.push_str(&format!("  Returns by year ({:?}):\n", view.source));
        for point in &view.series {
            out.push_str(&format!("    {}  {:>8}\n", point.year, format_count(point.value)));
        }
    }
    for notice in &view.notices {
        out.push_str(&format!("  ! {}\n", notice));
    }
    out
}
