//! Return estimate export.

use crate::GlobalOpts;
use log::{info, warn};
use pss_core::{
    returns::{ReturnRecord, YearRange},
    selection::Filter,
    species::SpeciesCatalog,
    watershed::WatershedCatalog,
};
use pss_data::{aggregation::aggregate_by_year, returns::ReturnSeriesProvider};
use std::io::Write;

const RECORD_HEADER: [&str; 6] = [
    "watershed_id",
    "species_id",
    "year",
    "count_estimate",
    "source",
    "confidence",
];
const YEAR_HEADER: [&str; 2] = ["year", "value"];

/// Write return records for the selection as CSV, to `output` or stdout.
///
/// Series are the synthesized estimates; the live feed is only consulted
/// by the `dashboard` command.
pub fn run_returns(
    opts: &GlobalOpts,
    watershed: &str,
    species: &str,
    start_year: Option<i32>,
    end_year: Option<i32>,
    by_year: bool,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let watersheds = WatershedCatalog::puget_sound()?;
    let species_catalog = SpeciesCatalog::pacific_salmon()?;

    // Unknown ids pass through and match nothing; the CSV is header-only.
    let watershed_filter = Filter::from(watershed);
    let watershed_id = watershed_filter.id().map(|key| match watersheds.resolve(&watershed_filter) {
        Some(w) => w.id.clone(),
        None => {
            warn!("Unknown watershed {:?}, no records to write", key);
            key.to_string()
        }
    });
    let species_id = Filter::from(species).id().map(|key| {
        species_catalog
            .by_id(key)
            .or_else(|| species_catalog.by_slug(key))
            .map_or_else(|| key.to_string(), |s| s.id.clone())
    });

    let provider = ReturnSeriesProvider::new(watersheds, opts.seed);
    let years = YearRange::new(start_year, end_year);
    let records = provider.query(watershed_id.as_deref(), species_id.as_deref(), years);
    info!(
        "Writing {} return records ({} to {})",
        records.len(),
        start_year.map_or("start".to_string(), |y| y.to_string()),
        end_year.map_or("end".to_string(), |y| y.to_string())
    );

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    write_csv(sink, &records, by_year)?;
    if let Some(path) = output {
        info!("Output: {}", path);
    }
    Ok(())
}

fn write_csv<W: Write>(sink: W, records: &[ReturnRecord], by_year: bool) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    if records.is_empty() {
        if by_year {
            writer.write_record(YEAR_HEADER)?;
        } else {
            writer.write_record(RECORD_HEADER)?;
        }
    } else if by_year {
        for point in aggregate_by_year(records) {
            writer.serialize(point)?;
        }
    } else {
        for record in records {
            writer.serialize(record)?;
        }
    }
    writer.flush()?;
    Ok(())
}
