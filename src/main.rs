//! Meteorite Observatory - loads and cleans the landings catalog and prints
//! a JSON summary of the result.

use anyhow::Result;
use meteorite_observatory::logging::init_logging;
use meteorite_observatory::stats::{FilterSummary, MassSummary, StatsCalculator, YearRange};
use meteorite_observatory::{load, Category, PipelineConfig, SourceKind};
use serde::Serialize;

#[derive(Serialize)]
struct DatasetReport {
    source: SourceKind,
    summary: FilterSummary,
    year_range: Option<YearRange>,
    mass: MassSummary,
    categories: Vec<(Category, usize)>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = PipelineConfig::from_env()?;
    let dataset = load(&config);
    if !dataset.is_available() {
        anyhow::bail!("meteorite data unavailable");
    }

    let table = &dataset.table;
    let report = DatasetReport {
        source: dataset.source,
        summary: StatsCalculator::filter_summary(table),
        year_range: StatsCalculator::year_range(table, config.year_cutoff),
        mass: StatsCalculator::mass_summary(table),
        categories: StatsCalculator::category_counts(table),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
