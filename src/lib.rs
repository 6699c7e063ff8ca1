//! Meteorite Observatory - cleaning & classification pipeline for the
//! NASA meteorite landings catalog.
//!
//! [`load`] reads the raw catalog (local cache file first, remote endpoint
//! otherwise) and runs [`DataProcessor::prepare`], which coerces numeric
//! fields, drops incomplete rows, repairs known-bad records, rejects
//! off-world coordinates and assigns each record a composition [`Category`].

pub mod config;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod stats;

pub use config::{ConfigError, PipelineConfig, YearCorrections};
pub use data::{
    classify, Category, CleanRecord, DataLoader, DataProcessor, DatasetCache, MeteoriteTable,
    RecordFilter, SourceKind,
};
pub use pipeline::{load, load_cached, LoadedDataset};
pub use stats::{MassSummary, StatsCalculator};
