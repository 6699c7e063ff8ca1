//! Load orchestration: read the raw catalog, then run the cleaning pipeline.

use crate::config::PipelineConfig;
use crate::data::{DataLoader, DataProcessor, DatasetCache, MeteoriteTable, SourceKey, SourceKind};

/// Result of one load cycle.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub table: MeteoriteTable,
    pub source: SourceKind,
}

impl LoadedDataset {
    pub fn unavailable() -> Self {
        Self {
            table: MeteoriteTable::empty(),
            source: SourceKind::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.source != SourceKind::Unavailable
    }
}

/// Load and clean the catalog.
///
/// Never fails: any read, fetch or processing error is logged and reported
/// as an empty table labelled `Unavailable`.
pub fn load(config: &PipelineConfig) -> LoadedDataset {
    let (raw, source) = match DataLoader::new(config).load_raw() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "unable to load meteorite data");
            return LoadedDataset::unavailable();
        }
    };

    match DataProcessor::prepare(&raw, config) {
        Ok(table) => {
            tracing::info!(
                source = %source,
                raw_rows = raw.height(),
                clean_rows = table.height(),
                "meteorite data ready"
            );
            LoadedDataset { table, source }
        }
        Err(e) => {
            tracing::error!(error = %e, source = %source, "unable to clean meteorite data");
            LoadedDataset::unavailable()
        }
    }
}

/// `load`, memoized in `cache` by source identity.
pub fn load_cached(cache: &mut DatasetCache, config: &PipelineConfig) -> LoadedDataset {
    let key = SourceKey::from_config(config);
    cache.get_or_compute(&key, || load(config))
}
