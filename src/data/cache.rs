//! Memoized pipeline output, keyed by data source identity.

use crate::config::{PipelineConfig, YearCorrections};
use crate::pipeline::LoadedDataset;
use std::path::PathBuf;

/// Identity of a load: the same key reuses the previous result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub local_csv: PathBuf,
    pub remote_url: String,
    pub year_cutoff: i32,
    pub year_corrections: YearCorrections,
}

impl SourceKey {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            local_csv: config.local_csv.clone(),
            remote_url: config.remote_url.clone(),
            year_cutoff: config.year_cutoff,
            year_corrections: config.year_corrections.clone(),
        }
    }
}

/// Holds at most one loaded dataset. `invalidate` forces the next access to reload.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(SourceKey, LoadedDataset)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `key`, running `compute` on a miss.
    pub fn get_or_compute<F>(&mut self, key: &SourceKey, compute: F) -> LoadedDataset
    where
        F: FnOnce() -> LoadedDataset,
    {
        if let Some((cached_key, dataset)) = &self.entry {
            if cached_key == key {
                tracing::debug!("dataset cache hit");
                return dataset.clone();
            }
        }

        let dataset = compute();
        self.entry = Some((key.clone(), dataset.clone()));
        dataset
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self, key: &SourceKey) -> bool {
        matches!(&self.entry, Some((cached, _)) if cached == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MeteoriteTable, SourceKind};
    use std::cell::Cell;

    fn dataset(source: SourceKind) -> LoadedDataset {
        LoadedDataset {
            table: MeteoriteTable::empty(),
            source,
        }
    }

    #[test]
    fn test_reuses_result_for_same_key() {
        let key = SourceKey::from_config(&PipelineConfig::default());
        let mut cache = DatasetCache::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let loaded = cache.get_or_compute(&key, || {
                calls.set(calls.get() + 1);
                dataset(SourceKind::LocalCsv)
            });
            assert_eq!(loaded.source, SourceKind::LocalCsv);
        }
        assert_eq!(calls.get(), 1);
        assert!(cache.is_cached(&key));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let key = SourceKey::from_config(&PipelineConfig::default());
        let mut cache = DatasetCache::new();

        cache.get_or_compute(&key, || dataset(SourceKind::Unavailable));
        cache.invalidate();
        assert!(!cache.is_cached(&key));

        let loaded = cache.get_or_compute(&key, || dataset(SourceKind::NasaOpenData));
        assert_eq!(loaded.source, SourceKind::NasaOpenData);
    }

    #[test]
    fn test_different_source_misses() {
        let first = SourceKey::from_config(&PipelineConfig::default());
        let second = SourceKey::from_config(&PipelineConfig {
            remote_url: "https://mirror.example/Meteorite_Landings.csv".to_string(),
            ..PipelineConfig::default()
        });
        let mut cache = DatasetCache::new();

        cache.get_or_compute(&first, || dataset(SourceKind::NasaOpenData));
        let loaded = cache.get_or_compute(&second, || dataset(SourceKind::Unavailable));
        assert_eq!(loaded.source, SourceKind::Unavailable);
        assert!(!cache.is_cached(&first));
    }
}
