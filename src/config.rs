//! Pipeline Configuration Module
//! Data source locations, the year cutoff and the known-record correction table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cache file looked up before contacting the remote catalog.
pub const LOCAL_CSV_FILE: &str = "Meteorite_Landings.csv";

pub const NASA_DATA_URL: &str =
    "https://data.nasa.gov/docs/legacy/meteorite_landings/Meteorite_Landings.csv";

/// Latest landing year accepted into the clean table.
pub const YEAR_CUTOFF: i32 = 2025;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Catalog records with a transcription error in their year, as `(id, year)`.
/// 57150 is Northwest Africa 7701, listed upstream with the wrong year (Met. Bull. gives 2010).
pub const KNOWN_YEAR_FIXES: &[(i64, i32)] = &[(57150, 2010)];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Mapping of record id to its corrected landing year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearCorrections(BTreeMap<i64, i32>);

impl Default for YearCorrections {
    fn default() -> Self {
        Self(KNOWN_YEAR_FIXES.iter().copied().collect())
    }
}

impl YearCorrections {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_correction(mut self, id: i64, year: i32) -> Self {
        self.0.insert(id, year);
        self
    }

    pub fn get(&self, id: i64) -> Option<i32> {
        self.0.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i32)> + '_ {
        self.0.iter().map(|(id, year)| (*id, *year))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub local_csv: PathBuf,
    pub remote_url: String,
    pub year_cutoff: i32,
    pub request_timeout_secs: u64,
    pub year_corrections: YearCorrections,
}

/// `Meteorite_Landings.csv` beside the running executable, or in the
/// working directory when the executable path is unknown.
pub fn default_local_csv() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LOCAL_CSV_FILE)))
        .unwrap_or_else(|| PathBuf::from(LOCAL_CSV_FILE))
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            local_csv: default_local_csv(),
            remote_url: NASA_DATA_URL.to_string(),
            year_cutoff: YEAR_CUTOFF,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            year_corrections: YearCorrections::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `METEORITE_LOCAL_CSV`, `METEORITE_DATA_URL`
    /// and `METEORITE_YEAR_CUTOFF`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("METEORITE_LOCAL_CSV") {
            self.local_csv = PathBuf::from(path);
        }
        if let Some(url) = lookup("METEORITE_DATA_URL") {
            self.remote_url = url;
        }
        if let Some(value) = lookup("METEORITE_YEAR_CUTOFF") {
            self.year_cutoff = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "METEORITE_YEAR_CUTOFF",
                value,
            })?;
        }
        Ok(self)
    }
}
