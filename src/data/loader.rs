//! CSV Data Loader Module
//! Reads the raw meteorite catalog from the local cache file or the NASA endpoint.

use crate::config::PipelineConfig;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Remote fetch failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Where the raw table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    #[serde(rename = "Local CSV")]
    LocalCsv,
    #[serde(rename = "NASA Open Data")]
    NasaOpenData,
    #[serde(rename = "Unavailable")]
    Unavailable,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::LocalCsv => "Local CSV",
            SourceKind::NasaOpenData => "NASA Open Data",
            SourceKind::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fetches the raw catalog. Every column is read as text; typing is left to the processor.
pub struct DataLoader<'a> {
    config: &'a PipelineConfig,
}

impl<'a> DataLoader<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Load the raw table, preferring the local cache file.
    ///
    /// The remote endpoint is never contacted when the local file exists,
    /// even if reading it fails.
    pub fn load_raw(&self) -> Result<(DataFrame, SourceKind), LoaderError> {
        if self.config.local_csv.exists() {
            tracing::info!(path = %self.config.local_csv.display(), "reading local meteorite cache");
            let df = Self::read_csv_file(&self.config.local_csv)?;
            return Ok((df, SourceKind::LocalCsv));
        }

        tracing::info!(url = %self.config.remote_url, "local cache missing, fetching remote catalog");
        let bytes = self.fetch_remote()?;
        let df = Self::read_csv_bytes(bytes)?;
        Ok((df, SourceKind::NasaOpenData))
    }

    /// Read a CSV file using Polars.
    pub fn read_csv_file(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Parse an in-memory CSV payload.
    pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    fn fetch_remote(&self) -> Result<Vec<u8>, LoaderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .build()?;

        let response = client
            .get(&self.config.remote_url)
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = "\
name,id,nametype,recclass,mass (g),fall,year,reclat,reclong,GeoLocation
Aachen,1,Valid,L5,21,Fell,1880,50.775,6.08333,\"(50.775, 6.08333)\"
Aarhus,2,Valid,H6,720,Fell,1951,56.18333,10.23333,\"(56.18333, 10.23333)\"
";

    #[test]
    fn test_labels() {
        assert_eq!(SourceKind::LocalCsv.label(), "Local CSV");
        assert_eq!(SourceKind::NasaOpenData.to_string(), "NASA Open Data");
        assert_eq!(SourceKind::Unavailable.label(), "Unavailable");
    }

    #[test]
    fn test_columns_are_read_as_text() {
        let df = DataLoader::read_csv_bytes(SAMPLE.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 10);
        assert_eq!(df.column("mass (g)").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("year").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_local_file_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Meteorite_Landings.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = PipelineConfig {
            local_csv: path,
            // Unroutable; must never be contacted.
            remote_url: "http://127.0.0.1:9/never.csv".to_string(),
            ..PipelineConfig::default()
        };

        let (df, source) = DataLoader::new(&config).load_raw().unwrap();
        assert_eq!(source, SourceKind::LocalCsv);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_remote_failure_is_an_error() {
        let config = PipelineConfig {
            local_csv: PathBuf::from("/nonexistent/Meteorite_Landings.csv"),
            remote_url: "http://127.0.0.1:9/Meteorite_Landings.csv".to_string(),
            request_timeout_secs: 2,
            ..PipelineConfig::default()
        };

        let result = DataLoader::new(&config).load_raw();
        assert!(matches!(result, Err(LoaderError::HttpError(_))));
    }
}
