//! Data Processor Module
//! Turns the raw catalog into the clean, categorized meteorite table.
//!
//! Stage order matters: coercion and filtering run first, so a year
//! correction can only adjust a value that was already present.

use crate::config::{PipelineConfig, YearCorrections};
use crate::data::table::{columns, MeteoriteTable};
use crate::data::taxonomy;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Raw table is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Raw CSV header names.
pub mod raw_columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const RECCLASS: &str = "recclass";
    pub const MASS: &str = "mass (g)";
    pub const FALL: &str = "fall";
    pub const YEAR: &str = "year";
    pub const LATITUDE: &str = "reclat";
    pub const LONGITUDE: &str = "reclong";

    pub const REQUIRED: [&str; 8] = [ID, NAME, RECCLASS, MASS, FALL, YEAR, LATITUDE, LONGITUDE];
}

pub const UNCLASSIFIED: &str = "Unclassified";
pub const UNKNOWN: &str = "Unknown";

/// Handles the cleaning stages of the pipeline.
pub struct DataProcessor;

impl DataProcessor {
    /// Run the full cleaning pipeline on a raw table.
    ///
    /// The raw table is left untouched; the result is a new table.
    pub fn prepare(
        raw: &DataFrame,
        config: &PipelineConfig,
    ) -> Result<MeteoriteTable, ProcessorError> {
        let df = Self::coerce_and_filter(raw)?;
        tracing::debug!(rows = df.height(), "after coercion and filtering");

        let df = Self::apply_year_fixes(&df, &config.year_corrections)?;
        let df = Self::exclude_invalid_coordinates(&df)?;
        tracing::debug!(rows = df.height(), "after coordinate validation");

        let df = Self::apply_year_cutoff(&df, config.year_cutoff)?;
        let df = Self::add_category(&df)?;
        tracing::debug!(rows = df.height(), "after year cutoff and classification");

        Ok(MeteoriteTable::new(df))
    }

    /// Coerce numeric fields, fill textual defaults and drop incomplete rows.
    ///
    /// Unparseable numbers become nulls. Rows missing year, mass or either
    /// coordinate are dropped, as are rows with non-positive mass.
    pub fn coerce_and_filter(raw: &DataFrame) -> Result<DataFrame, ProcessorError> {
        for name in raw_columns::REQUIRED {
            if raw.column(name).is_err() {
                return Err(ProcessorError::MissingColumn(name));
            }
        }

        let mut df = raw.clone();
        df.rename(raw_columns::MASS, columns::MASS.into())?;
        df.rename(raw_columns::LATITUDE, columns::LATITUDE.into())?;
        df.rename(raw_columns::LONGITUDE, columns::LONGITUDE.into())?;

        let df = df
            .lazy()
            .with_columns([
                Self::integral_id(),
                col(columns::YEAR).cast(DataType::Float64),
                col(columns::MASS).cast(DataType::Float64),
                col(columns::LATITUDE).cast(DataType::Float64),
                col(columns::LONGITUDE).cast(DataType::Float64),
                col(columns::RECCLASS)
                    .cast(DataType::String)
                    .fill_null(lit(UNCLASSIFIED)),
                col(columns::FALL).cast(DataType::String).fill_null(lit(UNKNOWN)),
                col(columns::NAME).cast(DataType::String).fill_null(lit(UNKNOWN)),
            ])
            .filter(
                Self::is_present(columns::YEAR)
                    .and(Self::is_present(columns::MASS))
                    .and(Self::is_present(columns::LATITUDE))
                    .and(Self::is_present(columns::LONGITUDE)),
            )
            .filter(col(columns::MASS).gt(lit(0.0)))
            .collect()?;

        Ok(df)
    }

    /// Non-null and not NaN. A literal "NaN" in the CSV parses to a float NaN.
    fn is_present(name: &str) -> Expr {
        col(name).is_not_null().and(col(name).is_not_nan())
    }

    /// `id` as an integer, accepting float spellings such as "57150.0".
    /// Non-numeric and non-integral ids become null.
    fn integral_id() -> Expr {
        let as_float = col(columns::ID).cast(DataType::Float64);
        let as_int = as_float.clone().cast(DataType::Int64);

        when(as_int.clone().cast(DataType::Float64).eq(as_float))
            .then(as_int)
            .otherwise(lit(NULL).cast(DataType::Int64))
            .alias(columns::ID)
    }

    /// Overwrite `year` for every row whose `id` is in the correction table.
    pub fn apply_year_fixes(
        df: &DataFrame,
        fixes: &YearCorrections,
    ) -> Result<DataFrame, ProcessorError> {
        if fixes.is_empty() {
            return Ok(df.clone());
        }

        let year_expr = fixes.iter().fold(col(columns::YEAR), |acc, (id, year)| {
            when(col(columns::ID).eq(lit(id)))
                .then(lit(year as f64))
                .otherwise(acc)
        });

        let df = df
            .clone()
            .lazy()
            .with_column(year_expr.alias(columns::YEAR))
            .collect()?;
        Ok(df)
    }

    /// Keep only rows with latitude in [-90, 90] and longitude in [-180, 180].
    ///
    /// Guards against records such as Meridiani Planum (id 32789), whose
    /// coordinates were reported on Mars.
    pub fn exclude_invalid_coordinates(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let df = df
            .clone()
            .lazy()
            .filter(
                col(columns::LATITUDE)
                    .gt_eq(lit(-90.0))
                    .and(col(columns::LATITUDE).lt_eq(lit(90.0)))
                    .and(col(columns::LONGITUDE).gt_eq(lit(-180.0)))
                    .and(col(columns::LONGITUDE).lt_eq(lit(180.0))),
            )
            .collect()?;
        Ok(df)
    }

    /// Drop landings after `cutoff` and store `year` as an integer.
    ///
    /// Years below the Int32 range (including -inf) are dropped too, so the
    /// cast never produces a null year.
    pub fn apply_year_cutoff(df: &DataFrame, cutoff: i32) -> Result<DataFrame, ProcessorError> {
        let df = df
            .clone()
            .lazy()
            .filter(
                col(columns::YEAR)
                    .gt_eq(lit(i32::MIN as f64))
                    .and(col(columns::YEAR).lt_eq(lit(cutoff as f64))),
            )
            .with_column(col(columns::YEAR).cast(DataType::Int32))
            .filter(col(columns::YEAR).is_not_null())
            .collect()?;
        Ok(df)
    }

    /// Append the `category` column derived from `recclass`.
    pub fn add_category(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let categories: Vec<&str> = df
            .column(columns::RECCLASS)?
            .str()?
            .into_iter()
            .map(|recclass| taxonomy::classify(recclass.unwrap_or("")).as_str())
            .collect();

        let mut df = df.clone();
        df.with_column(Column::new(columns::CATEGORY.into(), categories))?;
        Ok(df)
    }
}
