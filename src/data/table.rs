//! Clean meteorite table: an immutable handle over the processed DataFrame.

use crate::data::taxonomy::Category;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Column names of the clean table.
pub mod columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const RECCLASS: &str = "recclass";
    pub const MASS: &str = "mass_g";
    pub const FALL: &str = "fall";
    pub const YEAR: &str = "year";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const CATEGORY: &str = "category";
}

/// One row of the clean table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    pub id: Option<i64>,
    pub name: String,
    pub recclass: String,
    pub mass_g: f64,
    pub fall: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
}

/// Output of one pipeline run. Cloning shares the underlying column buffers.
#[derive(Debug, Clone, Default)]
pub struct MeteoriteTable {
    df: DataFrame,
}

impl MeteoriteTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Materialize every row as a typed record, in table order.
    pub fn records(&self) -> PolarsResult<Vec<CleanRecord>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self.df.column(columns::ID)?.i64()?;
        let names = self.df.column(columns::NAME)?.str()?;
        let classes = self.df.column(columns::RECCLASS)?.str()?;
        let masses = self.df.column(columns::MASS)?.f64()?;
        let falls = self.df.column(columns::FALL)?.str()?;
        let years = self.df.column(columns::YEAR)?.i32()?;
        let lats = self.df.column(columns::LATITUDE)?.f64()?;
        let longs = self.df.column(columns::LONGITUDE)?.f64()?;
        let categories = self.df.column(columns::CATEGORY)?.str()?;

        let mut records = Vec::with_capacity(self.df.height());
        for i in 0..self.df.height() {
            // Pipeline invariants guarantee these are present.
            let (Some(mass_g), Some(year), Some(latitude), Some(longitude)) =
                (masses.get(i), years.get(i), lats.get(i), longs.get(i))
            else {
                continue;
            };

            records.push(CleanRecord {
                id: ids.get(i),
                name: names.get(i).unwrap_or_default().to_string(),
                recclass: classes.get(i).unwrap_or_default().to_string(),
                mass_g,
                fall: falls.get(i).unwrap_or_default().to_string(),
                year,
                latitude,
                longitude,
                category: categories
                    .get(i)
                    .and_then(Category::from_label)
                    .unwrap_or_default(),
            });
        }

        Ok(records)
    }

    /// Sorted distinct landing years.
    pub fn distinct_years(&self) -> Vec<i32> {
        self.year_values().into_iter().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Categories present in the table, in legend order.
    pub fn distinct_categories(&self) -> Vec<Category> {
        let present: BTreeSet<Category> = self
            .string_values(columns::CATEGORY)
            .iter()
            .filter_map(|label| Category::from_label(label))
            .collect();
        Category::ALL
            .into_iter()
            .filter(|c| present.contains(c))
            .collect()
    }

    /// Sorted distinct `recclass` values.
    pub fn distinct_classes(&self) -> Vec<String> {
        self.string_values(columns::RECCLASS)
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn year_values(&self) -> Vec<i32> {
        self.df
            .column(columns::YEAR)
            .ok()
            .and_then(|col| col.i32().ok().map(|ca| ca.into_iter().flatten().collect()))
            .unwrap_or_default()
    }

    pub fn mass_values(&self) -> Vec<f64> {
        self.df
            .column(columns::MASS)
            .ok()
            .and_then(|col| col.f64().ok().map(|ca| ca.into_iter().flatten().collect()))
            .unwrap_or_default()
    }

    pub fn string_values(&self, column: &str) -> Vec<String> {
        self.df
            .column(column)
            .ok()
            .and_then(|col| {
                col.str()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().map(str::to_string).collect())
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_frame() -> DataFrame {
        df!(
            "id" => &[Some(3i64), Some(1), None],
            "name" => &["Gamma", "Alpha", "Beta"],
            "recclass" => &["L6", "Iron, IVA", "L6"],
            "mass_g" => &[10.0, 2.5, 7.0],
            "fall" => &["Fell", "Found", "Unknown"],
            "year" => &[1999i32, 1880, 1999],
            "latitude" => &[-90.0, 0.0, 45.5],
            "longitude" => &[180.0, -180.0, 12.0],
            "category" => &["Stony", "Iron", "Stony"]
        )
        .unwrap()
    }

    #[test]
    fn test_records() {
        let table = MeteoriteTable::new(clean_frame());
        let records = table.records().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].name, "Alpha");
        assert_eq!(records[1].category, Category::Iron);
        assert_eq!(records[2].id, None);
        assert_eq!(records[0].latitude, -90.0);
    }

    #[test]
    fn test_distinct_values() {
        let table = MeteoriteTable::new(clean_frame());

        assert_eq!(table.distinct_years(), vec![1880, 1999]);
        assert_eq!(
            table.distinct_categories(),
            vec![Category::Stony, Category::Iron]
        );
        assert_eq!(table.distinct_classes(), vec!["Iron, IVA", "L6"]);
    }

    #[test]
    fn test_empty_table() {
        let table = MeteoriteTable::empty();
        assert!(table.is_empty());
        assert!(table.records().unwrap().is_empty());
        assert!(table.distinct_years().is_empty());
        assert!(table.mass_values().is_empty());
    }
}
