//! Record filtering for the exploration views.

use crate::data::table::{columns, MeteoriteTable};
use crate::data::taxonomy::Category;
use polars::prelude::*;

/// Interactive filter over the clean table. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub year_range: Option<(i32, i32)>,
    pub category: Option<Category>,
    pub mass_range: Option<(f64, f64)>,
    /// Case-insensitive substring of the meteorite name.
    pub name_query: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, from: i32, to: i32) -> Self {
        self.year_range = Some((from, to));
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_mass(mut self, lower: f64, upper: f64) -> Self {
        self.mass_range = Some((lower, upper));
        self
    }

    pub fn with_name(mut self, query: impl Into<String>) -> Self {
        self.name_query = Some(query.into());
        self
    }

    /// Apply the filter. Bounds are inclusive; an empty result is not an error.
    pub fn apply(&self, table: &MeteoriteTable) -> PolarsResult<MeteoriteTable> {
        if table.is_empty() {
            return Ok(table.clone());
        }

        let mut predicate = lit(true);
        if let Some((from, to)) = self.year_range {
            predicate = predicate
                .and(col(columns::YEAR).gt_eq(lit(from)))
                .and(col(columns::YEAR).lt_eq(lit(to)));
        }
        if let Some((lower, upper)) = self.mass_range {
            predicate = predicate
                .and(col(columns::MASS).gt_eq(lit(lower)))
                .and(col(columns::MASS).lt_eq(lit(upper)));
        }
        if let Some(category) = self.category {
            predicate = predicate.and(col(columns::CATEGORY).eq(lit(category.as_str())));
        }

        let df = table.dataframe().clone().lazy().filter(predicate).collect()?;

        let df = match self.name_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let needle = query.to_lowercase();
                let mask: BooleanChunked = df
                    .column(columns::NAME)?
                    .str()?
                    .into_iter()
                    .map(|name| name.is_some_and(|n| n.to_lowercase().contains(&needle)))
                    .collect();
                df.filter(&mask)?
            }
            _ => df,
        };

        Ok(MeteoriteTable::new(df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MeteoriteTable {
        let df = df!(
            "id" => &[1i64, 2, 3, 4],
            "name" => &["Aachen", "Gibeon", "Allende", "Esquel"],
            "recclass" => &["L5", "Iron, IVA", "CV3", "Pallasite, PMG"],
            "mass_g" => &[21.0, 26_000_000.0, 2_000_000.0, 755_000.0],
            "fall" => &["Fell", "Found", "Fell", "Found"],
            "year" => &[1880i32, 1836, 1969, 1951],
            "latitude" => &[50.775, -25.5, 26.96667, -42.9],
            "longitude" => &[6.08333, 18.0, -105.31667, -71.2],
            "category" => &["Stony", "Iron", "Stony", "Stony-iron"]
        )
        .unwrap();
        MeteoriteTable::new(df)
    }

    fn names(table: &MeteoriteTable) -> Vec<String> {
        table.string_values("name")
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filtered = RecordFilter::new().apply(&table()).unwrap();
        assert_eq!(filtered.height(), 4);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let filtered = RecordFilter::new().with_years(1836, 1880).apply(&table()).unwrap();
        assert_eq!(names(&filtered), vec!["Aachen", "Gibeon"]);
    }

    #[test]
    fn test_category_and_mass() {
        let filtered = RecordFilter::new()
            .with_category(Category::Stony)
            .with_mass(0.0, 1_000.0)
            .apply(&table())
            .unwrap();
        assert_eq!(names(&filtered), vec!["Aachen"]);
    }

    #[test]
    fn test_name_search_is_case_insensitive() {
        let filtered = RecordFilter::new().with_name("AL").apply(&table()).unwrap();
        assert_eq!(names(&filtered), vec!["Allende"]);

        let filtered = RecordFilter::new().with_name("  ").apply(&table()).unwrap();
        assert_eq!(filtered.height(), 4);
    }

    #[test]
    fn test_no_match_is_empty() {
        let filtered = RecordFilter::new().with_name("zzz").apply(&table()).unwrap();
        assert!(filtered.is_empty());
    }
}
