//! Statistics Calculator Module
//! Aggregates over the clean table that drive the dashboard controls and KPIs.

use crate::data::table::columns;
use crate::data::{Category, MeteoriteTable};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Earliest year of the default year-range selection.
pub const DEFAULT_START_YEAR: i32 = 1900;

/// Quantiles bounding the default mass selection.
pub const MASS_LOW_QUANTILE: f64 = 0.05;
pub const MASS_HIGH_QUANTILE: f64 = 0.95;

/// Distribution of `mass_g` over a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub p05: f64,
    pub p95: f64,
}

impl Default for MassSummary {
    fn default() -> Self {
        Self {
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            median: f64::NAN,
            p05: f64::NAN,
            p95: f64::NAN,
        }
    }
}

/// Year slider bounds and its default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub bounds: (i32, i32),
    pub default_selection: (i32, i32),
}

/// Headline numbers for a (filtered) table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub classes: usize,
    pub years: Option<(i32, i32)>,
}

/// Handles statistical calculations over meteorite tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the mass distribution of a table.
    pub fn mass_summary(table: &MeteoriteTable) -> MassSummary {
        Self::compute_descriptive_stats(&table.mass_values())
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> MassSummary {
        let n = values.len();
        if n == 0 {
            return MassSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let std_dev = if n > 1 { values.iter().std_dev() } else { 0.0 };

        MassSummary {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean: values.iter().mean(),
            std_dev,
            median: Self::quantile(&sorted, 0.5),
            p05: Self::quantile(&sorted, MASS_LOW_QUANTILE),
            p95: Self::quantile(&sorted, MASS_HIGH_QUANTILE),
        }
    }

    /// Quantile using linear interpolation (NumPy/pandas compatible).
    pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Number of landings per year, ascending by year.
    pub fn yearly_counts(table: &MeteoriteTable) -> Vec<(i32, usize)> {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for year in table.year_values() {
            *counts.entry(year).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Number of landings per category, in legend order, including zero counts.
    pub fn category_counts(table: &MeteoriteTable) -> Vec<(Category, usize)> {
        let labels = table.string_values(columns::CATEGORY);
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = labels.iter().filter(|l| l.as_str() == category.as_str()).count();
                (category, count)
            })
            .collect()
    }

    /// Year slider bounds, capped at `cutoff`, with the default selection
    /// starting no earlier than 1900.
    pub fn year_range(table: &MeteoriteTable, cutoff: i32) -> Option<YearRange> {
        let years = table.distinct_years();
        let (first, last) = (*years.first()?, *years.last()?);
        let upper = last.min(cutoff);

        Some(YearRange {
            bounds: (first, upper),
            default_selection: (first.max(DEFAULT_START_YEAR), upper),
        })
    }

    pub fn filter_summary(table: &MeteoriteTable) -> FilterSummary {
        let years = table.distinct_years();
        FilterSummary {
            total: table.height(),
            classes: table.distinct_classes().len(),
            years: years.first().copied().zip(years.last().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> MeteoriteTable {
        let df = df!(
            "id" => &[1i64, 2, 3, 4, 5],
            "name" => &["A", "B", "C", "D", "E"],
            "recclass" => &["L6", "L6", "H5", "Iron, IVA", "Pallasite"],
            "mass_g" => &[1.0, 2.0, 3.0, 4.0, 100.0],
            "fall" => &["Fell", "Found", "Found", "Found", "Fell"],
            "year" => &[1850i32, 1950, 1950, 2001, 2010],
            "latitude" => &[0.0, 1.0, 2.0, 3.0, 4.0],
            "longitude" => &[0.0, 1.0, 2.0, 3.0, 4.0],
            "category" => &["Stony", "Stony", "Stony", "Iron", "Stony-iron"]
        )
        .unwrap();
        MeteoriteTable::new(df)
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(StatsCalculator::quantile(&sorted, 0.5), 3.0);
        assert!((StatsCalculator::quantile(&sorted, 0.95) - 80.8).abs() < 1e-9);
        assert!((StatsCalculator::quantile(&sorted, 0.05) - 1.2).abs() < 1e-9);
        assert!(StatsCalculator::quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_mass_summary() {
        let summary = StatsCalculator::mass_summary(&table());
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 100.0);
        assert!((summary.mean - 22.0).abs() < 1e-9);
        assert_eq!(summary.median, 3.0);
    }

    #[test]
    fn test_mass_summary_of_empty_table() {
        let summary = StatsCalculator::mass_summary(&MeteoriteTable::empty());
        assert_eq!(summary.count, 0);
        assert!(summary.min.is_nan());
    }

    #[test]
    fn test_yearly_counts() {
        assert_eq!(
            StatsCalculator::yearly_counts(&table()),
            vec![(1850, 1), (1950, 2), (2001, 1), (2010, 1)]
        );
    }

    #[test]
    fn test_category_counts() {
        assert_eq!(
            StatsCalculator::category_counts(&table()),
            vec![
                (Category::Stony, 3),
                (Category::StonyIron, 1),
                (Category::Iron, 1),
                (Category::Other, 0),
            ]
        );
    }

    #[test]
    fn test_year_range() {
        let range = StatsCalculator::year_range(&table(), 2005).unwrap();
        assert_eq!(range.bounds, (1850, 2005));
        assert_eq!(range.default_selection, (1900, 2005));
        assert!(StatsCalculator::year_range(&MeteoriteTable::empty(), 2025).is_none());
    }

    #[test]
    fn test_filter_summary() {
        let summary = StatsCalculator::filter_summary(&table());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.classes, 4);
        assert_eq!(summary.years, Some((1850, 2010)));
    }
}
