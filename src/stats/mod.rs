//! Stats module - aggregates for the exploration views

mod calculator;

pub use calculator::{FilterSummary, MassSummary, StatsCalculator, YearRange};
