//! Taxonomy Classifier Module
//! Collapses free-text `recclass` codes into four coarse composition categories.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse composition class of a meteorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Stony")]
    Stony,
    #[serde(rename = "Iron")]
    Iron,
    #[serde(rename = "Stony-iron")]
    StonyIron,
    #[serde(rename = "Other")]
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Category {
    /// Display order used by the dashboard legend.
    pub const ALL: [Category; 4] = [
        Category::Stony,
        Category::StonyIron,
        Category::Iron,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stony => "Stony",
            Category::Iron => "Iron",
            Category::StonyIron => "Stony-iron",
            Category::Other => "Other",
        }
    }

    /// Parse a category label as written in the clean table.
    pub fn from_label(label: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static STONY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (
            ^(
                C[IMVORKHBF][0-9./~\-\(\)]*
              | C[0-9][0-9./~\-\(\)]*(?:-ung)?
              | C\b
              | OC[0-9./~\-\(\)]*
              | OC\b
              | H[0-9./~\-\(\)]*
              | L{1,2}[0-9./~\-\(\)]*
              | E[0-9./~\-\(\)]*
              | R[0-9./~\-\(\)]*
              | K[0-9./~\-\(\)]*
              | F[0-9./~\-\(\)]*
            )
          | \b(H|L|LL|E|R|K|F|C|OC)\b
          | chondrite|achondrite|lun|mar
          | acapulcoite|lodra|brachi|winona|breccia|ureil
          | eucrite|diogen|howard|angrite|aubrite
        )",
    )
    .expect("stony pattern is valid")
});

static IRON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(iron|hexahedrite|octahedrite|ataxite)\b").expect("iron pattern is valid")
});

static STONY_IRON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(pallasite|mesosiderite)\b").expect("stony-iron pattern is valid")
});

/// A single classification rule: any `recclass` matching `pattern` maps to `category`.
pub struct TaxonomyRule {
    pub category: Category,
    pattern: &'static Lazy<Regex>,
}

impl TaxonomyRule {
    pub fn matches(&self, recclass: &str) -> bool {
        self.pattern.is_match(recclass)
    }
}

/// Rules in ascending priority. When several match, the last one wins.
pub static RULES: [TaxonomyRule; 3] = [
    TaxonomyRule {
        category: Category::Stony,
        pattern: &STONY_RE,
    },
    TaxonomyRule {
        category: Category::Iron,
        pattern: &IRON_RE,
    },
    TaxonomyRule {
        category: Category::StonyIron,
        pattern: &STONY_IRON_RE,
    },
];

/// Classify a `recclass` string. Unmatched text falls back to `Other`.
pub fn classify(recclass: &str) -> Category {
    RULES
        .iter()
        .rev()
        .find(|rule| rule.matches(recclass))
        .map(|rule| rule.category)
        .unwrap_or_default()
}
