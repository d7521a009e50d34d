//! Closed set of intent categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent label assigned to a user query.
///
/// `Unknown` is an explicit member so every dispatch site has to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Books,
    Clothing,
    Retention,
    Order,
    Unknown,
}

impl Category {
    /// Categories that have a responder
    pub const ROUTABLE: [Category; 4] = [
        Category::Books,
        Category::Clothing,
        Category::Retention,
        Category::Order,
    ];

    /// Wire and display label
    pub fn label(self) -> &'static str {
        match self {
            Category::Books => "books",
            Category::Clothing => "clothing",
            Category::Retention => "retention",
            Category::Order => "order",
            Category::Unknown => "unknown",
        }
    }

    pub fn is_routable(self) -> bool {
        !matches!(self, Category::Unknown)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
