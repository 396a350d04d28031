//! The fixed set of post categories.

use std::fmt;
use std::str::FromStr;

/// Upper bound on categories attached to a single post.
pub const MAX_CATEGORIES: usize = 3;

/// A post category. Labels are case-sensitive on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Travel,
    Nature,
    City,
    Adventure,
    Beaches,
    Landmarks,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Travel,
        Category::Nature,
        Category::City,
        Category::Adventure,
        Category::Beaches,
        Category::Landmarks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Travel => "Travel",
            Category::Nature => "Nature",
            Category::City => "City",
            Category::Adventure => "Adventure",
            Category::Beaches => "Beaches",
            Category::Landmarks => "Landmarks",
        }
    }

    /// Returns true if `label` names one of the known categories.
    pub fn is_valid(label: &str) -> bool {
        label.parse::<Category>().is_ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
