use core::str::FromStr;

use serde::{Deserialize, Serialize};
use shopdeck_core::DomainError;

/// Fixed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Accessories,
    Fashion,
    Sports,
}

impl Category {
    /// Every category, in the order the admin form offers them.
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Accessories,
        Category::Fashion,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Accessories => "Accessories",
            Category::Fashion => "Fashion",
            Category::Sports => "Sports",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "category must be one of: Electronics, Accessories, Fashion, Sports (got {s:?})"
                ))
            })
    }
}
