//! Catalog categories.
//!
//! Categories are the fixed set of weaving motifs the shop sells. Anything
//! the normalizer cannot place lands in [`Category::Lainnya`] ("other").

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Motif category of a product.
///
/// Serialized as its display name (`"Beragi"`, `"Lainnya"`, ...), which is
/// also the value used in the `category` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Beragi,
    Songket,
    Ikat,
    Endek,
    Ulos,
    Lurik,
    Lainnya,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Beragi,
        Self::Songket,
        Self::Ikat,
        Self::Endek,
        Self::Ulos,
        Self::Lurik,
        Self::Lainnya,
    ];

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beragi => "Beragi",
            Self::Songket => "Songket",
            Self::Ikat => "Ikat",
            Self::Endek => "Endek",
            Self::Ulos => "Ulos",
            Self::Lurik => "Lurik",
            Self::Lainnya => "Lainnya",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("beragi".parse::<Category>().unwrap(), Category::Beragi);
        assert_eq!(" SONGKET ".parse::<Category>().unwrap(), Category::Songket);
        assert!("batik".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
    }
}
