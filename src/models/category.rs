//! Expense category reference table
//!
//! Categories are a fixed lookup of display name and color. Obligations carry
//! the category as a plain string; the aggregator maps it onto this table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::obligation::FALLBACK_CATEGORY;

/// A named expense category with its display color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Display name (e.g., "Utilities")
    pub name: String,

    /// Hex color used by charts (e.g., "#3B82F6")
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace
    pub fn matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        let hex = self.color.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The default category table
pub fn default_categories() -> Vec<Category> {
    [
        ("Housing", "#6366F1"),
        ("Utilities", "#F59E0B"),
        ("Internet", "#3B82F6"),
        ("Phone", "#06B6D4"),
        ("Insurance", "#10B981"),
        ("Transportation", "#84CC16"),
        ("Streaming", "#EF4444"),
        ("Software", "#8B5CF6"),
        ("Entertainment", "#EC4899"),
        ("Health & Fitness", "#14B8A6"),
        ("Food & Dining", "#F97316"),
        (FALLBACK_CATEGORY, "#6B7280"),
    ]
    .into_iter()
    .map(|(name, color)| Category::new(name, color))
    .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(c) => write!(f, "Invalid color '{}', expected #RRGGBB", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let categories = default_categories();
        assert_eq!(categories.len(), 12);
        assert!(categories.iter().any(|c| c.name == FALLBACK_CATEGORY));
        assert!(categories.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_matches_ignores_case() {
        let category = Category::new("Health & Fitness", "#14B8A6");
        assert!(category.matches("health & fitness"));
        assert!(category.matches("  HEALTH & FITNESS "));
        assert!(!category.matches("Health"));
    }

    #[test]
    fn test_invalid_color() {
        let category = Category::new("Pets", "teal");
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }
}
