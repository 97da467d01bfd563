use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expense category. Each category carries a fixed deductibility flag that
/// replaced the free-standing `deductible` bool of the legacy bill schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Business,
    Health,
    Education,
    Personal,
    Other,
}

impl Category {
    pub fn deductible(&self) -> bool {
        matches!(
            self,
            Category::Business | Category::Health | Category::Education
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "BUSINESS",
            Category::Health => "HEALTH",
            Category::Education => "EDUCATION",
            Category::Personal => "PERSONAL",
            Category::Other => "OTHER",
        }
    }

    /// Category assigned when migrating a legacy `deductible` flag.
    pub fn from_legacy_deductible(deductible: bool) -> Self {
        if deductible {
            Category::Business
        } else {
            Category::Personal
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUSINESS" => Ok(Category::Business),
            "HEALTH" => Ok(Category::Health),
            "EDUCATION" => Ok(Category::Education),
            "PERSONAL" => Ok(Category::Personal),
            "OTHER" => Ok(Category::Other),
            other => Err(AppError::InvalidCategory(other.to_string())),
        }
    }
}
