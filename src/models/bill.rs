use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// One expense record.
///
/// Dates are ISO `YYYY-MM-DD` on the wire (chrono's default NaiveDate form).
/// The `deductible` bool of the legacy schema is accepted on read but never
/// written back; `normalize_legacy` folds it into the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(alias = "label")]
    pub description: String,

    pub amount: f64,

    pub date: NaiveDate,

    #[serde(default)]
    pub category: Category,

    /// Legacy flag, consumed only during migration.
    #[serde(default, skip_serializing)]
    pub deductible: Option<bool>,
}

impl Bill {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: Category,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            category,
            deductible: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description must not be empty".into()));
        }
        if self.amount <= 0.0 {
            return Err(AppError::Validation(format!(
                "amount must be > 0, got {}",
                self.amount
            )));
        }
        Ok(())
    }

    /// Fold a legacy `deductible` flag into the category and drop it.
    /// Entries already carrying an explicit category are left untouched.
    pub fn normalize_legacy(&mut self) {
        if let Some(flag) = self.deductible.take()
            && self.category == Category::Other
        {
            self.category = Category::from_legacy_deductible(flag);
        }
    }
}
