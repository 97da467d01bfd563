use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a work entry's rate applies to.
/// Serialized as the historical lowercase Portuguese names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateUnit {
    #[serde(rename = "hora")]
    Hour,
    #[serde(rename = "minuto")]
    Minute,
}

impl RateUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateUnit::Hour => "hora",
            RateUnit::Minute => "minuto",
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hora" | "hour" | "h" => Ok(RateUnit::Hour),
            "minuto" | "minute" | "m" => Ok(RateUnit::Minute),
            other => Err(AppError::InvalidRateUnit(other.to_string())),
        }
    }
}
