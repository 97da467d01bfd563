use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rate_unit::RateUnit;

/// Display format used on the wire for work entry dates.
pub const WORK_DATE_FORMAT: &str = "%m/%d/%Y";

/// One logged work session.
///
/// Field names on the wire keep the historical Portuguese schema so shards
/// written by older releases stay readable without migration.
///
/// Identity for update/delete is structural equality over all fields; there
/// is no surrogate id. Two byte-identical entries are indistinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    /// ⇔ "data" (TEXT "MM/dd/yyyy")
    #[serde(rename = "data", with = "work_date_format")]
    pub date: NaiveDate,

    /// ⇔ "empresa"
    #[serde(rename = "empresa")]
    pub company: String,

    /// ⇔ "horas" (≥ 0)
    #[serde(rename = "horas")]
    pub hours: f64,

    /// ⇔ "minutos" (≥ 0)
    #[serde(rename = "minutos")]
    pub minutes: f64,

    /// ⇔ "pagamentoDobrado"
    #[serde(rename = "pagamentoDobrado")]
    pub double_pay: bool,

    /// ⇔ "taxaUsada"
    #[serde(rename = "taxaUsada")]
    pub rate_used: f64,

    /// ⇔ "tipoUsado" ('hora' | 'minuto')
    #[serde(rename = "tipoUsado")]
    pub rate_unit: RateUnit,
}

impl WorkEntry {
    pub fn new(
        date: NaiveDate,
        company: impl Into<String>,
        hours: f64,
        minutes: f64,
        double_pay: bool,
        rate_used: f64,
        rate_unit: RateUnit,
    ) -> Self {
        Self {
            date,
            company: company.into(),
            hours,
            minutes,
            double_pay,
            rate_used,
            rate_unit,
        }
    }

    /// Check caller-supplied fields before the entry reaches a shard.
    pub fn validate(&self) -> AppResult<()> {
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("company must not be empty".into()));
        }
        if self.hours < 0.0 {
            return Err(AppError::Validation(format!(
                "hours must be >= 0, got {}",
                self.hours
            )));
        }
        if self.minutes < 0.0 {
            return Err(AppError::Validation(format!(
                "minutes must be >= 0, got {}",
                self.minutes
            )));
        }
        if self.rate_used < 0.0 {
            return Err(AppError::Validation(format!(
                "rate must be >= 0, got {}",
                self.rate_used
            )));
        }
        Ok(())
    }

    pub fn date_str(&self) -> String {
        self.date.format(WORK_DATE_FORMAT).to_string()
    }
}

/// Parse a work entry date from its fixed display format.
pub fn parse_work_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, WORK_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

mod work_date_format {
    use super::WORK_DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(WORK_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_work_date(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry() -> WorkEntry {
        WorkEntry::new(
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "Acme",
            5.0,
            0.0,
            false,
            20.0,
            RateUnit::Hour,
        )
    }

    #[test]
    fn serializes_with_portuguese_field_names() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["data"], "03/14/2025");
        assert_eq!(json["empresa"], "Acme");
        assert_eq!(json["horas"], 5.0);
        assert_eq!(json["pagamentoDobrado"], false);
        assert_eq!(json["tipoUsado"], "hora");
    }

    #[test]
    fn round_trips_through_json() {
        let e = entry();
        let json = serde_json::to_string(&e).unwrap();
        let back: WorkEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn rejects_negative_hours() {
        let mut e = entry();
        e.hours = -1.0;
        assert!(matches!(e.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn parse_work_date_rejects_iso() {
        assert!(parse_work_date("2025-03-14").is_err());
        assert!(parse_work_date("03/14/2025").is_ok());
    }

    #[test]
    fn deserialization_rejects_iso_dates() {
        let json = r#"{
            "data": "2025-03-14",
            "empresa": "Acme",
            "horas": 1.0,
            "minutos": 0.0,
            "pagamentoDobrado": false,
            "taxaUsada": 20.0,
            "tipoUsado": "hora"
        }"#;
        assert!(serde_json::from_str::<WorkEntry>(json).is_err());
    }
}
