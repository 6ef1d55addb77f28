use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{PillcheckError, Result};
use crate::planning::{parse_hhmm, ReminderAlert, TakenDose};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TakenDoseRecord {
    pub alert_id: i32,
    /// YYYY-MM-DD
    pub day: String,
    /// HH:MM
    pub time: String,
}

impl TakenDoseRecord {
    fn to_taken_dose(&self) -> Result<TakenDose> {
        let day = NaiveDate::parse_from_str(&self.day, "%Y-%m-%d").map_err(|_| {
            PillcheckError::Config(format!("invalid day {:?}, expected YYYY-MM-DD", self.day))
        })?;
        Ok(TakenDose {
            alert_id: self.alert_id,
            day,
            time: parse_hhmm(&self.time)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub alerts: Vec<ReminderAlert>,
    #[serde(default)]
    pub taken: Vec<TakenDoseRecord>,
    pub replan_minutes: Option<u64>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| PillcheckError::Config(format!("cannot read {path}: {e}")))?;
        serde_json::from_str(&raw).map_err(|e| PillcheckError::Serialization(e.to_string()))
    }

    pub fn taken_doses(&self) -> Result<Vec<TakenDose>> {
        self.taken
            .iter()
            .map(TakenDoseRecord::to_taken_dose)
            .collect()
    }
}
