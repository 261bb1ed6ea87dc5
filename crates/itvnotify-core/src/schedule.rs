//! On-disk schedule configuration (`config.json`).
//!
//! Recognised keys: `cc`, `cco`, `send_time` ("HH:MM"), and
//! `repeat_interval_minutes`. The file is re-read on every scheduling
//! decision so distribution-list and trigger changes take effect without a
//! restart. A missing or malformed file degrades to defaults: empty CC/BCC
//! and no triggers.

use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigLoadError;

#[derive(Debug, Deserialize)]
struct RawSchedule {
    #[serde(default)]
    cc: Vec<String>,
    #[serde(default)]
    cco: Vec<String>,
    #[serde(default)]
    send_time: Option<String>,
    #[serde(default)]
    repeat_interval_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Addresses always CC'd, header order preserved.
    pub cc: Vec<String>,
    /// Addresses always BCC'd (`cco` in the file), header order preserved.
    pub bcc: Vec<String>,
    /// Fixed daily trigger; `None` means no daily trigger is registered.
    pub daily_send_time: Option<NaiveTime>,
    /// Reminder-tier cadence; `None` (or 0 in the file) disables the tier.
    pub repeat_interval_minutes: Option<u32>,
}

impl ScheduleConfig {
    pub fn try_load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path)?;
        let raw: RawSchedule = serde_json::from_str(&text)?;

        let daily_send_time = match raw.send_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                NaiveTime::parse_from_str(s, "%H:%M")
                    .map_err(|_| ConfigLoadError::InvalidSendTime(s.to_string()))?,
            ),
        };

        Ok(Self {
            cc: raw.cc,
            bcc: raw.cco,
            daily_send_time,
            repeat_interval_minutes: raw.repeat_interval_minutes.filter(|m| *m > 0),
        })
    }

    /// Load the schedule file, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "schedule config unavailable, using defaults");
                Self::default()
            }
        }
    }
}
