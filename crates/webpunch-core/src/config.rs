use crate::locator::LocatorMap;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Snapshot of the on-disk configuration document.
///
/// `load()` returns this by value with the password already decrypted; flows
/// never share a mutable view of it. The password is only ever plaintext in
/// memory, never on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub url: String,
    pub user_id: String,
    pub password: String,
    pub selectors: LocatorMap,
    pub advanced: AdvancedOptions,
}

impl Config {
    /// True when everything a login needs is present.
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.user_id.is_empty() && !self.password.is_empty()
    }
}

/// Options consumed by the external scheduler and the session launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedOptions {
    pub auto_end: AutoEnd,
    pub headless_mode: bool,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            auto_end: AutoEnd::default(),
            headless_mode: true,
        }
    }
}

/// Automatic clock-out setting. The core only persists this; acting on it is
/// the scheduler's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoEnd {
    pub enabled: bool,
    /// Time of day in `HH:MM`.
    pub time: String,
}

impl Default for AutoEnd {
    fn default() -> Self {
        Self {
            enabled: false,
            time: DEFAULT_AUTO_END_TIME.to_string(),
        }
    }
}

const DEFAULT_AUTO_END_TIME: &str = "18:00";

impl AutoEnd {
    /// Parse the configured time, falling back to 18:00 on malformed input.
    pub fn time_of_day(&self) -> NaiveTime {
        NaiveTime::parse_from_str(&self.time, "%H:%M").unwrap_or_else(|_| {
            tracing::warn!(
                "invalid auto_end time '{}', falling back to {}",
                self.time,
                DEFAULT_AUTO_END_TIME
            );
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
        })
    }
}
