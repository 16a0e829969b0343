//! # Configuration State
//!
//! The resolved, read-only view of [`RegisterConfig`] that commands use.
//! Read-only after initialization, so no lock.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::time::Duration;

use crate::config::{ConfigResult, RegisterConfig};
use tourdesk_core::ClosingWindow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (displayed on the dashboard)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Closing eligibility gate
    pub window: ClosingWindow,

    /// Zone whose local hour the gate compares against
    #[serde(serialize_with = "serialize_tz")]
    pub timezone: Tz,

    /// Closing watcher cadence
    #[serde(skip)]
    pub poll_interval: Duration,
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(tz.name())
}

impl ConfigState {
    pub fn from_config(config: &RegisterConfig) -> ConfigResult<Self> {
        Ok(ConfigState {
            store_name: config.store.name.clone(),
            currency_symbol: config.store.currency_symbol.clone(),
            window: config.window()?,
            timezone: config.timezone()?,
            poll_interval: config.poll_interval(),
        })
    }

    /// Wall-clock time at the store for the instant `now`.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        now.with_timezone(&self.timezone).time()
    }

    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        self.window.is_eligible_at(self.local_time(now))
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Tour Desk".to_string(),
            currency_symbol: "R$".to_string(),
            window: ClosingWindow::default(),
            timezone: chrono_tz::America::Sao_Paulo,
            poll_interval: Duration::from_secs(60),
        }
    }
}
