//! User preference access
//!
//! The preference store is owned by the host; the tracker only reads it, once
//! at the start of every cycle. Read failures fall back to the defaults in
//! [`crate::constants`] and never fail the cycle.

use crate::{
    constants::{DEFAULT_DISPLAY_UNIT, DEFAULT_REFRESH_INTERVAL},
    error::PreferenceError,
    types::{DisplayUnit, RefreshInterval},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

const UNIT_KEY: &str = "unit";
const INTERVAL_KEY: &str = "refresh_interval_minutes";

/// Read-only view of the host's preference store
pub trait PreferenceStore: Send + Sync {
    fn read_unit(&self) -> Result<DisplayUnit, PreferenceError>;

    fn read_interval(&self) -> Result<RefreshInterval, PreferenceError>;
}

/// Preferences resolved for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub unit: DisplayUnit,
    #[serde(rename = "refresh_interval_minutes")]
    pub interval: RefreshInterval,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit: DEFAULT_DISPLAY_UNIT,
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl Preferences {
    /// Reads both preferences, substituting the default for any that fail
    pub fn read(store: &dyn PreferenceStore) -> Self {
        let unit = store.read_unit().unwrap_or_else(|e| {
            tracing::warn!(error = %e, default = ?DEFAULT_DISPLAY_UNIT, "Falling back to default display unit");
            DEFAULT_DISPLAY_UNIT
        });
        let interval = store.read_interval().unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                default_minutes = DEFAULT_REFRESH_INTERVAL.minutes(),
                "Falling back to default refresh interval"
            );
            DEFAULT_REFRESH_INTERVAL
        });

        Self { unit, interval }
    }
}

/// In-memory store the host can update between cycles
#[derive(Debug, Default)]
pub struct StaticPreferences {
    inner: RwLock<Preferences>,
}

impl StaticPreferences {
    pub fn new(unit: DisplayUnit, interval: RefreshInterval) -> Self {
        Self {
            inner: RwLock::new(Preferences { unit, interval }),
        }
    }

    fn current(&self) -> Result<Preferences, PreferenceError> {
        self.inner
            .read()
            .map(|prefs| *prefs)
            .map_err(|_| PreferenceError::Storage(std::io::Error::other("preference lock poisoned")))
    }

    pub fn set_unit(&self, unit: DisplayUnit) {
        if let Ok(mut prefs) = self.inner.write() {
            prefs.unit = unit;
        }
    }

    pub fn set_interval(&self, interval: RefreshInterval) {
        if let Ok(mut prefs) = self.inner.write() {
            prefs.interval = interval;
        }
    }
}

impl PreferenceStore for StaticPreferences {
    fn read_unit(&self) -> Result<DisplayUnit, PreferenceError> {
        Ok(self.current()?.unit)
    }

    fn read_interval(&self) -> Result<RefreshInterval, PreferenceError> {
        Ok(self.current()?.interval)
    }
}

/// Store backed by a JSON document on disk
///
/// ```json
/// { "unit": "fiat", "refresh_interval_minutes": 15 }
/// ```
///
/// The file is re-read on every call so edits made by the host between
/// cycles are picked up.
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Writes both preferences, replacing the file
    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn read_key(&self, key: &'static str) -> Result<serde_json::Value, PreferenceError> {
        let content = fs::read_to_string(&self.path)?;
        let mut document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content)?;
        document.remove(key).ok_or(PreferenceError::Missing(key))
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn read_unit(&self) -> Result<DisplayUnit, PreferenceError> {
        match self.read_key(UNIT_KEY)? {
            serde_json::Value::String(raw) => raw.parse(),
            other => Err(PreferenceError::invalid_value(UNIT_KEY, other)),
        }
    }

    fn read_interval(&self) -> Result<RefreshInterval, PreferenceError> {
        let value = self.read_key(INTERVAL_KEY)?;
        let minutes = value
            .as_u64()
            .and_then(|m| u32::try_from(m).ok())
            .ok_or_else(|| PreferenceError::invalid_value(INTERVAL_KEY, &value))?;
        RefreshInterval::try_from(minutes)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Store whose reads always fail
    pub struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn read_unit(&self) -> Result<DisplayUnit, PreferenceError> {
            Err(PreferenceError::Storage(std::io::Error::other("keychain locked")))
        }

        fn read_interval(&self) -> Result<RefreshInterval, PreferenceError> {
            Err(PreferenceError::Missing(INTERVAL_KEY))
        }
    }

    /// Store whose unit alternates between Native and Fiat on every read
    #[derive(Default)]
    pub struct FlippingPreferences {
        reads: std::sync::atomic::AtomicUsize,
    }

    impl FlippingPreferences {
        pub fn unit_reads(&self) -> usize {
            self.reads.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl PreferenceStore for FlippingPreferences {
        fn read_unit(&self) -> Result<DisplayUnit, PreferenceError> {
            let n = self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(if n % 2 == 0 {
                DisplayUnit::Native
            } else {
                DisplayUnit::Fiat
            })
        }

        fn read_interval(&self) -> Result<RefreshInterval, PreferenceError> {
            Ok(RefreshInterval::TenMinutes)
        }
    }
}
