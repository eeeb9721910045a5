use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which fallback layer produced a resolved clock value. Diagnostic only;
/// filtering decisions never branch on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockProvenance {
    RemoteTimeService { provider: String },
    BackendFallback,
    LocalClock,
}

impl ClockProvenance {
    pub fn label(&self) -> &'static str {
        match self {
            ClockProvenance::RemoteTimeService { .. } => "remote_time_service",
            ClockProvenance::BackendFallback => "backend_fallback",
            ClockProvenance::LocalClock => "local_clock",
        }
    }

    pub fn provider(&self) -> Option<&str> {
        match self {
            ClockProvenance::RemoteTimeService { provider } => Some(provider),
            _ => None,
        }
    }
}

impl fmt::Display for ClockProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The resolved "now" used as the reference for upcoming-appointment
/// decisions. Each resolution produces a new value; never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceClock {
    pub instant: DateTime<Utc>,
    pub source: ClockProvenance,
    pub timezone: String,
}

impl ReferenceClock {
    pub fn local_fallback() -> Self {
        Self {
            instant: Utc::now(),
            source: ClockProvenance::LocalClock,
            timezone: "UTC".to_string(),
        }
    }
}
