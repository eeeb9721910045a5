use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Response field layout of a remote time service. The three public
/// services each report the current moment under a different key and
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{ "utc_datetime": "2024-01-10T12:00:00+00:00", "timezone": … }`
    UtcDatetime,
    /// `{ "dateTime": "2024-01-10T12:00:00.123", "timeZone": … }`
    DateTime,
    /// `{ "formatted": "2024-01-10 12:00:00", "zoneName": … }`
    Formatted,
}

#[derive(Debug, Clone)]
pub struct TimeProvider {
    pub name: String,
    pub url: String,
    pub shape: ResponseShape,
}

impl TimeProvider {
    pub fn new(name: &str, url: &str, shape: ResponseShape) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            shape,
        }
    }

    /// The fixed priority chain tried before any fallback.
    pub fn default_chain() -> Vec<TimeProvider> {
        vec![
            TimeProvider::new(
                "worldtimeapi",
                "https://worldtimeapi.org/api/ip",
                ResponseShape::UtcDatetime,
            ),
            TimeProvider::new(
                "timeapi.io",
                "https://timeapi.io/api/Time/current/zone?timeZone=UTC",
                ResponseShape::DateTime,
            ),
            TimeProvider::new(
                "timezonedb",
                "https://api.timezonedb.com/v2.1/get-time-zone?key=demo&format=json&by=zone&zone=UTC",
                ResponseShape::Formatted,
            ),
        ]
    }

    /// Fetch and parse the provider's current moment. Any non-OK status,
    /// timeout, or unparsable payload is an error; the caller decides
    /// whether to fall through.
    pub async fn fetch(
        &self,
        client: &Client,
        timeout: Duration,
    ) -> Result<(DateTime<Utc>, String)> {
        debug!("Querying time provider {}", self.name);

        let response = client
            .get(&self.url)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Provider {} returned status {}", self.name, status));
        }

        let body: Value = response.json().await?;

        let (date_key, zone_key) = match self.shape {
            ResponseShape::UtcDatetime => ("utc_datetime", "timezone"),
            ResponseShape::DateTime => ("dateTime", "timeZone"),
            ResponseShape::Formatted => ("formatted", "zoneName"),
        };

        let raw = body
            .get(date_key)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Provider {} response missing {}", self.name, date_key))?;

        let instant = parse_instant(raw)
            .ok_or_else(|| anyhow!("Provider {} returned unparsable instant: {}", self.name, raw))?;

        let timezone = body
            .get(zone_key)
            .and_then(Value::as_str)
            .unwrap_or("UTC")
            .to_string();

        Ok((instant, timezone))
    }
}

/// Parse the instant formats the provider chain is known to emit. Offset
/// timestamps are normalized to UTC; naive ones are taken as UTC since
/// every provider in the chain is queried for the UTC zone.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
