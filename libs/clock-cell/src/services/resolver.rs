use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{ClockProvenance, ReferenceClock};
use crate::services::providers::TimeProvider;

pub const CLOCK_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(3);
const BACKEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct RealTimeResponse {
    success: bool,
    date: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedClock {
    clock: ReferenceClock,
    resolved_at: Instant,
}

/// Resolves the best-available current instant.
///
/// Remote providers are tried strictly in priority order, then the NNIA
/// backend, then the local system clock. Resolution never fails. One
/// instance is shared process-wide so the cache bounds request rate
/// across every caller.
pub struct ClockService {
    client: Client,
    providers: Vec<TimeProvider>,
    backend_url: String,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedClock>>,
}

impl ClockService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_providers(
            TimeProvider::default_chain(),
            &config.nnia_api_url,
            CLOCK_CACHE_TTL,
        )
    }

    pub fn with_providers(
        providers: Vec<TimeProvider>,
        backend_url: &str,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            providers,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    /// Resolve the reference clock, serving from cache when fresh.
    ///
    /// Only remote and backend resolutions are cached; a local-clock
    /// fallback leaves the cache untouched so the next call retries the
    /// chain.
    pub async fn resolve(&self) -> ReferenceClock {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.resolved_at.elapsed() < self.cache_ttl {
                debug!("Reference clock served from cache");
                return cached.clock.clone();
            }
        }

        let clock = self.resolve_uncached().await;

        if clock.source != ClockProvenance::LocalClock {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedClock {
                clock: clock.clone(),
                resolved_at: Instant::now(),
            });
        }

        clock
    }

    /// Drop any cached resolution; the next call re-runs the chain.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    async fn resolve_uncached(&self) -> ReferenceClock {
        for provider in &self.providers {
            match provider.fetch(&self.client, PROVIDER_TIMEOUT).await {
                Ok((instant, timezone)) => {
                    debug!("Reference clock resolved by provider {}", provider.name);
                    return ReferenceClock {
                        instant,
                        source: ClockProvenance::RemoteTimeService {
                            provider: provider.name.clone(),
                        },
                        timezone,
                    };
                }
                Err(e) => {
                    warn!("Time provider {} failed: {}", provider.name, e);
                }
            }
        }

        match self.fetch_backend_time().await {
            Ok(instant) => {
                debug!("Reference clock resolved by backend fallback");
                return ReferenceClock {
                    instant,
                    source: ClockProvenance::BackendFallback,
                    timezone: "UTC".to_string(),
                };
            }
            Err(e) => {
                warn!("Backend real-time endpoint failed: {}", e);
            }
        }

        warn!("All clock sources exhausted, falling back to local clock");
        ReferenceClock::local_fallback()
    }

    async fn fetch_backend_time(&self) -> Result<DateTime<Utc>> {
        let url = format!("{}/nnia/real-time", self.backend_url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .timeout(BACKEND_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Real-time endpoint returned status {}", status));
        }

        let body: RealTimeResponse = response.json().await?;
        if !body.success {
            return Err(anyhow!("Real-time endpoint reported failure"));
        }

        let raw = body
            .date
            .ok_or_else(|| anyhow!("Real-time endpoint response missing date"))?;

        let instant = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| anyhow!("Real-time endpoint returned unparsable date: {}", e))?;

        Ok(instant.with_timezone(&Utc))
    }
}
