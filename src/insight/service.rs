use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::common::{ClientError, DailyTransit, DailyTransitRequest, Result};
use crate::network::ZodiacApi;
use crate::storage::ProfileStore;

use super::cache::DailyInsightCache;

/// Where a loaded insight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource {
    Cache,
    Network,
}

/// Loads today's insight: cache first, then at most one remote fetch.
pub struct InsightService {
    api: Arc<dyn ZodiacApi>,
}

impl InsightService {
    pub fn new(api: Arc<dyn ZodiacApi>) -> Self {
        Self { api }
    }

    /// Errors are meant for display; the cache is untouched on failure and
    /// nothing is retried.
    pub async fn load(&self, profile: &ProfileStore) -> Result<(DailyTransit, InsightSource)> {
        let cache = DailyInsightCache::new(profile.kv());
        if let Some(cached) = cache.read() {
            log::debug!("Daily insight served from cache");
            return Ok((cached, InsightSource::Cache));
        }

        let stored = profile.load().unwrap_or_else(|err| {
            log::error!("Failed to read stored profile: {err}");
            Default::default()
        });
        let (Some(city), Some(birth_datetime)) = (stored.city, stored.birth_datetime) else {
            return Err(ClientError::ProfileNotFound);
        };

        let ai_portrait = stored
            .portrait
            .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
            .transpose()
            .map_err(|err| {
                log::error!("Stored portrait is unreadable: {err}");
                ClientError::Parse(format!("stored portrait: {err}"))
            })?;

        // No live location: the birth city doubles as the current city.
        let request = DailyTransitRequest {
            birth_datetime,
            birth_city: city.clone(),
            transit_datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            current_city: city,
            ai_portrait,
        };

        let transit = self.api.daily_transit(&request).await.inspect_err(|err| {
            log::error!("Daily transit request failed: {err}");
        })?;
        cache.write(&transit);
        log::info!("Fetched daily insight: {}", transit.headline);
        Ok((transit, InsightSource::Network))
    }
}
