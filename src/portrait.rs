use std::sync::Arc;

use crate::common::{ClientError, Portrait, PortraitRequest, Result};
use crate::network::ZodiacApi;
use crate::storage::ProfileStore;

/// Creates the birth portrait and keeps the profile it was built from.
pub struct PortraitService {
    api: Arc<dyn ZodiacApi>,
}

impl PortraitService {
    pub fn new(api: Arc<dyn ZodiacApi>) -> Self {
        Self { api }
    }

    /// Request a portrait for the given birth data and store city, datetime
    /// and portrait together. Nothing is stored if the request fails.
    pub async fn create(
        &self,
        city: &str,
        birth_datetime: &str,
        profile: &mut ProfileStore,
    ) -> Result<Portrait> {
        let city = city.trim();
        let birth_datetime = birth_datetime.trim();
        if city.is_empty() || birth_datetime.is_empty() {
            return Err(ClientError::MissingProfile(
                "Missing city or date information.".into(),
            ));
        }

        let request = PortraitRequest {
            city: city.to_string(),
            datetime: birth_datetime.to_string(),
        };
        let (portrait, raw) = self.api.portrait(&request).await?;

        profile.save_portrait(city, birth_datetime, &raw.to_string())?;
        log::info!("Stored portrait for {city}");
        Ok(portrait)
    }

    /// The stored portrait, without touching the network.
    pub fn cached(&self, profile: &ProfileStore) -> Option<Portrait> {
        let raw = match profile.load() {
            Ok(stored) => stored.portrait?,
            Err(err) => {
                log::error!("Failed to read stored profile: {err}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|err| log::warn!("Stored portrait is unreadable: {err}"))
            .ok()
    }
}
