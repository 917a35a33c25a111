use rusqlite::Result as SqlResult;
use std::path::Path;

use super::kv_store::{KeyValueStore, StorageKey};

/// Birth data captured when the portrait was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub city: Option<String>,
    pub birth_datetime: Option<String>,
    pub coordinates: Option<String>,
    pub portrait: Option<String>,
}

/// Typed access to the persisted profile slots.
pub struct ProfileStore {
    kv: KeyValueStore,
}

impl ProfileStore {
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Ok(Self {
            kv: KeyValueStore::with_path(path)?,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        Ok(Self {
            kv: KeyValueStore::in_memory()?,
        })
    }

    pub fn kv(&self) -> &KeyValueStore {
        &self.kv
    }

    pub fn load(&self) -> SqlResult<UserProfile> {
        let [city, birth_datetime, coordinates, portrait] = self.kv.get_many([
            StorageKey::UserCity,
            StorageKey::UserBirthDatetime,
            StorageKey::UserCoordinates,
            StorageKey::UserPortrait,
        ])?;
        Ok(UserProfile {
            city: non_empty(city),
            birth_datetime: non_empty(birth_datetime),
            coordinates: non_empty(coordinates),
            portrait: non_empty(portrait),
        })
    }

    /// Store the result of a successful portrait request.
    pub fn save_portrait(&mut self, city: &str, birth_datetime: &str, portrait_json: &str) -> SqlResult<()> {
        self.kv.set_many(&[
            (StorageKey::UserCity, city),
            (StorageKey::UserBirthDatetime, birth_datetime),
            (StorageKey::UserPortrait, portrait_json),
        ])
    }

    pub fn save_coordinates(&self, coordinates: &str) -> SqlResult<()> {
        self.kv.set(StorageKey::UserCoordinates, coordinates)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_profile() {
        let store = ProfileStore::in_memory().unwrap();
        assert_eq!(store.load().unwrap(), UserProfile::default());
    }

    #[test]
    fn saved_portrait_round_trips_profile_fields() {
        let mut store = ProfileStore::in_memory().unwrap();
        store
            .save_portrait("Lisbon", "1990-05-01T08:30:00", r#"{"k":1}"#)
            .unwrap();

        let profile = store.load().unwrap();
        assert_eq!(profile.city.as_deref(), Some("Lisbon"));
        assert_eq!(profile.birth_datetime.as_deref(), Some("1990-05-01T08:30:00"));
        assert_eq!(profile.portrait.as_deref(), Some(r#"{"k":1}"#));
        assert_eq!(profile.coordinates, None);
    }

    #[test]
    fn blank_slots_read_as_missing() {
        let store = ProfileStore::in_memory().unwrap();
        store.save_coordinates("").unwrap();
        assert_eq!(store.load().unwrap().coordinates, None);
    }
}
