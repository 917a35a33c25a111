use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::common::{CachedDailyInsight, DailyTransit};
use crate::storage::{KeyValueStore, StorageKey};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Single-slot, date-keyed cache for the daily transit document.
pub struct DailyInsightCache<'a> {
    store: &'a KeyValueStore,
}

impl<'a> DailyInsightCache<'a> {
    pub fn new(store: &'a KeyValueStore) -> Self {
        Self { store }
    }

    /// Today's document, if one was stored today in the current shape.
    pub fn read(&self) -> Option<DailyTransit> {
        self.read_on(local_today())
    }

    pub fn read_on(&self, today: NaiveDate) -> Option<DailyTransit> {
        let raw = match self.store.get(StorageKey::DailyInsight) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::error!("Failed to load daily insight cache: {err}");
                return None;
            }
        };

        let entry: Value = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Discarding unreadable daily insight cache: {err}");
                return None;
            }
        };

        let today = today.format(DATE_FORMAT).to_string();
        if entry.get("date").and_then(Value::as_str) != Some(today.as_str()) {
            log::debug!("Daily insight cache is not from {today}");
            return None;
        }

        let data = entry.get("data")?;
        if !has_current_shape(data) {
            log::info!("Daily insight cache holds an older document shape; ignoring it");
            return None;
        }

        match serde_json::from_value(data.clone()) {
            Ok(transit) => Some(transit),
            Err(err) => {
                log::warn!("Discarding daily insight cache: {err}");
                None
            }
        }
    }

    /// Store `data` as today's document. Failures are logged, never returned.
    pub fn write(&self, data: &DailyTransit) {
        self.write_on(local_today(), data)
    }

    pub fn write_on(&self, today: NaiveDate, data: &DailyTransit) {
        let entry = CachedDailyInsight {
            date: today.format(DATE_FORMAT).to_string(),
            data: data.clone(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(|err| err.to_string())
            .and_then(|json| {
                self.store
                    .set(StorageKey::DailyInsight, &json)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            log::error!("Failed to save daily insight cache: {err}");
        }
    }
}

/// Every field this build renders must be present as a string.
fn has_current_shape(data: &Value) -> bool {
    DailyTransit::REQUIRED_FIELDS
        .iter()
        .all(|field| data.get(field).is_some_and(Value::is_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn sample() -> DailyTransit {
        DailyTransit {
            headline: "A day for quiet courage".into(),
            mood_word: "Steady".into(),
            the_tension: "Mars squares your Sun.".into(),
            the_shift: "Lean on routine.".into(),
            pro_tip: "Walk before noon.".into(),
        }
    }

    #[test]
    fn empty_store_is_a_miss() {
        let store = KeyValueStore::in_memory().unwrap();
        assert_eq!(DailyInsightCache::new(&store).read_on(day("2024-01-01")), None);
    }

    #[test]
    fn write_then_read_same_day_returns_document() {
        let store = KeyValueStore::in_memory().unwrap();
        let cache = DailyInsightCache::new(&store);

        cache.write_on(day("2024-01-01"), &sample());
        assert_eq!(cache.read_on(day("2024-01-01")), Some(sample()));
    }

    #[test]
    fn write_uses_local_today() {
        let store = KeyValueStore::in_memory().unwrap();
        let cache = DailyInsightCache::new(&store);

        cache.write(&sample());
        assert_eq!(cache.read_on(local_today()), Some(sample()));
    }

    #[test]
    fn entry_from_another_day_is_a_miss() {
        let store = KeyValueStore::in_memory().unwrap();
        let cache = DailyInsightCache::new(&store);

        cache.write_on(day("2024-01-01"), &sample());
        assert_eq!(cache.read_on(day("2024-01-02")), None);
        assert_eq!(cache.read_on(day("2023-12-31")), None);
    }

    #[test]
    fn older_document_shape_is_a_miss() {
        let store = KeyValueStore::in_memory().unwrap();
        let stale = json!({
            "date": "2024-01-01",
            "data": {
                "headline": "Old news",
                "mood_word": "Calm",
                "the_vibe": "Soft",
                "the_fix": "Rest",
                "pro_tip": "Sleep"
            }
        });
        store.set(StorageKey::DailyInsight, &stale.to_string()).unwrap();

        assert_eq!(DailyInsightCache::new(&store).read_on(day("2024-01-01")), None);
    }

    #[test]
    fn non_string_field_is_a_miss() {
        let store = KeyValueStore::in_memory().unwrap();
        let mut entry = json!({ "date": "2024-01-01", "data": sample() });
        entry["data"]["pro_tip"] = json!(null);
        store.set(StorageKey::DailyInsight, &entry.to_string()).unwrap();

        assert_eq!(DailyInsightCache::new(&store).read_on(day("2024-01-01")), None);
    }

    #[test]
    fn garbage_payload_is_a_miss() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set(StorageKey::DailyInsight, "{not json").unwrap();
        assert_eq!(DailyInsightCache::new(&store).read_on(day("2024-01-01")), None);

        store.set(StorageKey::DailyInsight, r#"{"date":"2024-01-01"}"#).unwrap();
        assert_eq!(DailyInsightCache::new(&store).read_on(day("2024-01-01")), None);
    }

    #[test]
    fn failed_write_is_swallowed() {
        let store = KeyValueStore::in_memory().unwrap();
        store.break_storage();
        let cache = DailyInsightCache::new(&store);

        cache.write_on(day("2024-01-01"), &sample());
        assert_eq!(cache.read_on(day("2024-01-01")), None);
    }

    #[test]
    fn later_write_overwrites_slot() {
        let store = KeyValueStore::in_memory().unwrap();
        let cache = DailyInsightCache::new(&store);
        let mut newer = sample();
        newer.headline = "Second reading".into();

        cache.write_on(day("2024-01-01"), &sample());
        cache.write_on(day("2024-01-02"), &newer);

        assert_eq!(cache.read_on(day("2024-01-01")), None);
        assert_eq!(cache.read_on(day("2024-01-02")), Some(newer));
    }
}
