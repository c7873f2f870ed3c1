//! Typed views over [`KeyValueStore`] entries.
//!
//! Loading never fails: missing or unreadable data falls back to a default
//! and is logged. Saving is best effort and reports success as a `bool`.

use std::marker::PhantomData;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{InterestWeight, KeyValueStore};

/// Storage key holding the via-point list.
pub const VIA_POINTS_KEY: &str = "jp_via_points";

/// Storage key holding the interest weight.
pub const INTEREST_WEIGHT_KEY: &str = "jp_interest_weight";

/// A JSON array of `T` persisted under one key.
///
/// # Examples
/// ```
/// use waymark_core::PersistentList;
/// use waymark_core::test_support::MemoryKeyValueStore;
///
/// let store = MemoryKeyValueStore::with_entry("stops", r#"[1, "two", 3]"#);
/// let list = PersistentList::<u32>::new("stops");
/// assert_eq!(list.load(&store), vec![1, 3]);
/// ```
#[derive(Debug)]
pub struct PersistentList<T> {
    key: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> PersistentList<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a list to `key`.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }

    /// Storage key backing this list.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Load the list, skipping entries that fail to decode.
    #[must_use]
    pub fn load(&self, store: &impl KeyValueStore) -> Vec<T> {
        let Some(raw) = read_non_empty(store, self.key) else {
            return Vec::new();
        };
        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("stored value for {} is not a list; ignoring it", self.key);
                return Vec::new();
            }
            Err(err) => {
                warn!("stored value for {} is not valid JSON: {err}", self.key);
                return Vec::new();
            }
        };
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("skipping entry {index} of {}: {err}", self.key);
                    None
                }
            })
            .collect()
    }

    /// Write the whole list. Returns whether the write succeeded.
    #[must_use]
    pub fn save(&self, store: &impl KeyValueStore, items: &[T]) -> bool {
        let encoded = match serde_json::to_string(items) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("failed to encode {}: {err}", self.key);
                return false;
            }
        };
        write_logged(store, self.key, &encoded)
    }
}

/// The interest weight persisted as a decimal string.
#[derive(Debug, Clone, Copy)]
pub struct PersistentWeight {
    key: &'static str,
}

impl PersistentWeight {
    /// Bind the weight to `key`.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }

    /// Load the weight, falling back to [`InterestWeight::DEFAULT`].
    #[must_use]
    pub fn load(&self, store: &impl KeyValueStore) -> InterestWeight {
        let Some(raw) = read_non_empty(store, self.key) else {
            return InterestWeight::DEFAULT;
        };
        InterestWeight::parse(&raw).unwrap_or_else(|| {
            warn!("stored value for {} is not a weight: {raw:?}", self.key);
            InterestWeight::DEFAULT
        })
    }

    /// Write the weight. Returns whether the write succeeded.
    #[must_use]
    pub fn save(&self, store: &impl KeyValueStore, weight: InterestWeight) -> bool {
        write_logged(store, self.key, &weight.to_string())
    }
}

fn read_non_empty(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => Some(raw),
        Ok(_) => None,
        Err(err) => {
            warn!("failed to read {key}: {err}");
            None
        }
    }
}

fn write_logged(store: &impl KeyValueStore, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => true,
        Err(err) => {
            warn!("failed to persist {key}: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViaPoint;
    use crate::test_support::{FailingKeyValueStore, MemoryKeyValueStore};
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("{\"lat\": 1}"))]
    #[case(Some("[not json"))]
    fn unusable_values_load_as_empty(#[case] stored: Option<&str>) {
        let store = stored.map_or_else(MemoryKeyValueStore::default, |raw| {
            MemoryKeyValueStore::with_entry(VIA_POINTS_KEY, raw)
        });
        let list = PersistentList::<ViaPoint>::new(VIA_POINTS_KEY);
        assert!(list.load(&store).is_empty());
    }

    #[rstest]
    fn undecodable_entries_are_skipped() {
        let store = MemoryKeyValueStore::with_entry(
            VIA_POINTS_KEY,
            r#"[{"lat": 1.0, "lng": 2.0}, {"name": "no position"}, {"id": "b", "lat": 3.0, "lng": 4.0}]"#,
        );
        let loaded = PersistentList::<ViaPoint>::new(VIA_POINTS_KEY).load(&store);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id.as_deref(), Some("b"));
    }

    #[rstest]
    fn save_writes_whole_list_as_json() {
        let store = MemoryKeyValueStore::default();
        let list = PersistentList::<ViaPoint>::new(VIA_POINTS_KEY);
        assert!(list.save(&store, &[ViaPoint::new(1.0, 2.0).with_id("a")]));
        assert_eq!(
            store.value(VIA_POINTS_KEY).as_deref(),
            Some(r#"[{"id":"a","lat":1.0,"lng":2.0}]"#)
        );
    }

    #[rstest]
    fn failed_writes_report_false() {
        let list = PersistentList::<ViaPoint>::new(VIA_POINTS_KEY);
        assert!(!list.save(&FailingKeyValueStore, &[]));
        let weight = PersistentWeight::new(INTEREST_WEIGHT_KEY);
        assert!(!weight.save(&FailingKeyValueStore, InterestWeight::DEFAULT));
    }

    #[rstest]
    fn failed_reads_fall_back_to_defaults() {
        let list = PersistentList::<ViaPoint>::new(VIA_POINTS_KEY);
        assert!(list.load(&FailingKeyValueStore).is_empty());
        assert_eq!(
            PersistentWeight::new(INTEREST_WEIGHT_KEY).load(&FailingKeyValueStore),
            InterestWeight::DEFAULT
        );
    }

    #[rstest]
    #[case("0.8", 0.8)]
    #[case("80", 0.8)]
    #[case("garbage", 0.5)]
    #[case("", 0.5)]
    fn weight_loads_with_legacy_scale(#[case] stored: &str, #[case] expected: f64) {
        let store = MemoryKeyValueStore::with_entry(INTEREST_WEIGHT_KEY, stored);
        let weight = PersistentWeight::new(INTEREST_WEIGHT_KEY).load(&store);
        assert!((weight.get() - expected).abs() < 1e-12);
    }
}
