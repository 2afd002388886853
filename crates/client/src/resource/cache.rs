//! Shared TTL cache for resource responses.

use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Key used when the filters carry nothing.
const DEFAULT_KEY: &str = "default";

/// Response cache keyed by the canonical JSON of a filter set.
///
/// Clones share entries, so every resource built from the same cache sees
/// the same data.
#[derive(Clone)]
pub struct ResponseCache<V> {
    entries: Cache<String, V>,
    ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> ResponseCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(256)
            .time_to_live(ttl)
            .build();
        Self { entries, ttl }
    }

    /// Cache key for `filters`.
    ///
    /// Object keys come out sorted, so two equal filter sets always map to
    /// the same key. Filters that serialize to `null` or `{}` share the
    /// `"default"` key. Returns `None` if the filters cannot be serialized.
    #[must_use]
    pub fn key<T: Serialize + ?Sized>(filters: &T) -> Option<String> {
        let value = serde_json::to_value(filters).ok()?;
        let empty = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            Some(DEFAULT_KEY.to_owned())
        } else {
            Some(value.to_string())
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: String, value: V) {
        self.entries.insert(key, value).await;
    }

    /// Whether a live (unexpired) entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone + Send + Sync + 'static> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V> std::fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Serialize, Default)]
    struct Filters {
        #[serde(skip_serializing_if = "Option::is_none")]
        period: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    }

    #[test]
    fn test_empty_filters_use_default_key() {
        assert_eq!(ResponseCache::<u8>::key(&()).as_deref(), Some("default"));
        assert_eq!(
            ResponseCache::<u8>::key(&Filters::default()).as_deref(),
            Some("default")
        );
    }

    #[test]
    fn test_key_is_canonical() {
        let a = Filters {
            period: Some("week"),
            limit: Some(5),
        };
        let mut b = BTreeMap::new();
        b.insert("limit", serde_json::json!(5));
        b.insert("period", serde_json::json!("week"));

        assert_eq!(ResponseCache::<u8>::key(&a), ResponseCache::<u8>::key(&b));
        assert_eq!(
            ResponseCache::<u8>::key(&a).as_deref(),
            Some(r#"{"limit":5,"period":"week"}"#)
        );
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = ResponseCache::new(Duration::from_millis(50));
        cache.insert("k".to_owned(), 7_u32).await;
        assert_eq!(cache.get("k").await, Some(7));
        assert!(cache.contains("k"));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("k").await, None);
        assert!(!cache.contains("k"));
    }
}
