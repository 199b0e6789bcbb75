//! Search response caching with LRU eviction

use crate::error::SearchError;
use crate::normalize::normalize_arabic;
use crate::search::{canonical_sura_name, MatchConfig, Pagination, SearchOptions, SearchResponse};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Capacity-bounded map that evicts the least recently used entry.
///
/// All operations go through one mutex and are O(1). `get` and `set` refresh
/// recency; `has` does not.
pub struct RecencyCache<K: Hash + Eq, V> {
    cache: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> RecencyCache<K, V> {
    pub fn new(capacity: usize) -> Result<Self, SearchError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(SearchError::InvalidCapacity(capacity))?;
        Ok(Self {
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, V>> {
        // entries stay consistent even if a holder panicked
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Insert or update, evicting the least recently used entry when a new
    /// key arrives at capacity.
    pub fn set(&self, key: K, value: V) {
        self.lock().put(key, value);
    }

    pub fn has(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    pub fn delete(&self, key: &K) -> bool {
        self.lock().pop(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// (entries, capacity)
    pub fn stats(&self) -> (usize, usize) {
        let cache = self.lock();
        (cache.len(), cache.cap().get())
    }
}

/// Canonical cache key for one search call.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct SearchKey {
    query: String,
    lemma: bool,
    root: bool,
    fuzzy: bool,
    sura_id: Option<u32>,
    juz_id: Option<u32>,
    sura_name: Option<String>,
    page: usize,
    limit: usize,
    config: MatchConfig,
}

impl SearchKey {
    /// Queries and sura names that normalize identically share a key.
    /// Engines with different match configs never share one.
    pub fn new(
        query: &str,
        options: &SearchOptions,
        pagination: Pagination,
        config: &MatchConfig,
    ) -> Self {
        let pagination = pagination.normalized();
        Self {
            query: normalize_arabic(query),
            lemma: options.lemma,
            root: options.root,
            fuzzy: options.fuzzy,
            sura_id: options.sura_id,
            juz_id: options.juz_id,
            sura_name: options.sura_name.as_deref().and_then(canonical_sura_name),
            page: pagination.page,
            limit: pagination.limit,
            config: config.clone(),
        }
    }
}

pub type SearchCache = RecencyCache<SearchKey, Arc<SearchResponse>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_retrieve() {
        let cache = RecencyCache::new(3).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);

        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), None);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = RecencyCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = RecencyCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.get(&"a");
        cache.set("c", 3);

        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn test_set_existing_refreshes_recency() {
        let cache = RecencyCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        cache.set("c", 3);

        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn test_has_does_not_refresh() {
        let cache = RecencyCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);

        assert!(cache.has(&"a"));
        assert!(!cache.has(&"z"));
        cache.set("c", 3);
        assert!(!cache.has(&"a"));
    }

    #[test]
    fn test_delete_and_clear() {
        let cache = RecencyCache::new(3).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);

        assert!(cache.delete(&"a"));
        assert!(!cache.delete(&"x"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn test_invalid_capacity() {
        let result = RecencyCache::<&str, i32>::new(0);
        assert!(matches!(result, Err(SearchError::InvalidCapacity(0))));
    }

    #[test]
    fn test_capacity_one() {
        let cache = RecencyCache::new(1).unwrap();
        cache.set("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));

        cache.set("b", 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_n_plus_one_keeps_most_recent() {
        let capacity = 4;
        let cache = RecencyCache::new(capacity).unwrap();
        for i in 0..=capacity {
            cache.set(i, i * 10);
        }

        assert!(!cache.has(&0));
        for i in 1..=capacity {
            assert_eq!(cache.get(&i), Some(i * 10));
        }
        assert_eq!(cache.capacity(), capacity);
    }

    #[test]
    fn test_search_key_canonicalization() {
        let options = SearchOptions {
            sura_name: Some("  Al-Fatihah ".to_string()),
            ..SearchOptions::default()
        };
        let same = SearchOptions {
            sura_name: Some("al-fatihah".to_string()),
            ..SearchOptions::default()
        };

        let config = MatchConfig::default();

        let a = SearchKey::new("ٱللَّهِ", &options, Pagination::new(1, 10), &config);
        let b = SearchKey::new("الله", &same, Pagination::new(1, 10), &config);
        assert_eq!(a, b);

        let other_page = SearchKey::new("الله", &same, Pagination::new(2, 10), &config);
        assert_ne!(a, other_page);
    }

    #[test]
    fn test_search_key_separates_match_configs() {
        let options = SearchOptions::default();
        let strict = MatchConfig {
            fuzzy_min_query_len: 100,
            ..MatchConfig::default()
        };

        let pagination = Pagination::new(1, 10);

        let default_key = SearchKey::new("الله", &options, pagination, &MatchConfig::default());
        let strict_key = SearchKey::new("الله", &options, pagination, &strict);
        assert_ne!(default_key, strict_key);
        assert_eq!(default_key, SearchKey::new("الله", &options, pagination, &MatchConfig::default()));
    }
}
