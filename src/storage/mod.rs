use crate::analyzers::rarities::FrequencyTable;
use crate::config::Settings;
use anyhow::Result;
use cached::{Cached, SizedCache, TimedCache, TimedSizedCache, UnboundCache};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

type Entry = Arc<FrequencyTable>;

enum Store {
    Unbound(UnboundCache<String, Entry>),
    Sized(SizedCache<String, Entry>),
    Timed(TimedCache<String, Entry>),
    TimedSized(TimedSizedCache<String, Entry>),
}

impl Store {
    fn get(&mut self, key: &String) -> Option<Entry> {
        match self {
            Store::Unbound(c) => c.cache_get(key).cloned(),
            Store::Sized(c) => c.cache_get(key).cloned(),
            Store::Timed(c) => c.cache_get(key).cloned(),
            Store::TimedSized(c) => c.cache_get(key).cloned(),
        }
    }

    fn set(&mut self, key: String, value: Entry) {
        match self {
            Store::Unbound(c) => c.cache_set(key, value),
            Store::Sized(c) => c.cache_set(key, value),
            Store::Timed(c) => c.cache_set(key, value),
            Store::TimedSized(c) => c.cache_set(key, value),
        };
    }

    fn remove(&mut self, key: &String) -> Option<Entry> {
        match self {
            Store::Unbound(c) => c.cache_remove(key),
            Store::Sized(c) => c.cache_remove(key),
            Store::Timed(c) => c.cache_remove(key),
            Store::TimedSized(c) => c.cache_remove(key),
        }
    }

    fn clear(&mut self) {
        match self {
            Store::Unbound(c) => c.cache_clear(),
            Store::Sized(c) => c.cache_clear(),
            Store::Timed(c) => c.cache_clear(),
            Store::TimedSized(c) => c.cache_clear(),
        }
    }

    fn len(&mut self) -> usize {
        match self {
            Store::Unbound(c) => c.cache_size(),
            Store::Sized(c) => c.cache_size(),
            Store::Timed(c) => {
                c.flush();
                c.cache_size()
            }
            Store::TimedSized(c) => {
                c.flush();
                c.cache_size()
            }
        }
    }
}

/// Frequency tables keyed by lower-cased contract address.
///
/// Entries are immutable once stored; callers share them through `Arc`.
/// The lock is never held while a table is being loaded, so two callers
/// missing on the same contract may both load it and the last write wins.
pub struct FrequencyCache {
    store: Mutex<Store>,
}

fn cache_key(contract: &str) -> String {
    contract.trim().to_lowercase()
}

impl Default for FrequencyCache {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl FrequencyCache {
    /// A `size` of zero is treated as no size limit.
    pub fn new(ttl_secs: Option<u64>, size: Option<usize>) -> Self {
        let store = match (ttl_secs, size.filter(|s| *s > 0)) {
            (None, None) => Store::Unbound(UnboundCache::new()),
            (None, Some(size)) => Store::Sized(SizedCache::with_size(size)),
            (Some(ttl), None) => Store::Timed(TimedCache::with_lifespan(ttl)),
            (Some(ttl), Some(size)) => {
                Store::TimedSized(TimedSizedCache::with_size_and_lifespan(size, ttl))
            }
        };

        Self {
            store: Mutex::new(store),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.frequency_cache_ttl_secs,
            settings.frequency_cache_size,
        )
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // entries are never left half written, so a poisoned lock is still usable
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, contract: &str) -> Option<Entry> {
        self.lock().get(&cache_key(contract))
    }

    pub fn insert(&self, contract: &str, table: FrequencyTable) -> Entry {
        let entry = Arc::new(table);
        self.lock().set(cache_key(contract), entry.clone());
        entry
    }

    pub fn invalidate(&self, contract: &str) -> bool {
        self.lock().remove(&cache_key(contract)).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    /// Number of live entries. Expired entries are evicted first.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached table for `contract`, running `loader` on a miss.
    /// A failed load leaves the cache untouched.
    pub async fn get_or_load<F, Fut>(&self, contract: &str, loader: F) -> Result<Entry>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FrequencyTable>>,
    {
        if let Some(entry) = self.get(contract) {
            log::info!("Frequency table for {} served from cache", cache_key(contract));
            return Ok(entry);
        }

        let table = loader().await?;
        Ok(self.insert(contract, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::RawAttribute;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn get_table(value: &str) -> FrequencyTable {
        FrequencyTable::from_sample(&[vec![RawAttribute::new("Hat", value)]])
    }

    #[tokio::test]
    async fn test_get_or_load_hits_cache() {
        let cache = FrequencyCache::default();
        let counter = AtomicUsize::new(0);
        let loads = &counter;

        for contract in ["0xABC", "0xabc", " 0xAbc "] {
            let table = cache
                .get_or_load(contract, move || async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(get_table("Cap"))
                })
                .await
                .unwrap();
            assert!(table.get("Hat", "Cap").is_some());
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_load() {
        let cache = FrequencyCache::default();
        let counter = AtomicUsize::new(0);
        let barrier = Barrier::new(2);
        let (loads, gate) = (&counter, &barrier);

        // each loader waits for the other, so this only finishes if neither blocks the cache
        let (a, b) = tokio::join!(
            cache.get_or_load("0xabc", move || async move {
                loads.fetch_add(1, Ordering::SeqCst);
                gate.wait().await;
                Ok(get_table("Cap"))
            }),
            cache.get_or_load("0xABC", move || async move {
                loads.fetch_add(1, Ordering::SeqCst);
                gate.wait().await;
                Ok(get_table("Crown"))
            }),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_not_cached() {
        let cache = FrequencyCache::default();

        let result = cache
            .get_or_load("0xdead", || async { Err(anyhow::anyhow!("provider down")) })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty());

        let table = cache
            .get_or_load("0xdead", || async { Ok(get_table("Crown")) })
            .await
            .unwrap();
        assert!(table.get("Hat", "Crown").is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = FrequencyCache::default();
        cache.insert("0xaaa", get_table("Cap"));
        cache.insert("0xbbb", get_table("Crown"));

        assert!(cache.invalidate("0xAAA"));
        assert!(!cache.invalidate("0xaaa"));
        assert!(cache.get("0xaaa").is_none());
        assert!(cache.get("0xbbb").is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sized_cache_evicts() {
        let cache = FrequencyCache::new(None, Some(2));
        cache.insert("0x1", get_table("a"));
        cache.insert("0x2", get_table("b"));
        cache.insert("0x3", get_table("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("0x1").is_none());
        assert!(cache.get("0x3").is_some());
    }

    #[test]
    fn test_zero_size_is_unbounded() {
        let cache = FrequencyCache::new(None, Some(0));
        cache.insert("0x1", get_table("a"));
        cache.insert("0x2", get_table("b"));
        assert_eq!(cache.len(), 2);

        let cache = FrequencyCache::new(Some(60), Some(0));
        cache.insert("0x1", get_table("a"));
        assert!(cache.get("0x1").is_some());
    }

    #[test]
    fn test_len_skips_expired_entries() {
        let cache = FrequencyCache::new(Some(1), None);
        cache.insert("0x1", get_table("a"));
        assert_eq!(cache.len(), 1);

        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(cache.get("0x1").is_none());
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            frequency_cache_ttl_secs: Some(60),
            frequency_cache_size: Some(4),
            ..Default::default()
        };
        let cache = FrequencyCache::from_settings(&settings);
        cache.insert("0x1", get_table("a"));
        assert!(cache.get("0x1").is_some());
    }
}
