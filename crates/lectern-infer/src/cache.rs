//! LRU query cache for embedding results.
//!
//! Questions are often asked twice in a row (retyped, refreshed page);
//! caching avoids a second ONNX pass. Default: 512 entries, 1-hour TTL.
//! Only single-text embeddings are cached; document batches never enter
//! the cache, so one large upload cannot evict the cached questions.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use lectern_core::Result;
use ndarray::Array1;
use parking_lot::Mutex;
use tracing::debug;

use crate::embedder::{EmbedderBackend, EmbeddingResult};

struct CacheEntry {
    embedding: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache keyed by the exact input text.
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Least recently used at the front.
    order: VecDeque<String>,
    max_size: usize,
    ttl: Duration,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

impl QueryCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
                max_size: max_size.max(1),
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (512 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(512, Duration::from_secs(3600))
    }

    /// Get a cached embedding. Returns None on miss or expired entry.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let lookup = inner
            .entries
            .get(text)
            .map(|e| (e.inserted_at.elapsed() < ttl, e.embedding.clone()));

        match lookup {
            Some((true, embedding)) => {
                inner.touch(text);
                Some(embedding)
            }
            Some((false, _)) => {
                inner.forget(text);
                None
            }
            None => None,
        }
    }

    /// Insert an embedding, evicting the least recently used entry when full.
    pub fn put(&self, text: String, embedding: Array1<f32>) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&text) {
            inner.touch(&text);
        } else {
            while inner.entries.len() >= inner.max_size {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            inner.order.push_back(text.clone());
        }

        inner.entries.insert(
            text,
            CacheEntry {
                embedding,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backend wrapper that serves `embed` from a `QueryCache`.
///
/// `embed_batch` goes straight to the wrapped backend.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: QueryCache,
}

impl<E: EmbedderBackend> CachedEmbedder<E> {
    pub fn new(inner: E, cache: QueryCache) -> Self {
        Self { inner, cache }
    }
}

impl<E: EmbedderBackend> EmbedderBackend for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        if let Some(cached) = self.cache.get(text) {
            debug!("Embedding cache hit ({} chars)", text.len());
            return Ok(EmbeddingResult {
                embedding: cached,
                cached: true,
            });
        }

        let result = self.inner.embed(text)?;
        self.cache.put(text.to_string(), result.embedding.clone());
        Ok(result)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingResult>> {
        self.inner.embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingEmbedder;
    use ndarray::array;

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = QueryCache::new(10, Duration::from_secs(3600));
        assert!(cache.get("what is osmosis").is_none());

        cache.put("what is osmosis".into(), array![1.0, 2.0, 3.0]);
        assert_eq!(cache.get("what is osmosis"), Some(array![1.0, 2.0, 3.0]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let cache = QueryCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), array![1.0]);
        cache.put("b".into(), array![2.0]);

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.put("c".into(), array![3.0]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_ttl_expiry() {
        let cache = QueryCache::new(10, Duration::from_millis(1));
        cache.put("ephemeral".into(), array![1.0]);

        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("ephemeral").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_questions_are_cached() {
        let embedder = CachedEmbedder::new(
            HashingEmbedder::new(16),
            QueryCache::new(4, Duration::from_secs(3600)),
        );

        let first = embedder.embed("what is osmosis").unwrap();
        assert!(!first.cached);
        let second = embedder.embed("what is osmosis").unwrap();
        assert!(second.cached);
        assert_eq!(first.embedding, second.embedding);
        assert_eq!(embedder.cache.len(), 1);
    }

    #[test]
    fn test_document_batches_do_not_evict_questions() {
        let embedder = CachedEmbedder::new(
            HashingEmbedder::new(16),
            QueryCache::new(2, Duration::from_secs(3600)),
        );
        embedder.embed("what is osmosis").unwrap();

        let segments: Vec<String> = (0..10).map(|i| format!("segment {}", i)).collect();
        let texts: Vec<&str> = segments.iter().map(String::as_str).collect();
        let batch = embedder.embed_batch(&texts).unwrap();

        assert_eq!(batch.len(), 10);
        assert!(batch.iter().all(|r| !r.cached));
        assert_eq!(embedder.cache.len(), 1);
        assert!(embedder.embed("what is osmosis").unwrap().cached);
    }
}
