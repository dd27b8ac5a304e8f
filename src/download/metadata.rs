//! Video metadata and the TTL-bounded metadata cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::download::engine::{MediaEngine, RawMetadata};
use crate::download::formats::StreamDescriptor;

/// Normalized metadata for one video. Immutable once built; a stale cache
/// entry is replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
    /// 0 = the engine did not report a duration.
    pub duration_seconds: u64,
    pub uploader: String,
    pub view_count: u64,
    pub formats: Vec<StreamDescriptor>,
}

impl VideoMetadata {
    /// Normalizes a raw engine document, substituting display defaults for
    /// absent fields.
    pub fn from_raw(raw: RawMetadata) -> Self {
        Self {
            title: raw
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Unknown Title".to_string()),
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
            duration_seconds: raw.duration.map(|d| d.round() as u64).unwrap_or(0),
            uploader: raw
                .uploader
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            view_count: raw.view_count.unwrap_or(0),
            formats: raw.formats.iter().map(StreamDescriptor::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedMetadata {
    metadata: VideoMetadata,
    cached_at: Instant,
}

/// Cache usage snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Fetch-through metadata cache keyed by the literal URL string.
///
/// No canonicalization: `youtu.be/X` and `www.youtube.com/watch?v=X` are
/// distinct entries, as are URLs differing only in tracking parameters.
/// Entries expire after the TTL; failures are never cached.
pub struct MetadataCache {
    cache: Mutex<HashMap<String, CachedMetadata>>,
    ttl: Duration,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl MetadataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            ttl,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(config::cache::metadata_ttl())
    }

    /// Returns cached metadata when fresh, otherwise asks the engine
    /// (extraction only, no download), caches the normalized result and
    /// returns it. Engine failures surface as `AppError::MetadataFetch`.
    pub async fn get_or_fetch(
        &self,
        engine: &dyn MediaEngine,
        url: &str,
    ) -> AppResult<VideoMetadata> {
        if let Some(hit) = self.lookup(url).await {
            return Ok(hit);
        }

        log::debug!("Metadata cache miss for {}", url);
        let raw = engine
            .extract_metadata(url)
            .await
            .map_err(|e| AppError::MetadataFetch(e.to_string()))?;
        let metadata = VideoMetadata::from_raw(raw);

        let mut cache = self.cache.lock().await;
        cache.insert(
            url.to_string(),
            CachedMetadata {
                metadata: metadata.clone(),
                cached_at: Instant::now(),
            },
        );
        Ok(metadata)
    }

    async fn lookup(&self, url: &str) -> Option<VideoMetadata> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.get(url) {
            if cached.cached_at.elapsed() < self.ttl {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                log::debug!("Metadata cache hit for {}", url);
                return Some(cached.metadata.clone());
            }
            // Stale entry: evict now so the insert below replaces it.
            cache.remove(url);
        }
        self.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Evicts expired entries; returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        let mut cache = self.cache.lock().await;
        let before = cache.len();
        cache.retain(|_, cached| cached.cached_at.elapsed() < self.ttl);
        let removed = before - cache.len();
        if removed > 0 {
            log::debug!("Evicted {} expired metadata entries", removed);
        }
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        let size = self.cache.lock().await.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStats {
            size,
            hits,
            misses,
            hit_rate,
        }
    }
}
