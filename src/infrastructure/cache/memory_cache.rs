// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::infrastructure::cache::kv::{CacheStats, KeyValueCache};

/// 缓存条目
struct CacheEntry {
    data: String,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(data: String, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 内存缓存
///
/// 带TTL的进程内键值缓存，条目数达到上限时按创建时间淘汰
/// 最老的条目。
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
    max_entries: usize,
    stats: Mutex<CacheStats>,
}

impl MemoryCache {
    /// 创建新的内存缓存
    ///
    /// # 参数
    ///
    /// * `default_ttl` - 未显式指定时的条目过期时间
    /// * `max_entries` - 最大缓存条目数
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            max_entries,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    fn evict_if_needed(&self) {
        let current_size = self.entries.len();
        if current_size < self.max_entries {
            return;
        }

        // 多淘汰10%，避免每次插入都触发淘汰
        let to_evict = current_size - self.max_entries + 1 + self.max_entries / 10;

        let mut candidates: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        candidates.sort_by_key(|(_, created_at)| *created_at);

        for (key, _) in candidates.iter().take(to_evict) {
            self.entries.remove(key);
        }

        let evicted = to_evict.min(candidates.len()) as u64;
        self.stats.lock().evictions += evicted;
        debug!("Evicted {} entries from memory cache", evicted);
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.entries.remove(key);
                self.stats.lock().misses += 1;
                return Ok(None);
            }
            self.stats.lock().hits += 1;
            return Ok(Some(entry.data.clone()));
        }

        self.stats.lock().misses += 1;
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.evict_if_needed();
        self.entries.insert(
            key.to_string(),
            CacheEntry::new(value.to_string(), ttl.unwrap_or(self.default_ttl)),
        );
        self.stats.lock().stores += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}
