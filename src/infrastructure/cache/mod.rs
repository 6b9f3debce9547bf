// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供缓存功能的实现
/// 包括键值缓存接口、内存缓存与Redis缓存
pub mod kv;
pub mod memory_cache;
pub mod redis_cache;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings::CacheSettings;
use kv::KeyValueCache;
use memory_cache::MemoryCache;
use redis_cache::RedisCache;

/// 按配置构建缓存后端
///
/// 未知后端或Redis不可用时回退到内存缓存，只记录警告，
/// 不向调用方传播错误。
pub async fn build_cache(settings: &CacheSettings) -> Arc<dyn KeyValueCache> {
    let default_ttl = Duration::from_secs(settings.ttl_seconds);

    match settings.backend.as_str() {
        "memory" => Arc::new(MemoryCache::new(default_ttl, settings.max_entries)),
        "redis" => {
            if let Some(url) = settings.redis_url.as_deref() {
                match RedisCache::new(url).await {
                    Ok(cache) => {
                        info!("Redis cache connected");
                        return Arc::new(cache);
                    }
                    Err(e) => {
                        warn!(error = %e, "Redis cache unavailable, falling back to memory")
                    }
                }
            } else {
                warn!("Redis backend selected without redis_url, falling back to memory");
            }
            Arc::new(MemoryCache::new(default_ttl, settings.max_entries))
        }
        other => {
            warn!("Unknown cache backend: {}, using memory", other);
            Arc::new(MemoryCache::new(default_ttl, settings.max_entries))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: &str) -> CacheSettings {
        CacheSettings {
            backend: backend.to_string(),
            ttl_seconds: 60,
            max_entries: 16,
            redis_url: None,
        }
    }

    #[tokio::test]
    async fn test_memory_backend_selected() {
        let cache = build_cache(&settings("memory")).await;
        cache.set("key", "value", None).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_backend_falls_back_to_memory() {
        let cache = build_cache(&settings("mystery")).await;
        cache.set("key", "value", None).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_redis_without_url_falls_back_to_memory() {
        let cache = build_cache(&settings("redis")).await;
        cache.set("key", "value", None).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some("value".to_string()));
    }
}
