// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use redis::AsyncCommands;
use std::time::Duration;

use crate::infrastructure::cache::kv::{CacheStats, KeyValueCache};

/// Redis缓存
///
/// 基于Redis的键值缓存后端，过期时间由`SET EX`托管给服务端。
pub struct RedisCache {
    client: redis::Client,
    stats: Mutex<CacheStats>,
}

impl RedisCache {
    /// 创建新的Redis缓存实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisCache)` - Redis缓存实例
    /// * `Err(anyhow::Error)` - 创建过程中出现的错误
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        // Fail fast on unreachable servers instead of on first use.
        client.get_multiplexed_async_connection().await?;
        Ok(Self {
            client,
            stats: Mutex::new(CacheStats::default()),
        })
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = con.get(key).await?;

        let mut stats = self.stats.lock();
        match value {
            Some(_) => stats.hits += 1,
            None => stats.misses += 1,
        }
        drop(stats);

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        match ttl {
            Some(ttl) => {
                con.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
            }
            None => {
                con.set::<_, _, ()>(key, value).await?;
            }
        }
        self.stats.lock().stores += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.del::<_, ()>(key).await?;
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}
