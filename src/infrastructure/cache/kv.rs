// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

/// 键值缓存接口
///
/// 带过期时间的简单键值存储。值为已序列化的字符串，由调用方
/// 决定编码格式。
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// 获取缓存值
    ///
    /// # 参数
    ///
    /// * `key` - 键
    ///
    /// # 返回值
    ///
    /// * `Ok(Option<String>)` - 键对应的值，不存在或已过期则返回None
    /// * `Err(anyhow::Error)` - 获取过程中出现的错误
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 设置键值对并指定过期时间
    ///
    /// # 参数
    ///
    /// * `key` - 键
    /// * `value` - 值
    /// * `ttl` - 过期时间；None时使用后端默认值
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// 删除缓存值
    async fn delete(&self, key: &str) -> Result<()>;

    /// 获取缓存统计信息
    fn stats(&self) -> CacheStats;
}
