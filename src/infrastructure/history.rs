// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::models::history::HistoryEntry;
use crate::infrastructure::cache::kv::KeyValueCache;

/// 历史记录的固定缓存键
const HISTORY_CACHE_KEY: &str = "audit_history";

/// 运行历史存储
///
/// 维护最近若干次审计运行的有界记录（最新在前），并将完整的
/// 截断序列持久化到带过期时间的键值缓存。持久化是尽力而为的：
/// 任何缓存故障只记录日志，绝不影响运行结果。截断策略由存储
/// 持有，调用方不参与。
pub struct RunHistoryStore {
    cache: Arc<dyn KeyValueCache>,
    entries: Mutex<Vec<HistoryEntry>>,
    limit: usize,
    ttl: Duration,
}

impl RunHistoryStore {
    /// 默认保留的历史条目数
    pub const DEFAULT_LIMIT: usize = 20;
    /// 默认持久化过期时间（30天）
    pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400 * 30);

    /// 以默认边界创建历史存储
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self::with_bounds(cache, Self::DEFAULT_LIMIT, Self::DEFAULT_TTL)
    }

    /// 以指定的条目上限与过期时间创建历史存储
    pub fn with_bounds(cache: Arc<dyn KeyValueCache>, limit: usize, ttl: Duration) -> Self {
        Self {
            cache,
            entries: Mutex::new(Vec::new()),
            limit,
            ttl,
        }
    }

    /// 从缓存恢复内存中的历史序列
    ///
    /// 通常在启动时调用一次；不调用也不影响追加的正确性。
    pub async fn hydrate(&self) {
        let loaded = self.load().await;
        *self.entries.lock() = loaded;
    }

    /// 追加一条历史记录
    ///
    /// 插入到序列头部，截断到上限，然后持久化完整的截断序列。
    /// 持久化失败不会向调用方传播。
    pub async fn append(&self, entry: HistoryEntry) {
        let snapshot = {
            let mut entries = self.entries.lock();
            entries.insert(0, entry);
            entries.truncate(self.limit);
            entries.clone()
        };

        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize audit history");
                return;
            }
        };

        if let Err(e) = self.cache.set(HISTORY_CACHE_KEY, &payload, Some(self.ttl)).await {
            warn!(error = %e, "failed to persist audit history, continuing");
        }
    }

    /// 读取持久化的历史序列
    ///
    /// 缓存未命中、读取失败或载荷损坏时一律返回空序列。
    pub async fn load(&self) -> Vec<HistoryEntry> {
        match self.cache.get(HISTORY_CACHE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "corrupt audit history payload, ignoring");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load audit history");
                Vec::new()
            }
        }
    }

    /// 内存中的最近历史快照（最新在前）
    pub fn recent(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    /// 内存中的历史条目数
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// 内存序列是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
