// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::audit::{AuditRequest, CheckCategory};

/// 应用程序配置设置
///
/// 包含爬虫默认值、缓存、历史记录和日志等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬虫默认配置
    pub crawler: CrawlerSettings,
    /// 缓存配置
    pub cache: CacheSettings,
    /// 历史记录配置
    pub history: HistorySettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 爬虫默认配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 单次运行最大爬取页面数
    pub max_pages: u32,
    /// 最大爬取深度
    pub max_depth: u32,
    /// 请求间隔（秒）
    pub delay_seconds: f64,
    /// 单请求超时时间（秒），由爬取引擎实现消费
    pub timeout_seconds: u64,
    /// User-Agent标识
    pub user_agent: String,
}

/// 缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 缓存后端 (memory, redis)
    pub backend: String,
    /// 默认过期时间（秒）
    pub ttl_seconds: u64,
    /// 内存缓存最大条目数
    pub max_entries: usize,
    /// Redis连接URL (当 backend=redis 时使用)
    pub redis_url: Option<String>,
}

/// 历史记录配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    /// 保留的历史条目数
    pub limit: usize,
    /// 持久化过期时间（天）
    pub ttl_days: u64,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 按 内置默认值 → 配置文件 → 环境变量 的顺序加载；任何来源
    /// 缺失时落到内置默认值，加载本身不会因文件不存在而失败。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawler settings
            .set_default("crawler.max_pages", 50)?
            .set_default("crawler.max_depth", 3)?
            .set_default("crawler.delay_seconds", 1.0)?
            .set_default("crawler.timeout_seconds", 30)?
            .set_default("crawler.user_agent", "Auditrs-Bot/0.1.0")?
            // Default cache settings
            .set_default("cache.backend", "memory")?
            .set_default("cache.ttl_seconds", 3600)?
            .set_default("cache.max_entries", 10000)?
            // Default history settings
            .set_default("history.limit", 20)?
            .set_default("history.ttl_days", 30)?
            // Default logging settings
            .set_default("logging.level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("AUDITRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl CrawlerSettings {
    /// 以配置默认值构造一个启用全部检查类别的审计请求
    pub fn default_request(&self, url: impl Into<String>) -> AuditRequest {
        AuditRequest {
            url: url.into(),
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            crawl_delay_seconds: self.delay_seconds,
            selected_checks: CheckCategory::all().into_iter().collect(),
        }
    }
}

impl HistorySettings {
    /// 持久化过期时间
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_days * 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let settings = Settings::new().expect("defaults must always load");
        assert_eq!(settings.crawler.max_pages, 50);
        assert_eq!(settings.crawler.max_depth, 3);
        assert_eq!(settings.cache.backend, "memory");
        assert_eq!(settings.history.limit, 20);
        assert_eq!(settings.history.ttl_days, 30);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_default_request_enables_all_checks() {
        let settings = Settings::new().unwrap();
        let request = settings.crawler.default_request("https://example.com");
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.max_pages, 50);
        assert_eq!(request.selected_checks.len(), 6);
    }

    #[test]
    fn test_history_ttl_in_days() {
        let history = HistorySettings {
            limit: 20,
            ttl_days: 30,
        };
        assert_eq!(history.ttl(), Duration::from_secs(2_592_000));
    }
}
