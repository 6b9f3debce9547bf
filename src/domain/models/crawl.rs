// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 单页爬取记录
///
/// 爬取引擎对单个页面的产出，供分析引擎只读消费。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// 页面URL
    pub url: String,
    /// HTTP状态码
    #[serde(default)]
    pub status_code: Option<u16>,
    /// 页面标题
    #[serde(default)]
    pub title: Option<String>,
    /// meta description内容
    #[serde(default)]
    pub meta_description: Option<String>,
    /// 页面内全部H1标签文本
    #[serde(default)]
    pub h1_tags: Vec<String>,
    /// 站内链接
    #[serde(default)]
    pub internal_links: Vec<String>,
    /// 站外链接
    #[serde(default)]
    pub external_links: Vec<String>,
    /// 正文词数
    #[serde(default)]
    pub word_count: u32,
    /// 响应时间（毫秒）
    #[serde(default)]
    pub response_time_ms: u64,
    /// 响应体大小（字节）
    #[serde(default)]
    pub content_size: u64,
}

impl PageRecord {
    /// 创建只含URL的空白页记录
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            title: None,
            meta_description: None,
            h1_tags: Vec::new(),
            internal_links: Vec::new(),
            external_links: Vec::new(),
            word_count: 0,
            response_time_ms: 0,
            content_size: 0,
        }
    }
}

/// 爬取参数限制
///
/// 每次运行开始时由编排器下发给爬取引擎。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// 最大爬取页面数
    pub max_pages: u32,
    /// 最大爬取深度
    pub max_depth: u32,
    /// 请求间隔
    pub crawl_delay: Duration,
}

/// 一次完整爬取的产出
///
/// 由编排器在爬取阶段结束时组装，之后只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// 按爬取顺序排列的页面记录
    pub pages: Vec<PageRecord>,
    /// 爬取计数统计
    pub statistics: HashMap<String, serde_json::Value>,
    /// 已发现的URL列表
    pub url_list: Vec<String>,
    /// 起始URL
    pub start_url: String,
    /// 页面总数
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_record_serde_defaults() {
        let page: PageRecord =
            serde_json::from_str(r#"{"url": "https://example.com/about"}"#).unwrap();
        assert_eq!(page.url, "https://example.com/about");
        assert!(page.status_code.is_none());
        assert!(page.h1_tags.is_empty());
        assert_eq!(page.word_count, 0);
    }
}
