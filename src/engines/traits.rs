// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::models::audit::{AnalysisReport, CheckCategory};
use crate::domain::models::crawl::{CrawlLimits, CrawlOutcome, PageRecord};

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// 引擎不可用
    #[error("Engine unavailable: {0}")]
    Unavailable(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 爬取引擎特质
///
/// 负责抓取目标站点并汇报爬取统计。编排器在每次运行后调用
/// `close`释放资源，成功与失败路径各恰好一次。引擎内部的
/// 重试与超时策略由实现自行决定，编排器不做重试。
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// 应用本次运行的爬取限制
    fn configure(&self, limits: CrawlLimits);

    /// 从起始URL开始爬取，返回按爬取顺序排列的页面记录
    async fn crawl(&self, start_url: &str) -> Result<Vec<PageRecord>, EngineError>;

    /// 本次爬取的计数统计
    fn statistics(&self) -> HashMap<String, serde_json::Value>;

    /// 本次爬取发现的URL列表
    fn url_list(&self) -> Vec<String>;

    /// 释放引擎持有的资源
    async fn close(&self) -> Result<(), EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 分析引擎特质
///
/// 将爬取产出转换为各类别得分与问题列表。得分完全由分析器
/// 负责，编排器只消费结果、从不重算。`parallel`为true时允许
/// 实现跨类别并行执行；对编排器而言整个调用是单个阻塞单元。
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// 对爬取产出执行选定类别的分析
    async fn analyze(
        &self,
        crawl: &CrawlOutcome,
        selected_checks: &HashSet<CheckCategory>,
        parallel: bool,
    ) -> Result<AnalysisReport, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
