// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use auditrs::config::settings::Settings;
use auditrs::domain::models::audit::{
    AnalysisReport, CategoryReport, CheckCategory, Grade, ScoreStatus,
};
use auditrs::domain::models::crawl::{CrawlLimits, CrawlOutcome, PageRecord};
use auditrs::domain::services::audit_service::AuditService;
use auditrs::engines::traits::{AnalysisEngine, CrawlEngine, EngineError};
use auditrs::infrastructure::cache::build_cache;
use auditrs::infrastructure::history::RunHistoryStore;
use auditrs::infrastructure::observability::audit_log::{AuditLogger, PerformanceLogger};

/// 返回固定页面集合的测试爬虫，记录配置与关闭次数。
struct StubCrawler {
    page_count: usize,
    closes: AtomicUsize,
    configured: Mutex<Option<CrawlLimits>>,
}

impl StubCrawler {
    fn new(page_count: usize) -> Self {
        Self {
            page_count,
            closes: AtomicUsize::new(0),
            configured: Mutex::new(None),
        }
    }

    fn pages(&self) -> Vec<PageRecord> {
        (0..self.page_count)
            .map(|i| {
                let mut page = PageRecord::new(format!("https://example.com/page-{i}"));
                page.status_code = Some(200);
                page.title = Some(format!("Page {i}"));
                page.word_count = 350;
                page
            })
            .collect()
    }
}

#[async_trait]
impl CrawlEngine for StubCrawler {
    fn configure(&self, limits: CrawlLimits) {
        *self.configured.lock() = Some(limits);
    }

    async fn crawl(&self, _start_url: &str) -> Result<Vec<PageRecord>, EngineError> {
        Ok(self.pages())
    }

    fn statistics(&self) -> HashMap<String, serde_json::Value> {
        let mut stats = HashMap::new();
        stats.insert("pages_crawled".to_string(), json!(self.page_count));
        stats.insert("pages_skipped".to_string(), json!(0));
        stats.insert("errors".to_string(), json!(0));
        stats
    }

    fn url_list(&self) -> Vec<String> {
        self.pages().into_iter().map(|p| p.url).collect()
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub-crawler"
    }
}

/// 为每个选定类别产出固定得分的测试分析器。
struct StubAnalyzer;

impl StubAnalyzer {
    fn category_score(category: CheckCategory) -> u8 {
        match category {
            CheckCategory::Technical => 85,
            CheckCategory::Onpage => 75,
            CheckCategory::Performance => 70,
            CheckCategory::Mobile => 82,
            CheckCategory::Security => 90,
            CheckCategory::Accessibility => 68,
        }
    }
}

#[async_trait]
impl AnalysisEngine for StubAnalyzer {
    async fn analyze(
        &self,
        crawl: &CrawlOutcome,
        selected_checks: &HashSet<CheckCategory>,
        _parallel: bool,
    ) -> Result<AnalysisReport, EngineError> {
        let mut category_scores = HashMap::new();
        let mut categories = HashMap::new();
        for category in selected_checks {
            let score = Self::category_score(*category);
            category_scores.insert(*category, score);
            categories.insert(
                *category,
                CategoryReport {
                    score,
                    grade: Grade::from_score(score),
                    status: ScoreStatus::from_score(score),
                    issues: Vec::new(),
                },
            );
        }

        Ok(AnalysisReport {
            overall_score: 78,
            overall_grade: Grade::B,
            overall_status: ScoreStatus::Good,
            category_scores,
            categories,
            issues: Vec::new(),
            total_issues: 0,
            pages_analyzed: crawl.total_pages as u32,
        })
    }

    fn name(&self) -> &'static str {
        "stub-analyzer"
    }
}

#[tokio::test]
async fn test_full_audit_lifecycle_with_default_settings() {
    let settings = Settings::new().expect("builtin defaults always load");

    let cache = build_cache(&settings.cache).await;
    let history = Arc::new(RunHistoryStore::with_bounds(
        cache.clone(),
        settings.history.limit,
        settings.history.ttl(),
    ));
    history.hydrate().await;
    assert!(history.is_empty());

    let crawler = Arc::new(StubCrawler::new(3));
    let service = AuditService::new(
        crawler.clone(),
        Arc::new(StubAnalyzer),
        history.clone(),
        Arc::new(AuditLogger::new()),
        Arc::new(PerformanceLogger::new()),
    );

    let mut request = settings.crawler.default_request("https://example.com");
    request.max_pages = 10;
    request.max_depth = 2;
    request.crawl_delay_seconds = 0.0;

    let result = service.execute(request.clone()).await.unwrap();

    assert_eq!(result.overall_score, 78);
    assert_eq!(result.overall_grade, Grade::B);
    assert_eq!(result.pages_analyzed, 3);
    assert_eq!(result.category_scores[&CheckCategory::Technical], 85);
    assert_eq!(result.categories[&CheckCategory::Security].score, 90);
    assert!(result.audit_duration_seconds >= 0.0);

    // The crawler was configured from the request and released exactly once.
    let configured = *crawler.configured.lock();
    assert_eq!(configured, Some(request.crawl_limits()));
    assert_eq!(crawler.closes.load(Ordering::SeqCst), 1);

    // History is persisted through the cache, newest first.
    let persisted = history.load().await;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].score, 78);
    assert_eq!(persisted[0].run_id, result.run_id);

    // A second run lands in front of the first.
    let second = service.execute(request).await.unwrap();
    let persisted = history.load().await;
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].run_id, second.run_id);

    // A fresh store over the same cache sees the same sequence after hydration.
    let rehydrated = RunHistoryStore::with_bounds(
        cache,
        settings.history.limit,
        settings.history.ttl(),
    );
    rehydrated.hydrate().await;
    assert_eq!(rehydrated.len(), 2);
}
