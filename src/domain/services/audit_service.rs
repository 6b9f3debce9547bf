// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use parking_lot::RwLock;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::domain::models::audit::{AuditPhase, AuditRequest, AuditResult, RunContext};
use crate::domain::models::crawl::CrawlOutcome;
use crate::domain::models::history::HistoryEntry;
use crate::engines::traits::{AnalysisEngine, CrawlEngine};
use crate::infrastructure::history::RunHistoryStore;
use crate::infrastructure::observability::audit_log::{AuditLogger, PerformanceLogger};
use crate::utils::errors::AuditError;
use crate::utils::validators;

/// 进度上报接口
///
/// 由表示层实现；编排器在阶段边界上报完成百分比。
pub trait ProgressSink: Send + Sync {
    /// 上报当前阶段与完成百分比
    fn report(&self, phase: AuditPhase, percent: u8);
}

/// 默认进度上报实现，仅输出调试日志
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, phase: AuditPhase, percent: u8) {
        debug!(%phase, percent, "audit progress");
    }
}

/// 单次运行占用守卫
///
/// 持有期间运行槽位被占用；无论正常返回、错误返回还是Future
/// 被丢弃，析构时都会释放槽位。
struct RunSlot<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AuditError> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AuditError::RunInProgress);
        }
        Ok(Self { flag })
    }
}

impl Drop for RunSlot<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 审计运行编排服务
///
/// 驱动一次审计运行经过 校验 → 爬取 → 分析 → 定稿 → 历史持久化
/// 的完整生命周期：隔离各阶段失败、上报进度、采集指标，并组装
/// 最终结果文档。得分完全来自分析引擎，编排器从不重算。
///
/// 同一实例同一时刻只允许一次运行，运行期间的再次触发会被拒绝
/// 而不是排队。已知限制：爬取阶段没有编排层超时，挂起的爬取会
/// 挂起整次运行；不支持运行中途取消。
pub struct AuditService<C, A>
where
    C: CrawlEngine,
    A: AnalysisEngine,
{
    crawler: Arc<C>,
    analyzer: Arc<A>,
    history: Arc<RunHistoryStore>,
    audit_log: Arc<AuditLogger>,
    performance_log: Arc<PerformanceLogger>,
    progress: Arc<dyn ProgressSink>,
    phase: RwLock<AuditPhase>,
    in_progress: AtomicBool,
}

impl<C, A> AuditService<C, A>
where
    C: CrawlEngine,
    A: AnalysisEngine,
{
    /// 创建新的审计服务实例
    pub fn new(
        crawler: Arc<C>,
        analyzer: Arc<A>,
        history: Arc<RunHistoryStore>,
        audit_log: Arc<AuditLogger>,
        performance_log: Arc<PerformanceLogger>,
    ) -> Self {
        Self {
            crawler,
            analyzer,
            history,
            audit_log,
            performance_log,
            progress: Arc::new(LogProgress),
            phase: RwLock::new(AuditPhase::Idle),
            in_progress: AtomicBool::new(false),
        }
    }

    /// 替换进度上报实现
    pub fn with_progress_sink(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// 当前（或最近一次）运行的阶段
    pub fn phase(&self) -> AuditPhase {
        *self.phase.read()
    }

    /// 是否有运行正在进行
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    fn set_phase(&self, phase: AuditPhase) {
        *self.phase.write() = phase;
    }

    /// 执行一次审计运行
    ///
    /// # 参数
    ///
    /// * `request` - 审计请求
    ///
    /// # 返回值
    ///
    /// * `Ok(AuditResult)` - 完整的审计结果文档
    /// * `Err(AuditError)` - 分类后的运行错误。无论哪条路径返回，
    ///   系统都保证处于非运行状态，可以立即发起新的运行
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditResult, AuditError> {
        // Reject before any side effect: no run identity, no logging, no history.
        validators::validate_target_url(&request.url)
            .map_err(|e| AuditError::InvalidInput(e.to_string()))?;
        request
            .validate()
            .map_err(|e| AuditError::InvalidInput(e.to_string()))?;

        let _slot = RunSlot::acquire(&self.in_progress)?;
        self.set_phase(AuditPhase::Validating);

        let ctx = RunContext::new(request.url.clone());
        counter!("audit_runs_total").increment(1);
        self.audit_log.start_session(&ctx.url, ctx.run_id);
        info!(run_id = %ctx.run_id, url = %ctx.url, "Starting audit run");

        match self.run_stages(&request, &ctx).await {
            Ok(result) => {
                self.set_phase(AuditPhase::Complete);
                info!(
                    run_id = %ctx.run_id,
                    score = result.overall_score,
                    duration_seconds = result.audit_duration_seconds,
                    "Audit run completed"
                );
                Ok(result)
            }
            Err(e) => {
                counter!("audit_runs_failed_total").increment(1);
                self.audit_log.log_error(
                    "audit_failed",
                    &e.to_string(),
                    json!({ "url": ctx.url, "run_id": ctx.run_id }),
                );
                self.set_phase(AuditPhase::Failed);
                error!(run_id = %ctx.run_id, url = %ctx.url, error = %e, "Audit run failed");
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &AuditRequest,
        ctx: &RunContext,
    ) -> Result<AuditResult, AuditError> {
        self.set_phase(AuditPhase::Crawling);
        self.progress.report(AuditPhase::Crawling, 10);

        self.crawler.configure(request.crawl_limits());
        let crawled = self.crawler.crawl(&ctx.url).await;

        let outcome = match crawled {
            Ok(pages) => {
                let outcome = CrawlOutcome {
                    total_pages: pages.len(),
                    statistics: self.crawler.statistics(),
                    url_list: self.crawler.url_list(),
                    start_url: ctx.url.clone(),
                    pages,
                };
                self.performance_log.log_metric(
                    "crawl_pages",
                    outcome.total_pages as f64,
                    "pages",
                    json!({ "run_id": ctx.run_id, "url": ctx.url }),
                );
                outcome
            }
            Err(e) => {
                self.audit_log
                    .log_error("crawl_error", &e.to_string(), json!({ "url": ctx.url }));
                self.close_crawler(ctx).await;
                return Err(AuditError::CrawlStage {
                    url: ctx.url.clone(),
                    message: e.to_string(),
                });
            }
        };
        self.close_crawler(ctx).await;
        self.progress.report(AuditPhase::Crawling, 40);

        self.set_phase(AuditPhase::Analyzing);
        let report = match self
            .analyzer
            .analyze(&outcome, &request.selected_checks, true)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                self.audit_log
                    .log_error("analysis_error", &e.to_string(), json!({ "url": ctx.url }));
                return Err(AuditError::AnalysisStage {
                    url: ctx.url.clone(),
                    message: e.to_string(),
                });
            }
        };

        self.set_phase(AuditPhase::Finalizing);
        self.progress.report(AuditPhase::Finalizing, 95);
        let duration = ctx.start.elapsed().as_secs_f64();
        let result = AuditResult::finalize(report, ctx, duration);
        self.progress.report(AuditPhase::Finalizing, 100);

        // History must be visible before the session-end event is observable.
        self.history.append(HistoryEntry::from_result(&result)).await;
        self.performance_log.log_metric(
            "audit_duration",
            duration,
            "seconds",
            json!({ "run_id": ctx.run_id, "url": ctx.url }),
        );
        self.audit_log.end_session(json!({
            "overall_score": result.overall_score,
            "pages_analyzed": result.pages_analyzed,
            "duration": duration,
        }));

        Ok(result)
    }

    async fn close_crawler(&self, ctx: &RunContext) {
        // Exactly one close per run; release failure does not fail the run.
        if let Err(e) = self.crawler.close().await {
            warn!(run_id = %ctx.run_id, error = %e, "Crawler close failed");
        }
    }
}
