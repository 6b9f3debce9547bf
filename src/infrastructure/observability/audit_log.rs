// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::histogram;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

/// 审计会话信息
#[derive(Debug, Clone)]
struct AuditSession {
    run_id: Uuid,
    url: String,
}

/// 审计事件日志器
///
/// 以结构化事件记录审计运行的生命周期（`auditrs::audit`目标）。
/// 所有方法都不会失败：可观测性故障绝不影响运行结果。
#[derive(Default)]
pub struct AuditLogger {
    session: RwLock<Option<AuditSession>>,
}

impl AuditLogger {
    /// 创建新的审计日志器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录审计会话开始
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `run_id` - 运行唯一标识符
    pub fn start_session(&self, url: &str, run_id: Uuid) {
        *self.session.write() = Some(AuditSession {
            run_id,
            url: url.to_string(),
        });
        info!(
            target: "auditrs::audit",
            event = "session_start",
            run_id = %run_id,
            url = %url,
            "Audit session started"
        );
    }

    /// 记录错误事件
    ///
    /// `kind`是开放的字符串标识（crawl_error、analysis_error、
    /// audit_failed等），不限定为封闭枚举。
    pub fn log_error(&self, kind: &str, message: &str, context: Value) {
        let session = self.session.read().clone();
        match session {
            Some(session) => error!(
                target: "auditrs::audit",
                event = "error",
                error_type = kind,
                run_id = %session.run_id,
                url = %session.url,
                context = %context,
                "{}",
                message
            ),
            None => error!(
                target: "auditrs::audit",
                event = "error",
                error_type = kind,
                context = %context,
                "{}",
                message
            ),
        }
    }

    /// 记录审计会话结束并清除会话状态
    pub fn end_session(&self, summary: Value) {
        if let Some(session) = self.session.write().take() {
            info!(
                target: "auditrs::audit",
                event = "session_end",
                run_id = %session.run_id,
                url = %session.url,
                summary = %summary,
                "Audit session completed"
            );
        }
    }

    /// 当前会话的运行标识
    pub fn current_run(&self) -> Option<Uuid> {
        self.session.read().as_ref().map(|s| s.run_id)
    }
}

/// 性能指标日志器
///
/// 记录带运行上下文的数值采样，同时写入`metrics`直方图与
/// `auditrs::performance`日志目标。不会失败。
#[derive(Default)]
pub struct PerformanceLogger;

impl PerformanceLogger {
    /// 创建新的性能日志器
    pub fn new() -> Self {
        Self
    }

    /// 记录一次数值性能采样
    ///
    /// # 参数
    ///
    /// * `name` - 指标名称
    /// * `value` - 采样值
    /// * `unit` - 计量单位
    /// * `context` - 附加上下文（运行标识、URL等）
    pub fn log_metric(&self, name: &str, value: f64, unit: &str, context: Value) {
        histogram!(name.to_string()).record(value);
        info!(
            target: "auditrs::performance",
            event = "performance_metric",
            metric = name,
            value,
            unit,
            context = %context,
            "Performance sample"
        );
    }
}
