// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 审计运行错误类型
///
/// 一次审计运行的所有失败都归入此分类。调用方依据具体变体
/// 决定展示和恢复策略；任何变体返回后都保证系统处于非运行
/// 状态，可以立即发起新的运行。
#[derive(Error, Debug)]
pub enum AuditError {
    /// 请求无效（URL缺少http/https协议或参数越界）
    #[error("Invalid audit request: {0}")]
    InvalidInput(String),

    /// 爬取阶段失败
    #[error("Crawl stage failed for {url}: {message}")]
    CrawlStage { url: String, message: String },

    /// 分析阶段失败
    #[error("Analysis stage failed for {url}: {message}")]
    AnalysisStage { url: String, message: String },

    /// 已有审计正在运行
    #[error("An audit run is already in progress")]
    RunInProgress,

    /// 未分类的运行错误
    #[error("Audit run failed: {0}")]
    Unclassified(String),
}

impl From<anyhow::Error> for AuditError {
    fn from(err: anyhow::Error) -> Self {
        AuditError::Unclassified(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_stage_context() {
        let err = AuditError::CrawlStage {
            url: "https://example.com".to_string(),
            message: "connection refused".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("https://example.com"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_unclassified_from_anyhow() {
        let err: AuditError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AuditError::Unclassified(msg) if msg == "boom"));
    }
}
