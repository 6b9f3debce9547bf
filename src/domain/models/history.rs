// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::audit::AuditResult;

/// 历史记录条目
///
/// 一次成功运行的紧凑记录，创建后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 目标URL
    pub url: String,
    /// 记录时刻
    pub date: DateTime<Utc>,
    /// 总分
    pub score: u8,
    /// 运行唯一标识符
    pub run_id: Uuid,
    /// 分析覆盖的页面数
    pub pages_analyzed: u32,
    /// 运行耗时（秒）
    pub duration_seconds: f64,
}

impl HistoryEntry {
    /// 从定稿结果派生历史条目
    pub fn from_result(result: &AuditResult) -> Self {
        Self {
            url: result.url.clone(),
            date: Utc::now(),
            score: result.overall_score,
            run_id: result.run_id,
            pages_analyzed: result.pages_analyzed,
            duration_seconds: result.audit_duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::audit::{AnalysisReport, AuditResult, RunContext};

    #[test]
    fn test_entry_mirrors_finalized_result() {
        let ctx = RunContext::new("https://example.com".to_string());
        let report = AnalysisReport {
            overall_score: 78,
            pages_analyzed: 25,
            ..Default::default()
        };
        let result = AuditResult::finalize(report, &ctx, 45.3);

        let entry = HistoryEntry::from_result(&result);
        assert_eq!(entry.url, "https://example.com");
        assert_eq!(entry.score, 78);
        assert_eq!(entry.run_id, ctx.run_id);
        assert_eq!(entry.pages_analyzed, 25);
        assert!((entry.duration_seconds - 45.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_entry_serializes_with_iso_date() {
        let entry = HistoryEntry {
            url: "https://example.com".to_string(),
            date: "2025-06-01T12:00:00Z".parse().unwrap(),
            score: 82,
            run_id: Uuid::new_v4(),
            pages_analyzed: 10,
            duration_seconds: 12.5,
        };
        let raw = serde_json::to_string(&entry).unwrap();
        assert!(raw.contains("2025-06-01T12:00:00Z"));
    }
}
