// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::crawl::CrawlLimits;

/// 审计请求
///
/// 一次审计运行的全部输入参数。数值范围由`validate`校验；
/// URL协议校验在编排器进入任何阶段之前单独执行。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuditRequest {
    /// 目标URL，必须是绝对的http/https地址
    #[validate(url)]
    pub url: String,
    /// 单次运行最大爬取页面数
    #[validate(range(min = 1))]
    pub max_pages: u32,
    /// 最大爬取深度
    #[validate(range(min = 1))]
    pub max_depth: u32,
    /// 请求间隔（秒）
    #[validate(range(min = 0.0))]
    pub crawl_delay_seconds: f64,
    /// 启用的检查类别集合
    pub selected_checks: HashSet<CheckCategory>,
}

impl AuditRequest {
    /// 本次运行的爬取限制
    pub fn crawl_limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            crawl_delay: Duration::from_secs_f64(self.crawl_delay_seconds.max(0.0)),
        }
    }
}

/// 检查类别枚举
///
/// 审计的六个维度，也是分析引擎按类别并行执行的单位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// 技术SEO
    Technical,
    /// 页面内容
    Onpage,
    /// 性能
    Performance,
    /// 移动端适配
    Mobile,
    /// 安全
    Security,
    /// 可访问性
    Accessibility,
}

impl CheckCategory {
    /// 全部检查类别
    pub fn all() -> [CheckCategory; 6] {
        [
            CheckCategory::Technical,
            CheckCategory::Onpage,
            CheckCategory::Performance,
            CheckCategory::Mobile,
            CheckCategory::Security,
            CheckCategory::Accessibility,
        ]
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CheckCategory::Technical => write!(f, "technical"),
            CheckCategory::Onpage => write!(f, "onpage"),
            CheckCategory::Performance => write!(f, "performance"),
            CheckCategory::Mobile => write!(f, "mobile"),
            CheckCategory::Security => write!(f, "security"),
            CheckCategory::Accessibility => write!(f, "accessibility"),
        }
    }
}

impl FromStr for CheckCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(CheckCategory::Technical),
            "onpage" => Ok(CheckCategory::Onpage),
            "performance" => Ok(CheckCategory::Performance),
            "mobile" => Ok(CheckCategory::Mobile),
            "security" => Ok(CheckCategory::Security),
            "accessibility" => Ok(CheckCategory::Accessibility),
            _ => Err(()),
        }
    }
}

/// 问题严重程度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// 严重
    Critical,
    /// 错误
    Error,
    /// 警告
    Warning,
    /// 提示
    #[default]
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// 字母等级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Grade {
    A,
    B,
    C,
    D,
    #[default]
    F,
}

impl Grade {
    /// 由分数映射字母等级
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// 分数状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// 优秀
    Excellent,
    /// 良好
    Good,
    /// 一般
    Fair,
    /// 较差
    Poor,
    /// 不及格
    #[default]
    Failing,
}

impl ScoreStatus {
    /// 由分数映射状态
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => ScoreStatus::Excellent,
            75..=89 => ScoreStatus::Good,
            60..=74 => ScoreStatus::Fair,
            40..=59 => ScoreStatus::Poor,
            _ => ScoreStatus::Failing,
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScoreStatus::Excellent => write!(f, "excellent"),
            ScoreStatus::Good => write!(f, "good"),
            ScoreStatus::Fair => write!(f, "fair"),
            ScoreStatus::Poor => write!(f, "poor"),
            ScoreStatus::Failing => write!(f, "failing"),
        }
    }
}

/// 单个审计问题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// 问题标题
    pub title: String,
    /// 严重程度
    #[serde(default)]
    pub severity: Severity,
    /// 所属类别
    #[serde(default)]
    pub category: String,
    /// 受影响的页面数
    #[serde(default)]
    pub affected_pages: u32,
    /// 问题描述
    #[serde(default)]
    pub description: String,
    /// 修复建议
    #[serde(default)]
    pub recommendation: String,
}

/// 单个类别的分析结果
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryReport {
    /// 类别得分（0-100）
    #[serde(default)]
    pub score: u8,
    /// 类别等级
    #[serde(default)]
    pub grade: Grade,
    /// 类别状态
    #[serde(default)]
    pub status: ScoreStatus,
    /// 该类别发现的问题
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// 分析引擎的产出
///
/// 得分与问题列表完全由分析引擎计算。所有字段都带默认值：
/// 引擎省略某个字段时按零值/空值处理，定稿阶段绝不因缺少
/// 元数据而失败。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisReport {
    /// 加权总分（0-100）
    #[serde(default)]
    pub overall_score: u8,
    /// 总体等级
    #[serde(default)]
    pub overall_grade: Grade,
    /// 总体状态
    #[serde(default)]
    pub overall_status: ScoreStatus,
    /// 各类别得分
    #[serde(default)]
    pub category_scores: HashMap<CheckCategory, u8>,
    /// 各类别的详细结果
    #[serde(default)]
    pub categories: HashMap<CheckCategory, CategoryReport>,
    /// 全部问题的汇总列表
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// 问题总数
    #[serde(default)]
    pub total_issues: u32,
    /// 分析覆盖的页面数
    #[serde(default)]
    pub pages_analyzed: u32,
}

/// 运行上下文
///
/// 在运行开始时创建，生命周期内不可变，运行结束即丢弃。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 运行唯一标识符
    pub run_id: Uuid,
    /// 目标URL
    pub url: String,
    /// 运行开始时刻（墙钟）
    pub started_at: DateTime<Utc>,
    /// 运行开始时刻（单调时钟，用于时长计算）
    pub start: Instant,
}

impl RunContext {
    /// 创建新的运行上下文并分配运行标识
    pub fn new(url: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            url,
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }
}

/// 运行阶段枚举
///
/// 状态转换遵循以下流程：
/// Idle → Validating → Crawling → Analyzing → Finalizing → Complete，
/// Validating/Crawling/Analyzing 均可转入 Failed。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditPhase {
    /// 空闲
    #[default]
    Idle,
    /// 校验中
    Validating,
    /// 爬取中
    Crawling,
    /// 分析中
    Analyzing,
    /// 定稿中
    Finalizing,
    /// 已完成
    Complete,
    /// 已失败
    Failed,
}

impl fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuditPhase::Idle => write!(f, "idle"),
            AuditPhase::Validating => write!(f, "validating"),
            AuditPhase::Crawling => write!(f, "crawling"),
            AuditPhase::Analyzing => write!(f, "analyzing"),
            AuditPhase::Finalizing => write!(f, "finalizing"),
            AuditPhase::Complete => write!(f, "complete"),
            AuditPhase::Failed => write!(f, "failed"),
        }
    }
}

/// 最终审计结果文档
///
/// 在分析报告之上附加运行元数据（日期、运行标识、时长）得到。
/// 编排器只做标注，从不重算分数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    /// 运行唯一标识符
    pub run_id: Uuid,
    /// 目标URL
    pub url: String,
    /// 审计完成日期
    pub audit_date: DateTime<Utc>,
    /// 运行耗时（秒）
    pub audit_duration_seconds: f64,
    /// 加权总分（0-100）
    pub overall_score: u8,
    /// 总体等级
    pub overall_grade: Grade,
    /// 总体状态
    pub overall_status: ScoreStatus,
    /// 分析覆盖的页面数
    pub pages_analyzed: u32,
    /// 各类别得分
    pub category_scores: HashMap<CheckCategory, u8>,
    /// 各类别的详细结果
    pub categories: HashMap<CheckCategory, CategoryReport>,
    /// 全部问题的汇总列表
    pub issues: Vec<Issue>,
    /// 问题总数
    pub total_issues: u32,
}

impl AuditResult {
    /// 由分析报告定稿为最终结果文档
    ///
    /// 超出量程的总分在此边界收敛到100。
    pub fn finalize(report: AnalysisReport, ctx: &RunContext, duration_seconds: f64) -> Self {
        Self {
            run_id: ctx.run_id,
            url: ctx.url.clone(),
            audit_date: Utc::now(),
            audit_duration_seconds: duration_seconds,
            overall_score: report.overall_score.min(100),
            overall_grade: report.overall_grade,
            overall_status: report.overall_status,
            pages_analyzed: report.pages_analyzed,
            category_scores: report.category_scores,
            categories: report.categories,
            issues: report.issues,
            total_issues: report.total_issues,
        }
    }

    /// 构造演示用的示例审计结果
    ///
    /// 供表示层在没有真实运行数据时展示；数据形状与分析引擎的
    /// 真实产出一致。
    pub fn sample() -> Self {
        let issue = Issue {
            title: "Missing meta descriptions".to_string(),
            severity: Severity::Warning,
            category: "technical".to_string(),
            affected_pages: 5,
            description: "5 pages are missing meta descriptions".to_string(),
            recommendation: "Add unique meta descriptions to all pages (150-160 characters)"
                .to_string(),
        };

        let scores = [
            (CheckCategory::Technical, 85),
            (CheckCategory::Onpage, 75),
            (CheckCategory::Performance, 70),
            (CheckCategory::Mobile, 82),
            (CheckCategory::Security, 90),
            (CheckCategory::Accessibility, 68),
        ];

        let mut category_scores = HashMap::new();
        let mut categories = HashMap::new();
        for (category, score) in scores {
            category_scores.insert(category, score);
            let issues = if category == CheckCategory::Technical {
                vec![issue.clone()]
            } else {
                Vec::new()
            };
            categories.insert(
                category,
                CategoryReport {
                    score,
                    grade: Grade::from_score(score),
                    status: ScoreStatus::from_score(score),
                    issues,
                },
            );
        }

        Self {
            run_id: Uuid::new_v4(),
            url: "https://example.com".to_string(),
            audit_date: Utc::now(),
            audit_duration_seconds: 45.3,
            overall_score: 78,
            overall_grade: Grade::B,
            overall_status: ScoreStatus::Good,
            pages_analyzed: 25,
            category_scores,
            categories,
            issues: vec![issue],
            total_issues: 1,
        }
    }
}
