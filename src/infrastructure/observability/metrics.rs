// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// 初始化指标系统
///
/// 安装Prometheus记录器并注册审计相关指标。由嵌入方在启动时
/// 调用一次；库本身不依赖记录器的存在，未安装时所有采样都是
/// 空操作。
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    builder
        .install()
        .expect("failed to install Prometheus recorder");

    describe_counter!("audit_runs_total", "Total number of audit runs started");
    describe_counter!(
        "audit_runs_failed_total",
        "Total number of audit runs failed"
    );
    describe_histogram!("audit_duration", "Duration of audit runs in seconds");
    describe_histogram!("crawl_pages", "Pages crawled per audit run");
}
