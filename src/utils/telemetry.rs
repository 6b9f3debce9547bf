// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::settings::LoggingSettings;

/// 初始化遥测系统
///
/// `RUST_LOG`环境变量优先，缺失时使用配置中的日志级别。
pub fn init_telemetry(logging: &LoggingSettings) {
    let default_filter = format!("{},auditrs=debug", logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
