// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// URL无效
    #[error("Invalid URL")]
    InvalidUrl,
    /// URL协议不受支持
    #[error("URL scheme must be http or https")]
    UnsupportedScheme,
}

/// 验证审计目标URL
///
/// 在运行产生任何副作用之前调用：只做纯校验，不解析域名、
/// 不发起网络请求。
///
/// # 参数
///
/// * `url` - 目标URL字符串
///
/// # 返回值
///
/// * `Ok(())` - URL有效
/// * `Err(ValidationError)` - URL无效或协议不受支持
pub fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme);
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl);
    }

    Ok(())
}
