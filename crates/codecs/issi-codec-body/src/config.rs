//! # config 模块
//!
//! ## 教案目的（Why）
//! - 编解码器本身几乎没有可调项，但一致性测试工具需要在不改代码的情况下
//!   切换档案比对的严格程度，并在排障时打开逐片段追踪；
//! - 配置以 TOML 承载，字段缺省即取默认值，未知字段直接拒绝，避免拼写错误被静默忽略。
//!
//! ## 示例
//! ```toml
//! trace_fragments = true
//!
//! [matcher]
//! user_profile_policy = "strict"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 档案比对策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilePolicy {
    /// 档案部分只要同种类出现即视为满足。
    #[default]
    Permissive,
    /// 参考侧显式设置的每一行都必须在捕获侧以相同取值出现。
    Strict,
}

/// 比对器配置。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// 用户服务档案的比对策略。
    pub user_profile_policy: ProfilePolicy,
    /// 组服务档案的比对策略。
    pub group_profile_policy: ProfilePolicy,
}

/// 编解码器整体配置。
///
/// # 教案式说明
/// - **契约 (What)**：`trace_fragments` 打开后，多部分解析会为每个片段输出一条
///   `trace` 级日志；`matcher` 传递给 [`crate::ConformanceMatcher`]。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// 是否逐片段追踪多部分解析。
    pub trace_fragments: bool,
    /// 比对器配置。
    pub matcher: MatcherConfig,
}

impl CodecConfig {
    /// 从 TOML 文本加载。
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// 输出为 TOML 文本。
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// 配置加载错误。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 语法或字段错误。
    #[error("invalid codec configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// 序列化失败。
    #[error("failed to render codec configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CodecConfig::from_toml_str("").expect("empty is valid");
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.matcher.user_profile_policy, ProfilePolicy::Permissive);
    }

    #[test]
    fn nested_policies_are_read() {
        let config = CodecConfig::from_toml_str(
            "trace_fragments = true\n\n[matcher]\ngroup_profile_policy = \"strict\"\n",
        )
        .expect("valid");
        assert!(config.trace_fragments);
        assert_eq!(config.matcher.group_profile_policy, ProfilePolicy::Strict);
        assert_eq!(config.matcher.user_profile_policy, ProfilePolicy::Permissive);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CodecConfig::from_toml_str("trace_fragment = true").expect_err("typo");
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid codec configuration"));
    }

    #[test]
    fn rendered_config_reloads() {
        let config = CodecConfig {
            trace_fragments: true,
            matcher: MatcherConfig {
                user_profile_policy: ProfilePolicy::Strict,
                group_profile_policy: ProfilePolicy::Permissive,
            },
        };
        let text = config.to_toml_string().expect("serializable");
        assert_eq!(CodecConfig::from_toml_str(&text).expect("reloads"), config);
    }
}
