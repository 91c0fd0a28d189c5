//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 一致性测试工具不能“修复”畸形报文：任何格式问题都必须以 [`FormatError`] 暴露给调用方，
//!   否则被测实现的缺陷会在比对阶段被悄然吞掉。
//! - 一致性“不匹配”不是错误，它由 [`crate::Verdict`] 承载，与本模块无关。
//!
//! ## 设计要求（What）
//! - 所有变体派生 `thiserror::Error`，消息使用英文，并携带出错的行、记号或片段摘录；
//! - 变体保持 `Clone + Eq`，便于测试直接比较。

use issi_codec_sdp::SdpParseError;
use thiserror::Error;

use crate::attribute::Block;

/// 消息体编解码错误。
///
/// # 教案式说明
/// - **意图 (Why)**：为属性行、服务档案、参数块与多部分帧提供统一的失败语义。
/// - **契约 (What)**：解析遇到第一处结构问题即返回；多部分报文中的其余片段不会继续处理。
/// - **权衡 (Trade-offs)**：上下文以 `String` 保存，牺牲少量分配换取可读诊断。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// 注册表中不存在该属性名（含缩写）。
    #[error("unknown attribute name `{name}`")]
    UnknownAttribute {
        /// 原始属性名。
        name: String,
    },

    /// 属性名合法，但不属于当前所解析的块。
    #[error("attribute `{name}` is not valid inside a {block}")]
    WrongBlock {
        /// 规范属性名。
        name: &'static str,
        /// 正在解析的块。
        block: Block,
    },

    /// 行不是恰好含一个 `:` 的 `name:value` 形式。
    #[error("line `{line}` is not a single `name:value` pair")]
    MalformedLine {
        /// 出错的整行。
        line: String,
    },

    /// 布尔记号只能是 `0` 或 `1`。
    #[error("invalid boolean token `{token}` for `{name}`, expected `0` or `1`")]
    InvalidBoolean {
        /// 规范属性名。
        name: &'static str,
        /// 原始记号。
        token: String,
    },

    /// 记号不是十进制整数。
    #[error("invalid integer `{token}` for `{name}`")]
    InvalidInteger {
        /// 规范属性名。
        name: &'static str,
        /// 原始记号。
        token: String,
    },

    /// 整数超出字段允许的范围。
    #[error("value {value} for `{name}` is outside {min}..={max}")]
    OutOfRange {
        /// 规范属性名。
        name: &'static str,
        /// 解析出的数值。
        value: i64,
        /// 下界。
        min: u32,
        /// 上界。
        max: u32,
    },

    /// 枚举字段的记号不在取值表中。
    #[error("invalid value `{token}` for `{name}`")]
    InvalidChoice {
        /// 规范属性名。
        name: &'static str,
        /// 原始记号。
        token: String,
    },

    /// 十六进制字段为空、含非法字符、带 `0x` 前缀或超长。
    #[error("invalid hexadecimal value `{token}` for `{name}`")]
    InvalidHex {
        /// 规范属性名。
        name: &'static str,
        /// 原始记号。
        token: String,
    },

    /// 鉴权参数不是三组以逗号分隔的十六进制字节。
    #[error("invalid authentication parameters `{token}`: {reason}")]
    InvalidAuthParams {
        /// 原始记号。
        token: String,
        /// 具体原因。
        reason: &'static str,
    },

    /// 以内存值构造属性行时，值的类别与字段类型不符。
    #[error("value kind does not fit attribute `{name}`")]
    ValueKindMismatch {
        /// 规范属性名。
        name: &'static str,
    },

    /// 消息体不是合法 UTF-8。
    #[error("message body is not valid UTF-8 (valid up to byte {valid_up_to})")]
    NonUtf8Body {
        /// 合法前缀长度。
        valid_up_to: usize,
    },

    /// Content-Type 取值无法解析为 `type/subtype`。
    #[error("invalid content type `{header}`")]
    InvalidContentType {
        /// 原始头部取值。
        header: String,
    },

    /// 不支持的内容类型。
    #[error("unsupported content type `{content_type}`")]
    UnsupportedContentType {
        /// 规范化后的 `type/subtype`。
        content_type: String,
    },

    /// `application/x-tia-p25-issi` 负载的前缀无法识别。
    #[error("unrecognized ISSI body content `{excerpt}`")]
    UnrecognizedBody {
        /// 负载摘录。
        excerpt: String,
    },

    /// 多部分片段缺少头部或头部与正文之间的空行。
    #[error("multipart fragment has no content type header: `{excerpt}`")]
    MissingPartHeader {
        /// 片段摘录。
        excerpt: String,
    },

    /// SDP 负载无法解析。
    #[error("malformed SDP payload: {source}")]
    Sdp {
        /// 底层解析错误。
        #[from]
        source: SdpParseError,
    },
}

/// 本 crate 的结果别名。
pub type Result<T, E = FormatError> = core::result::Result<T, E>;

const EXCERPT_CHARS: usize = 48;

/// 截取诊断用的片段摘录，保证字符边界安全。
pub(crate) fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    let mut out: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().nth(EXCERPT_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_bounded_and_char_safe() {
        let long = "é".repeat(100);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("  short\r\n"), "short");
    }

    #[test]
    fn messages_name_the_offending_token() {
        let err = FormatError::InvalidBoolean {
            name: "g-access",
            token: "yes".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid boolean token `yes` for `g-access`, expected `0` or `1`"
        );
        let err = FormatError::WrongBlock {
            name: "u-access",
            block: Block::GroupProfile,
        };
        assert_eq!(
            err.to_string(),
            "attribute `u-access` is not valid inside a group service profile"
        );
    }
}
