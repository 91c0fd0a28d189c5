//! 内容类型描述符与 ISSI 消息体的固定常量。

use core::fmt;

use crate::error::{FormatError, Result};

/// 多部分消息体的边界参数值，所有报文共用。
pub const BODY_BOUNDARY: &str = "P25 ISSI body boundary";
/// 正文中实际出现的分隔符（边界前加 `--`）。
pub const BOUNDARY_DELIMITER: &str = "--P25 ISSI body boundary";
/// `application` 主类型。
pub const APPLICATION: &str = "application";
/// `sdp` 子类型。
pub const SDP: &str = "sdp";
/// ISSI 通用子类型。
pub const X_TIA_P25_ISSI: &str = "x-tia-p25-issi";
/// `multipart` 主类型。
pub const MULTIPART: &str = "multipart";
/// `mixed` 子类型。
pub const MIXED: &str = "mixed";

/// `{type, subtype, parameters}` 描述符。
///
/// # 教案式说明
/// - **意图 (Why)**：解码入口只拿到 Content-Type 头的取值，需要先还原为结构化描述再分派；
/// - **契约 (What)**：类型、子类型与参数名统一小写存储，比较大小写不敏感；参数值保留原样（去引号）；
/// - **权衡 (Trade-offs)**：参数按 `;` 朴素切分，不处理引号内的 `;`，ISSI 的边界值不含该字符。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    media_type: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl ContentType {
    /// 以类型与子类型构造，无参数。
    #[must_use]
    pub fn new(media_type: &str, subtype: &str) -> Self {
        Self {
            media_type: media_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// `application/sdp`。
    #[must_use]
    pub fn sdp() -> Self {
        Self::new(APPLICATION, SDP)
    }

    /// `application/x-tia-p25-issi`。
    #[must_use]
    pub fn issi() -> Self {
        Self::new(APPLICATION, X_TIA_P25_ISSI)
    }

    /// 带固定边界参数的 `multipart/mixed`。
    #[must_use]
    pub fn multipart_mixed() -> Self {
        Self::new(MULTIPART, MIXED).with_parameter("boundary", BODY_BOUNDARY)
    }

    /// 追加参数。
    #[must_use]
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .push((name.to_ascii_lowercase(), value.to_owned()));
        self
    }

    /// 解析头部取值，允许带 `Content-Type:` 前缀。
    pub fn parse(header: &str) -> Result<Self> {
        let invalid = || FormatError::InvalidContentType {
            header: header.trim().to_owned(),
        };
        let mut value = header.trim();
        if let Some((name, rest)) = value.split_once(':').filter(|(name, _)| !name.contains('/')) {
            if !name.trim().eq_ignore_ascii_case("content-type") {
                return Err(invalid());
            }
            value = rest.trim();
        }

        let mut segments = value.split(';');
        let essence = segments.next().unwrap_or_default();
        let (media_type, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        let (media_type, subtype) = (media_type.trim(), subtype.trim());
        if !is_token(media_type) || !is_token(subtype) {
            return Err(invalid());
        }

        let mut parsed = Self::new(media_type, subtype);
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, raw) = segment.split_once('=').ok_or_else(invalid)?;
            let name = name.trim();
            if !is_token(name) {
                return Err(invalid());
            }
            parsed = parsed.with_parameter(name, raw.trim().trim_matches('"'));
        }
        Ok(parsed)
    }

    /// 主类型。
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// 子类型。
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// 按名称取参数值。
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 边界参数。
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// 是否为给定的 `type/subtype`。
    #[must_use]
    pub fn is(&self, media_type: &str, subtype: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type)
            && self.subtype.eq_ignore_ascii_case(subtype)
    }

    /// 不含参数的 `type/subtype`。
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.media_type, self.subtype)
    }

    /// 完整头部行（不含行尾）。
    #[must_use]
    pub fn header_line(&self) -> String {
        format!("Content-Type: {self}")
    }
}

fn is_token(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.subtype)?;
        for (name, value) in &self.parameters {
            if is_token(value) {
                write!(f, ";{name}={value}")?;
            } else {
                write!(f, ";{name}=\"{value}\"")?;
            }
        }
        Ok(())
    }
}
