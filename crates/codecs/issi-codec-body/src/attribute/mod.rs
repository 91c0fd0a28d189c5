//! # attribute 模块
//!
//! ## 教案目的（Why）
//! - ISSI 消息体中的服务档案与参数块都由 `name:value` 行构成；本模块把一行文本变为
//!   类型化的 [`AttributeLine`]，并在此处集中完成记号合法性校验。
//!
//! ## 交互契约（What）
//! - 名称解析委托给 [`crate::registry::Registry`]，大小写不敏感，支持缩写；
//! - 布尔记号只能是 `0`/`1`，整数受字段范围约束，十六进制不带 `0x` 前缀；
//! - “是否显式设置”不由行自身记录：容器以 `Option`/映射中的存在与否表达。
//!
//! ## 实现策略（How）
//! - `field` 子模块维护封闭字段目录；`value` 子模块负责记号与类型化值之间的转换。

mod field;
mod value;

pub use field::{
    ACCESS_PERMISSION, AUTHENTICATION_POLICY, AUTHENTICATION_TYPE, AVAILABILITY_CHECK, Block,
    CALL_PERMISSION, CALL_SETUP_PREFERENCE, CONSOLE_PRIORITY, Choice, DUPLEXITY, Field,
    FieldKind, FieldSpec, GROUP_CALL_PERMISSION, INTERRUPT_MODE, RADIO_INHIBIT, SECURITY_LEVEL,
};
pub use value::{AttributeValue, AuthParams};

pub(crate) use value::flag_token;

use core::fmt;

use crate::error::{FormatError, Result};
use crate::registry::Registry;

/// 一条类型化属性行。
///
/// # 教案式说明
/// - **意图 (Why)**：保留原始记号便于诊断，同时以类型化值参与比较与渲染；
/// - **契约 (What)**：相等性只看字段与值，不看原始记号的大小写差异；
/// - **权衡 (Trade-offs)**：十六进制行按收到的记号原样回写，保证稀疏档案往返逐字一致；
///   其余类型输出规范记号。
#[derive(Debug, Clone)]
pub struct AttributeLine {
    field: Field,
    value: AttributeValue,
    raw: String,
}

impl AttributeLine {
    /// 以名称（规范名或缩写）与原始记号构造。
    pub fn parse(name: &str, token: &str) -> Result<Self> {
        let field = Registry::global().resolve(name)?;
        Self::parse_field(field, token)
    }

    /// 在指定块内解析，名称属于其它块时报 [`FormatError::WrongBlock`]。
    pub fn parse_in(block: Block, name: &str, token: &str) -> Result<Self> {
        let field = Registry::global().resolve_in(block, name)?;
        Self::parse_field(field, token)
    }

    /// 解析整行 `name:value`。
    pub fn parse_line(line: &str) -> Result<Self> {
        let (name, token) = split_attribute(line)?;
        Self::parse(name, token)
    }

    fn parse_field(field: Field, token: &str) -> Result<Self> {
        let value = value::parse_token(field, token)?;
        Ok(Self {
            field,
            value,
            raw: token.to_owned(),
        })
    }

    /// 以内存值构造，校验类别与范围。
    pub fn new(field: Field, value: AttributeValue) -> Result<Self> {
        value::check_value(field, &value)?;
        let raw = value::render_token(field, &value);
        Ok(Self { field, value, raw })
    }

    /// 字段。
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// 规范名。
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    /// 类型化值。
    #[must_use]
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// 解析时的原始记号。
    #[must_use]
    pub fn raw_token(&self) -> &str {
        &self.raw
    }

    /// 线上记号；十六进制值沿用原始记号。
    #[must_use]
    pub fn token(&self) -> String {
        match self.value {
            AttributeValue::Hex(_) => self.raw.clone(),
            _ => value::render_token(self.field, &self.value),
        }
    }

    /// 值是否等于字段类型默认值。
    #[must_use]
    pub fn is_default_value(&self) -> bool {
        self.field.kind().default_value().as_ref() == Some(&self.value)
    }

    /// 布尔值视图。
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self.value {
            AttributeValue::Flag(v) => Some(v),
            _ => None,
        }
    }

    /// 整数视图。
    #[must_use]
    pub fn as_integer(&self) -> Option<u32> {
        match self.value {
            AttributeValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// 枚举编码视图。
    #[must_use]
    pub fn as_choice(&self) -> Option<u8> {
        match self.value {
            AttributeValue::Choice(v) => Some(v),
            _ => None,
        }
    }

    /// 十六进制视图。
    #[must_use]
    pub fn as_hex(&self) -> Option<u64> {
        match self.value {
            AttributeValue::Hex(v) => Some(v),
            _ => None,
        }
    }

    /// 枚举值的诊断标签。
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        choice_label(self.field, &self.value)
    }
}

impl PartialEq for AttributeLine {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.value == other.value
    }
}

impl Eq for AttributeLine {}

impl fmt::Display for AttributeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name(), self.token())
    }
}

/// 查找枚举值的诊断标签。
pub(crate) fn choice_label(field: Field, value: &AttributeValue) -> Option<&'static str> {
    match (field.kind(), value) {
        (FieldKind::Choice { options, .. }, AttributeValue::Choice(code)) => options
            .iter()
            .find(|choice| choice.code == *code)
            .map(|choice| choice.label),
        _ => None,
    }
}

/// 把一行拆成 `(name, value)`；要求恰好一个 `:`，两侧去空白后名称非空。
pub(crate) fn split_attribute(line: &str) -> Result<(&str, &str)> {
    let malformed = || FormatError::MalformedLine {
        line: line.trim().to_owned(),
    };
    let (name, value) = line.split_once(':').ok_or_else(malformed)?;
    if value.contains(':') {
        return Err(malformed());
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    Ok((name, value.trim()))
}

/// 逐行迭代正文：兼容 CRLF 与 LF，去除首尾空白并跳过空行。
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_by_alias_ignoring_case() {
        let line = AttributeLine::parse("G-RFHANGT", "120").expect("known field");
        assert_eq!(line.field(), Field::GroupRfHangTime);
        assert_eq!(line.to_string(), "g-rfhangt:120");

        let short = AttributeLine::parse("g-h", "120").expect("alias");
        assert_eq!(short, line);
    }

    #[test]
    fn unknown_names_are_reported() {
        assert_eq!(
            AttributeLine::parse("g-bogus", "1"),
            Err(FormatError::UnknownAttribute {
                name: "g-bogus".to_owned()
            })
        );
    }

    #[test]
    fn block_scoped_parse_rejects_foreign_fields() {
        assert_eq!(
            AttributeLine::parse_in(Block::CallParam, "g-pri", "2"),
            Err(FormatError::WrongBlock {
                name: "g-pri",
                block: Block::CallParam
            })
        );
    }

    #[test]
    fn split_requires_exactly_one_separator() {
        assert_eq!(split_attribute(" g-pri : 2 "), Ok(("g-pri", "2")));
        for bad in ["g-access=1", "a:b:c", ":1"] {
            assert!(matches!(
                split_attribute(bad),
                Err(FormatError::MalformedLine { .. })
            ));
        }
    }

    #[test]
    fn hex_tokens_are_written_back_as_received() {
        let short = AttributeLine::parse_line("g-agroup:1a").expect("hex line");
        assert_eq!(short.to_string(), "g-agroup:1a");
        assert_eq!(short.as_hex(), Some(0x1A));

        let built = AttributeLine::new(Field::GroupAnnouncementGroup, AttributeValue::Hex(0x1A))
            .expect("in range");
        assert_eq!(built.to_string(), "g-agroup:1A");
        assert_eq!(built, short);
    }

    #[test]
    fn content_lines_tolerate_mixed_terminators() {
        let lines: Vec<&str> = content_lines("a:1\r\n\r\nb:2\nc:3\n  \n").collect();
        assert_eq!(lines, vec!["a:1", "b:2", "c:3"]);
    }

    #[test]
    fn typed_views_and_labels() {
        let line = AttributeLine::new(Field::UserAccessPermission, AttributeValue::Choice(2))
            .expect("in range");
        assert_eq!(line.as_choice(), Some(2));
        assert_eq!(line.label(), Some("Emergency"));
        assert!(!line.is_default_value());
        assert_eq!(line.raw_token(), "2");

        let default = AttributeLine::parse_line("u-as:1").expect("alias line");
        assert!(default.is_default_value());
        assert_eq!(default.as_flag(), None);
    }
}
