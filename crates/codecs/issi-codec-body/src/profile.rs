//! # profile 模块
//!
//! ## 教案目的（Why）
//! - 用户/组服务档案是一组有序的属性行；档案的重写必须与源文本一一对应，
//!   不能凭空补出隐含的默认值。
//!
//! ## 交互契约（What）
//! - 每个逻辑字段至多一行；重复行以后出现者为准；
//! - 映射中“存在”即“显式设置”，序列化只输出存在的行，因此稀疏档案往返幂等；
//! - 输出顺序为字段声明顺序，与输入顺序无关。
//!
//! ## 实现策略（How）
//! - 以 `BTreeMap<Field, AttributeLine>` 存储，`Field` 的派生 `Ord` 即声明顺序。

use core::fmt;
use std::collections::BTreeMap;

use tracing::trace;

use crate::attribute::{
    AttributeLine, AttributeValue, Block, Field, choice_label, content_lines, split_attribute,
};
use crate::error::{FormatError, Result};

/// 一个命名块内的有序属性行集合。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDocument {
    block: Block,
    lines: BTreeMap<Field, AttributeLine>,
}

impl ProfileDocument {
    /// 构造指定块的空文档。
    #[must_use]
    pub fn new(block: Block) -> Self {
        Self {
            block,
            lines: BTreeMap::new(),
        }
    }

    /// 解析档案正文。
    ///
    /// # 契约说明
    /// - 兼容 CRLF 与裸 LF，跳过空行；
    /// - 每行必须恰好含一个 `:`，名称经注册表解析且必须属于本块；
    /// - 遇到第一处错误立即返回，不做任何修补。
    pub fn parse(block: Block, text: &str) -> Result<Self> {
        let mut document = Self::new(block);
        for line in content_lines(text) {
            let (name, token) = split_attribute(line)?;
            let attribute = AttributeLine::parse_in(block, name, token)?;
            if let Some(previous) = document.lines.insert(attribute.field(), attribute) {
                trace!(field = previous.name(), "duplicate profile line replaced");
            }
        }
        Ok(document)
    }

    /// 按声明顺序输出 `name:value\r\n`，只包含显式设置的行。
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for line in self.lines.values() {
            out.push_str(line.name());
            out.push(':');
            out.push_str(&line.token());
            out.push_str("\r\n");
        }
        out
    }

    /// 文档所属块。
    #[must_use]
    pub fn block(&self) -> Block {
        self.block
    }

    /// 显式设置的行。
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&AttributeLine> {
        self.lines.get(&field)
    }

    /// 字段是否显式设置。
    #[must_use]
    pub fn is_explicit(&self, field: Field) -> bool {
        self.lines.contains_key(&field)
    }

    /// 有效值：显式值优先，否则为类型默认值；字段不属于本块时为 `None`。
    #[must_use]
    pub fn value(&self, field: Field) -> Option<AttributeValue> {
        if field.block() != self.block {
            return None;
        }
        match self.lines.get(&field) {
            Some(line) => Some(line.value().clone()),
            None => field.kind().default_value(),
        }
    }

    /// 布尔有效值。
    #[must_use]
    pub fn flag(&self, field: Field) -> Option<bool> {
        match self.value(field)? {
            AttributeValue::Flag(v) => Some(v),
            _ => None,
        }
    }

    /// 整数有效值；枚举字段返回其编码，十六进制字段不在此列。
    #[must_use]
    pub fn integer(&self, field: Field) -> Option<u32> {
        match self.value(field)? {
            AttributeValue::Integer(v) => Some(v),
            AttributeValue::Choice(code) => Some(u32::from(code)),
            _ => None,
        }
    }

    /// 十六进制有效值。
    #[must_use]
    pub fn hex(&self, field: Field) -> Option<u64> {
        match self.value(field)? {
            AttributeValue::Hex(v) => Some(v),
            _ => None,
        }
    }

    /// 枚举有效值的诊断标签。
    #[must_use]
    pub fn label(&self, field: Field) -> Option<&'static str> {
        self.value(field)
            .and_then(|value| choice_label(field, &value))
    }

    /// 插入一行，返回被替换的旧行。
    pub fn insert(&mut self, line: AttributeLine) -> Result<Option<AttributeLine>> {
        if line.field().block() != self.block {
            return Err(FormatError::WrongBlock {
                name: line.name(),
                block: self.block,
            });
        }
        Ok(self.lines.insert(line.field(), line))
    }

    /// 以内存值设置字段。
    pub fn set(&mut self, field: Field, value: AttributeValue) -> Result<()> {
        let line = AttributeLine::new(field, value)?;
        self.insert(line).map(drop)
    }

    /// 移除字段，恢复为“未设置”。
    pub fn remove(&mut self, field: Field) -> Option<AttributeLine> {
        self.lines.remove(&field)
    }

    /// 显式设置的行，按声明顺序。
    pub fn lines(&self) -> impl Iterator<Item = &AttributeLine> {
        self.lines.values()
    }

    /// 显式设置的行数。
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 是否没有任何显式设置的行。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 本文档显式设置的每一行，在 `other` 中的有效值都相同。
    ///
    /// 用于严格档案比对策略；方向是“本文档为参考，`other` 为捕获”。
    #[must_use]
    pub fn is_satisfied_by(&self, other: &ProfileDocument) -> bool {
        self.block == other.block
            && self
                .lines
                .values()
                .all(|line| other.value(line.field()).as_ref() == Some(line.value()))
    }
}

impl fmt::Display for ProfileDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP_SAMPLE: &str = "g-access:1\r\n\
        g-agroup:0B4561A27271\r\n\
        g-pri:2\r\n\
        g-ecap:1\r\n\
        g-eprempt:0\r\n\
        g-rfhangT:2\r\n\
        g-ccsetupT:2\r\n\
        g-intmode:2\r\n\
        g-sec:2\r\n\
        g-ic:1\r\n\
        g-icsecstart:1\r\n";

    #[test]
    fn sparse_group_profile_round_trips_without_defaults() {
        let doc = ProfileDocument::parse(Block::GroupProfile, "g-access:1\r\ng-pri:2\r\n")
            .expect("valid profile");
        assert_eq!(doc.flag(Field::GroupAccessPermission), Some(true));
        assert_eq!(doc.integer(Field::GroupPriority), Some(2));
        assert_eq!(doc.serialize(), "g-access:1\r\ng-pri:2\r\n");
    }

    #[test]
    fn full_group_profile_round_trips() {
        let doc = ProfileDocument::parse(Block::GroupProfile, GROUP_SAMPLE).expect("valid");
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.hex(Field::GroupAnnouncementGroup), Some(0x0B45_61A2_7271));
        assert_eq!(doc.label(Field::GroupInterruptMode), Some("AlwaysAllowed"));
        assert_eq!(doc.serialize(), GROUP_SAMPLE.replace("g-rfhangT", "g-rfhangt"));
    }

    #[test]
    fn output_follows_declaration_order_and_aliases_resolve() {
        let doc = ProfileDocument::parse(Block::GroupProfile, "g-p:4\ng-as:0\n").expect("valid");
        assert_eq!(doc.serialize(), "g-access:0\r\ng-pri:4\r\n");
    }

    #[test]
    fn defaults_apply_only_to_the_value_view() {
        let doc = ProfileDocument::new(Block::UserProfile);
        assert_eq!(doc.integer(Field::UserGroupCallPermission), Some(3));
        assert_eq!(doc.label(Field::UserAccessPermission), Some("Full"));
        assert_eq!(doc.value(Field::UserAuthenticationParameters), None);
        assert_eq!(doc.value(Field::GroupPriority), None);
        assert!(doc.serialize().is_empty());
    }

    #[test]
    fn explicit_default_is_kept() {
        let doc = ProfileDocument::parse(Block::UserProfile, "u-upri:3\r\n").expect("valid");
        assert!(doc.is_explicit(Field::UserUnitToUnitCallPriority));
        assert_eq!(doc.serialize(), "u-upri:3\r\n");
    }

    #[test]
    fn malformed_and_foreign_lines_fail() {
        assert!(matches!(
            ProfileDocument::parse(Block::GroupProfile, "g-access=1"),
            Err(FormatError::MalformedLine { .. })
        ));
        assert!(matches!(
            ProfileDocument::parse(Block::GroupProfile, "u-access:1"),
            Err(FormatError::WrongBlock { .. })
        ));
        assert!(matches!(
            ProfileDocument::parse(Block::GroupProfile, "g-access:1\r\ng-sec:9\r\n"),
            Err(FormatError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn later_duplicate_wins() {
        let doc = ProfileDocument::parse(Block::GroupProfile, "g-pri:2\r\ng-p:5\r\n").expect("valid");
        assert_eq!(doc.serialize(), "g-pri:5\r\n");
    }

    #[test]
    fn setters_validate_and_satisfaction_is_directional() {
        let mut reference = ProfileDocument::new(Block::GroupProfile);
        reference
            .set(Field::GroupPriority, AttributeValue::Integer(7))
            .expect("in range");
        assert!(reference.set(Field::GroupPriority, AttributeValue::Integer(11)).is_err());
        assert!(reference.set(Field::UserSecureCapable, AttributeValue::Flag(true)).is_err());

        let mut captured = ProfileDocument::new(Block::GroupProfile);
        assert!(!reference.is_satisfied_by(&captured));
        captured
            .set(Field::GroupPriority, AttributeValue::Integer(7))
            .expect("in range");
        captured
            .set(Field::GroupEmergencyCapable, AttributeValue::Flag(false))
            .expect("flag");
        assert!(reference.is_satisfied_by(&captured));
        assert!(!captured.is_satisfied_by(&reference));

        assert!(captured.remove(Field::GroupPriority).is_some());
        assert!(!reference.is_satisfied_by(&captured));
    }
}
