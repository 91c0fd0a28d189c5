//! 用户与组服务档案部分。
//!
//! ## 设计意图（Why）
//! - 两类档案都是 [`ProfileDocument`] 的薄封装，区别只在所属块与类型化访问器；
//! - 档案从不视为默认部分：它们一旦出现就必须写出。
//!
//! ## 契约（What）
//! - 组档案的比对恒为成功：各 RFSS 的本地组策略可以合法地不同，不属于一致性检查范围；
//! - 用户档案的比对目前同样恒为成功，是否收紧属于策略决定，由
//!   [`crate::config::ProfilePolicy::Strict`] 在比对器层面选择。

use crate::attribute::{AttributeValue, Block, Field};
use crate::error::Result;
use crate::profile::ProfileDocument;

/// 用户服务档案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfilePart {
    document: ProfileDocument,
}

impl UserProfilePart {
    /// 空档案。
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: ProfileDocument::new(Block::UserProfile),
        }
    }

    /// 解析 `u-` 行。
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            document: ProfileDocument::parse(Block::UserProfile, text)?,
        })
    }

    /// 链式设置字段。
    pub fn with(mut self, field: Field, value: AttributeValue) -> Result<Self> {
        self.document.set(field, value)?;
        Ok(self)
    }

    /// 底层文档。
    #[must_use]
    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    /// 可变文档。
    pub fn document_mut(&mut self) -> &mut ProfileDocument {
        &mut self.document
    }

    /// 渲染显式设置的行。
    #[must_use]
    pub fn render(&self) -> String {
        self.document.serialize()
    }

    /// 两侧字段都被遍历，但不因差异判负。
    #[must_use]
    pub fn matches(&self, peer: &UserProfilePart) -> bool {
        let compared = Field::in_block(Block::UserProfile)
            .filter(|field| self.document.value(*field) != peer.document.value(*field))
            .count();
        tracing::trace!(differing = compared, "user profile compared permissively");
        true
    }

    /// 系统接入许可编码，默认 1（Full）。
    #[must_use]
    pub fn access_permission(&self) -> u32 {
        self.document
            .integer(Field::UserAccessPermission)
            .unwrap_or(1)
    }

    /// 单呼优先级，默认 3。
    #[must_use]
    pub fn unit_to_unit_priority(&self) -> u32 {
        self.document
            .integer(Field::UserUnitToUnitCallPriority)
            .unwrap_or(3)
    }

    /// 是否具备加密能力。
    #[must_use]
    pub fn secure_capable(&self) -> bool {
        self.document
            .flag(Field::UserSecureCapable)
            .unwrap_or(false)
    }
}

impl Default for UserProfilePart {
    fn default() -> Self {
        Self::new()
    }
}

/// 组服务档案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfilePart {
    document: ProfileDocument,
}

impl GroupProfilePart {
    /// 空档案。
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: ProfileDocument::new(Block::GroupProfile),
        }
    }

    /// 解析 `g-` 行。
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            document: ProfileDocument::parse(Block::GroupProfile, text)?,
        })
    }

    /// 链式设置字段。
    pub fn with(mut self, field: Field, value: AttributeValue) -> Result<Self> {
        self.document.set(field, value)?;
        Ok(self)
    }

    /// 底层文档。
    #[must_use]
    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    /// 可变文档。
    pub fn document_mut(&mut self) -> &mut ProfileDocument {
        &mut self.document
    }

    /// 渲染显式设置的行。
    #[must_use]
    pub fn render(&self) -> String {
        self.document.serialize()
    }

    /// 恒为成功。
    #[must_use]
    pub fn matches(&self, _peer: &GroupProfilePart) -> bool {
        true
    }

    /// 接入许可，默认 `true`。
    #[must_use]
    pub fn access_permission(&self) -> bool {
        self.document
            .flag(Field::GroupAccessPermission)
            .unwrap_or(true)
    }

    /// 通播组标识，默认 0。
    #[must_use]
    pub fn announcement_group(&self) -> u64 {
        self.document
            .hex(Field::GroupAnnouncementGroup)
            .unwrap_or(0)
    }

    /// 组优先级，默认 3。
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.document.integer(Field::GroupPriority).unwrap_or(3)
    }

    /// RF 挂起时间，默认 0。
    #[must_use]
    pub fn rf_hang_time(&self) -> u32 {
        self.document.integer(Field::GroupRfHangTime).unwrap_or(0)
    }
}

impl Default for GroupProfilePart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_literal_parses_and_rerenders() {
        let part = GroupProfilePart::parse("g-access:1\r\ng-pri:2\r\n").expect("valid");
        assert!(part.access_permission());
        assert_eq!(part.priority(), 2);
        assert_eq!(part.announcement_group(), 0);
        assert_eq!(part.render(), "g-access:1\r\ng-pri:2\r\n");
    }

    #[test]
    fn group_profiles_always_match() {
        let a = GroupProfilePart::parse("g-pri:1").expect("valid");
        let b = GroupProfilePart::parse("g-pri:9\ng-rfhangt:100").expect("valid");
        assert!(a.matches(&b));
        assert_eq!(b.rf_hang_time(), 100);
    }

    #[test]
    fn user_profiles_match_permissively() {
        let a = UserProfilePart::new()
            .with(Field::UserAccessPermission, AttributeValue::Choice(0))
            .expect("valid");
        let b = UserProfilePart::parse("u-access:2\r\nu-sec:1\r\nu-upri:9\r\n").expect("valid");
        assert!(a.matches(&b));
        assert!(b.secure_capable());
        assert_eq!(b.access_permission(), 2);
        assert_eq!(b.unit_to_unit_priority(), 9);
        assert_eq!(a.render(), "u-access:0\r\n");
    }

    #[test]
    fn typed_setters_validate_ranges() {
        assert!(
            GroupProfilePart::new()
                .with(Field::GroupPriority, AttributeValue::Integer(0))
                .is_err()
        );
        let mut part = GroupProfilePart::default();
        part.document_mut()
            .set(Field::GroupAnnouncementGroup, AttributeValue::Hex(0x0B45_61A2_7271))
            .expect("12 digits");
        assert_eq!(part.render(), "g-agroup:B4561A27271\r\n");
    }

    #[test]
    fn short_hex_tokens_re_render_unchanged() {
        let part = GroupProfilePart::parse("g-agroup:1a\r\n").expect("valid");
        assert_eq!(part.announcement_group(), 0x1A);
        assert_eq!(part.render(), "g-agroup:1a\r\n");
        let reparsed = GroupProfilePart::parse(&part.render()).expect("valid");
        assert_eq!(reparsed.render(), part.render());
    }
}
