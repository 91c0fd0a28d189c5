//! 注册参数部分（`r-` 前缀）。

use crate::attribute::{AttributeLine, Block, Field, content_lines, flag_token, split_attribute};
use crate::error::Result;

/// 注册参数：强制注册、确认注册与确认在线三个独立布尔量。
///
/// 每个字段的显式设置状态由 `Option` 表达，渲染只输出已设置的字段；
/// 比对按有效值相等判断。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterParamPart {
    force: Option<bool>,
    confirm: Option<bool>,
    presence: Option<bool>,
}

impl RegisterParamPart {
    /// 所有字段都未设置。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 `r-` 行。
    pub fn parse(text: &str) -> Result<Self> {
        let mut part = Self::new();
        for line in content_lines(text) {
            let (name, token) = split_attribute(line)?;
            let attribute = AttributeLine::parse_in(Block::RegisterParam, name, token)?;
            let slot = match attribute.field() {
                Field::RegisterForce => &mut part.force,
                Field::RegisterConfirm => &mut part.confirm,
                Field::RegisterPresence => &mut part.presence,
                _ => continue,
            };
            *slot = attribute.as_flag();
        }
        Ok(part)
    }

    /// 渲染已设置的字段。
    #[must_use]
    pub fn render(&self) -> String {
        [
            (Field::RegisterForce, self.force),
            (Field::RegisterConfirm, self.confirm),
            (Field::RegisterPresence, self.presence),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value.map(|v| format!("{}:{}\r\n", field.name(), flag_token(v)))
        })
        .collect()
    }

    /// 三个有效值都为 `false` 即为默认，与是否显式设置无关。
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.force() && !self.confirm() && !self.presence()
    }

    /// 有效值逐一相等。
    #[must_use]
    pub fn matches(&self, peer: &RegisterParamPart) -> bool {
        self.force() == peer.force()
            && self.confirm() == peer.confirm()
            && self.presence() == peer.presence()
    }

    /// 强制注册。
    #[must_use]
    pub fn force(&self) -> bool {
        self.force.unwrap_or(false)
    }

    /// 确认注册。
    #[must_use]
    pub fn confirm(&self) -> bool {
        self.confirm.unwrap_or(false)
    }

    /// 确认在线。
    #[must_use]
    pub fn presence(&self) -> bool {
        self.presence.unwrap_or(false)
    }

    /// 设置强制注册。
    #[must_use]
    pub fn with_force(mut self, value: bool) -> Self {
        self.force = Some(value);
        self
    }

    /// 设置确认注册。
    #[must_use]
    pub fn with_confirm(mut self, value: bool) -> Self {
        self.confirm = Some(value);
        self
    }

    /// 设置确认在线。
    #[must_use]
    pub fn with_presence(mut self, value: bool) -> Self {
        self.presence = Some(value);
        self
    }
}
