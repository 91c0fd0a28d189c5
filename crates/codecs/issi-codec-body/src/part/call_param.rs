//! 呼叫参数部分（`c-` 前缀）。
//!
//! ## 设计意图（Why）
//! - 多个字段即使等于默认值也必须原样回写，因此每个字段以 `Option` 表达“显式设置与否”，
//!   输出只由 `Option` 的状态决定。
//!
//! ## 契约（What）
//! - “是否默认”与“是否匹配”是两个不同的谓词：前者不考虑全双工请求，后者考虑；
//! - 初始发射方是三态字段：未设置与任意已设置值不匹配，但两侧都设置时不比较取值。

use crate::attribute::{
    AttributeLine, Block, CONSOLE_PRIORITY, Field, content_lines, flag_token, split_attribute,
};
use crate::error::Result;

/// 谁先发射话音。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitialTransmitter {
    /// 主叫 SU 先发射，线上记号 `0`。
    CallingSu,
    /// 被叫 SU 先发射，线上记号 `1`。
    CalledSu,
}

impl InitialTransmitter {
    fn from_flag(flag: bool) -> Self {
        if flag { Self::CalledSu } else { Self::CallingSu }
    }

    fn token(self) -> &'static str {
        flag_token(matches!(self, Self::CalledSu))
    }
}

/// 调度台发射请求优先级，等级 0..=7，线上以 `10`..`F0` 编码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsolePriority(u8);

impl ConsolePriority {
    /// 默认等级（线上 `30`）。
    pub const DEFAULT: Self = Self(1);

    /// 构造；超出 0..=7 返回 `None`。
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level < 8 { Some(Self(level)) } else { None }
    }

    /// 等级。
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// 线上十六进制记号。
    #[must_use]
    pub fn code(self) -> &'static str {
        CONSOLE_PRIORITY
            .iter()
            .find(|choice| choice.code == self.0)
            .map_or("30", |choice| choice.token)
    }
}

impl Default for ConsolePriority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 呼叫参数。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallParamPart {
    initial_transmitter: Option<InitialTransmitter>,
    rf_resource_available: Option<bool>,
    availability_check_requested: Option<bool>,
    full_duplex_requested: Option<bool>,
    in_call_roaming: Option<bool>,
    confirmed_group_call: Option<bool>,
    protected_mode: Option<bool>,
    console_priority: Option<ConsolePriority>,
}

impl CallParamPart {
    /// 所有字段都未设置。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 `c-` 行；布尔记号只接受 `0`/`1`，其它块的名称报错。
    pub fn parse(text: &str) -> Result<Self> {
        let mut part = Self::new();
        for line in content_lines(text) {
            let (name, token) = split_attribute(line)?;
            let attribute = AttributeLine::parse_in(Block::CallParam, name, token)?;
            part.apply(&attribute);
        }
        Ok(part)
    }

    fn apply(&mut self, attribute: &AttributeLine) {
        let flag = attribute.as_flag();
        match attribute.field() {
            Field::CallInitialTransmitter => {
                self.initial_transmitter = flag.map(InitialTransmitter::from_flag);
            }
            Field::CallRfResourceAvailable => self.rf_resource_available = flag,
            Field::CallAvailabilityCheckRequested => self.availability_check_requested = flag,
            Field::CallFullDuplexRequested => self.full_duplex_requested = flag,
            Field::CallInCallRoaming => self.in_call_roaming = flag,
            Field::CallConfirmedGroupCall => self.confirmed_group_call = flag,
            Field::CallProtectedMode => self.protected_mode = flag,
            Field::CallConsolePriority => {
                self.console_priority = attribute.as_choice().and_then(ConsolePriority::new);
            }
            _ => {}
        }
    }

    /// 输出所有显式设置的字段，顺序固定。
    #[must_use]
    pub fn render(&self) -> String {
        let flags = [
            (
                Field::CallInitialTransmitter,
                self.initial_transmitter.map(InitialTransmitter::token),
            ),
            (
                Field::CallRfResourceAvailable,
                self.rf_resource_available.map(flag_token),
            ),
            (
                Field::CallAvailabilityCheckRequested,
                self.availability_check_requested.map(flag_token),
            ),
            (
                Field::CallFullDuplexRequested,
                self.full_duplex_requested.map(flag_token),
            ),
            (Field::CallInCallRoaming, self.in_call_roaming.map(flag_token)),
            (
                Field::CallConfirmedGroupCall,
                self.confirmed_group_call.map(flag_token),
            ),
            (Field::CallProtectedMode, self.protected_mode.map(flag_token)),
            (
                Field::CallConsolePriority,
                self.console_priority.map(ConsolePriority::code),
            ),
        ];

        let mut out = String::new();
        for (field, token) in flags {
            if let Some(token) = token {
                out.push_str(field.name());
                out.push(':');
                out.push_str(token);
                out.push_str("\r\n");
            }
        }
        out
    }

    /// 是否等同于协议默认参数块。
    ///
    /// 全双工请求不参与判断；资源可用与可用性检查只要显式设置就不再视为默认。
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.initial_transmitter.is_none()
            && self.rf_resource_available.is_none()
            && self.availability_check_requested.is_none()
            && !self.in_call_roaming()
            && !self.confirmed_group_call()
            && !self.protected_mode()
            && self.console_priority() == ConsolePriority::DEFAULT
    }

    /// 以本部分为参考比对对端。
    #[must_use]
    pub fn matches(&self, peer: &CallParamPart) -> bool {
        if self.initial_transmitter.is_some() != peer.initial_transmitter.is_some() {
            return false;
        }
        self.rf_resource_available() == peer.rf_resource_available()
            && self.availability_check_requested() == peer.availability_check_requested()
            && self.full_duplex_requested() == peer.full_duplex_requested()
            && self.in_call_roaming() == peer.in_call_roaming()
            && self.confirmed_group_call() == peer.confirmed_group_call()
            && self.protected_mode() == peer.protected_mode()
            && self.console_priority() == peer.console_priority()
    }

    /// 字段是否显式设置；非本块字段返回 `false`。
    #[must_use]
    pub fn is_explicit(&self, field: Field) -> bool {
        match field {
            Field::CallInitialTransmitter => self.initial_transmitter.is_some(),
            Field::CallRfResourceAvailable => self.rf_resource_available.is_some(),
            Field::CallAvailabilityCheckRequested => self.availability_check_requested.is_some(),
            Field::CallFullDuplexRequested => self.full_duplex_requested.is_some(),
            Field::CallInCallRoaming => self.in_call_roaming.is_some(),
            Field::CallConfirmedGroupCall => self.confirmed_group_call.is_some(),
            Field::CallProtectedMode => self.protected_mode.is_some(),
            Field::CallConsolePriority => self.console_priority.is_some(),
            _ => false,
        }
    }

    /// 初始发射方；未设置为 `None`。
    #[must_use]
    pub fn initial_transmitter(&self) -> Option<InitialTransmitter> {
        self.initial_transmitter
    }

    /// RF 资源是否可用，默认 `false`。
    #[must_use]
    pub fn rf_resource_available(&self) -> bool {
        self.rf_resource_available.unwrap_or(false)
    }

    /// 是否请求可用性检查，默认 `true`。
    #[must_use]
    pub fn availability_check_requested(&self) -> bool {
        self.availability_check_requested.unwrap_or(true)
    }

    /// 是否请求全双工，默认 `false`。
    #[must_use]
    pub fn full_duplex_requested(&self) -> bool {
        self.full_duplex_requested.unwrap_or(false)
    }

    /// 是否呼叫中漫游，默认 `false`。
    #[must_use]
    pub fn in_call_roaming(&self) -> bool {
        self.in_call_roaming.unwrap_or(false)
    }

    /// 是否确认型组呼，默认 `false`。
    #[must_use]
    pub fn confirmed_group_call(&self) -> bool {
        self.confirmed_group_call.unwrap_or(false)
    }

    /// 是否保护模式，默认 `false`。
    #[must_use]
    pub fn protected_mode(&self) -> bool {
        self.protected_mode.unwrap_or(false)
    }

    /// 调度台发射请求优先级。
    #[must_use]
    pub fn console_priority(&self) -> ConsolePriority {
        self.console_priority.unwrap_or_default()
    }

    /// 设置初始发射方。
    #[must_use]
    pub fn with_initial_transmitter(mut self, value: InitialTransmitter) -> Self {
        self.initial_transmitter = Some(value);
        self
    }

    /// 设置 RF 资源可用。
    #[must_use]
    pub fn with_rf_resource_available(mut self, value: bool) -> Self {
        self.rf_resource_available = Some(value);
        self
    }

    /// 设置可用性检查请求。
    #[must_use]
    pub fn with_availability_check_requested(mut self, value: bool) -> Self {
        self.availability_check_requested = Some(value);
        self
    }

    /// 设置全双工请求。
    #[must_use]
    pub fn with_full_duplex_requested(mut self, value: bool) -> Self {
        self.full_duplex_requested = Some(value);
        self
    }

    /// 设置呼叫中漫游。
    #[must_use]
    pub fn with_in_call_roaming(mut self, value: bool) -> Self {
        self.in_call_roaming = Some(value);
        self
    }

    /// 设置确认型组呼。
    #[must_use]
    pub fn with_confirmed_group_call(mut self, value: bool) -> Self {
        self.confirmed_group_call = Some(value);
        self
    }

    /// 设置保护模式。
    #[must_use]
    pub fn with_protected_mode(mut self, value: bool) -> Self {
        self.protected_mode = Some(value);
        self
    }

    /// 设置调度台发射请求优先级。
    #[must_use]
    pub fn with_console_priority(mut self, value: ConsolePriority) -> Self {
        self.console_priority = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn nothing_set_renders_empty_and_is_default() {
        let part = CallParamPart::new();
        assert_eq!(part.render(), "");
        assert!(part.is_default());
        assert!(part.availability_check_requested());
        assert_eq!(part.console_priority().code(), "30");
    }

    #[test]
    fn explicit_defaults_are_re_emitted() {
        let part = CallParamPart::new()
            .with_availability_check_requested(true)
            .with_rf_resource_available(false);
        assert_eq!(part.render(), "c-resavail:0\r\nc-pref:1\r\n");
        assert!(!part.is_default());
    }

    #[test]
    fn full_duplex_is_ignored_by_default_check_but_not_by_match() {
        let duplex = CallParamPart::new().with_full_duplex_requested(true);
        assert!(duplex.is_default());
        assert_eq!(duplex.render(), "c-duplex:1\r\n");
        assert!(!duplex.matches(&CallParamPart::new()));
        assert!(!CallParamPart::new().matches(&duplex));
    }

    #[test]
    fn initial_transmitter_presence_must_agree() {
        let calling = CallParamPart::new().with_initial_transmitter(InitialTransmitter::CallingSu);
        let called = CallParamPart::new().with_initial_transmitter(InitialTransmitter::CalledSu);
        assert!(!calling.matches(&CallParamPart::new()));
        assert!(!CallParamPart::new().matches(&calling));
        assert!(calling.matches(&called));
    }

    #[test]
    fn parses_long_and_short_names() {
        let part = CallParamPart::parse(
            "c-initrans:0\r\nc-r:1\nC-PREF:0\r\nc-icr:1\r\nc-gct:1\r\nc-p:1\r\nc-ctxrp:B0\r\n",
        )
        .expect("valid call parameters");
        assert_eq!(part.initial_transmitter(), Some(InitialTransmitter::CallingSu));
        assert!(part.rf_resource_available());
        assert!(!part.availability_check_requested());
        assert!(part.in_call_roaming());
        assert!(part.confirmed_group_call());
        assert!(part.protected_mode());
        assert_eq!(part.console_priority().level(), 5);
        assert!(!part.is_explicit(Field::CallFullDuplexRequested));
        assert_eq!(
            part.render(),
            "c-initrans:0\r\nc-resavail:1\r\nc-pref:0\r\nc-incallroaming:1\r\n\
             c-groupcalltype:1\r\nc-protected:1\r\nc-consoletransmitrequestpriority:B0\r\n"
        );
    }

    #[test]
    fn bad_lines_are_rejected() {
        assert!(matches!(
            CallParamPart::parse("c-pref=0"),
            Err(FormatError::MalformedLine { .. })
        ));
        assert!(matches!(
            CallParamPart::parse("c-pref:yes"),
            Err(FormatError::InvalidBoolean { .. })
        ));
        assert!(matches!(
            CallParamPart::parse("c-unknown:1"),
            Err(FormatError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            CallParamPart::parse("r-force:1"),
            Err(FormatError::WrongBlock { .. })
        ));
    }

    #[test]
    fn console_priority_bounds() {
        assert!(ConsolePriority::new(8).is_none());
        assert_eq!(ConsolePriority::new(7).map(ConsolePriority::code), Some("F0"));
        assert_eq!(ConsolePriority::new(0).map(ConsolePriority::code), Some("10"));
    }
}
