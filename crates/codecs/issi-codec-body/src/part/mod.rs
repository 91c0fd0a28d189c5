//! # part 模块
//!
//! ## 教案目的（Why）
//! - 消息体由五类语义独立的部分组成；以封闭的 [`ContentPart`] 枚举表达，
//!   序列化器与比对器对每个分支的处理都由编译器检查穷尽性。
//!
//! ## 交互契约（What）
//! - 每个分支都能渲染自身正文、报告是否“全默认”（可从输出中省略），
//!   并按本类规则与同类对端比对；跨类比对恒为 `false`；
//! - 从线上文本构造可能失败（[`crate::FormatError`]），从内存值构造不会失败。
//!
//! ## 实现策略（How）
//! - 每个分支的具体规则放在各自子模块；本文件只负责分派、内容类型与分帧。

mod call_param;
mod profile;
mod register_param;
mod sdp;

pub use call_param::{CallParamPart, ConsolePriority, InitialTransmitter};
pub use profile::{GroupProfilePart, UserProfilePart};
pub use register_param::RegisterParamPart;
pub use sdp::SdpPart;

use core::fmt;

use tracing::debug;

use crate::attribute::Block;
use crate::content_type::{APPLICATION, ContentType, SDP, X_TIA_P25_ISSI};
use crate::error::{FormatError, Result, excerpt};

/// 部分的具体种类，也是内容列表去重的依据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// `application/sdp`。
    Sdp,
    /// 呼叫参数。
    CallParam,
    /// 注册参数。
    RegisterParam,
    /// 用户服务档案。
    UserProfile,
    /// 组服务档案。
    GroupProfile,
}

impl PartKind {
    /// 排序键 `(type, subtype)`。
    #[must_use]
    pub const fn sort_key(self) -> (&'static str, &'static str) {
        match self {
            Self::Sdp => (APPLICATION, SDP),
            _ => (APPLICATION, X_TIA_P25_ISSI),
        }
    }

    /// 内容类型描述符。
    #[must_use]
    pub fn content_type(self) -> ContentType {
        let (media_type, subtype) = self.sort_key();
        ContentType::new(media_type, subtype)
    }

    fn from_block(block: Block) -> Self {
        match block {
            Block::UserProfile => Self::UserProfile,
            Block::GroupProfile => Self::GroupProfile,
            Block::CallParam => Self::CallParam,
            Block::RegisterParam => Self::RegisterParam,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sdp => "sdp",
            Self::CallParam => "call-param",
            Self::RegisterParam => "register-param",
            Self::UserProfile => "user-profile",
            Self::GroupProfile => "group-profile",
        })
    }
}

/// 消息体的一个部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// 会话描述。
    Sdp(SdpPart),
    /// 呼叫参数。
    CallParam(CallParamPart),
    /// 注册参数。
    RegisterParam(RegisterParamPart),
    /// 用户服务档案。
    UserProfile(UserProfilePart),
    /// 组服务档案。
    GroupProfile(GroupProfilePart),
}

impl ContentPart {
    /// 种类。
    #[must_use]
    pub fn kind(&self) -> PartKind {
        match self {
            Self::Sdp(_) => PartKind::Sdp,
            Self::CallParam(_) => PartKind::CallParam,
            Self::RegisterParam(_) => PartKind::RegisterParam,
            Self::UserProfile(_) => PartKind::UserProfile,
            Self::GroupProfile(_) => PartKind::GroupProfile,
        }
    }

    /// 内容类型描述符。
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.kind().content_type()
    }

    /// 渲染正文（不含分帧）。
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Sdp(part) => part.render(),
            Self::CallParam(part) => part.render(),
            Self::RegisterParam(part) => part.render(),
            Self::UserProfile(part) => part.render(),
            Self::GroupProfile(part) => part.render(),
        }
    }

    /// 是否全默认，可从输出中省略。
    #[must_use]
    pub fn is_default(&self) -> bool {
        match self {
            Self::Sdp(_) | Self::UserProfile(_) | Self::GroupProfile(_) => false,
            Self::CallParam(part) => part.is_default(),
            Self::RegisterParam(part) => part.is_default(),
        }
    }

    /// 以本部分为参考，判断对端是否满足；种类不同恒为 `false`。
    #[must_use]
    pub fn matches(&self, peer: &ContentPart) -> bool {
        match (self, peer) {
            (Self::Sdp(own), Self::Sdp(other)) => own.matches(other),
            (Self::CallParam(own), Self::CallParam(other)) => own.matches(other),
            (Self::RegisterParam(own), Self::RegisterParam(other)) => own.matches(other),
            (Self::UserProfile(own), Self::UserProfile(other)) => own.matches(other),
            (Self::GroupProfile(own), Self::GroupProfile(other)) => own.matches(other),
            _ => false,
        }
    }

    /// 以给定分隔符分帧：`delimiter CRLF header CRLF CRLF body`。
    #[must_use]
    pub fn render_framed(&self, delimiter: &str) -> String {
        format!(
            "{delimiter}\r\n{}\r\n\r\n{}",
            self.content_type().header_line(),
            self.render()
        )
    }

    /// 按两字符前缀解析 `application/x-tia-p25-issi` 负载；空负载返回 `None`。
    pub fn parse_issi(body: &str) -> Result<Option<Self>> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            debug!("empty ISSI body ignored");
            return Ok(None);
        }
        let block =
            Block::from_body_prefix(trimmed).ok_or_else(|| FormatError::UnrecognizedBody {
                excerpt: excerpt(trimmed),
            })?;
        debug!(kind = %PartKind::from_block(block), "dispatching ISSI body by prefix");
        let part = match block {
            Block::UserProfile => Self::UserProfile(UserProfilePart::parse(body)?),
            Block::GroupProfile => Self::GroupProfile(GroupProfilePart::parse(body)?),
            Block::CallParam => Self::CallParam(CallParamPart::parse(body)?),
            Block::RegisterParam => Self::RegisterParam(RegisterParamPart::parse(body)?),
        };
        Ok(Some(part))
    }

    /// 根据内容类型构造单个部分；不支持的类型报错，空 ISSI 负载返回 `None`。
    pub fn parse_typed(content_type: &ContentType, body: &str) -> Result<Option<Self>> {
        if content_type.is(APPLICATION, SDP) {
            SdpPart::parse(body).map(|part| Some(Self::Sdp(part)))
        } else if content_type.is(APPLICATION, X_TIA_P25_ISSI) {
            Self::parse_issi(body)
        } else {
            Err(FormatError::UnsupportedContentType {
                content_type: content_type.essence(),
            })
        }
    }

    /// 会话描述视图。
    #[must_use]
    pub fn as_sdp(&self) -> Option<&SdpPart> {
        match self {
            Self::Sdp(part) => Some(part),
            _ => None,
        }
    }

    /// 呼叫参数视图。
    #[must_use]
    pub fn as_call_param(&self) -> Option<&CallParamPart> {
        match self {
            Self::CallParam(part) => Some(part),
            _ => None,
        }
    }

    /// 注册参数视图。
    #[must_use]
    pub fn as_register_param(&self) -> Option<&RegisterParamPart> {
        match self {
            Self::RegisterParam(part) => Some(part),
            _ => None,
        }
    }

    /// 用户档案视图。
    #[must_use]
    pub fn as_user_profile(&self) -> Option<&UserProfilePart> {
        match self {
            Self::UserProfile(part) => Some(part),
            _ => None,
        }
    }

    /// 组档案视图。
    #[must_use]
    pub fn as_group_profile(&self) -> Option<&GroupProfilePart> {
        match self {
            Self::GroupProfile(part) => Some(part),
            _ => None,
        }
    }
}

impl fmt::Display for ContentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<SdpPart> for ContentPart {
    fn from(part: SdpPart) -> Self {
        Self::Sdp(part)
    }
}

impl From<CallParamPart> for ContentPart {
    fn from(part: CallParamPart) -> Self {
        Self::CallParam(part)
    }
}

impl From<RegisterParamPart> for ContentPart {
    fn from(part: RegisterParamPart) -> Self {
        Self::RegisterParam(part)
    }
}

impl From<UserProfilePart> for ContentPart {
    fn from(part: UserProfilePart) -> Self {
        Self::UserProfile(part)
    }
}

impl From<GroupProfilePart> for ContentPart {
    fn from(part: GroupProfilePart) -> Self {
        Self::GroupProfile(part)
    }
}
