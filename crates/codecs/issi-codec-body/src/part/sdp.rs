//! `application/sdp` 部分。

use issi_codec_sdp::{SdpParseError, SessionDesc, format_sdp, parse_sdp};

use crate::error::Result;

/// 会话描述部分。
///
/// # 教案式说明
/// - **意图 (Why)**：SDP 负载由外部解析器负责语法；本部分把负载当作不透明文本持有，
///   只实现 ISSI 一致性关心的少数字段比对。
/// - **契约 (What)**：
///   - 构造时即完成校验，持有的文本总能重新解析；
///   - 除行尾统一为 CRLF、空行被去掉之外，文本按收到的样子保存，任何行都不会被丢弃或重排；
///   - 从不视为默认部分；
///   - 比对版本、会话名（大小写不敏感）、首个媒体行的类型与协议（大小写不敏感）
///     以及首个媒体属性的值；任一侧缺少首个媒体属性时判为不匹配。
/// - **权衡 (Trade-offs)**：比对时重新解析两侧文本，换取部分本身不持有借用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpPart {
    text: String,
}

impl SdpPart {
    /// 校验 SDP 文本并以 CRLF 行尾保存。
    pub fn parse(text: &str) -> Result<Self> {
        parse_sdp(text)?;
        Ok(Self {
            text: crlf_lines(text),
        })
    }

    /// 以已解析的会话描述构造。
    #[must_use]
    pub fn from_session(session: &SessionDesc<'_>) -> Self {
        Self {
            text: format_sdp(session),
        }
    }

    /// 以 CRLF 结尾的负载文本。
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 会话描述视图。
    pub fn session(&self) -> core::result::Result<SessionDesc<'_>, SdpParseError> {
        parse_sdp(&self.text)
    }

    /// 正文即负载文本。
    #[must_use]
    pub fn render(&self) -> String {
        self.text.clone()
    }

    /// 以本部分为参考比对对端，任何解析失败都判为不匹配。
    #[must_use]
    pub fn matches(&self, peer: &SdpPart) -> bool {
        let (Ok(own), Ok(other)) = (self.session(), peer.session()) else {
            return false;
        };
        let (Some(own_media), Some(peer_media)) = (own.first_media(), other.first_media()) else {
            return false;
        };
        let (Some(own_attr), Some(peer_attr)) =
            (own_media.first_attribute(), peer_media.first_attribute())
        else {
            return false;
        };

        own.version == other.version
            && own.session_name.eq_ignore_ascii_case(other.session_name)
            && own_media.media.eq_ignore_ascii_case(peer_media.media)
            && own_media.proto.eq_ignore_ascii_case(peer_media.proto)
            && own_attr.value_or_empty() == peer_attr.value_or_empty()
    }
}

fn crlf_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 16);
    for line in text.split('\n').map(|line| line.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            continue;
        }
        output.push_str(line);
        output.push_str("\r\n");
    }
    output
}
