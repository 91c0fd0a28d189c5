//! # codec 模块
//!
//! ## 教案目的（Why）
//! - SIP 层拿到的是 `Content-Type` 头部取值与原始字节，发送时需要的也是这两样；
//!   [`BodyCodec`] 把列表的渲染、解析与一致性比对收拢到同一个带配置的入口。
//!
//! ## 交互契约（What）
//! - `decode` 与 [`ContentList::parse_header`] 语义一致，仅额外按配置追踪片段；
//! - `encode` 产出的 Content-Type 在没有可写出部分时为 `None`，此时 SIP 层应省略消息体；
//! - `verify` 使用配置中的比对策略。

use tracing::{debug, instrument};

use crate::config::CodecConfig;
use crate::content_type::ContentType;
use crate::error::Result;
use crate::list::ContentList;
use crate::matcher::{ConformanceMatcher, Verdict};

/// 编码结果：Content-Type 与正文文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    /// 报文应携带的内容类型；`None` 表示无消息体。
    pub content_type: Option<ContentType>,
    /// 线上正文。
    pub text: String,
}

impl EncodedBody {
    /// `Content-Type` 头部取值。
    #[must_use]
    pub fn content_type_header(&self) -> Option<String> {
        self.content_type.as_ref().map(ToString::to_string)
    }

    /// 是否没有任何可写出的内容。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_type.is_none()
    }
}

/// 带配置的消息体编解码入口。
///
/// # 教案式说明
/// - **契约 (What)**：不持有可变状态，`&self` 方法可并发调用。
/// - **权衡 (Trade-offs)**：配置在构造时固定；需要不同策略时构造新的实例。
#[derive(Debug, Clone, Default)]
pub struct BodyCodec {
    config: CodecConfig,
    matcher: ConformanceMatcher,
}

impl BodyCodec {
    /// 以给定配置构造。
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        let matcher = ConformanceMatcher::new(config.matcher.clone());
        Self { config, matcher }
    }

    /// 当前配置。
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// 解析收到的消息体。
    #[instrument(level = "debug", skip(self, body), fields(len = body.len()))]
    pub fn decode(&self, content_type: &str, body: &[u8]) -> Result<ContentList> {
        let content_type = ContentType::parse(content_type)?;
        let list = ContentList::parse_traced(&content_type, body, self.config.trace_fragments)?;
        debug!(parts = list.len(), "body decoded");
        Ok(list)
    }

    /// 渲染待发送的消息体。
    #[must_use]
    pub fn encode(&self, list: &ContentList) -> EncodedBody {
        EncodedBody {
            content_type: list.content_type(),
            text: list.render(),
        }
    }

    /// 以 `reference` 为模板校验 `captured`。
    pub fn verify<'r>(&self, reference: &'r ContentList, captured: &ContentList) -> Verdict<'r> {
        self.matcher.verify(reference, captured)
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::config::{MatcherConfig, ProfilePolicy};
    use crate::part::{ContentPart, RegisterParamPart, UserProfilePart};

    #[test]
    fn default_list_encodes_to_nothing() {
        let encoded = BodyCodec::default().encode(&ContentList::new());
        assert!(encoded.is_empty());
        assert_eq!(encoded.text, "");
        assert_eq!(encoded.content_type_header(), None);
    }

    #[test]
    fn encode_then_decode_preserves_parts() {
        let codec = BodyCodec::default();
        let mut list = ContentList::new();
        list.add(RegisterParamPart::new().with_force(true));
        list.add(UserProfilePart::parse("u-upri:7").expect("valid"));

        let encoded = codec.encode(&list);
        let header = encoded.content_type_header().expect("two parts");
        assert_eq!(header, "multipart/mixed;boundary=\"P25 ISSI body boundary\"");

        let decoded = codec.decode(&header, encoded.text.as_bytes()).expect("decodes");
        assert_eq!(decoded.len(), 2);
        assert!(codec.verify(&list, &decoded).is_conformant());
    }

    #[traced_test]
    #[test]
    fn fragment_tracing_follows_configuration() {
        let mut list = ContentList::empty();
        list.add(RegisterParamPart::new().with_confirm(true));
        list.add(UserProfilePart::parse("u-sec:1").expect("valid"));
        let codec = BodyCodec::new(CodecConfig {
            trace_fragments: true,
            ..CodecConfig::default()
        });
        let encoded = codec.encode(&list);
        let header = encoded.content_type_header().expect("multipart");

        codec.decode(&header, encoded.text.as_bytes()).expect("decodes");
        assert!(logs_contain("multipart fragment received"));
    }

    #[test]
    fn strict_configuration_reaches_the_matcher() {
        let config = CodecConfig {
            matcher: MatcherConfig {
                user_profile_policy: ProfilePolicy::Strict,
                ..MatcherConfig::default()
            },
            ..CodecConfig::default()
        };
        let codec = BodyCodec::new(config);
        assert_eq!(codec.config().matcher.user_profile_policy, ProfilePolicy::Strict);

        let reference: ContentList =
            [ContentPart::from(UserProfilePart::parse("u-upri:7").expect("valid"))]
                .into_iter()
                .collect();
        let captured: ContentList = [ContentPart::from(UserProfilePart::new())]
            .into_iter()
            .collect();
        assert!(!codec.verify(&reference, &captured).is_conformant());
    }

    #[test]
    fn malformed_header_is_reported() {
        assert!(BodyCodec::default().decode("", b"c-duplex:1").is_err());
    }
}
