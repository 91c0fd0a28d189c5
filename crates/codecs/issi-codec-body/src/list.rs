//! # list 模块
//!
//! ## 教案目的（Why）
//! - 一条 SIP 报文的消息体是若干部分的有序集合；发送时需要分帧与默认省略，
//!   接收时需要把线上字节还原为结构化的部分。
//!
//! ## 交互契约（What）
//! - 每种具体部分至多一个，重复添加即替换；
//! - 部分始终按 `(type, subtype)` 稳定排序，同键部分保持添加顺序；
//! - 新建列表自带默认的呼叫参数与注册参数；解析得到的列表只包含线上确实出现的部分。
//!
//! ## 实现策略（How）
//! 1. 渲染：统计非默认部分；多于一个时逐个分帧、以 CRLF 连接并追加终止分隔符；
//!    恰好一个时直接输出正文；没有则输出空文本；
//! 2. 解析：按内容类型分派，多部分正文按分隔符切片，逐片定位头部与空行后按类型与前缀构造。
//!
//! ## 风险提示（Trade-offs）
//! - 列表不是为并发修改设计的：构建一次、渲染或比对一次，需要共享时由调用方同步。

use core::fmt;

use tracing::{debug, trace};

use crate::content_type::{BODY_BOUNDARY, BOUNDARY_DELIMITER, ContentType, MIXED, MULTIPART};
use crate::error::{FormatError, Result, excerpt};
use crate::part::{
    CallParamPart, ContentPart, GroupProfilePart, PartKind, RegisterParamPart, SdpPart,
    UserProfilePart,
};

const CRLF: &str = "\r\n";

/// 有序、按种类去重的部分集合。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentList {
    parts: Vec<ContentPart>,
}

impl Default for ContentList {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentList {
    /// 新建列表，预置默认呼叫参数与注册参数。
    #[must_use]
    pub fn new() -> Self {
        let mut list = Self::empty();
        list.add(CallParamPart::new());
        list.add(RegisterParamPart::new());
        list
    }

    /// 不含任何部分的列表。
    #[must_use]
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// 添加部分，替换同种类的旧部分并重新排序；返回被替换者。
    pub fn add(&mut self, part: impl Into<ContentPart>) -> Option<ContentPart> {
        let part = part.into();
        let replaced = self.remove(part.kind());
        self.parts.push(part);
        self.parts.sort_by_key(|part| part.kind().sort_key());
        replaced
    }

    /// 移除指定种类的部分。
    pub fn remove(&mut self, kind: PartKind) -> Option<ContentPart> {
        let index = self.parts.iter().position(|part| part.kind() == kind)?;
        Some(self.parts.remove(index))
    }

    /// 指定种类的部分。
    #[must_use]
    pub fn get(&self, kind: PartKind) -> Option<&ContentPart> {
        self.parts.iter().find(|part| part.kind() == kind)
    }

    /// 内容类型为 `type/subtype` 的所有部分。
    pub fn get_by_type<'a>(
        &'a self,
        media_type: &'a str,
        subtype: &'a str,
    ) -> impl Iterator<Item = &'a ContentPart> + 'a {
        self.parts
            .iter()
            .filter(move |part| part.content_type().is(media_type, subtype))
    }

    /// 会话描述。
    #[must_use]
    pub fn sdp(&self) -> Option<&SdpPart> {
        self.get(PartKind::Sdp).and_then(ContentPart::as_sdp)
    }

    /// 呼叫参数。
    #[must_use]
    pub fn call_param(&self) -> Option<&CallParamPart> {
        self.get(PartKind::CallParam)
            .and_then(ContentPart::as_call_param)
    }

    /// 注册参数。
    #[must_use]
    pub fn register_param(&self) -> Option<&RegisterParamPart> {
        self.get(PartKind::RegisterParam)
            .and_then(ContentPart::as_register_param)
    }

    /// 用户档案。
    #[must_use]
    pub fn user_profile(&self) -> Option<&UserProfilePart> {
        self.get(PartKind::UserProfile)
            .and_then(ContentPart::as_user_profile)
    }

    /// 组档案。
    #[must_use]
    pub fn group_profile(&self) -> Option<&GroupProfilePart> {
        self.get(PartKind::GroupProfile)
            .and_then(ContentPart::as_group_profile)
    }

    /// 按顺序遍历部分。
    pub fn iter(&self) -> impl Iterator<Item = &ContentPart> {
        self.parts.iter()
    }

    /// 部分数量（含默认部分）。
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// 是否没有任何部分。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 会被写出的非默认部分数量。
    #[must_use]
    pub fn packing_size(&self) -> usize {
        self.packed().count()
    }

    fn packed(&self) -> impl Iterator<Item = &ContentPart> {
        self.parts.iter().filter(|part| !part.is_default())
    }

    /// 报文应携带的 Content-Type；没有可写出的部分时为 `None`。
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        let mut packed = self.packed();
        let first = packed.next()?;
        if packed.next().is_some() {
            Some(ContentType::multipart_mixed())
        } else {
            Some(first.content_type())
        }
    }

    /// 渲染线上正文。
    #[must_use]
    pub fn render(&self) -> String {
        let packed: Vec<&ContentPart> = self.packed().collect();
        match packed.as_slice() {
            [] => String::new(),
            [single] => single.render(),
            many => {
                let mut out = many
                    .iter()
                    .map(|part| part.render_framed(BOUNDARY_DELIMITER))
                    .collect::<Vec<_>>()
                    .join(CRLF);
                out.push_str(BOUNDARY_DELIMITER);
                out.push_str("--");
                out
            }
        }
    }

    /// 按 Content-Type 头部取值与原始字节解析。
    pub fn parse_header(content_type: &str, body: &[u8]) -> Result<Self> {
        Self::parse(&ContentType::parse(content_type)?, body)
    }

    /// 按内容类型描述符与原始字节解析。
    ///
    /// # 契约说明
    /// - 空白正文得到空列表；
    /// - `multipart/mixed` 逐片解析，第一处错误即返回；
    /// - 单独的 `application/sdp` 或 `application/x-tia-p25-issi` 直接构造对应部分；
    /// - 其它类型报 [`FormatError::UnsupportedContentType`]。
    pub fn parse(content_type: &ContentType, body: &[u8]) -> Result<Self> {
        Self::parse_traced(content_type, body, false)
    }

    pub(crate) fn parse_traced(
        content_type: &ContentType,
        body: &[u8],
        trace_fragments: bool,
    ) -> Result<Self> {
        let text = core::str::from_utf8(body).map_err(|err| FormatError::NonUtf8Body {
            valid_up_to: err.valid_up_to(),
        })?;
        if text.trim().is_empty() {
            debug!(content_type = %content_type, "empty body decoded to empty list");
            return Ok(Self::empty());
        }

        if content_type.is(MULTIPART, MIXED) {
            let boundary = content_type.boundary().unwrap_or(BODY_BOUNDARY);
            return Self::parse_multipart(text, &format!("--{boundary}"), trace_fragments);
        }

        let mut list = Self::empty();
        if let Some(part) = ContentPart::parse_typed(content_type, text)? {
            list.add(part);
        }
        Ok(list)
    }

    fn parse_multipart(text: &str, delimiter: &str, trace_fragments: bool) -> Result<Self> {
        let mut list = Self::empty();
        for (index, raw) in text.split(delimiter).enumerate() {
            let fragment = raw.trim_start_matches(['\r', '\n']);
            if fragment.trim().is_empty() {
                continue;
            }
            if trace_fragments {
                trace!(index, fragment, "multipart fragment received");
            }
            if fragment.starts_with("--") {
                debug!(index, "terminal boundary reached");
                break;
            }

            let (header, payload) = split_fragment(fragment)?;
            let content_type = ContentType::parse(header)?;
            match ContentPart::parse_typed(&content_type, payload)? {
                Some(part) => {
                    debug!(index, kind = %part.kind(), "multipart fragment decoded");
                    list.add(part);
                }
                None => debug!(index, "empty ISSI fragment skipped"),
            }
        }
        Ok(list)
    }
}

/// 把片段切成 `(Content-Type 头部行, 正文)`；头部与正文之间必须有空行。
fn split_fragment(fragment: &str) -> Result<(&str, &str)> {
    let missing = || FormatError::MissingPartHeader {
        excerpt: excerpt(fragment),
    };

    let mut offset = 0;
    let mut header = None;
    for line in fragment.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim().is_empty() {
            let header = header.ok_or_else(missing)?;
            return Ok((header, &fragment[offset + line.len()..]));
        }
        let is_content_type = content
            .split_once(':')
            .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"));
        if is_content_type {
            header = Some(content);
        } else if header.is_none() && !content.contains(':') {
            return Err(missing());
        }
        offset += line.len();
    }
    Err(missing())
}

impl fmt::Display for ContentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromIterator<ContentPart> for ContentList {
    fn from_iter<I: IntoIterator<Item = ContentPart>>(iter: I) -> Self {
        let mut list = Self::empty();
        for part in iter {
            list.add(part);
        }
        list
    }
}

impl<'a> IntoIterator for &'a ContentList {
    type Item = &'a ContentPart;
    type IntoIter = core::slice::Iter<'a, ContentPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::{APPLICATION, X_TIA_P25_ISSI};

    const SDP_TEXT: &str = "v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=-\r\nt=0 0\r\n\
        m=audio 25000 RTP/AVP 100\r\na=rtpmap:100 X-TIA-P25-IMBE/8000\r\n";

    fn sdp() -> SdpPart {
        SdpPart::parse(SDP_TEXT).expect("valid sdp")
    }

    #[test]
    fn new_list_holds_default_parameters_and_renders_nothing() {
        let list = ContentList::new();
        assert_eq!(list.len(), 2);
        assert!(list.call_param().is_some());
        assert!(list.register_param().is_some());
        assert_eq!(list.packing_size(), 0);
        assert_eq!(list.content_type(), None);
        assert_eq!(list.render(), "");
    }

    #[test]
    fn add_replaces_and_keeps_sort_order() {
        let mut list = ContentList::new();
        list.add(GroupProfilePart::new());
        list.add(sdp());
        let replaced = list.add(CallParamPart::new().with_protected_mode(true));
        assert!(replaced.is_some());
        assert_eq!(list.len(), 4);

        let kinds: Vec<PartKind> = list.iter().map(ContentPart::kind).collect();
        assert_eq!(
            kinds,
            vec![
                PartKind::Sdp,
                PartKind::RegisterParam,
                PartKind::GroupProfile,
                PartKind::CallParam
            ]
        );
        assert_eq!(list.get_by_type(APPLICATION, X_TIA_P25_ISSI).count(), 3);
    }

    #[test]
    fn single_part_renders_unadorned() {
        let mut list = ContentList::new();
        list.add(GroupProfilePart::parse("g-access:1\r\ng-pri:2\r\n").expect("valid"));
        assert_eq!(list.packing_size(), 1);
        assert_eq!(list.content_type(), Some(ContentType::issi()));
        assert_eq!(list.render(), "g-access:1\r\ng-pri:2\r\n");
    }

    #[test]
    fn two_parts_are_framed_with_one_terminal_boundary() {
        let mut list = ContentList::new();
        list.add(sdp());
        list.add(CallParamPart::new().with_availability_check_requested(false));
        assert_eq!(list.content_type(), Some(ContentType::multipart_mixed()));

        let expected = format!(
            "{BOUNDARY_DELIMITER}\r\nContent-Type: application/sdp\r\n\r\n{SDP_TEXT}\r\n\
             {BOUNDARY_DELIMITER}\r\nContent-Type: application/x-tia-p25-issi\r\n\r\nc-pref:0\r\n\
             {BOUNDARY_DELIMITER}--"
        );
        let rendered = list.render();
        assert_eq!(rendered, expected);
        assert_eq!(rendered.matches(BOUNDARY_DELIMITER).count(), 3);
        assert_eq!(rendered.matches(&format!("{BOUNDARY_DELIMITER}--")).count(), 1);
        assert_eq!(list.render(), rendered);
    }

    #[test]
    fn multipart_body_parses_back() {
        let mut list = ContentList::new();
        list.add(sdp());
        list.add(CallParamPart::new().with_availability_check_requested(false));
        let rendered = list.render();

        let parsed = ContentList::parse(&ContentType::multipart_mixed(), rendered.as_bytes())
            .expect("round trip");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.sdp(), list.sdp());
        assert_eq!(parsed.call_param(), list.call_param());
        assert!(parsed.register_param().is_none());
    }

    #[test]
    fn sdp_payload_lines_survive_decode_and_render() {
        let text = "v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=-\r\ni=ISSI group call\r\nb=AS:64\r\n\
            c=IN IP4 10.0.0.1\r\nt=0 0\r\nm=audio 25000 RTP/AVP 100\r\nb=AS:32\r\n\
            a=rtpmap:100 X-TIA-P25-IMBE/8000\r\n";
        let single = ContentList::parse(&ContentType::sdp(), text.as_bytes()).expect("valid");
        assert_eq!(single.render(), text);

        let mut list = ContentList::new();
        list.add(single.sdp().cloned().expect("sdp part"));
        list.add(CallParamPart::new().with_rf_resource_available(true));
        let rendered = list.render();
        let parsed = ContentList::parse(&ContentType::multipart_mixed(), rendered.as_bytes())
            .expect("round trip");
        assert_eq!(parsed.sdp().map(SdpPart::text), Some(text));
        assert_eq!(parsed.render(), rendered);
    }

    #[test]
    fn lf_only_multipart_is_accepted() {
        let body = format!(
            "{BOUNDARY_DELIMITER}\nContent-Type: application/x-tia-p25-issi\n\nr-force:1\n\
             {BOUNDARY_DELIMITER}\nContent-Type: application/x-tia-p25-issi\n\ng-pri:4\n\
             {BOUNDARY_DELIMITER}--\n"
        );
        let parsed = ContentList::parse_header(
            "multipart/mixed; boundary=\"P25 ISSI body boundary\"",
            body.as_bytes(),
        )
        .expect("lf body");
        assert!(parsed.register_param().is_some_and(RegisterParamPart::force));
        assert_eq!(parsed.group_profile().map(GroupProfilePart::priority), Some(4));
    }

    #[test]
    fn bare_bodies_build_single_parts() {
        let parsed = ContentList::parse(&ContentType::issi(), b"g-access:1\r\ng-pri:2\r\n")
            .expect("group profile");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.render(), "g-access:1\r\ng-pri:2\r\n");

        let parsed = ContentList::parse(&ContentType::sdp(), SDP_TEXT.as_bytes()).expect("sdp");
        assert!(parsed.sdp().is_some());

        let empty = ContentList::parse(&ContentType::sdp(), b"\r\n").expect("empty body");
        assert!(empty.is_empty());
    }

    #[test]
    fn format_errors_surface() {
        assert!(matches!(
            ContentList::parse(&ContentType::issi(), b"g-access=1"),
            Err(FormatError::MalformedLine { .. })
        ));
        assert!(matches!(
            ContentList::parse(&ContentType::new("text", "plain"), b"hi"),
            Err(FormatError::UnsupportedContentType { .. })
        ));
        assert!(matches!(
            ContentList::parse(&ContentType::issi(), &[0xff, 0xfe]),
            Err(FormatError::NonUtf8Body { valid_up_to: 0 })
        ));
    }

    #[test]
    fn multipart_fragment_errors_surface() {
        let no_header = format!("{BOUNDARY_DELIMITER}\r\ng-pri:2\r\n{BOUNDARY_DELIMITER}--");
        assert!(matches!(
            ContentList::parse(&ContentType::multipart_mixed(), no_header.as_bytes()),
            Err(FormatError::MissingPartHeader { .. })
        ));

        let foreign = format!(
            "{BOUNDARY_DELIMITER}\r\nContent-Type: text/plain\r\n\r\nhello\r\n{BOUNDARY_DELIMITER}--"
        );
        assert!(matches!(
            ContentList::parse(&ContentType::multipart_mixed(), foreign.as_bytes()),
            Err(FormatError::UnsupportedContentType { .. })
        ));

        let unknown = format!(
            "{BOUNDARY_DELIMITER}\r\nContent-Type: application/x-tia-p25-issi\r\n\r\nz-1:1\r\n{BOUNDARY_DELIMITER}--"
        );
        assert!(matches!(
            ContentList::parse(&ContentType::multipart_mixed(), unknown.as_bytes()),
            Err(FormatError::UnrecognizedBody { .. })
        ));
    }

    #[test]
    fn empty_issi_fragment_is_skipped() {
        let body = format!(
            "{BOUNDARY_DELIMITER}\r\nContent-Type: application/x-tia-p25-issi\r\n\r\n\r\n\
             {BOUNDARY_DELIMITER}\r\nContent-Type: application/x-tia-p25-issi\r\n\r\nc-d:1\r\n\
             {BOUNDARY_DELIMITER}--"
        );
        let parsed =
            ContentList::parse(&ContentType::multipart_mixed(), body.as_bytes()).expect("valid");
        assert_eq!(parsed.len(), 1);
        assert!(parsed.call_param().is_some_and(CallParamPart::full_duplex_requested));
    }

    #[test]
    fn collects_from_parts() {
        let list: ContentList = [
            ContentPart::from(RegisterParamPart::new().with_force(true)),
            ContentPart::from(sdp()),
            ContentPart::from(RegisterParamPart::new()),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.len(), 2);
        assert!(list.register_param().is_some_and(RegisterParamPart::is_default));
        assert_eq!((&list).into_iter().count(), 2);
    }
}
