#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # issi-codec-sdp
//!
//! ## 教案目的（Why）
//! - **定位**：ISSI 消息体中的 `application/sdp` 部分需要一个只读、零拷贝的会话描述视图，
//!   供消息体编解码器校验负载、并在一致性比对时读取版本、会话名与首个媒体行。
//! - **架构角色**：位于 `issi-codec-body` 之下，作为外部 SDP 协作者；上层只依赖
//!   `parse_sdp`/`format_sdp`/`normalize_sdp` 三个入口，不关心行级细节。
//! - **设计策略**：单次扫描解析核心行（`v/o/s/c/t/m/a`），严格拒绝不具备 `x=` 形态的行；
//!   合法但未建模的行（`i=`、`b=`、`k=`、`r=` 等）原样收集为 [`OtherLine`]，生成时写回。
//!
//! ## 交互契约（What）
//! - `parse_sdp`：返回借用输入切片的 [`SessionDesc`]，失败时给出带行号的 [`SdpParseError`]；
//! - `format_sdp`：按 RFC 4566 行序输出 CRLF 结尾文本，未建模行不会丢失；
//! - `normalize_sdp`：解析后再生成，得到可重复比较的规范文本。
//!
//! ## 风险提示（Trade-offs）
//! - 仅保证结构完整性，不对地址、端口等做语义校验；一致性判定所需的比较由上层完成。
//! - 解析对 LF 与 CRLF 同样宽容，输出统一为 CRLF。

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// SDP 解析错误。
///
/// ### 设计动机（Why）
/// - 一致性测试工具必须把畸形负载暴露给使用者，因此每个变体都指向具体缺失的行或出错的行号。
///
/// ### 契约定义（What）
/// - `line` 字段为 1 起始的物理行号（按 `\n` 切分计数，空行同样计数）；
/// - `Missing*` 变体表示整个文本缺少该必需行，不携带位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdpParseError {
    /// 缺少 `v=` 行。
    MissingVersion,
    /// 缺少 `o=` 行。
    MissingOrigin,
    /// `o=` 行不足 6 个字段。
    InvalidOrigin {
        /// 出错行号。
        line: usize,
    },
    /// 缺少 `s=` 行。
    MissingSessionName,
    /// 缺少 `t=` 行。
    MissingTiming,
    /// `t=` 行缺少开始或结束时间。
    InvalidTiming {
        /// 出错行号。
        line: usize,
    },
    /// `c=` 行字段不足。
    InvalidConnection {
        /// 出错行号。
        line: usize,
    },
    /// `m=` 行字段不足或缺少格式列表。
    InvalidMedia {
        /// 出错行号。
        line: usize,
    },
    /// 行不符合 `x=value` 形态。
    MalformedLine {
        /// 出错行号。
        line: usize,
    },
}

impl fmt::Display for SdpParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersion => write!(f, "missing v= line"),
            Self::MissingOrigin => write!(f, "missing o= line"),
            Self::InvalidOrigin { line } => {
                write!(f, "o= line {line} needs six space separated fields")
            }
            Self::MissingSessionName => write!(f, "missing s= line"),
            Self::MissingTiming => write!(f, "missing t= line"),
            Self::InvalidTiming { line } => write!(f, "t= line {line} needs start and stop"),
            Self::InvalidConnection { line } => {
                write!(f, "c= line {line} needs network type, address type and address")
            }
            Self::InvalidMedia { line } => write!(
                f,
                "m= line {line} needs media, port, transport and at least one format"
            ),
            Self::MalformedLine { line } => write!(f, "line {line} is not of the form x=value"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SdpParseError {}

/// `o=` 行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin<'a> {
    /// 发起用户名。
    pub username: &'a str,
    /// 会话标识。
    pub session_id: &'a str,
    /// 会话版本号。
    pub session_version: &'a str,
    /// 网络类型，例如 `IN`。
    pub net_type: &'a str,
    /// 地址类型，例如 `IP4`。
    pub addr_type: &'a str,
    /// 单播地址。
    pub address: &'a str,
}

/// `c=` 行，会话级与媒体级共用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<'a> {
    /// 网络类型。
    pub net_type: &'a str,
    /// 地址类型。
    pub addr_type: &'a str,
    /// 连接地址。
    pub address: &'a str,
}

/// `t=` 行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing<'a> {
    /// 会话开始时间。
    pub start: &'a str,
    /// 会话结束时间。
    pub stop: &'a str,
}

/// `a=` 行，`a=key` 或 `a=key:value`。
///
/// ISSI 负载中典型的值是 `rtpmap` 的 `100 X-TIA-P25-IMBE/8000`，一致性比对只读取值部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// 属性键名。
    pub key: &'a str,
    /// 属性值，标志型属性为 `None`。
    pub value: Option<&'a str>,
}

impl<'a> Attribute<'a> {
    /// 返回属性值，标志型属性返回空串。
    #[must_use]
    pub fn value_or_empty(&self) -> &'a str {
        self.value.unwrap_or("")
    }
}

/// 未建模的合法行，例如 `b=AS:64`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtherLine<'a> {
    /// 行类型字母。
    pub kind: u8,
    /// `=` 之后的内容。
    pub value: &'a str,
}

/// `m=` 行及其随后的 `c=`/`a=` 行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDesc<'a> {
    /// 媒体类型，例如 `audio`。
    pub media: &'a str,
    /// 端口原文。
    pub port: &'a str,
    /// 传输协议，例如 `RTP/AVP`。
    pub proto: &'a str,
    /// 格式列表。
    pub formats: Vec<&'a str>,
    /// 媒体级连接信息。
    pub connection: Option<Connection<'a>>,
    /// 媒体级属性，保持出现顺序。
    pub attributes: Vec<Attribute<'a>>,
    /// 媒体级未建模行，保持出现顺序。
    pub other: Vec<OtherLine<'a>>,
}

impl<'a> MediaDesc<'a> {
    /// 首个媒体级属性。
    #[must_use]
    pub fn first_attribute(&self) -> Option<&Attribute<'a>> {
        self.attributes.first()
    }
}

/// 完整的会话描述，全部字段借用输入文本。
///
/// ### 契约定义（What）
/// - 会话级 `a=` 只收集首个 `m=` 之前出现的属性；
/// - 重复的必需行以最后一次出现为准。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDesc<'a> {
    /// `v=` 内容，通常为 `0`。
    pub version: &'a str,
    /// 会话发起人。
    pub origin: Origin<'a>,
    /// 会话名称。
    pub session_name: &'a str,
    /// 会话级连接信息。
    pub connection: Option<Connection<'a>>,
    /// 时间窗口。
    pub timing: Timing<'a>,
    /// 会话级属性。
    pub attributes: Vec<Attribute<'a>>,
    /// 会话级未建模行，保持出现顺序。
    pub other: Vec<OtherLine<'a>>,
    /// 媒体块。
    pub media: Vec<MediaDesc<'a>>,
}

impl<'a> SessionDesc<'a> {
    /// 首个媒体块；一致性比对只关心它。
    #[must_use]
    pub fn first_media(&self) -> Option<&MediaDesc<'a>> {
        self.media.first()
    }
}

/// 解析 SDP 文本。
///
/// ### 契约定义（What）
/// - **输入**：完整 SDP 文本，`\n` 或 `\r\n` 分隔，空行被跳过；
/// - **输出**：借用输入的 [`SessionDesc`]；
/// - **错误**：必需行缺失、关键字段不足或行不符合 `x=value` 形态时返回 [`SdpParseError`]。
///
/// ### 实现逻辑（How）
/// 1. 逐行扫描，以首字节判定行类型；
/// 2. 遇到 `m=` 后，`c=`/`a=` 归属最近的媒体块；
/// 3. 合法但未建模的行收集到所在层级的 `other`。
pub fn parse_sdp<'a>(input: &'a str) -> Result<SessionDesc<'a>, SdpParseError> {
    let mut version: Option<&'a str> = None;
    let mut origin: Option<Origin<'a>> = None;
    let mut session_name: Option<&'a str> = None;
    let mut session_connection: Option<Connection<'a>> = None;
    let mut timing: Option<Timing<'a>> = None;
    let mut session_attributes: Vec<Attribute<'a>> = Vec::new();
    let mut session_other: Vec<OtherLine<'a>> = Vec::new();
    let mut media_list: Vec<MediaDesc<'a>> = Vec::new();

    for (index, raw_line) in input.split('\n').enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let bytes = line.as_bytes();
        if bytes.len() < 2 || bytes[1] != b'=' || !bytes[0].is_ascii_lowercase() {
            return Err(SdpParseError::MalformedLine { line: line_no });
        }
        let value = line[2..].trim();

        match bytes[0] {
            b'v' => version = Some(value),
            b'o' => origin = Some(parse_origin(value, line_no)?),
            b's' => session_name = Some(value),
            b'c' => {
                let connection = parse_connection(value, line_no)?;
                match media_list.last_mut() {
                    Some(media) => media.connection = Some(connection),
                    None => session_connection = Some(connection),
                }
            }
            b't' => timing = Some(parse_timing(value, line_no)?),
            b'm' => media_list.push(parse_media(value, line_no)?),
            b'a' => {
                let attribute = parse_attribute(value);
                match media_list.last_mut() {
                    Some(media) => media.attributes.push(attribute),
                    None => session_attributes.push(attribute),
                }
            }
            kind => {
                let other = OtherLine { kind, value };
                match media_list.last_mut() {
                    Some(media) => media.other.push(other),
                    None => session_other.push(other),
                }
            }
        }
    }

    Ok(SessionDesc {
        version: version.ok_or(SdpParseError::MissingVersion)?,
        origin: origin.ok_or(SdpParseError::MissingOrigin)?,
        session_name: session_name.ok_or(SdpParseError::MissingSessionName)?,
        connection: session_connection,
        timing: timing.ok_or(SdpParseError::MissingTiming)?,
        attributes: session_attributes,
        other: session_other,
        media: media_list,
    })
}

/// 根据会话结构生成 CRLF 结尾的文本。
///
/// 会话级行序为 `v o s i u e p c b t r z k a*`，随后每个媒体块输出 `m i c b k a*`；
/// 同类行保持原有顺序，未知类型的行放在 `a=` 之前。
pub fn format_sdp(desc: &SessionDesc<'_>) -> String {
    let mut output = String::new();

    push_line(&mut output, "v=", desc.version);
    push_origin(&mut output, &desc.origin);
    push_line(&mut output, "s=", desc.session_name);
    push_other(&mut output, &desc.other, |kind| b"iuep".contains(&kind));
    if let Some(connection) = &desc.connection {
        push_connection(&mut output, connection);
    }
    push_other(&mut output, &desc.other, |kind| kind == b'b');
    push_timing(&mut output, &desc.timing);
    push_other(&mut output, &desc.other, |kind| b"rz".contains(&kind));
    push_other(&mut output, &desc.other, |kind| !b"iuepbrz".contains(&kind));
    for attribute in &desc.attributes {
        push_attribute(&mut output, attribute);
    }
    for media in &desc.media {
        push_media(&mut output, media);
    }

    output
}

/// 解析并重新生成，得到规范化文本。
///
/// 上层以此把捕获到的负载折叠为确定的 CRLF 形式后再持有，避免保存借用。
pub fn normalize_sdp(input: &str) -> Result<String, SdpParseError> {
    parse_sdp(input).map(|desc| format_sdp(&desc))
}

fn push_line(buffer: &mut String, prefix: &str, content: &str) {
    buffer.push_str(prefix);
    buffer.push_str(content);
    buffer.push_str("\r\n");
}

fn push_other(buffer: &mut String, lines: &[OtherLine<'_>], select: impl Fn(u8) -> bool) {
    for line in lines.iter().filter(|line| select(line.kind)) {
        buffer.push(char::from(line.kind));
        buffer.push('=');
        buffer.push_str(line.value);
        buffer.push_str("\r\n");
    }
}

fn push_fields(buffer: &mut String, prefix: &str, fields: &[&str]) {
    buffer.push_str(prefix);
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            buffer.push(' ');
        }
        buffer.push_str(field);
    }
    buffer.push_str("\r\n");
}

fn push_origin(buffer: &mut String, origin: &Origin<'_>) {
    push_fields(
        buffer,
        "o=",
        &[
            origin.username,
            origin.session_id,
            origin.session_version,
            origin.net_type,
            origin.addr_type,
            origin.address,
        ],
    );
}

fn push_connection(buffer: &mut String, connection: &Connection<'_>) {
    push_fields(
        buffer,
        "c=",
        &[connection.net_type, connection.addr_type, connection.address],
    );
}

fn push_timing(buffer: &mut String, timing: &Timing<'_>) {
    push_fields(buffer, "t=", &[timing.start, timing.stop]);
}

fn push_attribute(buffer: &mut String, attribute: &Attribute<'_>) {
    buffer.push_str("a=");
    buffer.push_str(attribute.key);
    if let Some(value) = attribute.value {
        buffer.push(':');
        buffer.push_str(value);
    }
    buffer.push_str("\r\n");
}

fn push_media(buffer: &mut String, media: &MediaDesc<'_>) {
    let mut fields: Vec<&str> = Vec::with_capacity(3 + media.formats.len());
    fields.push(media.media);
    fields.push(media.port);
    fields.push(media.proto);
    fields.extend(media.formats.iter().copied());
    push_fields(buffer, "m=", &fields);

    push_other(buffer, &media.other, |kind| kind == b'i');
    if let Some(connection) = &media.connection {
        push_connection(buffer, connection);
    }
    push_other(buffer, &media.other, |kind| kind != b'i');
    for attribute in &media.attributes {
        push_attribute(buffer, attribute);
    }
}

fn parse_origin<'a>(value: &'a str, line: usize) -> Result<Origin<'a>, SdpParseError> {
    let mut parts = value.split_whitespace();
    match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (
            Some(username),
            Some(session_id),
            Some(session_version),
            Some(net_type),
            Some(addr_type),
            Some(address),
        ) => Ok(Origin {
            username,
            session_id,
            session_version,
            net_type,
            addr_type,
            address,
        }),
        _ => Err(SdpParseError::InvalidOrigin { line }),
    }
}

fn parse_connection<'a>(value: &'a str, line: usize) -> Result<Connection<'a>, SdpParseError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(net_type), Some(addr_type), Some(address)) => Ok(Connection {
            net_type,
            addr_type,
            address,
        }),
        _ => Err(SdpParseError::InvalidConnection { line }),
    }
}

fn parse_timing<'a>(value: &'a str, line: usize) -> Result<Timing<'a>, SdpParseError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(start), Some(stop)) => Ok(Timing { start, stop }),
        _ => Err(SdpParseError::InvalidTiming { line }),
    }
}

fn parse_media<'a>(value: &'a str, line: usize) -> Result<MediaDesc<'a>, SdpParseError> {
    let mut parts = value.split_whitespace();
    let (Some(media), Some(port), Some(proto)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SdpParseError::InvalidMedia { line });
    };
    let formats: Vec<&'a str> = parts.collect();
    if formats.is_empty() {
        return Err(SdpParseError::InvalidMedia { line });
    }
    Ok(MediaDesc {
        media,
        port,
        proto,
        formats,
        connection: None,
        attributes: Vec::new(),
        other: Vec::new(),
    })
}

fn parse_attribute(value: &str) -> Attribute<'_> {
    match value.split_once(':') {
        Some((key, val)) => Attribute {
            key,
            value: Some(val),
        },
        None => Attribute { key: value, value: None },
    }
}
