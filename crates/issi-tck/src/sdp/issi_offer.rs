//! ISSI 语音 offer 的解析与规范化。
//!
//! ## 设计意图（Why）
//! - 消息体一致性比对读取会话名、首个媒体块与首个媒体属性，这些字段必须被稳定地定位；
//! - 捕获到的负载可能使用裸 LF，规范化后必须得到确定的 CRLF 文本。
//!
//! ## 结构安排（How）
//! - `assert_issi_offer_fields`：字段定位；
//! - `assert_normalization_is_stable`：规范化幂等；
//! - `assert_errors_carry_line_numbers`：负例与行号。

use issi_codec_sdp::{SdpParseError, format_sdp, normalize_sdp, parse_sdp};

const OFFER_LF: &str = "v=0\n\
    o=- 30 1 IN IP4 10.0.0.24\n\
    s=ISSI\n\
    c=IN IP4 10.0.0.24\n\
    t=0 0\n\
    m=audio 25000 RTP/AVP 100\n\
    a=rtpmap:100 X-TIA-P25-IMBE/8000\n\
    a=ptime:20\n";

/// 首个媒体块与首个属性被正确定位。
///
/// # 教案式说明
/// - **契约（What）**：`first_media` 为音频块，`first_attribute` 的值为 `rtpmap` 的参数部分；
///   会话级连接信息与时间窗口都被保留。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_issi_offer_fields() {
    let session = parse_sdp(OFFER_LF).expect("offer must parse");
    assert_eq!(session.version, "0");
    assert_eq!(session.session_name, "ISSI");
    assert_eq!(session.origin.address, "10.0.0.24");
    assert_eq!(session.timing.start, "0");
    assert!(session.connection.is_some());

    let media = session.first_media().expect("audio media block");
    assert_eq!(media.media, "audio");
    assert_eq!(media.port, "25000");
    assert_eq!(media.proto, "RTP/AVP");
    assert_eq!(media.formats, ["100"]);
    assert_eq!(media.attributes.len(), 2);

    let attribute = media.first_attribute().expect("rtpmap attribute");
    assert_eq!(attribute.key, "rtpmap");
    assert_eq!(attribute.value_or_empty(), "100 X-TIA-P25-IMBE/8000");
}

/// 规范化输出 CRLF 文本，且对自身幂等。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_normalization_is_stable() -> anyhow::Result<()> {
    let normalized = normalize_sdp(OFFER_LF)?;
    anyhow::ensure!(
        normalized == OFFER_LF.replace('\n', "\r\n"),
        "normalized text differs: {normalized:?}"
    );
    anyhow::ensure!(
        normalize_sdp(&normalized)? == normalized,
        "normalization must be idempotent"
    );
    let session = parse_sdp(&normalized)?;
    anyhow::ensure!(format_sdp(&session) == normalized, "format must mirror parse");
    Ok(())
}

/// 必需行缺失或行格式错误时返回带位置的错误。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_errors_carry_line_numbers() {
    assert_eq!(
        parse_sdp("o=- 1 1 IN IP4 a\ns=-\nt=0 0\n"),
        Err(SdpParseError::MissingVersion)
    );
    assert_eq!(
        parse_sdp("v=0\no=- 1 1 IN IP4 a\ns=-\nt=0 0\nm=audio\n"),
        Err(SdpParseError::InvalidMedia { line: 5 })
    );
    assert_eq!(
        parse_sdp("v=0\no=- 1 1 IN IP4 a\nrtpmap\n"),
        Err(SdpParseError::MalformedLine { line: 3 })
    );
    assert_eq!(
        parse_sdp("v=0\no=- 1 IN\ns=-\nt=0 0\n"),
        Err(SdpParseError::InvalidOrigin { line: 2 })
    );
}
