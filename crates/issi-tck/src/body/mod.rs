//! 消息体编解码器的兼容性断言。
//!
//! ## 设计意图（Why）
//! - 每个子模块聚焦一类契约，断言函数以 `assert_` 开头，由 `issi-codec-body` 的集成测试逐一调用；
//! - 构造报文的辅助函数集中在本文件，避免各子模块重复拼接 SDP 与参数块。

pub mod golden;
pub mod matching;
pub mod profile;
pub mod roundtrip;

use issi_codec_body::SdpPart;

/// ISSI 语音会话常见的 SDP offer。
pub(crate) const ISSI_OFFER: &str = "v=0\r\n\
    o=- 30 1 IN IP4 10.0.0.24\r\n\
    s=-\r\n\
    c=IN IP4 10.0.0.24\r\n\
    t=0 0\r\n\
    m=audio 25000 RTP/AVP 100\r\n\
    a=rtpmap:100 X-TIA-P25-IMBE/8000\r\n";

/// 解析 [`ISSI_OFFER`]。
pub(crate) fn issi_offer() -> SdpPart {
    SdpPart::parse(ISSI_OFFER).expect("ISSI offer must parse")
}
