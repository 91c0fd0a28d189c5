//! SDP 读写器的兼容性断言。
//!
//! ISSI 只使用 SDP 的一个很小的子集：单个音频媒体块与 `rtpmap` 属性。
//! 子模块围绕这一子集固定解析、规范化与错误定位的行为。

pub mod issi_offer;
