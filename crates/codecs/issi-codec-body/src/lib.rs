#![warn(missing_docs)]

//! # issi-codec-body
//!
//! ## 教案目的（Why）
//! - **定位**：P25 ISSI 在 SIP 报文中携带的消息体编解码器，覆盖会话描述、呼叫参数、
//!   注册参数以及用户/组服务档案五类部分。
//! - **架构角色**：位于 SIP 信令与业务逻辑之间；SIP 层只交付 `Content-Type` 与原始字节，
//!   本 crate 负责把它们变成结构化的 [`ContentList`]，并在一致性测试中执行单向比对。
//! - **设计策略**：字段目录封闭且静态，名称查找经由全局只读 [`Registry`]；
//!   每类部分的渲染、默认判定与比对规则都收敛在各自类型上。
//!
//! ## 交互契约（What）
//! - **输入**：UTF-8 正文，行尾可为 CRLF 或 LF；多部分正文以 `P25 ISSI body boundary` 为边界。
//! - **输出**：渲染一律使用 CRLF；全默认的呼叫/注册参数被省略；只有一个可写出部分时不分帧。
//! - **错误**：所有格式问题以 [`FormatError`] 返回，不会 panic；比对失败是
//!   [`Verdict::Mismatch`] 结论而非错误。
//!
//! ## 实现策略（How）
//! 1. `attribute` 与 `registry` 把 `name:value` 行解析为类型化 [`AttributeLine`]；
//! 2. `profile` 与 `part` 在行之上构建各类部分；
//! 3. `list` 负责去重、排序、分帧与多部分解析；
//! 4. `matcher` 执行一致性比对，`codec` 把以上能力与 [`CodecConfig`] 组合成单一入口。
//!
//! ## 风险提示（Trade-offs）
//! - **容错范围**：未知属性名、越界取值、缺失头部的片段都会让整段解析失败，不做部分恢复。
//! - **维护提醒**：新增字段时需同时更新字段目录、默认值与渲染顺序，并补充黄金向量。

mod attribute;
mod codec;
mod config;
mod content_type;
mod error;
mod list;
mod matcher;
mod part;
mod profile;
mod registry;

pub use attribute::{
    ACCESS_PERMISSION, AUTHENTICATION_POLICY, AUTHENTICATION_TYPE, AVAILABILITY_CHECK,
    AttributeLine, AttributeValue, AuthParams, Block, CALL_PERMISSION, CALL_SETUP_PREFERENCE,
    CONSOLE_PRIORITY, Choice, DUPLEXITY, Field, FieldKind, FieldSpec, GROUP_CALL_PERMISSION,
    INTERRUPT_MODE, RADIO_INHIBIT, SECURITY_LEVEL,
};
pub use codec::{BodyCodec, EncodedBody};
pub use config::{CodecConfig, ConfigError, MatcherConfig, ProfilePolicy};
pub use content_type::{
    APPLICATION, BODY_BOUNDARY, BOUNDARY_DELIMITER, ContentType, MIXED, MULTIPART, SDP,
    X_TIA_P25_ISSI,
};
pub use error::{FormatError, Result};
pub use list::ContentList;
pub use matcher::{ConformanceMatcher, Verdict, conformance_match};
pub use part::{
    CallParamPart, ConsolePriority, ContentPart, GroupProfilePart, InitialTransmitter, PartKind,
    RegisterParamPart, SdpPart, UserProfilePart,
};
pub use profile::ProfileDocument;
pub use registry::Registry;
