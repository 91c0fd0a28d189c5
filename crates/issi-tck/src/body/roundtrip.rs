//! 渲染与解析契约。
//!
//! ## 设计意图（Why）
//! - 线上形态（默认省略、单部分不分帧、多部分的 CRLF 分帧与终止边界）是对端实现最先观察到的行为，
//!   任何回归都会让互通失败；
//! - 解析侧必须把自身的渲染结果还原为等价列表，并拒绝畸形输入。

use issi_codec_body::{
    BOUNDARY_DELIMITER, CallParamPart, ContentList, ContentPart, ContentType, FormatError,
    GroupProfilePart, PartKind, RegisterParamPart, UserProfilePart,
};

use super::issi_offer;

/// 新建列表只含默认参数，渲染为空且没有 Content-Type。
///
/// # 教案式说明
/// - **意图（Why）**：默认呼叫/注册参数不应出现在报文中；
/// - **契约（What）**：`len == 2`、`packing_size == 0`、`render` 为空串。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_default_list_renders_nothing() {
    let list = ContentList::new();
    assert_eq!(list.len(), 2);
    assert_eq!(list.packing_size(), 0);
    assert_eq!(list.render(), "");
    assert!(list.content_type().is_none());
}

/// 只有一个非默认部分时直接输出正文。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_single_part_is_unframed() {
    let mut list = ContentList::new();
    list.add(RegisterParamPart::new().with_force(true));

    assert_eq!(list.packing_size(), 1);
    assert_eq!(list.render(), "r-force:1\r\n");
    assert_eq!(list.content_type(), Some(ContentType::issi()));
    assert!(!list.render().contains(BOUNDARY_DELIMITER));
}

/// 两个非默认部分按排序分帧，并以唯一的终止边界结束。
///
/// # 教案式说明
/// - **流程（How）**：先添加呼叫参数再添加 SDP，验证排序把 SDP 放在前面；
/// - **契约（What）**：输出与逐字拼接的期望文本完全一致，Content-Type 为带引号边界的
///   `multipart/mixed`。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_two_parts_are_framed() {
    let offer = issi_offer();
    let mut list = ContentList::new();
    list.add(CallParamPart::new().with_rf_resource_available(true));
    list.add(offer.clone());

    let expected = format!(
        "--P25 ISSI body boundary\r\nContent-Type: application/sdp\r\n\r\n{}\r\n\
         --P25 ISSI body boundary\r\nContent-Type: application/x-tia-p25-issi\r\n\r\n\
         c-resavail:1\r\n--P25 ISSI body boundary--",
        offer.text()
    );
    assert_eq!(list.render(), expected);
    assert_eq!(list.render().matches(BOUNDARY_DELIMITER).count(), 3);
    assert_eq!(list.render().matches("--P25 ISSI body boundary--").count(), 1);
    assert_eq!(
        list.content_type().map(|ct| ct.to_string()).as_deref(),
        Some("multipart/mixed;boundary=\"P25 ISSI body boundary\"")
    );
}

/// 解析自身渲染的多部分报文得到等价列表。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_multipart_parses_back() -> anyhow::Result<()> {
    let mut list = ContentList::new();
    list.add(issi_offer());
    list.add(RegisterParamPart::new().with_confirm(true));
    list.add(UserProfilePart::parse("u-upri:5\r\nu-sec:1\r\n")?);

    let header = list
        .content_type()
        .map(|ct| ct.to_string())
        .ok_or_else(|| anyhow::anyhow!("three parts must produce a content type"))?;
    let parsed = ContentList::parse_header(&header, list.render().as_bytes())?;

    let kinds: Vec<PartKind> = parsed.iter().map(ContentPart::kind).collect();
    anyhow::ensure!(
        kinds == [PartKind::Sdp, PartKind::RegisterParam, PartKind::UserProfile],
        "unexpected part order {kinds:?}"
    );
    anyhow::ensure!(parsed.render() == list.render(), "re-render differs");
    Ok(())
}

/// 同种类添加即替换，部分保持 `(type, subtype)` 稳定排序。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_add_replaces_and_sorts() {
    let mut list = ContentList::empty();
    list.add(GroupProfilePart::parse("g-pri:4").expect("group profile"));
    list.add(UserProfilePart::parse("u-sec:1").expect("user profile"));
    list.add(issi_offer());
    let replaced = list.add(CallParamPart::new().with_protected_mode(true));
    assert!(replaced.is_none());

    let replaced = list.add(CallParamPart::new().with_protected_mode(false));
    assert!(matches!(replaced, Some(ContentPart::CallParam(_))));

    let kinds: Vec<PartKind> = list.iter().map(ContentPart::kind).collect();
    assert_eq!(
        kinds,
        [
            PartKind::Sdp,
            PartKind::GroupProfile,
            PartKind::UserProfile,
            PartKind::CallParam,
        ]
    );
    assert_eq!(list.len(), 4);
    assert_eq!(
        list.call_param().map(CallParamPart::protected_mode),
        Some(false)
    );
}

/// 空白正文得到空列表。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_blank_body_decodes_empty() -> anyhow::Result<()> {
    let parsed = ContentList::parse_header("application/x-tia-p25-issi", b" \r\n")?;
    anyhow::ensure!(parsed.is_empty(), "blank body produced {} parts", parsed.len());
    Ok(())
}

/// 畸形输入以具体的 [`FormatError`] 变体失败。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_malformed_bodies_are_rejected() {
    let issi = "application/x-tia-p25-issi";
    assert!(matches!(
        ContentList::parse_header(issi, b"c-bogus:1\r\n"),
        Err(FormatError::UnknownAttribute { .. })
    ));
    assert!(matches!(
        ContentList::parse_header(issi, b"r-force:yes\r\n"),
        Err(FormatError::InvalidBoolean { name: "r-force", .. })
    ));
    assert!(matches!(
        ContentList::parse_header(issi, b"c-duplex:1\r\nr-force:1\r\n"),
        Err(FormatError::WrongBlock { name: "r-force", .. })
    ));
    assert!(matches!(
        ContentList::parse_header(issi, b"x-unknown:1\r\n"),
        Err(FormatError::UnrecognizedBody { .. })
    ));
    assert!(matches!(
        ContentList::parse_header("text/plain", b"hello"),
        Err(FormatError::UnsupportedContentType { .. })
    ));
    assert!(matches!(
        ContentList::parse_header(issi, &[0x63, 0x2d, 0xff]),
        Err(FormatError::NonUtf8Body { valid_up_to: 2 })
    ));
}
