//! 服务档案字段契约。
//!
//! ## 设计意图（Why）
//! - 档案是对端最容易写出差异的部分：缩写名、大小写、十六进制宽度与缺省值都必须有确定的解释；
//! - 断言覆盖名称解析、规范渲染、缺省值与鉴权参数三元组。

use issi_codec_body::{
    AttributeValue, AuthParams, Block, Field, FormatError, GroupProfilePart, ProfileDocument,
    Registry, UserProfilePart,
};

/// 组档案样例按声明顺序规范渲染。
///
/// # 教案式说明
/// - **流程（How）**：乱序输入、大小写混合的名称，解析后重新渲染；
/// - **契约（What）**：输出按字段声明顺序、使用规范名，十六进制保留收到的记号。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_group_profile_canonical_render() -> anyhow::Result<()> {
    let part = GroupProfilePart::parse(
        "g-pri:2\r\nG-AGROUP:b4561a27271\r\ng-access:1\r\ng-rfhangT:2\r\ng-ic:1\r\n",
    )?;
    anyhow::ensure!(
        part.render() == "g-access:1\r\ng-agroup:b4561a27271\r\ng-pri:2\r\ng-rfhangt:2\r\ng-ic:1\r\n",
        "unexpected canonical render: {}",
        part.render()
    );
    anyhow::ensure!(part.announcement_group() == 0x0B_4561_A272_71, "agroup value");
    Ok(())
}

/// 缩写名与全名解析到同一字段，渲染总是输出全名。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_aliases_resolve_to_canonical_names() {
    let registry = Registry::global();
    assert_eq!(registry.lookup("u-p"), Some(Field::UserUnitToUnitCallPriority));
    assert_eq!(registry.lookup("U-UPRI"), Some(Field::UserUnitToUnitCallPriority));
    assert_eq!(registry.lookup("g-ccsetupt"), Some(Field::GroupConfirmedCallSetupTime));
    assert_eq!(registry.lookup("c-ctxrp"), Some(Field::CallConsolePriority));
    assert_eq!(registry.lookup("z-none"), None);

    let part = UserProfilePart::parse("u-as:2\r\nu-p:7\r\n").expect("aliases parse");
    assert_eq!(part.access_permission(), 2);
    assert_eq!(part.unit_to_unit_priority(), 7);
    assert_eq!(part.render(), "u-access:2\r\nu-upri:7\r\n");
}

/// 未设置的字段读取为协议缺省值，且不被渲染。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_defaults_are_implicit() {
    let group = GroupProfilePart::new();
    assert!(group.access_permission());
    assert_eq!(group.priority(), 3);
    assert_eq!(group.rf_hang_time(), 0);
    assert_eq!(group.announcement_group(), 0);
    assert_eq!(group.render(), "");

    let user = UserProfilePart::new();
    assert_eq!(user.access_permission(), 1);
    assert_eq!(user.unit_to_unit_priority(), 3);
    assert!(!user.secure_capable());
    assert_eq!(
        user.document().label(Field::UserAccessPermission),
        Some("Full")
    );
    assert_eq!(user.document().value(Field::UserAuthenticationParameters), None);
}

/// 越界、非法记号与跨块字段都被拒绝。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_invalid_profile_lines_are_rejected() {
    assert!(matches!(
        UserProfilePart::parse("u-upri:11"),
        Err(FormatError::OutOfRange { name: "u-upri", .. })
    ));
    assert!(matches!(
        GroupProfilePart::parse("g-agroup:0x12"),
        Err(FormatError::InvalidHex { .. })
    ));
    assert!(matches!(
        UserProfilePart::parse("u-sec:yes"),
        Err(FormatError::InvalidBoolean { .. })
    ));
    assert!(matches!(
        ProfileDocument::parse(Block::UserProfile, "g-pri:2"),
        Err(FormatError::WrongBlock { name: "g-pri", block: Block::UserProfile })
    ));
    assert!(matches!(
        UserProfilePart::parse("u-upri"),
        Err(FormatError::MalformedLine { .. })
    ));
}

/// 鉴权参数以三组十六进制字节往返。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_authentication_parameters() -> anyhow::Result<()> {
    let token = "01 02 03 04 05 06 07 08 09 0a,\
                 10 11 12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f,\
                 aa bb";
    let part = UserProfilePart::parse(&format!("u-authparam:{token}\r\n"))?;
    let Some(AttributeValue::AuthParams(params)) =
        part.document().value(Field::UserAuthenticationParameters)
    else {
        anyhow::bail!("authentication parameters missing");
    };
    anyhow::ensure!(params.random_seed()[9] == 0x0A, "seed tail");
    anyhow::ensure!(params.key()[0] == 0x10, "key head");
    anyhow::ensure!(params.expanded_key() == [0xAA, 0xBB], "expanded key");
    anyhow::ensure!(
        part.render()
            == "u-authparam:01 02 03 04 05 06 07 08 09 0A,\
                10 11 12 13 14 15 16 17 18 19 1A 1B 1C 1D 1E 1F,AA BB\r\n",
        "authentication parameters render upper case"
    );

    anyhow::ensure!(
        AuthParams::parse("01,02,03").is_err(),
        "short seed must be rejected"
    );
    Ok(())
}
