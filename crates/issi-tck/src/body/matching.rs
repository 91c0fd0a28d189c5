//! 单向一致性比对契约。
//!
//! ## 设计意图（Why）
//! - 一致性测试以参考模板校验被测实现发出的报文；比对方向、“不关心”规则与各部分的比对粒度
//!   决定了测试结论，必须被固定下来。
//!
//! ## 结构安排（How）
//! - 每个断言构造一对参考/捕获列表，并同时检查布尔结论与 [`Verdict`] 指出的未满足部分。

use issi_codec_body::{
    CallParamPart, ConformanceMatcher, ConsolePriority, ContentList, ContentPart,
    GroupProfilePart, InitialTransmitter, MatcherConfig, PartKind, ProfilePolicy,
    RegisterParamPart, SdpPart, UserProfilePart, Verdict, conformance_match,
};

use super::{ISSI_OFFER, issi_offer};

fn list_of(parts: impl IntoIterator<Item = ContentPart>) -> ContentList {
    parts.into_iter().collect()
}

/// 列表与自身的解析结果一致。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_self_conformance() -> anyhow::Result<()> {
    let mut list = ContentList::new();
    list.add(issi_offer());
    list.add(
        CallParamPart::new()
            .with_initial_transmitter(InitialTransmitter::CalledSu)
            .with_console_priority(ConsolePriority::new(4).unwrap_or_default()),
    );
    list.add(GroupProfilePart::parse("g-access:1\r\ng-agroup:0B4561A27271\r\n")?);

    let header = list
        .content_type()
        .map(|ct| ct.to_string())
        .ok_or_else(|| anyhow::anyhow!("list must render a content type"))?;
    let captured = ContentList::parse_header(&header, list.render().as_bytes())?;
    anyhow::ensure!(conformance_match(&list, &captured), "list does not match its decoding");
    Ok(())
}

/// 默认参数在捕获侧缺失时视为不关心；捕获侧多出的部分不影响结论。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_dont_care_and_extra_parts() {
    let mut reference = ContentList::new();
    reference.add(issi_offer());

    let mut captured = ContentList::empty();
    captured.add(issi_offer());
    captured.add(UserProfilePart::parse("u-upri:9").expect("user profile"));

    assert!(conformance_match(&reference, &captured));
    assert!(!conformance_match(&captured, &reference));
}

/// 参考侧的显式参数要求捕获侧存在同种类且取值一致的部分。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_explicit_parameters_are_enforced() {
    let reference = list_of([RegisterParamPart::new().with_presence(true).into()]);

    let verdict = ConformanceMatcher::default().verify(&reference, &ContentList::empty());
    assert_eq!(
        verdict.unmatched().map(ContentPart::kind),
        Some(PartKind::RegisterParam)
    );

    let wrong = list_of([RegisterParamPart::new().with_force(true).into()]);
    assert!(!conformance_match(&reference, &wrong));

    let right = list_of([RegisterParamPart::new()
        .with_presence(true)
        .with_force(false)
        .into()]);
    assert_eq!(
        ConformanceMatcher::default().verify(&reference, &right),
        Verdict::Conformant
    );
}

/// 初始发射方只比较是否出现，不比较取值。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_initial_transmitter_presence_only() {
    let reference = list_of([CallParamPart::new()
        .with_initial_transmitter(InitialTransmitter::CallingSu)
        .into()]);
    let called = list_of([CallParamPart::new()
        .with_initial_transmitter(InitialTransmitter::CalledSu)
        .into()]);
    let absent = list_of([CallParamPart::new().with_rf_resource_available(false).into()]);

    assert!(conformance_match(&reference, &called));
    assert!(!conformance_match(&reference, &absent));
}

/// SDP 比对忽略端口，但要求首个媒体属性取值一致。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_sdp_compares_first_media_attribute() -> anyhow::Result<()> {
    let reference = list_of([issi_offer().into()]);
    let moved = SdpPart::parse(&ISSI_OFFER.replace("25000", "30000"))?;
    let recoded = SdpPart::parse(&ISSI_OFFER.replace("IMBE", "AMBE"))?;

    anyhow::ensure!(
        conformance_match(&reference, &list_of([moved.into()])),
        "port change must not affect conformance"
    );
    anyhow::ensure!(
        !conformance_match(&reference, &list_of([recoded.into()])),
        "codec change must break conformance"
    );
    Ok(())
}

/// 档案默认宽松比对，严格策略下参考侧的显式行必须出现在捕获侧。
#[cfg_attr(not(test), allow(dead_code))]
pub fn assert_profile_policies() -> anyhow::Result<()> {
    let reference = list_of([
        UserProfilePart::parse("u-upri:9\r\n")?.into(),
        GroupProfilePart::parse("g-rfhangt:200\r\n")?.into(),
    ]);
    let captured = list_of([
        UserProfilePart::parse("u-upri:9\r\nu-sec:1\r\n")?.into(),
        GroupProfilePart::parse("g-rfhangt:100\r\n")?.into(),
    ]);

    anyhow::ensure!(conformance_match(&reference, &captured), "permissive by default");

    let strict_user = ConformanceMatcher::new(MatcherConfig {
        user_profile_policy: ProfilePolicy::Strict,
        ..MatcherConfig::default()
    });
    anyhow::ensure!(
        strict_user.verify(&reference, &captured).is_conformant(),
        "user lines agree"
    );

    let strict_group = ConformanceMatcher::new(MatcherConfig {
        group_profile_policy: ProfilePolicy::Strict,
        ..MatcherConfig::default()
    });
    let verdict = strict_group.verify(&reference, &captured);
    anyhow::ensure!(
        verdict.unmatched().map(ContentPart::kind) == Some(PartKind::GroupProfile),
        "strict group policy must flag the hang time"
    );
    Ok(())
}
