//! # matcher 模块
//!
//! ## 教案目的（Why）
//! - 一致性测试要回答的问题是：捕获到的报文是否满足参考模板中每一个有意义的属性。
//!   这是单向比较，捕获侧多出的部分或字段不影响结论。
//!
//! ## 交互契约（What）
//! - 参考侧的呼叫参数/注册参数若本身是默认值，且捕获侧完全没有该种类的部分，则视为“不关心”跳过；
//! - 渲染结果为空白的参考部分同样跳过；
//! - 其余每个参考部分都必须在捕获侧找到同种类、且满足本类比对规则的部分；
//! - 不匹配是正常结果，以 [`Verdict::Mismatch`] 返回第一个未满足的参考部分，而不是错误。

use tracing::{debug, warn};

use crate::config::{MatcherConfig, ProfilePolicy};
use crate::list::ContentList;
use crate::part::{ContentPart, PartKind};

/// 比对结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'r> {
    /// 捕获侧满足参考侧。
    Conformant,
    /// 第一个未被满足的参考部分。
    Mismatch {
        /// 参考列表中的部分。
        unmatched: &'r ContentPart,
    },
}

impl<'r> Verdict<'r> {
    /// 是否一致。
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        matches!(self, Self::Conformant)
    }

    /// 未满足的参考部分。
    #[must_use]
    pub fn unmatched(&self) -> Option<&'r ContentPart> {
        match *self {
            Self::Conformant => None,
            Self::Mismatch { unmatched } => Some(unmatched),
        }
    }
}

/// 单向结构比对器。
///
/// # 教案式说明
/// - **意图 (Why)**：把“不关心”排除、空白跳过与按种类查找集中在一处，
///   各部分只负责自身的比对规则。
/// - **契约 (What)**：无内部状态，可在线程间共享；比对过程不修改两侧列表。
/// - **权衡 (Trade-offs)**：档案的比对策略由 [`MatcherConfig`] 决定，默认宽松以保持既有行为。
#[derive(Debug, Clone, Default)]
pub struct ConformanceMatcher {
    config: MatcherConfig,
}

impl ConformanceMatcher {
    /// 以给定配置构造。
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// 当前配置。
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// 以 `reference` 为模板校验 `captured`。
    pub fn verify<'r>(&self, reference: &'r ContentList, captured: &ContentList) -> Verdict<'r> {
        for part in reference {
            let kind = part.kind();
            if is_dont_care(part, captured) {
                debug!(%kind, "default reference part absent from capture, skipped");
                continue;
            }
            if part.render().trim().is_empty() {
                debug!(%kind, "reference part renders blank, skipped");
                continue;
            }
            let satisfied = captured
                .iter()
                .filter(|candidate| candidate.kind() == kind)
                .any(|candidate| self.part_matches(part, candidate));
            if !satisfied {
                warn!(%kind, "reference part not satisfied by captured body");
                return Verdict::Mismatch { unmatched: part };
            }
        }
        Verdict::Conformant
    }

    fn part_matches(&self, reference: &ContentPart, candidate: &ContentPart) -> bool {
        match (reference, candidate) {
            (ContentPart::UserProfile(own), ContentPart::UserProfile(other))
                if self.config.user_profile_policy == ProfilePolicy::Strict =>
            {
                own.document().is_satisfied_by(other.document())
            }
            (ContentPart::GroupProfile(own), ContentPart::GroupProfile(other))
                if self.config.group_profile_policy == ProfilePolicy::Strict =>
            {
                own.document().is_satisfied_by(other.document())
            }
            _ => reference.matches(candidate),
        }
    }
}

fn is_dont_care(part: &ContentPart, captured: &ContentList) -> bool {
    matches!(part.kind(), PartKind::CallParam | PartKind::RegisterParam)
        && part.is_default()
        && captured.get(part.kind()).is_none()
}

/// 以默认配置比对，只返回布尔结论。
#[must_use]
pub fn conformance_match(reference: &ContentList, captured: &ContentList) -> bool {
    ConformanceMatcher::default()
        .verify(reference, captured)
        .is_conformant()
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::attribute::{AttributeValue, Field};
    use crate::part::{CallParamPart, GroupProfilePart, RegisterParamPart, UserProfilePart};

    #[traced_test]
    #[test]
    fn explicit_reference_value_requires_a_captured_part() {
        let mut reference = ContentList::new();
        reference.add(CallParamPart::new().with_availability_check_requested(false));
        let captured = ContentList::empty();

        let verdict = ConformanceMatcher::default().verify(&reference, &captured);
        assert_eq!(
            verdict.unmatched().map(ContentPart::kind),
            Some(PartKind::CallParam)
        );
        assert!(logs_contain("reference part not satisfied"));
    }

    #[test]
    fn untouched_reference_parameters_are_dont_care() {
        let reference = ContentList::new();
        assert!(conformance_match(&reference, &ContentList::empty()));
    }

    #[test]
    fn default_reference_against_present_capture_is_compared_but_blank() {
        let reference = ContentList::new();
        let mut captured = ContentList::empty();
        captured.add(CallParamPart::new().with_availability_check_requested(false));
        assert!(conformance_match(&reference, &captured));
    }

    #[test]
    fn duplex_only_reference_is_checked_when_capture_has_parameters() {
        let mut reference = ContentList::empty();
        reference.add(CallParamPart::new().with_full_duplex_requested(true));

        assert!(conformance_match(&reference, &ContentList::empty()));

        let mut captured = ContentList::empty();
        captured.add(CallParamPart::new());
        assert!(!conformance_match(&reference, &captured));
        captured.add(CallParamPart::new().with_full_duplex_requested(true));
        assert!(conformance_match(&reference, &captured));
    }

    #[test]
    fn matching_is_asymmetric() {
        let mut reference = ContentList::empty();
        reference.add(RegisterParamPart::new().with_force(true));
        let mut captured = reference.clone();
        captured.add(GroupProfilePart::parse("g-pri:2").expect("valid"));

        assert!(conformance_match(&reference, &captured));
        assert!(!conformance_match(&captured, &reference));
    }

    #[test]
    fn profiles_are_permissive_unless_configured() {
        let reference_user = UserProfilePart::new()
            .with(Field::UserUnitToUnitCallPriority, AttributeValue::Integer(9))
            .expect("valid");
        let captured_user = UserProfilePart::new();
        let reference: ContentList = [ContentPart::from(reference_user)].into_iter().collect();
        let captured: ContentList = [ContentPart::from(captured_user)].into_iter().collect();

        assert!(ConformanceMatcher::default().verify(&reference, &captured).is_conformant());

        let strict = ConformanceMatcher::new(MatcherConfig {
            user_profile_policy: ProfilePolicy::Strict,
            ..MatcherConfig::default()
        });
        assert!(!strict.verify(&reference, &captured).is_conformant());
        assert_eq!(strict.config().user_profile_policy, ProfilePolicy::Strict);
    }

    #[test]
    fn strict_group_policy_compares_explicit_lines() {
        let reference: ContentList =
            [ContentPart::from(GroupProfilePart::parse("g-pri:2").expect("valid"))]
                .into_iter()
                .collect();
        let captured: ContentList =
            [ContentPart::from(GroupProfilePart::parse("g-pri:5").expect("valid"))]
                .into_iter()
                .collect();
        assert!(conformance_match(&reference, &captured));

        let strict = ConformanceMatcher::new(MatcherConfig {
            group_profile_policy: ProfilePolicy::Strict,
            ..MatcherConfig::default()
        });
        assert!(!strict.verify(&reference, &captured).is_conformant());
    }

    #[test]
    fn missing_kind_is_a_mismatch_even_for_permissive_profiles() {
        let reference: ContentList = [ContentPart::from(GroupProfilePart::new())]
            .into_iter()
            .collect();
        let captured: ContentList = [ContentPart::from(RegisterParamPart::new().with_force(true))]
            .into_iter()
            .collect();
        // 空档案渲染为空白，被跳过。
        assert!(conformance_match(&reference, &captured));

        let reference: ContentList =
            [ContentPart::from(GroupProfilePart::parse("g-ic:1").expect("valid"))]
                .into_iter()
                .collect();
        assert!(!conformance_match(&reference, &captured));
    }
}
