//! 字段目录：每个逻辑字段的规范名、缩写、所属块与值类型。
//!
//! ## 设计意图（Why）
//! - 以封闭枚举 [`Field`] 取代按名称反射构造，编译器保证目录穷尽；
//! - `Field` 的声明顺序即序列化顺序，派生的 `Ord` 直接驱动档案文档的稳定输出。
//!
//! ## 契约（What）
//! - [`Field::spec`] 对每个字段返回唯一的 [`FieldSpec`]；规范名与缩写在全目录内互不冲突；
//! - 枚举型字段的取值表以 [`Choice`] 描述，`token` 为线上记号，`label` 仅用于诊断。

use core::fmt;

/// 属性行所属的块。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// 用户服务档案（`u-` 前缀）。
    UserProfile,
    /// 组服务档案（`g-` 前缀）。
    GroupProfile,
    /// 呼叫参数（`c-` 前缀）。
    CallParam,
    /// 注册参数（`r-` 前缀）。
    RegisterParam,
}

impl Block {
    /// 块内属性名共同的两字符前缀。
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::UserProfile => "u-",
            Self::GroupProfile => "g-",
            Self::CallParam => "c-",
            Self::RegisterParam => "r-",
        }
    }

    /// 按负载前缀识别块，大小写不敏感。
    #[must_use]
    pub fn from_body_prefix(body: &str) -> Option<Self> {
        let head = body.get(..2)?;
        [
            Self::UserProfile,
            Self::GroupProfile,
            Self::CallParam,
            Self::RegisterParam,
        ]
        .into_iter()
        .find(|block| head.eq_ignore_ascii_case(block.prefix()))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserProfile => "user service profile",
            Self::GroupProfile => "group service profile",
            Self::CallParam => "call parameter block",
            Self::RegisterParam => "register parameter block",
        })
    }
}

/// 枚举型字段的一个取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// 内部编码。
    pub code: u8,
    /// 线上记号。
    pub token: &'static str,
    /// 诊断标签。
    pub label: &'static str,
}

const fn choice(code: u8, token: &'static str, label: &'static str) -> Choice {
    Choice { code, token, label }
}

/// 系统接入许可。
pub const ACCESS_PERMISSION: &[Choice] = &[
    choice(0, "0", "None"),
    choice(1, "1", "Full"),
    choice(2, "2", "Emergency"),
];
/// 单工/双工。
pub const DUPLEXITY: &[Choice] = &[choice(0, "0", "Half"), choice(1, "1", "Full")];
/// 组呼许可。
pub const GROUP_CALL_PERMISSION: &[Choice] = &[
    choice(0, "0", "None"),
    choice(1, "1", "NonEmergency"),
    choice(2, "2", "Emergency"),
    choice(3, "3", "EmergencyAndNonEmergency"),
];
/// 单呼与互联呼叫许可。
pub const CALL_PERMISSION: &[Choice] = &[
    choice(0, "0", "None"),
    choice(1, "1", "Receive"),
    choice(2, "2", "Initiate"),
    choice(3, "3", "ReceiveAndInitiate"),
];
/// 加密等级。
pub const SECURITY_LEVEL: &[Choice] = &[
    choice(1, "1", "ClearOnly"),
    choice(2, "2", "SecureOnly"),
    choice(3, "3", "ClearAndSecure"),
];
/// 鉴权类型。
pub const AUTHENTICATION_TYPE: &[Choice] =
    &[choice(0, "0", "None"), choice(1, "1", "LinkLayer")];
/// 鉴权策略。
pub const AUTHENTICATION_POLICY: &[Choice] = &[
    choice(0, "0", "None"),
    choice(1, "1", "RequiredWhenHomeReachable"),
    choice(2, "2", "RejectIfNotCurrent"),
];
/// 可用性检查能力。
pub const AVAILABILITY_CHECK: &[Choice] = &[
    choice(1, "1", "AvailabilityCheckOnly"),
    choice(2, "2", "DirectCallOnly"),
    choice(3, "3", "AvailabilityCheckAndDirectCall"),
];
/// 呼叫建立偏好。
pub const CALL_SETUP_PREFERENCE: &[Choice] = &[
    choice(0, "0", "PrefersAvailabilityCheck"),
    choice(1, "1", "PrefersDirectCall"),
];
/// 遥毙状态。
pub const RADIO_INHIBIT: &[Choice] = &[
    choice(0, "0", "NotInhibited"),
    choice(1, "1", "Inhibited"),
];
/// 话音打断模式。
pub const INTERRUPT_MODE: &[Choice] = &[
    choice(0, "0", "NeverAllowed"),
    choice(1, "1", "PriorityBased"),
    choice(2, "2", "AlwaysAllowed"),
];
/// 调度台发射请求优先级，线上以十六进制字节编码。
pub const CONSOLE_PRIORITY: &[Choice] = &[
    choice(0, "10", "Priority1"),
    choice(1, "30", "Priority2"),
    choice(2, "50", "Priority3"),
    choice(3, "70", "Priority4"),
    choice(4, "90", "Priority5"),
    choice(5, "B0", "Priority6"),
    choice(6, "D0", "Priority7"),
    choice(7, "F0", "Priority8"),
];

/// 字段值类型。
///
/// # 教案式说明
/// - **意图 (Why)**：每种类型自带默认值、合法记号集合与可选数值范围，解析与渲染都以此为准；
/// - **契约 (What)**：`AuthParams` 没有默认值，缺省即“不存在”。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `0`/`1` 布尔。
    Flag {
        /// 默认值。
        default: bool,
    },
    /// 有界十进制整数。
    Integer {
        /// 默认值。
        default: u32,
        /// 下界（含）。
        min: u32,
        /// 上界（含）。
        max: u32,
    },
    /// 枚举。
    Choice {
        /// 默认编码。
        default: u8,
        /// 取值表。
        options: &'static [Choice],
    },
    /// 无前缀十六进制。
    Hex {
        /// 默认值。
        default: u64,
        /// 最大位数，同时是渲染宽度。
        digits: usize,
    },
    /// 鉴权参数三元组。
    AuthParams,
}

/// 单个字段的目录项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// 规范名。
    pub name: &'static str,
    /// 缩写名。
    pub alias: Option<&'static str>,
    /// 所属块。
    pub block: Block,
    /// 值类型。
    pub kind: FieldKind,
}

const fn spec(
    name: &'static str,
    alias: Option<&'static str>,
    block: Block,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        name,
        alias,
        block,
        kind,
    }
}

const fn flag(default: bool) -> FieldKind {
    FieldKind::Flag { default }
}

const fn integer(default: u32, min: u32, max: u32) -> FieldKind {
    FieldKind::Integer { default, min, max }
}

const fn pick(default: u8, options: &'static [Choice]) -> FieldKind {
    FieldKind::Choice { default, options }
}

/// 全部逻辑字段，按块分组、块内按线上声明顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// `u-access`
    UserAccessPermission,
    /// `u-dup`
    UserDuplexity,
    /// `u-sec`
    UserSecureCapable,
    /// `u-gcall`
    UserGroupCallPermission,
    /// `u-ucall`
    UserUnitToUnitCallPermission,
    /// `u-upri`
    UserUnitToUnitCallPriority,
    /// `u-iccall`
    UserInterconnectPermission,
    /// `u-icsec`
    UserInterconnectSecurity,
    /// `u-icpri`
    UserInterconnectCallPriority,
    /// `u-authtype`
    UserAuthenticationType,
    /// `u-authparam`
    UserAuthenticationParameters,
    /// `u-authpol`
    UserAuthenticationPolicy,
    /// `u-availcheck`
    UserAvailabilityCheck,
    /// `u-prefsetup`
    UserCallSetupPreference,
    /// `u-radioinhib`
    UserRadioInhibit,
    /// `g-access`
    GroupAccessPermission,
    /// `g-agroup`
    GroupAnnouncementGroup,
    /// `g-pri`
    GroupPriority,
    /// `g-ecap`
    GroupEmergencyCapable,
    /// `g-eprempt`
    GroupEmergencyPreemption,
    /// `g-rfhangt`
    GroupRfHangTime,
    /// `g-ccsetupT`
    GroupConfirmedCallSetupTime,
    /// `g-intmode`
    GroupInterruptMode,
    /// `g-sec`
    GroupSecurityLevel,
    /// `g-ic`
    GroupInterconnect,
    /// `g-icsecstart`
    GroupInterconnectSecureStart,
    /// `c-initrans`
    CallInitialTransmitter,
    /// `c-resavail`
    CallRfResourceAvailable,
    /// `c-pref`
    CallAvailabilityCheckRequested,
    /// `c-duplex`
    CallFullDuplexRequested,
    /// `c-incallroaming`
    CallInCallRoaming,
    /// `c-groupcalltype`
    CallConfirmedGroupCall,
    /// `c-protected`
    CallProtectedMode,
    /// `c-consoletransmitrequestpriority`
    CallConsolePriority,
    /// `r-force`
    RegisterForce,
    /// `r-confirm`
    RegisterConfirm,
    /// `r-presence`
    RegisterPresence,
}

impl Field {
    /// 目录中的全部字段，顺序与声明一致。
    pub const ALL: [Field; 37] = [
        Self::UserAccessPermission,
        Self::UserDuplexity,
        Self::UserSecureCapable,
        Self::UserGroupCallPermission,
        Self::UserUnitToUnitCallPermission,
        Self::UserUnitToUnitCallPriority,
        Self::UserInterconnectPermission,
        Self::UserInterconnectSecurity,
        Self::UserInterconnectCallPriority,
        Self::UserAuthenticationType,
        Self::UserAuthenticationParameters,
        Self::UserAuthenticationPolicy,
        Self::UserAvailabilityCheck,
        Self::UserCallSetupPreference,
        Self::UserRadioInhibit,
        Self::GroupAccessPermission,
        Self::GroupAnnouncementGroup,
        Self::GroupPriority,
        Self::GroupEmergencyCapable,
        Self::GroupEmergencyPreemption,
        Self::GroupRfHangTime,
        Self::GroupConfirmedCallSetupTime,
        Self::GroupInterruptMode,
        Self::GroupSecurityLevel,
        Self::GroupInterconnect,
        Self::GroupInterconnectSecureStart,
        Self::CallInitialTransmitter,
        Self::CallRfResourceAvailable,
        Self::CallAvailabilityCheckRequested,
        Self::CallFullDuplexRequested,
        Self::CallInCallRoaming,
        Self::CallConfirmedGroupCall,
        Self::CallProtectedMode,
        Self::CallConsolePriority,
        Self::RegisterForce,
        Self::RegisterConfirm,
        Self::RegisterPresence,
    ];

    /// 目录项。
    #[must_use]
    pub const fn spec(self) -> FieldSpec {
        use Block::{CallParam, GroupProfile, RegisterParam, UserProfile};

        match self {
            Self::UserAccessPermission => {
                spec("u-access", Some("u-as"), UserProfile, pick(1, ACCESS_PERMISSION))
            }
            Self::UserDuplexity => spec("u-dup", Some("u-d"), UserProfile, pick(0, DUPLEXITY)),
            Self::UserSecureCapable => spec("u-sec", Some("u-s"), UserProfile, flag(false)),
            Self::UserGroupCallPermission => spec(
                "u-gcall",
                Some("u-g"),
                UserProfile,
                pick(3, GROUP_CALL_PERMISSION),
            ),
            Self::UserUnitToUnitCallPermission => {
                spec("u-ucall", Some("u-uc"), UserProfile, pick(0, CALL_PERMISSION))
            }
            Self::UserUnitToUnitCallPriority => {
                spec("u-upri", Some("u-p"), UserProfile, integer(3, 1, 10))
            }
            Self::UserInterconnectPermission => {
                spec("u-iccall", Some("u-icc"), UserProfile, pick(0, CALL_PERMISSION))
            }
            Self::UserInterconnectSecurity => {
                spec("u-icsec", Some("u-ics"), UserProfile, pick(3, SECURITY_LEVEL))
            }
            Self::UserInterconnectCallPriority => {
                spec("u-icpri", Some("u-icp"), UserProfile, integer(3, 1, 10))
            }
            Self::UserAuthenticationType => spec(
                "u-authtype",
                Some("u-at"),
                UserProfile,
                pick(0, AUTHENTICATION_TYPE),
            ),
            Self::UserAuthenticationParameters => {
                spec("u-authparam", Some("u-apa"), UserProfile, FieldKind::AuthParams)
            }
            Self::UserAuthenticationPolicy => spec(
                "u-authpol",
                Some("u-apo"),
                UserProfile,
                pick(0, AUTHENTICATION_POLICY),
            ),
            Self::UserAvailabilityCheck => spec(
                "u-availcheck",
                Some("u-ac"),
                UserProfile,
                pick(3, AVAILABILITY_CHECK),
            ),
            Self::UserCallSetupPreference => spec(
                "u-prefsetup",
                Some("u-prf"),
                UserProfile,
                pick(0, CALL_SETUP_PREFERENCE),
            ),
            Self::UserRadioInhibit => spec(
                "u-radioinhib",
                Some("u-rdinh"),
                UserProfile,
                pick(0, RADIO_INHIBIT),
            ),
            Self::GroupAccessPermission => spec("g-access", Some("g-as"), GroupProfile, flag(true)),
            Self::GroupAnnouncementGroup => spec(
                "g-agroup",
                Some("g-ag"),
                GroupProfile,
                FieldKind::Hex {
                    default: 0,
                    digits: 12,
                },
            ),
            Self::GroupPriority => spec("g-pri", Some("g-p"), GroupProfile, integer(3, 1, 10)),
            Self::GroupEmergencyCapable => spec("g-ecap", Some("g-ec"), GroupProfile, flag(true)),
            Self::GroupEmergencyPreemption => {
                spec("g-eprempt", Some("g-ep"), GroupProfile, flag(false))
            }
            Self::GroupRfHangTime => {
                spec("g-rfhangt", Some("g-h"), GroupProfile, integer(0, 0, 32_766))
            }
            Self::GroupConfirmedCallSetupTime => {
                spec("g-ccsetupT", Some("g-c"), GroupProfile, integer(0, 0, 32_766))
            }
            Self::GroupInterruptMode => {
                spec("g-intmode", Some("g-in"), GroupProfile, pick(0, INTERRUPT_MODE))
            }
            Self::GroupSecurityLevel => {
                spec("g-sec", Some("g-s"), GroupProfile, pick(3, SECURITY_LEVEL))
            }
            Self::GroupInterconnect => spec("g-ic", None, GroupProfile, flag(false)),
            Self::GroupInterconnectSecureStart => {
                spec("g-icsecstart", Some("g-ics"), GroupProfile, flag(false))
            }
            // 默认值仅用于记号校验；未出现即为 None。
            Self::CallInitialTransmitter => spec("c-initrans", Some("c-i"), CallParam, flag(false)),
            Self::CallRfResourceAvailable => spec("c-resavail", Some("c-r"), CallParam, flag(false)),
            Self::CallAvailabilityCheckRequested => {
                spec("c-pref", Some("c-prf"), CallParam, flag(true))
            }
            Self::CallFullDuplexRequested => spec("c-duplex", Some("c-d"), CallParam, flag(false)),
            Self::CallInCallRoaming => {
                spec("c-incallroaming", Some("c-icr"), CallParam, flag(false))
            }
            Self::CallConfirmedGroupCall => {
                spec("c-groupcalltype", Some("c-gct"), CallParam, flag(false))
            }
            Self::CallProtectedMode => spec("c-protected", Some("c-p"), CallParam, flag(false)),
            Self::CallConsolePriority => spec(
                "c-consoletransmitrequestpriority",
                Some("c-ctxrp"),
                CallParam,
                pick(1, CONSOLE_PRIORITY),
            ),
            Self::RegisterForce => spec("r-force", Some("r-f"), RegisterParam, flag(false)),
            Self::RegisterConfirm => spec("r-confirm", Some("r-c"), RegisterParam, flag(false)),
            Self::RegisterPresence => spec("r-presence", Some("r-p"), RegisterParam, flag(false)),
        }
    }

    /// 规范名。
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// 所属块。
    #[must_use]
    pub const fn block(self) -> Block {
        self.spec().block
    }

    /// 值类型。
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        self.spec().kind
    }

    /// 某一块内的字段，保持声明顺序。
    pub fn in_block(block: Block) -> impl Iterator<Item = Field> {
        Self::ALL.into_iter().filter(move |field| field.block() == block)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
