//! 属性值的类型化表示以及线上记号的解析与渲染。

use core::fmt;

use super::field::{Field, FieldKind};
use crate::error::{FormatError, Result};

/// 类型化属性值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// 布尔值。
    Flag(bool),
    /// 十进制整数。
    Integer(u32),
    /// 枚举编码。
    Choice(u8),
    /// 十六进制数值。
    Hex(u64),
    /// 鉴权参数。
    AuthParams(AuthParams),
}

/// 用户鉴权参数：随机种子、密钥与扩展密钥三组十六进制字节。
///
/// 线上形式为三组以逗号分隔、组内以空格分隔的字节，例如
/// `01 02 .. 0A,11 .. 20,AA BB`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    random_seed: [u8; AuthParams::SEED_LEN],
    key: [u8; AuthParams::KEY_LEN],
    expanded_key: Vec<u8>,
}

impl AuthParams {
    /// 随机种子长度（字节）。
    pub const SEED_LEN: usize = 10;
    /// 密钥长度（字节）。
    pub const KEY_LEN: usize = 16;

    /// 以内存值构造；扩展密钥为空时返回 `None`。
    #[must_use]
    pub fn new(
        random_seed: [u8; Self::SEED_LEN],
        key: [u8; Self::KEY_LEN],
        expanded_key: Vec<u8>,
    ) -> Option<Self> {
        (!expanded_key.is_empty()).then_some(Self {
            random_seed,
            key,
            expanded_key,
        })
    }

    /// 解析线上记号。
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = |reason| FormatError::InvalidAuthParams {
            token: token.to_owned(),
            reason,
        };
        let groups: Vec<&str> = token.split(',').collect();
        let [seed, key, expanded] = groups.as_slice() else {
            return Err(invalid("expected three comma separated groups"));
        };
        let seed = parse_octets(seed).ok_or_else(|| invalid("random seed is not hex octets"))?;
        let key = parse_octets(key).ok_or_else(|| invalid("key is not hex octets"))?;
        let expanded_key =
            parse_octets(expanded).ok_or_else(|| invalid("expanded key is not hex octets"))?;

        let random_seed: [u8; Self::SEED_LEN] = seed
            .try_into()
            .map_err(|_| invalid("random seed must hold 10 octets"))?;
        let key: [u8; Self::KEY_LEN] = key
            .try_into()
            .map_err(|_| invalid("key must hold 16 octets"))?;
        if expanded_key.is_empty() {
            return Err(invalid("expanded key must not be empty"));
        }
        Ok(Self {
            random_seed,
            key,
            expanded_key,
        })
    }

    /// 随机种子。
    #[must_use]
    pub fn random_seed(&self) -> &[u8; Self::SEED_LEN] {
        &self.random_seed
    }

    /// 密钥。
    #[must_use]
    pub fn key(&self) -> &[u8; Self::KEY_LEN] {
        &self.key
    }

    /// 扩展密钥。
    #[must_use]
    pub fn expanded_key(&self) -> &[u8] {
        &self.expanded_key
    }
}

fn parse_octets(group: &str) -> Option<Vec<u8>> {
    group
        .split_whitespace()
        .map(|octet| {
            if octet.len() > 2 {
                return None;
            }
            u8::from_str_radix(octet, 16).ok()
        })
        .collect()
}

fn write_octets(f: &mut fmt::Formatter<'_>, octets: &[u8]) -> fmt::Result {
    for (index, octet) in octets.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{octet:02X}")?;
    }
    Ok(())
}

impl fmt::Display for AuthParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_octets(f, &self.random_seed)?;
        f.write_str(",")?;
        write_octets(f, &self.key)?;
        f.write_str(",")?;
        write_octets(f, &self.expanded_key)
    }
}

impl FieldKind {
    /// 类型默认值；鉴权参数没有默认值。
    #[must_use]
    pub fn default_value(self) -> Option<AttributeValue> {
        match self {
            Self::Flag { default } => Some(AttributeValue::Flag(default)),
            Self::Integer { default, .. } => Some(AttributeValue::Integer(default)),
            Self::Choice { default, .. } => Some(AttributeValue::Choice(default)),
            Self::Hex { default, .. } => Some(AttributeValue::Hex(default)),
            Self::AuthParams => None,
        }
    }
}

/// 依据字段类型解析线上记号。
pub(crate) fn parse_token(field: Field, token: &str) -> Result<AttributeValue> {
    let name = field.name();
    match field.kind() {
        FieldKind::Flag { .. } => parse_flag(name, token).map(AttributeValue::Flag),
        FieldKind::Integer { min, max, .. } => {
            let value: i64 = token
                .parse()
                .map_err(|_| FormatError::InvalidInteger {
                    name,
                    token: token.to_owned(),
                })?;
            if value < i64::from(min) || value > i64::from(max) {
                return Err(FormatError::OutOfRange {
                    name,
                    value,
                    min,
                    max,
                });
            }
            u32::try_from(value)
                .map(AttributeValue::Integer)
                .map_err(|_| FormatError::InvalidInteger {
                    name,
                    token: token.to_owned(),
                })
        }
        FieldKind::Choice { options, .. } => options
            .iter()
            .find(|choice| choice.token.eq_ignore_ascii_case(token))
            .map(|choice| AttributeValue::Choice(choice.code))
            .ok_or_else(|| FormatError::InvalidChoice {
                name,
                token: token.to_owned(),
            }),
        FieldKind::Hex { digits, .. } => {
            let well_formed = !token.is_empty()
                && token.len() <= digits
                && token.bytes().all(|b| b.is_ascii_hexdigit());
            if !well_formed {
                return Err(FormatError::InvalidHex {
                    name,
                    token: token.to_owned(),
                });
            }
            u64::from_str_radix(token, 16)
                .map(AttributeValue::Hex)
                .map_err(|_| FormatError::InvalidHex {
                    name,
                    token: token.to_owned(),
                })
        }
        FieldKind::AuthParams => AuthParams::parse(token).map(AttributeValue::AuthParams),
    }
}

/// 布尔记号只接受 `0`/`1`。
pub(crate) fn parse_flag(name: &'static str, token: &str) -> Result<bool> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(FormatError::InvalidBoolean {
            name,
            token: token.to_owned(),
        }),
    }
}

/// 布尔值的线上记号。
pub(crate) const fn flag_token(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// 校验内存值与字段类型是否相容，并检查范围。
pub(crate) fn check_value(field: Field, value: &AttributeValue) -> Result<()> {
    let name = field.name();
    match (field.kind(), value) {
        (FieldKind::Flag { .. }, AttributeValue::Flag(_))
        | (FieldKind::AuthParams, AttributeValue::AuthParams(_)) => Ok(()),
        (FieldKind::Integer { min, max, .. }, AttributeValue::Integer(v)) => {
            if (min..=max).contains(v) {
                Ok(())
            } else {
                Err(FormatError::OutOfRange {
                    name,
                    value: i64::from(*v),
                    min,
                    max,
                })
            }
        }
        (FieldKind::Choice { options, .. }, AttributeValue::Choice(code)) => {
            if options.iter().any(|choice| choice.code == *code) {
                Ok(())
            } else {
                Err(FormatError::InvalidChoice {
                    name,
                    token: code.to_string(),
                })
            }
        }
        (FieldKind::Hex { digits, .. }, AttributeValue::Hex(v)) => {
            let bits = u32::try_from(digits * 4).unwrap_or(u64::BITS);
            if bits >= u64::BITS || *v >> bits == 0 {
                Ok(())
            } else {
                Err(FormatError::InvalidHex {
                    name,
                    token: format!("{v:X}"),
                })
            }
        }
        _ => Err(FormatError::ValueKindMismatch { name }),
    }
}

/// 渲染线上记号；调用方保证值已通过 [`check_value`]。
pub(crate) fn render_token(field: Field, value: &AttributeValue) -> String {
    match (field.kind(), value) {
        (_, AttributeValue::Flag(v)) => flag_token(*v).to_owned(),
        (_, AttributeValue::Integer(v)) => v.to_string(),
        (FieldKind::Choice { options, .. }, AttributeValue::Choice(code)) => options
            .iter()
            .find(|choice| choice.code == *code)
            .map_or_else(|| code.to_string(), |choice| choice.token.to_owned()),
        (_, AttributeValue::Choice(code)) => code.to_string(),
        (_, AttributeValue::Hex(v)) => format!("{v:X}"),
        (_, AttributeValue::AuthParams(params)) => params.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_only_zero_and_one() {
        assert_eq!(
            parse_token(Field::GroupAccessPermission, "1"),
            Ok(AttributeValue::Flag(true))
        );
        for bad in ["true", "01", "", " 1", "2"] {
            assert!(matches!(
                parse_token(Field::GroupAccessPermission, bad),
                Err(FormatError::InvalidBoolean { .. })
            ));
        }
    }

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(
            parse_token(Field::GroupPriority, "10"),
            Ok(AttributeValue::Integer(10))
        );
        assert_eq!(
            parse_token(Field::GroupPriority, "0"),
            Err(FormatError::OutOfRange {
                name: "g-pri",
                value: 0,
                min: 1,
                max: 10
            })
        );
        assert!(matches!(
            parse_token(Field::GroupRfHangTime, "-1"),
            Err(FormatError::OutOfRange { value: -1, .. })
        ));
        assert!(matches!(
            parse_token(Field::GroupRfHangTime, "ten"),
            Err(FormatError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn choices_resolve_tokens() {
        assert_eq!(
            parse_token(Field::CallConsolePriority, "b0"),
            Ok(AttributeValue::Choice(5))
        );
        assert_eq!(
            render_token(Field::CallConsolePriority, &AttributeValue::Choice(5)),
            "B0"
        );
        assert!(matches!(
            parse_token(Field::GroupSecurityLevel, "0"),
            Err(FormatError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn hex_rejects_prefix_and_overflow() {
        assert_eq!(
            parse_token(Field::GroupAnnouncementGroup, "0B4561A27271"),
            Ok(AttributeValue::Hex(0x0B45_61A2_7271))
        );
        for bad in ["0x12", "", "1234567890ABC", "XYZ"] {
            assert!(matches!(
                parse_token(Field::GroupAnnouncementGroup, bad),
                Err(FormatError::InvalidHex { .. })
            ));
        }
        assert_eq!(
            render_token(Field::GroupAnnouncementGroup, &AttributeValue::Hex(0xABC)),
            "ABC"
        );
    }

    #[test]
    fn auth_params_round_trip() {
        let seed = (1..=10).map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ");
        let key = (0x11..=0x20).map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ");
        let token = format!("{seed},{key},AA BB CC");
        let parsed = AuthParams::parse(&token).expect("valid parameters");
        assert_eq!(parsed.random_seed()[9], 0x0A);
        assert_eq!(parsed.key()[0], 0x11);
        assert_eq!(parsed.expanded_key(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(parsed.to_string(), token);
    }

    #[test]
    fn auth_params_need_exact_group_sizes() {
        assert!(AuthParams::parse("01 02,03,04").is_err());
        assert!(AuthParams::parse("01").is_err());
        assert!(AuthParams::new([0; 10], [0; 16], Vec::new()).is_none());
    }

    #[test]
    fn value_checks_reject_wrong_kinds() {
        assert_eq!(
            check_value(Field::GroupPriority, &AttributeValue::Flag(true)),
            Err(FormatError::ValueKindMismatch { name: "g-pri" })
        );
        assert!(
            check_value(Field::GroupAnnouncementGroup, &AttributeValue::Hex(1 << 48)).is_err()
        );
        assert!(
            check_value(Field::GroupAnnouncementGroup, &AttributeValue::Hex((1 << 48) - 1))
                .is_ok()
        );
    }
}
