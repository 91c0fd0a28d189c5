//! # registry 模块
//!
//! ## 教案目的（Why）
//! - 把“属性名 → 字段”的解析集中为一张进程级只读表，取代逐类注册的可变静态容器。
//!
//! ## 交互契约（What）
//! - 表在首次访问时构建一次，之后从不修改，可在线程间无同步并发读取；
//! - 查找对大小写不敏感，规范名与缩写等价，查找过程无副作用。
//!
//! ## 风险提示（Trade-offs）
//! - 每次查找都会为小写化分配一个短字符串；字段名很短，换来实现的简单直接。

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::attribute::{Block, Field};
use crate::error::{FormatError, Result};

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::build);

/// 属性名注册表。
#[derive(Debug)]
pub struct Registry {
    by_name: HashMap<String, Field>,
}

impl Registry {
    /// 进程级共享实例。
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    fn build() -> Self {
        let mut by_name = HashMap::with_capacity(Field::ALL.len() * 2);
        for field in Field::ALL {
            let spec = field.spec();
            by_name.insert(spec.name.to_ascii_lowercase(), field);
            if let Some(alias) = spec.alias {
                by_name.insert(alias.to_ascii_lowercase(), field);
            }
        }
        Self { by_name }
    }

    /// 按名称查找字段。
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Field> {
        self.by_name.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// 按名称解析字段，未知名称报错。
    pub fn resolve(&self, name: &str) -> Result<Field> {
        self.lookup(name)
            .ok_or_else(|| FormatError::UnknownAttribute {
                name: name.to_owned(),
            })
    }

    /// 在指定块内解析字段。
    pub fn resolve_in(&self, block: Block, name: &str) -> Result<Field> {
        let field = self.resolve(name)?;
        if field.block() == block {
            Ok(field)
        } else {
            Err(FormatError::WrongBlock {
                name: field.name(),
                block,
            })
        }
    }

    /// 注册的名称总数（规范名与缩写分别计数）。
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// 注册表是否为空。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_every_name_and_alias() {
        let registry = Registry::global();
        let expected: usize = Field::ALL
            .iter()
            .map(|field| 1 + usize::from(field.spec().alias.is_some()))
            .sum();
        assert_eq!(registry.len(), expected);
        assert!(!registry.is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = Registry::global();
        assert_eq!(registry.lookup("g-ccsetupT"), Some(Field::GroupConfirmedCallSetupTime));
        assert_eq!(registry.lookup("G-CCSETUPT"), Some(Field::GroupConfirmedCallSetupTime));
        assert_eq!(registry.lookup("c-ctxrp"), Some(Field::CallConsolePriority));
        assert_eq!(registry.lookup("g-ic"), Some(Field::GroupInterconnect));
        assert_eq!(registry.lookup("nope"), None);
    }

    #[test]
    fn shared_instance_is_usable_from_many_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Registry::global().lookup("r-presence")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().ok().flatten(), Some(Field::RegisterPresence));
        }
    }
}
