//! 枚举的线上表示：服务端既可能返回数值代码，也可能返回名称。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireEnum {
    Code(i64),
    Name(String),
}

impl WireEnum {
    /// 名称比较忽略大小写。
    pub fn matches(&self, code: i64, name: &str) -> bool {
        match self {
            WireEnum::Code(value) => *value == code,
            WireEnum::Name(value) => value.eq_ignore_ascii_case(name),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WireEnum::Code(value) => value.to_string(),
            WireEnum::Name(value) => value.clone(),
        }
    }
}

/// 为单位枚举生成 `WireEnum` 双向转换。
macro_rules! wire_enum {
    ($ty:ident { $($variant:ident = $code:expr),+ $(,)? }) => {
        impl TryFrom<$crate::wire::WireEnum> for $ty {
            type Error = String;

            fn try_from(value: $crate::wire::WireEnum) -> Result<Self, Self::Error> {
                $(
                    if value.matches($code, stringify!($variant)) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!("unknown {}: {}", stringify!($ty), value.describe()))
            }
        }

        impl From<$ty> for $crate::wire::WireEnum {
            fn from(value: $ty) -> Self {
                match value {
                    $($ty::$variant => $crate::wire::WireEnum::Name(stringify!($variant).to_string()),)+
                }
            }
        }
    };
}

pub(crate) use wire_enum;
