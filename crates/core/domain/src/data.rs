use crate::wire::wire_enum;
use serde::{Deserialize, Serialize};

/// 角色作用域。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "crate::wire::WireEnum", into = "crate::wire::WireEnum")]
pub enum RoleScope {
    None,
    Tenant,
    Community,
}

wire_enum!(RoleScope {
    None = 0,
    Tenant = 1,
    Community = 2,
});

/// 租户内角色。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub role_scope: RoleScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type_id: Option<String>,
}

impl Role {
    /// 新建租户级自定义角色（ID 由服务端分配）。
    pub fn tenant_scoped(name: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            role_scope: RoleScope::Tenant,
            tenant_id: Some(tenant_id.into()),
            role_type_id: None,
        }
    }
}

/// 租户用户。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_provider_id: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
}

/// SDS 类型代码（仅列出示例用到及常见的代码）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "crate::wire::WireEnum", into = "crate::wire::WireEnum")]
pub enum SdsTypeCode {
    Empty,
    Object,
    Boolean,
    Int32,
    Int64,
    Double,
    DateTime,
    String,
}

wire_enum!(SdsTypeCode {
    Empty = 0,
    Object = 1,
    Boolean = 3,
    Int32 = 9,
    Int64 = 11,
    Double = 14,
    DateTime = 16,
    String = 18,
});

/// 类型属性；`is_key` 的属性为必填索引。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsTypeProperty {
    pub id: String,
    #[serde(default)]
    pub is_key: bool,
    pub sds_type: SdsType,
}

/// 流数据的结构定义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sds_type_code: SdsTypeCode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SdsTypeProperty>,
}

impl SdsType {
    /// 基础类型（无属性）。
    pub fn primitive(id: impl Into<String>, code: SdsTypeCode) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            sds_type_code: code,
            properties: Vec::new(),
        }
    }

    /// 至少需要一个 key 属性才能作为流类型使用。
    pub fn has_key(&self) -> bool {
        self.properties.iter().any(|property| property.is_key)
    }
}

/// 绑定到某个类型的数据流。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsStream {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub type_id: String,
}

impl SdsStream {
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            type_id: type_id.into(),
        }
    }
}
