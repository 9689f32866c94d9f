pub mod access;
pub mod data;
mod wire;

pub use access::{
    AccessControlEntry, AccessControlList, AccessRights, AccessType, Trustee, TrusteeType,
    compare_acls, compare_acls_strict,
};
pub use data::{Role, RoleScope, SdsStream, SdsType, SdsTypeCode, SdsTypeProperty, User};

/// 租户上下文：一次运行内所有远端调用共享的作用域。
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub namespace_id: String,
}

impl TenantContext {
    /// 构造显式租户与命名空间的上下文。
    pub fn new(tenant_id: impl Into<String>, namespace_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            namespace_id: namespace_id.into(),
        }
    }

    /// 以角色身份构造本租户内的 trustee。
    pub fn role_trustee(&self, role_id: impl Into<String>) -> Trustee {
        Trustee::new(TrusteeType::Role, self.tenant_id.clone(), role_id)
    }

    /// 以用户身份构造本租户内的 trustee。
    pub fn user_trustee(&self, user_id: impl Into<String>) -> Trustee {
        Trustee::new(TrusteeType::User, self.tenant_id.clone(), user_id)
    }
}

impl Default for TenantContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            tenant_id: "".to_string(),
            namespace_id: "".to_string(),
        }
    }
}
