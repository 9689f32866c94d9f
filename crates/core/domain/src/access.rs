//! 访问控制模型：Trustee、ACE、ACL 与 ACL 比较。
//!
//! ACL 在服务端是无序集合，这里的比较只关心条目内容而不关心顺序。

use crate::wire::wire_enum;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Trustee 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "crate::wire::WireEnum", into = "crate::wire::WireEnum")]
pub enum TrusteeType {
    User,
    Client,
    Role,
}

wire_enum!(TrusteeType {
    User = 1,
    Client = 2,
    Role = 3,
});

/// 允许或拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "crate::wire::WireEnum", into = "crate::wire::WireEnum")]
pub enum AccessType {
    Allowed,
    Denied,
}

wire_enum!(AccessType {
    Allowed = 0,
    Denied = 1,
});

/// 可被授予权限的身份（用户、客户端或角色）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trustee {
    #[serde(rename = "Type")]
    pub trustee_type: TrusteeType,
    pub tenant_id: String,
    pub object_id: String,
}

impl Trustee {
    pub fn new(
        trustee_type: TrusteeType,
        tenant_id: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            trustee_type,
            tenant_id: tenant_id.into(),
            object_id: object_id.into(),
        }
    }
}

/// 通用访问权限位掩码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRights(u32);

impl AccessRights {
    pub const NONE: AccessRights = AccessRights(0);
    pub const READ: AccessRights = AccessRights(1);
    pub const WRITE: AccessRights = AccessRights(2);
    pub const DELETE: AccessRights = AccessRights(4);
    pub const MANAGE_ACCESS_CONTROL: AccessRights = AccessRights(8);
    pub const SHARE: AccessRights = AccessRights(16);
    pub const ALL: AccessRights = AccessRights(31);

    const NAMED: [(&'static str, AccessRights); 5] = [
        ("Read", Self::READ),
        ("Write", Self::WRITE),
        ("Delete", Self::DELETE),
        ("ManageAccessControl", Self::MANAGE_ACCESS_CONTROL),
        ("Share", Self::SHARE),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        AccessRights(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: AccessRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// 掩码中包含的权限名称（按位从低到高）。
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, rights)| self.contains(*rights))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for AccessRights {
    type Output = AccessRights;

    fn bitor(self, rhs: AccessRights) -> AccessRights {
        AccessRights(self.0 | rhs.0)
    }
}

impl BitOrAssign for AccessRights {
    fn bitor_assign(&mut self, rhs: AccessRights) {
        self.0 |= rhs.0;
    }
}

/// 访问控制条目（ACE）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessControlEntry {
    pub trustee: Trustee,
    pub access_type: AccessType,
    pub access_rights: AccessRights,
}

impl AccessControlEntry {
    pub fn new(trustee: Trustee, access_type: AccessType, access_rights: AccessRights) -> Self {
        Self {
            trustee,
            access_type,
            access_rights,
        }
    }

    pub fn allowed(trustee: Trustee, access_rights: AccessRights) -> Self {
        Self::new(trustee, AccessType::Allowed, access_rights)
    }

    /// 比较 ACL 时使用的五个字段是否全部一致。
    fn matches(&self, other: &AccessControlEntry) -> bool {
        self.access_type == other.access_type
            && self.trustee.object_id == other.trustee.object_id
            && self.trustee.tenant_id == other.trustee.tenant_id
            && self.trustee.trustee_type == other.trustee.trustee_type
            && self.access_rights == other.access_rights
    }
}

/// 访问控制列表（ACL）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessControlList {
    #[serde(default)]
    pub role_trustee_access_control_entries: Vec<AccessControlEntry>,
}

impl AccessControlList {
    pub fn new(entries: Vec<AccessControlEntry>) -> Self {
        Self {
            role_trustee_access_control_entries: entries,
        }
    }

    pub fn entries(&self) -> &[AccessControlEntry] {
        &self.role_trustee_access_control_entries
    }

    pub fn len(&self) -> usize {
        self.role_trustee_access_control_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.role_trustee_access_control_entries.is_empty()
    }

    pub fn push(&mut self, entry: AccessControlEntry) {
        self.role_trustee_access_control_entries.push(entry);
    }

    pub fn contains(&self, entry: &AccessControlEntry) -> bool {
        self.role_trustee_access_control_entries
            .iter()
            .any(|candidate| candidate.matches(entry))
    }

    /// 去掉指定 trustee 对象的全部条目，返回被移除的条目数。
    pub fn remove_trustee(&mut self, object_id: &str) -> usize {
        let before = self.role_trustee_access_control_entries.len();
        self.role_trustee_access_control_entries
            .retain(|entry| entry.trustee.object_id != object_id);
        before - self.role_trustee_access_control_entries.len()
    }
}

/// 比较两个 ACL 是否包含相同的条目（与顺序无关）。
///
/// 条目数不同直接返回 false；否则 `acl1` 中每个条目都必须在 `acl2` 中找到匹配。
/// 注意：同一个 `acl2` 条目可以被 `acl1` 中的多个重复条目重复匹配，
/// 需要严格多重集语义时使用 [`compare_acls_strict`]。
pub fn compare_acls(acl1: &AccessControlList, acl2: &AccessControlList) -> bool {
    if acl1.len() != acl2.len() {
        return false;
    }

    acl1.entries()
        .iter()
        .all(|ace1| acl2.entries().iter().any(|ace2| ace1.matches(ace2)))
}

/// 严格多重集比较：`acl2` 中每个条目最多被匹配一次。
pub fn compare_acls_strict(acl1: &AccessControlList, acl2: &AccessControlList) -> bool {
    if acl1.len() != acl2.len() {
        return false;
    }

    let mut remaining: Vec<&AccessControlEntry> = acl2.entries().iter().collect();
    for ace1 in acl1.entries() {
        match remaining.iter().position(|ace2| ace1.matches(ace2)) {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_entry(object_id: &str, rights: AccessRights) -> AccessControlEntry {
        AccessControlEntry::allowed(Trustee::new(TrusteeType::Role, "tenant-1", object_id), rights)
    }

    #[test]
    fn rights_names_follow_bit_order() {
        let rights = AccessRights::WRITE | AccessRights::READ;
        assert_eq!(rights.names(), vec!["Read", "Write"]);
        assert!(AccessRights::NONE.names().is_empty());
        assert_eq!(AccessRights::ALL.names().len(), 5);
    }

    #[test]
    fn remove_trustee_drops_every_match() {
        let mut acl = AccessControlList::new(vec![
            role_entry("role-1", AccessRights::READ),
            role_entry("role-2", AccessRights::READ),
            role_entry("role-1", AccessRights::WRITE),
        ]);
        assert_eq!(acl.remove_trustee("role-1"), 2);
        assert_eq!(acl.len(), 1);
        assert_eq!(acl.entries()[0].trustee.object_id, "role-2");
    }

    #[test]
    fn strict_compare_consumes_matches() {
        let a = AccessControlList::new(vec![
            role_entry("role-1", AccessRights::READ),
            role_entry("role-1", AccessRights::READ),
        ]);
        let b = AccessControlList::new(vec![
            role_entry("role-1", AccessRights::READ),
            role_entry("role-2", AccessRights::READ),
        ]);
        assert!(!compare_acls_strict(&a, &b));
        assert!(compare_acls_strict(&a, &a.clone()));
    }
}
