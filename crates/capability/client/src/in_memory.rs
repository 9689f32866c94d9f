//! 远端服务的内存实现
//!
//! 仅用于本地演示和测试：
//! - 内置 "Tenant Administrator" 与 "Tenant Member" 两个角色
//! - 调用方身份为一个持有管理员角色的 client
//! - 记录每次调用的操作名，可按操作名注入失败

use crate::error::ClientError;
use crate::traits::{RolesApi, StreamsApi, TypesApi, UsersApi};
use api_contract::{Patch, UserInvitation};
use async_trait::async_trait;
use domain::{
    AccessControlEntry, AccessControlList, AccessRights, AccessType, Role, RoleScope, SdsStream,
    SdsType, TenantContext, Trustee, TrusteeType, User,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

/// 内置租户成员角色的 RoleTypeId。
pub const TENANT_MEMBER_ROLE_TYPE_ID: &str = "tenant-member-role-type";
/// 内置租户管理员角色的 RoleTypeId。
pub const TENANT_ADMIN_ROLE_TYPE_ID: &str = "tenant-admin-role-type";
/// 调用方 client 的对象 ID。
pub const CALLER_CLIENT_ID: &str = "sample-client";

struct StreamRecord {
    stream: SdsStream,
    acl: AccessControlList,
    owner: Trustee,
}

struct TypeRecord {
    sds_type: SdsType,
    acl: AccessControlList,
}

struct State {
    roles: HashMap<String, Role>,
    users: HashMap<String, User>,
    invitations: HashMap<String, UserInvitation>,
    types: HashMap<String, TypeRecord>,
    streams: HashMap<String, StreamRecord>,
    default_stream_acl: AccessControlList,
}

/// 远端服务内存实现
///
/// 使用 RwLock + HashMap 保存实体，Mutex 保存调用记录。
pub struct InMemoryHistorian {
    tenant_id: String,
    admin_role_id: String,
    member_role_id: String,
    state: RwLock<State>,
    calls: Mutex<Vec<String>>,
    failures: RwLock<HashSet<String>>,
}

impl InMemoryHistorian {
    /// 创建包含内置角色的租户。
    pub fn new(tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        let admin_role_id = "role-tenant-admin".to_string();
        let member_role_id = "role-tenant-member".to_string();

        let mut roles = HashMap::new();
        for (id, name, role_type_id) in [
            (&admin_role_id, "Tenant Administrator", TENANT_ADMIN_ROLE_TYPE_ID),
            (&member_role_id, "Tenant Member", TENANT_MEMBER_ROLE_TYPE_ID),
        ] {
            roles.insert(
                id.clone(),
                Role {
                    id: Some(id.clone()),
                    name: name.to_string(),
                    description: None,
                    role_scope: RoleScope::Tenant,
                    tenant_id: Some(tenant_id.clone()),
                    role_type_id: Some(role_type_id.to_string()),
                },
            );
        }

        let admin_entry = AccessControlEntry::allowed(
            Trustee::new(TrusteeType::Role, tenant_id.clone(), admin_role_id.clone()),
            AccessRights::ALL,
        );
        let state = State {
            roles,
            users: HashMap::new(),
            invitations: HashMap::new(),
            types: HashMap::new(),
            streams: HashMap::new(),
            default_stream_acl: AccessControlList::new(vec![admin_entry]),
        };

        Self {
            tenant_id,
            admin_role_id,
            member_role_id,
            state: RwLock::new(state),
            calls: Mutex::new(Vec::new()),
            failures: RwLock::new(HashSet::new()),
        }
    }

    pub fn admin_role_id(&self) -> &str {
        &self.admin_role_id
    }

    pub fn member_role_id(&self) -> &str {
        &self.member_role_id
    }

    /// 调用方 client 的 trustee。
    pub fn caller(&self) -> Trustee {
        Trustee::new(TrusteeType::Client, self.tenant_id.clone(), CALLER_CLIENT_ID)
    }

    /// 让指定操作此后返回 500。
    pub fn fail_on(&self, operation: &str) {
        if let Ok(mut failures) = self.failures.write() {
            failures.insert(operation.to_string());
        }
    }

    /// 已调用的操作名（按调用顺序）。
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn role_count(&self) -> usize {
        self.read().map(|state| state.roles.len()).unwrap_or(0)
    }

    pub fn user_count(&self) -> usize {
        self.read().map(|state| state.users.len()).unwrap_or(0)
    }

    pub fn has_type(&self, type_id: &str) -> bool {
        self.read()
            .map(|state| state.types.contains_key(type_id))
            .unwrap_or(false)
    }

    pub fn has_stream(&self, stream_id: &str) -> bool {
        self.read()
            .map(|state| state.streams.contains_key(stream_id))
            .unwrap_or(false)
    }

    pub fn invitation_sent(&self, user_id: &str) -> bool {
        self.read()
            .map(|state| {
                state
                    .invitations
                    .get(user_id)
                    .is_some_and(|invitation| invitation.send_invitation)
            })
            .unwrap_or(false)
    }

    /// 直接写入集合默认 ACL（测试前置条件）。
    pub fn set_default_stream_acl(&self, acl: AccessControlList) {
        if let Ok(mut state) = self.state.write() {
            state.default_stream_acl = acl;
        }
    }

    /// 记录调用并检查注入的失败。
    fn enter(&self, operation: &str) -> Result<(), ClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation.to_string());
        }
        let failing = self
            .failures
            .read()
            .map(|failures| failures.contains(operation))
            .unwrap_or(false);
        if failing {
            return Err(ClientError::Http {
                status: 500,
                message: format!("injected failure: {}", operation),
            });
        }
        Ok(())
    }

    fn check_tenant(&self, ctx: &TenantContext) -> Result<(), ClientError> {
        if ctx.tenant_id != self.tenant_id {
            return Err(forbidden(format!("tenant {} is not accessible", ctx.tenant_id)));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, ClientError> {
        self.state.read().map_err(|_| internal("state lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, ClientError> {
        self.state.write().map_err(|_| internal("state lock poisoned"))
    }

    /// 调用方的有效权限：所有者拥有全部权限，否则按 ACL 合并允许项并扣除拒绝项。
    fn effective_rights(&self, record: &StreamRecord) -> AccessRights {
        let caller = self.caller();
        if record.owner == caller {
            return AccessRights::ALL;
        }
        let applies = |entry: &AccessControlEntry| {
            entry.trustee == caller
                || (entry.trustee.trustee_type == TrusteeType::Role
                    && entry.trustee.object_id == self.admin_role_id)
        };
        let mut allowed = AccessRights::NONE;
        let mut denied = AccessRights::NONE;
        for entry in record.acl.entries().iter().filter(|entry| applies(entry)) {
            match entry.access_type {
                AccessType::Allowed => allowed |= entry.access_rights,
                AccessType::Denied => denied |= entry.access_rights,
            }
        }
        AccessRights::from_bits(allowed.bits() & !denied.bits())
    }

    fn validate_acl(&self, state: &State, acl: &AccessControlList) -> Result<(), ClientError> {
        for entry in acl.entries() {
            let known = match entry.trustee.trustee_type {
                TrusteeType::Role => state.roles.contains_key(&entry.trustee.object_id),
                TrusteeType::User => state.users.contains_key(&entry.trustee.object_id),
                TrusteeType::Client => true,
            };
            if !known {
                return Err(bad_request(format!(
                    "unknown trustee {:?} {}",
                    entry.trustee.trustee_type, entry.trustee.object_id
                )));
            }
        }
        Ok(())
    }
}

fn not_found(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 404,
        message: message.into(),
    }
}

fn conflict(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 409,
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 400,
        message: message.into(),
    }
}

fn forbidden(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 403,
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 500,
        message: message.into(),
    }
}

#[async_trait]
impl RolesApi for InMemoryHistorian {
    async fn create_role(&self, ctx: &TenantContext, role: &Role) -> Result<Role, ClientError> {
        self.enter("create_role")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if state.roles.values().any(|existing| existing.name == role.name) {
            return Err(conflict(format!("role name already exists: {}", role.name)));
        }
        let mut created = role.clone();
        let id = uuid::Uuid::new_v4().to_string();
        created.id = Some(id.clone());
        created.tenant_id = Some(ctx.tenant_id.clone());
        state.roles.insert(id, created.clone());
        Ok(created)
    }

    async fn list_roles(&self, ctx: &TenantContext) -> Result<Vec<Role>, ClientError> {
        self.enter("list_roles")?;
        self.check_tenant(ctx)?;
        let state = self.read()?;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn delete_role(&self, ctx: &TenantContext, role_id: &str) -> Result<(), ClientError> {
        self.enter("delete_role")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if role_id == self.admin_role_id || role_id == self.member_role_id {
            return Err(bad_request("built-in roles cannot be deleted"));
        }
        state
            .roles
            .remove(role_id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("role not found: {}", role_id)))
    }
}

#[async_trait]
impl UsersApi for InMemoryHistorian {
    async fn create_user(&self, ctx: &TenantContext, user: &User) -> Result<User, ClientError> {
        self.enter("create_user")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if let Some(unknown) = user
            .role_ids
            .iter()
            .find(|role_id| !state.roles.contains_key(role_id.as_str()))
        {
            return Err(bad_request(format!("unknown role: {}", unknown)));
        }
        let mut created = user.clone();
        let id = uuid::Uuid::new_v4().to_string();
        created.id = Some(id.clone());
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn create_or_update_invitation(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        invitation: &UserInvitation,
    ) -> Result<(), ClientError> {
        self.enter("create_or_update_invitation")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if !state.users.contains_key(user_id) {
            return Err(not_found(format!("user not found: {}", user_id)));
        }
        state
            .invitations
            .insert(user_id.to_string(), invitation.clone());
        Ok(())
    }

    async fn delete_user(&self, ctx: &TenantContext, user_id: &str) -> Result<(), ClientError> {
        self.enter("delete_user")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        state.invitations.remove(user_id);
        state
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("user not found: {}", user_id)))
    }
}

#[async_trait]
impl TypesApi for InMemoryHistorian {
    async fn get_or_create_type(
        &self,
        ctx: &TenantContext,
        sds_type: &SdsType,
    ) -> Result<SdsType, ClientError> {
        self.enter("get_or_create_type")?;
        self.check_tenant(ctx)?;
        if !sds_type.has_key() {
            return Err(bad_request(format!("type {} has no key property", sds_type.id)));
        }
        let mut state = self.write()?;
        if let Some(existing) = state.types.get(&sds_type.id) {
            if existing.sds_type != *sds_type {
                return Err(conflict(format!(
                    "type {} exists with a different definition",
                    sds_type.id
                )));
            }
            return Ok(existing.sds_type.clone());
        }
        let acl = AccessControlList::new(vec![AccessControlEntry::allowed(
            Trustee::new(TrusteeType::Role, self.tenant_id.clone(), self.admin_role_id.clone()),
            AccessRights::ALL,
        )]);
        state.types.insert(
            sds_type.id.clone(),
            TypeRecord {
                sds_type: sds_type.clone(),
                acl,
            },
        );
        Ok(sds_type.clone())
    }

    async fn get_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
    ) -> Result<AccessControlList, ClientError> {
        self.enter("get_type_access_control")?;
        self.check_tenant(ctx)?;
        let state = self.read()?;
        state
            .types
            .get(type_id)
            .map(|record| record.acl.clone())
            .ok_or_else(|| not_found(format!("type not found: {}", type_id)))
    }

    async fn update_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        self.enter("update_type_access_control")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        self.validate_acl(&state, acl)?;
        let record = state
            .types
            .get_mut(type_id)
            .ok_or_else(|| not_found(format!("type not found: {}", type_id)))?;
        record.acl = acl.clone();
        Ok(())
    }

    async fn delete_type(&self, ctx: &TenantContext, type_id: &str) -> Result<(), ClientError> {
        self.enter("delete_type")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if state
            .streams
            .values()
            .any(|record| record.stream.type_id == type_id)
        {
            return Err(conflict(format!("type {} is referenced by a stream", type_id)));
        }
        state
            .types
            .remove(type_id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("type not found: {}", type_id)))
    }
}

#[async_trait]
impl StreamsApi for InMemoryHistorian {
    async fn get_or_create_stream(
        &self,
        ctx: &TenantContext,
        stream: &SdsStream,
    ) -> Result<SdsStream, ClientError> {
        self.enter("get_or_create_stream")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        if !state.types.contains_key(&stream.type_id) {
            return Err(bad_request(format!("type not found: {}", stream.type_id)));
        }
        if let Some(existing) = state.streams.get(&stream.id) {
            if existing.stream != *stream {
                return Err(conflict(format!(
                    "stream {} exists with a different definition",
                    stream.id
                )));
            }
            return Ok(existing.stream.clone());
        }
        let record = StreamRecord {
            stream: stream.clone(),
            acl: state.default_stream_acl.clone(),
            owner: self.caller(),
        };
        state.streams.insert(stream.id.clone(), record);
        Ok(stream.clone())
    }

    async fn get_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<AccessControlList, ClientError> {
        self.enter("get_stream_access_control")?;
        self.check_tenant(ctx)?;
        let state = self.read()?;
        state
            .streams
            .get(stream_id)
            .map(|record| record.acl.clone())
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))
    }

    async fn update_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        self.enter("update_stream_access_control")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        self.validate_acl(&state, acl)?;
        let record = state
            .streams
            .get_mut(stream_id)
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))?;
        record.acl = acl.clone();
        Ok(())
    }

    async fn patch_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        patch: &Patch,
    ) -> Result<(), ClientError> {
        self.enter("patch_stream_access_control")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        let current = state
            .streams
            .get(stream_id)
            .map(|record| record.acl.clone())
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))?;
        let mut document = serde_json::to_value(&current)?;
        json_patch::patch(&mut document, &patch.0)
            .map_err(|err| bad_request(err.to_string()))?;
        let patched: AccessControlList =
            serde_json::from_value(document).map_err(|err| bad_request(err.to_string()))?;
        self.validate_acl(&state, &patched)?;
        if let Some(record) = state.streams.get_mut(stream_id) {
            record.acl = patched;
        }
        Ok(())
    }

    async fn get_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Trustee, ClientError> {
        self.enter("get_stream_owner")?;
        self.check_tenant(ctx)?;
        let state = self.read()?;
        state
            .streams
            .get(stream_id)
            .map(|record| record.owner.clone())
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))
    }

    async fn update_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        owner: &Trustee,
    ) -> Result<(), ClientError> {
        self.enter("update_stream_owner")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        self.validate_acl(
            &state,
            &AccessControlList::new(vec![AccessControlEntry::allowed(
                owner.clone(),
                AccessRights::NONE,
            )]),
        )?;
        let record = state
            .streams
            .get_mut(stream_id)
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))?;
        record.owner = owner.clone();
        Ok(())
    }

    async fn get_stream_access_rights(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Vec<String>, ClientError> {
        self.enter("get_stream_access_rights")?;
        self.check_tenant(ctx)?;
        let state = self.read()?;
        let record = state
            .streams
            .get(stream_id)
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))?;
        Ok(self
            .effective_rights(record)
            .names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    async fn get_default_stream_access_control(
        &self,
        ctx: &TenantContext,
    ) -> Result<AccessControlList, ClientError> {
        self.enter("get_default_stream_access_control")?;
        self.check_tenant(ctx)?;
        Ok(self.read()?.default_stream_acl.clone())
    }

    async fn update_default_stream_access_control(
        &self,
        ctx: &TenantContext,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        self.enter("update_default_stream_access_control")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        self.validate_acl(&state, acl)?;
        state.default_stream_acl = acl.clone();
        Ok(())
    }

    async fn delete_stream(&self, ctx: &TenantContext, stream_id: &str) -> Result<(), ClientError> {
        self.enter("delete_stream")?;
        self.check_tenant(ctx)?;
        let mut state = self.write()?;
        state
            .streams
            .remove(stream_id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("stream not found: {}", stream_id)))
    }
}
