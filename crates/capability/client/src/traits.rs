//! 远端 API 接口 Trait 定义
//!
//! 按资源拆分：
//! - RolesApi：角色
//! - UsersApi：用户与邀请
//! - TypesApi：SDS 类型及其 ACL
//! - StreamsApi：SDS 流、ACL、所有者、访问权限与集合默认 ACL
//!
//! 设计原则：
//! - 所有接口显式接收 TenantContext
//! - 所有接口返回 ClientError
//! - 使用 async_trait 支持动态分发

use crate::error::ClientError;
use api_contract::{Patch, UserInvitation};
use async_trait::async_trait;
use domain::{AccessControlList, Role, SdsStream, SdsType, TenantContext, Trustee, User};

/// 角色接口
#[async_trait]
pub trait RolesApi: Send + Sync {
    /// 创建角色，返回服务端分配 ID 后的角色
    async fn create_role(&self, ctx: &TenantContext, role: &Role) -> Result<Role, ClientError>;

    /// 列出租户内全部角色
    async fn list_roles(&self, ctx: &TenantContext) -> Result<Vec<Role>, ClientError>;

    /// 删除角色
    async fn delete_role(&self, ctx: &TenantContext, role_id: &str) -> Result<(), ClientError>;
}

/// 用户接口
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// 创建用户
    async fn create_user(&self, ctx: &TenantContext, user: &User) -> Result<User, ClientError>;

    /// 创建或更新用户邀请
    async fn create_or_update_invitation(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        invitation: &UserInvitation,
    ) -> Result<(), ClientError>;

    /// 删除用户
    async fn delete_user(&self, ctx: &TenantContext, user_id: &str) -> Result<(), ClientError>;
}

/// SDS 类型接口
#[async_trait]
pub trait TypesApi: Send + Sync {
    /// 按 ID 获取或创建类型（幂等）
    async fn get_or_create_type(
        &self,
        ctx: &TenantContext,
        sds_type: &SdsType,
    ) -> Result<SdsType, ClientError>;

    async fn get_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
    ) -> Result<AccessControlList, ClientError>;

    /// 整体替换类型 ACL
    async fn update_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError>;

    async fn delete_type(&self, ctx: &TenantContext, type_id: &str) -> Result<(), ClientError>;
}

/// SDS 流接口
#[async_trait]
pub trait StreamsApi: Send + Sync {
    /// 按 ID 获取或创建流（幂等）
    async fn get_or_create_stream(
        &self,
        ctx: &TenantContext,
        stream: &SdsStream,
    ) -> Result<SdsStream, ClientError>;

    async fn get_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<AccessControlList, ClientError>;

    /// 整体替换流 ACL
    async fn update_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError>;

    /// 以 JSON Patch 增量修改流 ACL
    async fn patch_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        patch: &Patch,
    ) -> Result<(), ClientError>;

    async fn get_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Trustee, ClientError>;

    async fn update_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        owner: &Trustee,
    ) -> Result<(), ClientError>;

    /// 调用方在该流上的有效权限名称
    async fn get_stream_access_rights(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Vec<String>, ClientError>;

    /// 流集合的默认 ACL（新建流继承）
    async fn get_default_stream_access_control(
        &self,
        ctx: &TenantContext,
    ) -> Result<AccessControlList, ClientError>;

    async fn update_default_stream_access_control(
        &self,
        ctx: &TenantContext,
        acl: &AccessControlList,
    ) -> Result<(), ClientError>;

    async fn delete_stream(&self, ctx: &TenantContext, stream_id: &str) -> Result<(), ClientError>;
}

/// 完整的远端 API（示例流程所需的全部资源）。
pub trait HistorianApi: RolesApi + UsersApi + TypesApi + StreamsApi {}

impl<T> HistorianApi for T where T: RolesApi + UsersApi + TypesApi + StreamsApi {}
