//! 安全管理示例流程：角色 → 用户 → 类型 → 流 → ACL → 所有者 → 校验 → 清理。
//!
//! 库入口 [`execute`] 总是执行清理并返回 [`SampleOutcome`]，
//! 是否把失败传给进程由调用方决定。

mod cleanup;
mod steps;
mod verify;

use adh_client::{ClientError, HistorianApi};
use api_contract::PatchBuildError;
use domain::{AccessControlList, Role, SdsStream, SdsType, TenantContext, Trustee, User};
use tracing::{error, info};

pub use cleanup::{CleanupFailure, best_effort, cleanup};
pub use steps::{find_tenant_member_role_id, run_sample, sample_type};
pub use verify::verify;

/// 示例类型 ID。
pub const SAMPLE_TYPE_ID: &str = "example_type-security_management_sample";
/// 示例流 ID。
pub const SAMPLE_STREAM_ID: &str = "example_stream-security_management_sample";
/// 未配置 RoleTypeId 时按此名称查找租户成员角色。
pub const TENANT_MEMBER_ROLE_NAME: &str = "Tenant Member";

/// 示例流程错误。
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{step} failed")]
    Client {
        step: &'static str,
        #[source]
        source: ClientError,
    },
    #[error("tenant member role not found")]
    MissingTenantMemberRole,
    #[error("service returned {0} without an id")]
    MissingId(&'static str),
    #[error("cannot build patch document")]
    Patch(#[from] PatchBuildError),
    #[error("verification failed: {0}")]
    Verification(String),
}

/// 新用户的联系信息。
#[derive(Debug, Clone, Default)]
pub struct ContactInfo {
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

/// 流程参数。
#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub custom_role_name: String,
    pub tenant_member_role_type_id: Option<String>,
    pub identity_provider_id: Option<String>,
    pub contact: ContactInfo,
    pub type_id: String,
    pub stream_id: String,
    /// 同时把自定义角色加入流集合默认 ACL（清理时移除）。
    pub update_default_acl: bool,
    /// 结束前重新读取 ACL 与所有者并与本地期望比较。
    pub verify: bool,
}

impl SampleOptions {
    pub fn new(custom_role_name: impl Into<String>) -> Self {
        Self {
            custom_role_name: custom_role_name.into(),
            tenant_member_role_type_id: None,
            identity_provider_id: None,
            contact: ContactInfo::default(),
            type_id: SAMPLE_TYPE_ID.to_string(),
            stream_id: SAMPLE_STREAM_ID.to_string(),
            update_default_acl: false,
            verify: true,
        }
    }
}

/// 本次运行已在服务端创建的资源，清理据此决定要删除什么。
#[derive(Debug, Clone, Default)]
pub struct CreatedResources {
    pub role_id: Option<String>,
    pub user_id: Option<String>,
    pub type_id: Option<String>,
    pub stream_id: Option<String>,
    /// 写入自定义角色后的集合默认 ACL。
    pub default_acl: Option<AccessControlList>,
}

/// 流程成功时的结果（均为本地期望状态）。
#[derive(Debug, Clone)]
pub struct SampleReport {
    pub custom_role: Role,
    pub tenant_member_role_id: String,
    pub user: User,
    pub sds_type: SdsType,
    pub stream: SdsStream,
    pub type_acl: AccessControlList,
    pub stream_acl: AccessControlList,
    pub default_acl: Option<AccessControlList>,
    pub owner: Trustee,
    pub access_rights: Vec<String>,
}

/// 一次完整运行（含清理）的结果。
#[derive(Debug)]
pub struct SampleOutcome {
    pub result: Result<SampleReport, WorkflowError>,
    pub created: CreatedResources,
    pub cleanup_failures: Vec<CleanupFailure>,
}

impl SampleOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<SampleReport, WorkflowError> {
        self.result
    }
}

/// 把远端调用失败标记上所在步骤。
pub(crate) fn at(step: &'static str) -> impl FnOnce(ClientError) -> WorkflowError {
    move |source| WorkflowError::Client { step, source }
}

/// 执行示例流程；无论成功与否都执行清理。
pub async fn execute(
    api: &dyn HistorianApi,
    ctx: &TenantContext,
    options: &SampleOptions,
) -> SampleOutcome {
    info!(target: "adh.workflow", tenant_id = %ctx.tenant_id, namespace_id = %ctx.namespace_id, "Sample starting...");
    let mut created = CreatedResources::default();
    let result = run_sample(api, ctx, options, &mut created).await;
    if let Err(err) = &result {
        error!(target: "adh.workflow", error = %error_chain(err), "Encountered Error");
    }

    let cleanup_failures = cleanup(api, ctx, &created).await;
    SampleOutcome {
        result,
        created,
        cleanup_failures,
    }
}

/// 错误及其 source 链，单行展示。
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_chain_includes_sources() {
        let err = WorkflowError::Client {
            step: "create_role",
            source: ClientError::Http {
                status: 500,
                message: "boom".to_string(),
            },
        };
        assert_eq!(error_chain(&err), "create_role failed: HTTP 500: boom");
    }

    #[test]
    fn at_tags_the_failing_step() {
        let err = at("delete_type")(ClientError::Http {
            status: 409,
            message: "in use".to_string(),
        });
        assert!(matches!(err, WorkflowError::Client { step: "delete_type", .. }));
    }

    #[test]
    fn options_default_to_sample_ids() {
        let options = SampleOptions::new("role");
        assert_eq!(options.type_id, SAMPLE_TYPE_ID);
        assert_eq!(options.stream_id, SAMPLE_STREAM_ID);
        assert!(options.verify);
        assert!(!options.update_default_acl);
    }
}
