use crate::CreatedResources;
use adh_client::{ClientError, HistorianApi, RolesApi, StreamsApi, TypesApi, UsersApi};
use domain::TenantContext;
use std::future::Future;
use tracing::{info, warn};

/// 清理阶段被吞掉的单个失败。
#[derive(Debug)]
pub struct CleanupFailure {
    pub operation: String,
    pub error: ClientError,
}

/// 执行一次清理调用：失败只记录日志并写入 `failures`，不向上传播。
pub async fn best_effort<F>(operation: &str, call: F, failures: &mut Vec<CleanupFailure>)
where
    F: Future<Output = Result<(), ClientError>>,
{
    match call.await {
        Ok(()) => info!(target: "adh.workflow", operation = %operation, "cleanup_step_done"),
        Err(error) => {
            warn!(
                target: "adh.workflow",
                operation = %operation,
                error = %error,
                "Encountered Error"
            );
            failures.push(CleanupFailure {
                operation: operation.to_string(),
                error,
            });
        }
    }
}

/// 依次删除流、类型、角色、用户；单个失败不影响后续删除。
///
/// 未创建的资源直接跳过。若写过集合默认 ACL，最后移除其中的自定义角色条目。
pub async fn cleanup(
    api: &dyn HistorianApi,
    ctx: &TenantContext,
    created: &CreatedResources,
) -> Vec<CleanupFailure> {
    info!(target: "adh.workflow", "Cleaning Up");
    let mut failures = Vec::new();

    if let Some(stream_id) = &created.stream_id {
        best_effort("delete_stream", api.delete_stream(ctx, stream_id), &mut failures).await;
    }
    if let Some(type_id) = &created.type_id {
        best_effort("delete_type", api.delete_type(ctx, type_id), &mut failures).await;
    }
    if let Some(role_id) = &created.role_id {
        best_effort("delete_role", api.delete_role(ctx, role_id), &mut failures).await;
    }
    if let Some(user_id) = &created.user_id {
        best_effort("delete_user", api.delete_user(ctx, user_id), &mut failures).await;
    }
    if let (Some(default_acl), Some(role_id)) = (&created.default_acl, &created.role_id) {
        let mut restored = default_acl.clone();
        restored.remove_trustee(role_id);
        best_effort(
            "restore_default_stream_access_control",
            api.update_default_stream_access_control(ctx, &restored),
            &mut failures,
        )
        .await;
    }

    failures
}
