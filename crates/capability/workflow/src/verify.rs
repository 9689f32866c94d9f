use crate::{SampleReport, WorkflowError, at};
use adh_client::{HistorianApi, StreamsApi, TypesApi};
use domain::{AccessControlList, TenantContext, compare_acls};
use tracing::info;

fn expect_same(
    what: &str,
    actual: &AccessControlList,
    expected: &AccessControlList,
) -> Result<(), WorkflowError> {
    if compare_acls(actual, expected) {
        return Ok(());
    }
    Err(WorkflowError::Verification(format!(
        "{} has {} entries, expected {}",
        what,
        actual.len(),
        expected.len()
    )))
}

/// 重新读取 ACL 与所有者，与流程结束时的本地期望比较。
pub async fn verify(
    api: &dyn HistorianApi,
    ctx: &TenantContext,
    report: &SampleReport,
) -> Result<(), WorkflowError> {
    info!(target: "adh.workflow", "Verifying the results of the previous steps");

    let type_acl = api
        .get_type_access_control(ctx, &report.sds_type.id)
        .await
        .map_err(at("verify_type_access_control"))?;
    expect_same("type access control list", &type_acl, &report.type_acl)?;

    let stream_acl = api
        .get_stream_access_control(ctx, &report.stream.id)
        .await
        .map_err(at("verify_stream_access_control"))?;
    expect_same("stream access control list", &stream_acl, &report.stream_acl)?;

    if let Some(expected) = &report.default_acl {
        let default_acl = api
            .get_default_stream_access_control(ctx)
            .await
            .map_err(at("verify_default_stream_access_control"))?;
        expect_same("default streams access control list", &default_acl, expected)?;
    }

    let owner = api
        .get_stream_owner(ctx, &report.stream.id)
        .await
        .map_err(at("verify_stream_owner"))?;
    if owner.object_id != report.owner.object_id {
        return Err(WorkflowError::Verification(format!(
            "stream owner is {}, expected {}",
            owner.object_id, report.owner.object_id
        )));
    }

    info!(target: "adh.workflow", "Verification passed");
    Ok(())
}
