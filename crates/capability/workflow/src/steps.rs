use crate::verify::verify;
use crate::{
    CreatedResources, SampleOptions, SampleReport, TENANT_MEMBER_ROLE_NAME, WorkflowError, at,
};
use adh_client::{HistorianApi, RolesApi, StreamsApi, TypesApi, UsersApi};
use api_contract::{ACL_ENTRIES_APPEND_PATH, UserInvitation, add_patch};
use domain::{
    AccessControlEntry, AccessRights, Role, SdsStream, SdsType, SdsTypeCode, SdsTypeProperty,
    TenantContext, User,
};
use tracing::info;

fn require_id(id: Option<&str>, what: &'static str) -> Result<String, WorkflowError> {
    id.filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(WorkflowError::MissingId(what))
}

/// 示例类型：必填的 DateTime key 与可选的 Int32 值。
pub fn sample_type(type_id: &str) -> SdsType {
    SdsType {
        id: type_id.to_string(),
        name: Some(type_id.to_string()),
        description: Some("This is a type example.".to_string()),
        sds_type_code: SdsTypeCode::Object,
        properties: vec![
            SdsTypeProperty {
                id: "DateTime".to_string(),
                is_key: true,
                sds_type: SdsType::primitive("DateTimeType", SdsTypeCode::DateTime),
            },
            SdsTypeProperty {
                id: "Value".to_string(),
                is_key: false,
                sds_type: SdsType::primitive("IntType", SdsTypeCode::Int32),
            },
        ],
    }
}

/// 查找内置租户成员角色：优先按 RoleTypeId，未配置时按名称，取第一个匹配。
pub async fn find_tenant_member_role_id(
    api: &dyn HistorianApi,
    ctx: &TenantContext,
    role_type_id: Option<&str>,
) -> Result<String, WorkflowError> {
    let roles = api.list_roles(ctx).await.map_err(at("list_roles"))?;
    roles
        .into_iter()
        .find(|role| match role_type_id {
            Some(type_id) => role.role_type_id.as_deref() == Some(type_id),
            None => role.name == TENANT_MEMBER_ROLE_NAME,
        })
        .and_then(|role| role.id)
        .ok_or(WorkflowError::MissingTenantMemberRole)
}

/// 按固定顺序执行示例步骤；每个远端调用只发送一次。
///
/// 每创建一个资源立即记入 `created`，失败时调用方据此清理。
pub async fn run_sample(
    api: &dyn HistorianApi,
    ctx: &TenantContext,
    options: &SampleOptions,
    created: &mut CreatedResources,
) -> Result<SampleReport, WorkflowError> {
    info!(target: "adh.workflow", "Creating a role");
    let role = Role::tenant_scoped(&options.custom_role_name, &ctx.tenant_id);
    let custom_role = api.create_role(ctx, &role).await.map_err(at("create_role"))?;
    let custom_role_id = require_id(custom_role.id.as_deref(), "role")?;
    created.role_id = Some(custom_role_id.clone());
    info!(target: "adh.workflow", role_id = %custom_role_id, "role created");

    let tenant_member_role_id =
        find_tenant_member_role_id(api, ctx, options.tenant_member_role_type_id.as_deref())
            .await?;

    info!(target: "adh.workflow", "Creating a user and invite them");
    let user = User {
        id: None,
        contact_given_name: options.contact.given_name.clone(),
        contact_surname: options.contact.surname.clone(),
        contact_email: options.contact.email.clone(),
        identity_provider_id: options.identity_provider_id.clone(),
        role_ids: vec![custom_role_id.clone(), tenant_member_role_id.clone()],
    };
    let user = api.create_user(ctx, &user).await.map_err(at("create_user"))?;
    let user_id = require_id(user.id.as_deref(), "user")?;
    created.user_id = Some(user_id.clone());
    api.create_or_update_invitation(ctx, &user_id, &UserInvitation::send())
        .await
        .map_err(at("create_or_update_invitation"))?;
    info!(target: "adh.workflow", user_id = %user_id, "user invited");

    info!(target: "adh.workflow", "Creating a type");
    let sds_type = api
        .get_or_create_type(ctx, &sample_type(&options.type_id))
        .await
        .map_err(at("get_or_create_type"))?;
    created.type_id = Some(sds_type.id.clone());

    info!(target: "adh.workflow", "Creating a stream");
    let stream = api
        .get_or_create_stream(ctx, &SdsStream::new(&options.stream_id, &sds_type.id))
        .await
        .map_err(at("get_or_create_stream"))?;
    created.stream_id = Some(stream.id.clone());

    info!(
        target: "adh.workflow",
        "Adding custom role to example type and stream access control lists using PUT"
    );
    let entry = AccessControlEntry::allowed(
        ctx.role_trustee(&custom_role_id),
        AccessRights::READ | AccessRights::WRITE,
    );

    let mut type_acl = api
        .get_type_access_control(ctx, &sds_type.id)
        .await
        .map_err(at("get_type_access_control"))?;
    type_acl.push(entry.clone());
    api.update_type_access_control(ctx, &sds_type.id, &type_acl)
        .await
        .map_err(at("update_type_access_control"))?;

    let mut stream_acl = api
        .get_stream_access_control(ctx, &stream.id)
        .await
        .map_err(at("get_stream_access_control"))?;
    stream_acl.push(entry.clone());
    api.update_stream_access_control(ctx, &stream.id, &stream_acl)
        .await
        .map_err(at("update_stream_access_control"))?;

    let default_acl = if options.update_default_acl {
        info!(target: "adh.workflow", "Adding custom role to the default streams access control list");
        let mut default_acl = api
            .get_default_stream_access_control(ctx)
            .await
            .map_err(at("get_default_stream_access_control"))?;
        default_acl.push(entry.clone());
        api.update_default_stream_access_control(ctx, &default_acl)
            .await
            .map_err(at("update_default_stream_access_control"))?;
        created.default_acl = Some(default_acl.clone());
        Some(default_acl)
    } else {
        None
    };

    info!(
        target: "adh.workflow",
        "Adding a role to the example stream access control list using PATCH"
    );
    let member_entry = AccessControlEntry::allowed(
        ctx.role_trustee(&tenant_member_role_id),
        AccessRights::NONE,
    );
    let patch = add_patch(ACL_ENTRIES_APPEND_PATH, &member_entry)?;
    api.patch_stream_access_control(ctx, &stream.id, &patch)
        .await
        .map_err(at("patch_stream_access_control"))?;
    stream_acl.push(member_entry);

    info!(target: "adh.workflow", "Changing owner of example stream");
    let previous_owner = api
        .get_stream_owner(ctx, &stream.id)
        .await
        .map_err(at("get_stream_owner"))?;
    info!(
        target: "adh.workflow",
        previous_owner = %previous_owner.object_id,
        new_owner = %user_id,
        "stream owner"
    );
    let owner = ctx.user_trustee(user_id.clone());
    api.update_stream_owner(ctx, &stream.id, &owner)
        .await
        .map_err(at("update_stream_owner"))?;

    info!(target: "adh.workflow", "Retrieving the access rights of the example stream");
    let access_rights = api
        .get_stream_access_rights(ctx, &stream.id)
        .await
        .map_err(at("get_stream_access_rights"))?;
    for access_right in &access_rights {
        info!(target: "adh.workflow", "{}", access_right);
    }

    let report = SampleReport {
        custom_role,
        tenant_member_role_id,
        user,
        sds_type,
        stream,
        type_acl,
        stream_acl,
        default_acl,
        owner,
        access_rights,
    };

    if options.verify {
        verify(api, ctx, &report).await?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_type_has_single_key() {
        let sds_type = sample_type("type-1");
        assert!(sds_type.has_key());
        let keys: Vec<&str> = sds_type
            .properties
            .iter()
            .filter(|property| property.is_key)
            .map(|property| property.id.as_str())
            .collect();
        assert_eq!(keys, vec!["DateTime"]);
        assert_eq!(sds_type.properties[1].sds_type.sds_type_code, SdsTypeCode::Int32);
    }

    #[test]
    fn require_id_rejects_empty() {
        assert!(matches!(
            require_id(Some(""), "role"),
            Err(WorkflowError::MissingId("role"))
        ));
        assert_eq!(require_id(Some("id-1"), "role").expect("id"), "id-1");
    }
}
