use api_contract::{
    ACL_ENTRIES_APPEND_PATH, ClientCredentialsRequest, Patch, PatchBuildError, PatchOperation,
    TokenResponse, UserInvitation, add_patch,
};
use serde_json::json;

#[test]
fn add_patch_serializes_as_array() {
    let patch = add_patch(ACL_ENTRIES_APPEND_PATH, &json!({ "AccessRights": 0 })).expect("add");
    let value = serde_json::to_value(&patch).expect("serialize");
    assert_eq!(
        value,
        json!([{
            "op": "add",
            "path": "/RoleTrusteeAccessControlEntries/-",
            "value": { "AccessRights": 0 }
        }])
    );
}

#[test]
fn add_patch_rejects_relative_path() {
    let result = add_patch("RoleTrusteeAccessControlEntries", &1);
    assert!(matches!(result, Err(PatchBuildError::Path(_, _))));
}

#[test]
fn patch_parses_every_operation_kind() {
    let body = r#"[
        {"op":"replace","path":"/Name","value":"x"},
        {"op":"copy","from":"/Items/0","path":"/Items/-"},
        {"op":"move","from":"/Items/0","path":"/Other"}
    ]"#;
    let patch: Patch = serde_json::from_str(body).expect("parse");
    assert_eq!(patch.0.len(), 3);
    assert!(matches!(patch.0[0], PatchOperation::Replace(_)));
    assert!(matches!(patch.0[1], PatchOperation::Copy(_)));
    assert!(matches!(patch.0[2], PatchOperation::Move(_)));
}

#[test]
fn invitation_is_pascal_case() {
    let value = serde_json::to_value(UserInvitation::send()).expect("serialize");
    assert_eq!(value, json!({ "SendInvitation": true }));
}

#[test]
fn client_credentials_request_has_grant_type() {
    let value = serde_json::to_value(ClientCredentialsRequest::new("id", "secret")).expect("json");
    assert_eq!(value["grant_type"], "client_credentials");
    assert_eq!(value["client_id"], "id");
    assert_eq!(value["client_secret"], "secret");
}

#[test]
fn token_response_parses() {
    let body = r#"{"access_token":"abc","expires_in":3600,"token_type":"Bearer"}"#;
    let token: TokenResponse = serde_json::from_str(body).expect("parse");
    assert_eq!(token.access_token, "abc");
    assert_eq!(token.expires_in, 3600);
}
