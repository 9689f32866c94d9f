use adh_config::{AppSettings, ConfigError, DEFAULT_CUSTOM_ROLE_NAME};
use std::collections::HashMap;

const SETTINGS: &str = r#"{
    "Resource": "https://uswe.datahub.example.com/",
    "ApiVersion": "v1",
    "TenantId": "tenant-1",
    "NamespaceId": "namespace-1",
    "ClientId": "client-1",
    "ClientSecret": "secret",
    "ContactGivenName": "Ada",
    "ContactSurname": "Lovelace",
    "ContactEmail": "ada@example.com"
}"#;

fn no_env(_key: &str) -> Option<String> {
    None
}

#[test]
fn parse_settings_file() {
    let settings = AppSettings::parse(SETTINGS, no_env).expect("settings");
    assert_eq!(settings.resource, "https://uswe.datahub.example.com");
    assert_eq!(settings.tenant_id, "tenant-1");
    assert_eq!(settings.namespace_id, "namespace-1");
    assert_eq!(settings.contact_email.as_deref(), Some("ada@example.com"));
    assert_eq!(settings.custom_role_name, DEFAULT_CUSTOM_ROLE_NAME);
    assert!(settings.tenant_member_role_type_id.is_none());
}

#[test]
fn env_overrides_file_values() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ADH_CLIENT_SECRET", "from-env"),
        ("ADH_TENANT_MEMBER_ROLE_TYPE_ID", "member-type"),
        ("ADH_CONTACT_SURNAME", ""),
    ]);
    let settings = AppSettings::parse(SETTINGS, |key| env.get(key).map(|v| v.to_string()))
        .expect("settings");
    assert_eq!(settings.client_secret, "from-env");
    assert_eq!(settings.tenant_member_role_type_id.as_deref(), Some("member-type"));
    assert_eq!(settings.contact_surname.as_deref(), Some("Lovelace"));
}

#[test]
fn missing_required_key_is_reported() {
    let text = SETTINGS.replace("\"NamespaceId\": \"namespace-1\",", "");
    let result = AppSettings::parse(&text, no_env);
    assert!(matches!(result, Err(ConfigError::Missing(key)) if key == "NamespaceId"));
}

#[test]
fn malformed_file_is_reported() {
    let result = AppSettings::parse("{ \"Resource\": ", no_env);
    assert!(matches!(result, Err(ConfigError::Malformed(_))));
}

#[test]
fn resource_must_be_a_url() {
    let text = SETTINGS.replace("https://uswe.datahub.example.com/", "datahub");
    let result = AppSettings::parse(&text, no_env);
    assert!(matches!(result, Err(ConfigError::Invalid(key, _)) if key == "Resource"));
}

#[test]
fn missing_file_is_reported() {
    let result = AppSettings::load("does-not-exist/appsettings.json");
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}
