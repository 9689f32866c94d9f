//! 示例运行配置加载：`appsettings.json` + `ADH_*` 环境变量覆盖。

use serde::Deserialize;
use std::env;
use std::path::Path;

/// 默认配置文件（相对当前工作目录）。
pub const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";

/// 未配置时使用的自定义角色名。
pub const DEFAULT_CUSTOM_ROLE_NAME: &str = "custom role - security management sample";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings file {0}: {1}")]
    Io(String, std::io::Error),
    #[error("malformed settings file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing required setting: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 示例运行配置。
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub resource: String,
    pub api_version: String,
    pub tenant_id: String,
    pub namespace_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub contact_given_name: Option<String>,
    pub contact_surname: Option<String>,
    pub contact_email: Option<String>,
    /// 租户成员内置角色的 RoleTypeId；未配置时按角色名查找。
    pub tenant_member_role_type_id: Option<String>,
    pub identity_provider_id: Option<String>,
    pub custom_role_name: String,
}

/// 文件中的原始键值（键名与服务端示例保持一致）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSettings {
    resource: Option<String>,
    api_version: Option<String>,
    tenant_id: Option<String>,
    namespace_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    contact_given_name: Option<String>,
    contact_surname: Option<String>,
    contact_email: Option<String>,
    tenant_member_role_type_id: Option<String>,
    identity_provider_id: Option<String>,
    custom_role_name: Option<String>,
}

impl AppSettings {
    /// 从文件读取配置，并用进程环境变量覆盖。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.display().to_string(), err))?;
        Self::parse(&text, |key| env::var(key).ok())
    }

    /// 解析 JSON 文本；`lookup` 提供 `ADH_*` 覆盖值（测试可注入）。
    pub fn parse(text: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(text)?;
        let read = |key: &str, file_value: Option<String>| -> Option<String> {
            match lookup(&env_key(key)) {
                Some(value) if !value.trim().is_empty() => Some(value),
                _ => file_value.filter(|value| !value.trim().is_empty()),
            }
        };
        let require = |key: &str, file_value: Option<String>| -> Result<String, ConfigError> {
            read(key, file_value).ok_or_else(|| ConfigError::Missing(key.to_string()))
        };

        let resource = require("Resource", raw.resource)?;
        if !(resource.starts_with("https://") || resource.starts_with("http://")) {
            return Err(ConfigError::Invalid("Resource".to_string(), resource));
        }
        let resource = resource.trim_end_matches('/').to_string();
        let api_version = require("ApiVersion", raw.api_version)?;
        let tenant_id = require("TenantId", raw.tenant_id)?;
        let namespace_id = require("NamespaceId", raw.namespace_id)?;
        let client_id = require("ClientId", raw.client_id)?;
        let client_secret = require("ClientSecret", raw.client_secret)?;
        let contact_given_name = read("ContactGivenName", raw.contact_given_name);
        let contact_surname = read("ContactSurname", raw.contact_surname);
        let contact_email = read("ContactEmail", raw.contact_email);
        let tenant_member_role_type_id =
            read("TenantMemberRoleTypeId", raw.tenant_member_role_type_id);
        let identity_provider_id = read("IdentityProviderId", raw.identity_provider_id);
        let custom_role_name = read("CustomRoleName", raw.custom_role_name)
            .unwrap_or_else(|| DEFAULT_CUSTOM_ROLE_NAME.to_string());

        Ok(Self {
            resource,
            api_version,
            tenant_id,
            namespace_id,
            client_id,
            client_secret,
            contact_given_name,
            contact_surname,
            contact_email,
            tenant_member_role_type_id,
            identity_provider_id,
            custom_role_name,
        })
    }
}

/// `ContactEmail` -> `ADH_CONTACT_EMAIL`。
fn env_key(key: &str) -> String {
    let mut out = String::from("ADH_");
    for (index, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() && index > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::env_key;

    #[test]
    fn env_key_splits_pascal_case() {
        assert_eq!(env_key("TenantId"), "ADH_TENANT_ID");
        assert_eq!(env_key("ContactEmail"), "ADH_CONTACT_EMAIL");
        assert_eq!(env_key("Resource"), "ADH_RESOURCE");
    }
}
