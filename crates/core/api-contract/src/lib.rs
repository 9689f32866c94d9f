//! 稳定的线上 DTO：JSON Patch、用户邀请、token 与服务端错误体。
//!
//! JSON Patch 文档直接使用 `json_patch::Patch`（RFC 6902）。

use serde::{Deserialize, Serialize};

/// JSON Patch 追加 ACL 条目的路径（`-` 表示数组末尾）。
pub const ACL_ENTRIES_APPEND_PATH: &str = "/RoleTrusteeAccessControlEntries/-";

/// JSON Patch 请求体的 Content-Type。
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

pub use json_patch::{AddOperation, Patch, PatchOperation};

/// 构造 JSON Patch 文档失败。
#[derive(Debug, thiserror::Error)]
pub enum PatchBuildError {
    #[error("invalid patch path {0}: {1}")]
    Path(String, String),
    #[error("cannot serialize patch value: {0}")]
    Value(#[from] serde_json::Error),
}

/// 单条 `add` 操作组成的补丁；value 先序列化为 JSON。
pub fn add_patch(path: &str, value: &impl Serialize) -> Result<Patch, PatchBuildError> {
    let pointer = jsonptr::PointerBuf::parse(path)
        .map_err(|err| PatchBuildError::Path(path.to_string(), err.to_string()))?;
    Ok(Patch(vec![PatchOperation::Add(AddOperation {
        path: pointer,
        value: serde_json::to_value(value)?,
    })]))
}

/// 用户邀请请求体。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInvitation {
    pub send_invitation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl UserInvitation {
    /// 创建并立即发送邀请邮件。
    pub fn send() -> Self {
        Self {
            send_invitation: true,
            id: None,
            user_id: None,
            expires: None,
        }
    }
}

/// OpenID 发现文档（仅取所需字段）。
#[derive(Debug, Clone, Deserialize)]
pub struct OpenIdConfiguration {
    pub token_endpoint: String,
}

/// client credentials 授权请求（表单编码）。
#[derive(Debug, Clone, Serialize)]
pub struct ClientCredentialsRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl<'a> ClientCredentialsRequest<'a> {
    pub fn new(client_id: &'a str, client_secret: &'a str) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id,
            client_secret,
        }
    }
}

/// token 端点响应体。
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// 服务端失败响应体（字段均可能缺失）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl ServiceErrorBody {
    /// 解析错误体；非 JSON 时返回 None。
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body).ok()
    }

    /// 拼接成单行可读信息。
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(error) = &self.error {
            parts.push(error.clone());
        }
        if let Some(reason) = &self.reason {
            parts.push(format!("reason: {}", reason));
        }
        if let Some(resolution) = &self.resolution {
            parts.push(format!("resolution: {}", resolution));
        }
        if let Some(operation_id) = &self.operation_id {
            parts.push(format!("operation: {}", operation_id));
        }
        parts.join("; ")
    }
}
