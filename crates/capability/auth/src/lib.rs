//! 认证能力：OpenID 发现 + client credentials 获取 bearer token。

mod client_credentials;

use async_trait::async_trait;

pub use client_credentials::{ClientCredentials, discovery_url};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token endpoint discovery failed: {0}")]
    Discovery(String),
    #[error("token request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid token response: {0}")]
    Decode(String),
}

/// 可替换的 token 提供者：每次请求前调用。
///
/// 实现负责获取、缓存与刷新 token。
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String, AuthError>;
}

/// 固定 token（外部已获取）。
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}
