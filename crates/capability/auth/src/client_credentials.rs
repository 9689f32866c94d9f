use crate::{AuthError, TokenSource};
use api_contract::{ClientCredentialsRequest, OpenIdConfiguration, TokenResponse};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 提前刷新的余量（秒）。
const EXPIRY_MARGIN_SECONDS: i64 = 30;

/// OpenID 发现文档地址。
pub fn discovery_url(resource: &str) -> String {
    format!(
        "{}/identity/.well-known/openid-configuration",
        resource.trim_end_matches('/')
    )
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// 绝对过期时间（epoch 秒，已扣除余量）。
    expires_at: i64,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: i64) -> Self {
        Self {
            access_token: response.access_token,
            expires_at: now + response.expires_in as i64 - EXPIRY_MARGIN_SECONDS,
        }
    }

    fn is_fresh(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// client credentials 授权。首次使用时发现 token 端点并获取 token，之后缓存到过期前。
pub struct ClientCredentials {
    http: reqwest::Client,
    resource: String,
    client_id: String,
    client_secret: String,
    token_endpoint: RwLock<Option<String>>,
    cached: RwLock<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        resource: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            resource: resource.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint: RwLock::new(None),
            cached: RwLock::new(None),
        }
    }

    async fn token_endpoint(&self) -> Result<String, AuthError> {
        if let Some(endpoint) = self.token_endpoint.read().await.as_ref() {
            return Ok(endpoint.clone());
        }

        let url = discovery_url(&self.resource);
        debug!(target: "adh.auth", url = %url, "openid_discovery");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Discovery(format!("{}: {}", status.as_u16(), body)));
        }
        let config: OpenIdConfiguration = response
            .json()
            .await
            .map_err(|err| AuthError::Discovery(err.to_string()))?;

        *self.token_endpoint.write().await = Some(config.token_endpoint.clone());
        Ok(config.token_endpoint)
    }

    async fn request_token(&self) -> Result<CachedToken, AuthError> {
        let endpoint = self.token_endpoint().await?;
        let response = self
            .http
            .post(&endpoint)
            .form(&ClientCredentialsRequest::new(&self.client_id, &self.client_secret))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Decode(err.to_string()))?;
        info!(target: "adh.auth", expires_in = token.expires_in, "access_token_acquired");
        Ok(CachedToken::from_response(token, chrono::Utc::now().timestamp()))
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn token(&self) -> Result<String, AuthError> {
        {
            let guard = self.cached.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.is_fresh(chrono::Utc::now().timestamp()) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut guard = self.cached.write().await;
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh(chrono::Utc::now().timestamp()) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }
}
