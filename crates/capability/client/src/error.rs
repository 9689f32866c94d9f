//! 客户端错误类型
//!
//! 封装远端调用的失败来源：
//! - 服务端返回的非 2xx 状态
//! - 网络与 token 获取错误
//! - 请求/响应体编解码错误

use adh_auth::AuthError;
use api_contract::ServiceErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),
    #[error("auth: {0}")]
    Auth(#[from] AuthError),
    #[error("decode: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// 由服务端状态码与响应体构造错误；能解析出错误体时使用其摘要。
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = ServiceErrorBody::parse(body)
            .map(|parsed| parsed.summary())
            .filter(|summary| !summary.is_empty())
            .unwrap_or_else(|| body.to_string());
        Self::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
