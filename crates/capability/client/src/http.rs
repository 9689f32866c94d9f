//! 基于 reqwest 的远端 API 实现。
//!
//! 路径规则：`{resource}/api/{version}/Tenants/{tenant}/...`，
//! 命名空间内资源位于 `.../Namespaces/{namespace}/...`。

use crate::error::ClientError;
use crate::traits::{RolesApi, StreamsApi, TypesApi, UsersApi};
use adh_auth::TokenSource;
use api_contract::{JSON_PATCH_CONTENT_TYPE, Patch, UserInvitation};
use async_trait::async_trait;
use domain::{AccessControlList, Role, SdsStream, SdsType, TenantContext, Trustee, User};
use reqwest::{Method, RequestBuilder, Response, Url, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// HTTP 客户端（每次调用前向 TokenSource 取 bearer token）。
pub struct HttpHistorianClient {
    http: reqwest::Client,
    resource: String,
    api_version: String,
    token_source: Arc<dyn TokenSource>,
}

impl HttpHistorianClient {
    pub fn new(
        http: reqwest::Client,
        resource: impl Into<String>,
        api_version: impl Into<String>,
        token_source: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            http,
            resource: resource.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            token_source,
        }
    }

    /// 租户级 URL；`segments` 逐段追加并做百分号编码。
    pub fn tenant_url(&self, ctx: &TenantContext, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.resource)
            .map_err(|err| ClientError::InvalidRequest(format!("resource url: {}", err)))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!("resource url cannot be a base: {}", self.resource))
            })?;
            path.pop_if_empty()
                .extend(["api", self.api_version.as_str(), "Tenants", ctx.tenant_id.as_str()])
                .extend(segments);
        }
        Ok(url)
    }

    /// 命名空间级 URL。
    pub fn namespace_url(
        &self,
        ctx: &TenantContext,
        segments: &[&str],
    ) -> Result<Url, ClientError> {
        let mut all = vec!["Namespaces", ctx.namespace_id.as_str()];
        all.extend_from_slice(segments);
        self.tenant_url(ctx, &all)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ClientError> {
        let token = self.token_source.token().await?;
        debug!(target: "adh.client", method = %method, url = %url, "request");
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// 校验状态码，失败时读取响应体构造错误。
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        debug!(target: "adh.client", status = status.as_u16(), url = %response.url(), "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status.as_u16(), &body))
    }

    async fn parse<R: DeserializeOwned>(response: Response) -> Result<R, ClientError> {
        let response = Self::check(response).await?;
        response
            .json::<R>()
            .await
            .map_err(|err| ClientError::Decode(format!("response body: {}", err)))
    }

    async fn send_json<B, R>(&self, method: Method, url: Url, body: &B) -> Result<R, ClientError>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.request(method, url).await?.json(body).send().await?;
        Self::parse(response).await
    }

    async fn send_json_no_content<B>(&self, method: Method, url: Url, body: &B) -> Result<(), ClientError>
    where
        B: serde::Serialize + Sync,
    {
        let response = self.request(method, url).await?.json(body).send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R, ClientError> {
        let response = self.request(Method::GET, url).await?.send().await?;
        Self::parse(response).await
    }

    async fn delete(&self, url: Url) -> Result<(), ClientError> {
        let response = self.request(Method::DELETE, url).await?.send().await?;
        Self::check(response).await.map(|_| ())
    }
}

#[async_trait]
impl RolesApi for HttpHistorianClient {
    async fn create_role(&self, ctx: &TenantContext, role: &Role) -> Result<Role, ClientError> {
        let url = self.tenant_url(ctx, &["Roles"])?;
        self.send_json(Method::POST, url, role).await
    }

    async fn list_roles(&self, ctx: &TenantContext) -> Result<Vec<Role>, ClientError> {
        let url = self.tenant_url(ctx, &["Roles"])?;
        self.get(url).await
    }

    async fn delete_role(&self, ctx: &TenantContext, role_id: &str) -> Result<(), ClientError> {
        let url = self.tenant_url(ctx, &["Roles", role_id])?;
        self.delete(url).await
    }
}

#[async_trait]
impl UsersApi for HttpHistorianClient {
    async fn create_user(&self, ctx: &TenantContext, user: &User) -> Result<User, ClientError> {
        let url = self.tenant_url(ctx, &["Users"])?;
        self.send_json(Method::POST, url, user).await
    }

    async fn create_or_update_invitation(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        invitation: &UserInvitation,
    ) -> Result<(), ClientError> {
        let url = self.tenant_url(ctx, &["Users", user_id, "Invitation"])?;
        self.send_json_no_content(Method::PUT, url, invitation).await
    }

    async fn delete_user(&self, ctx: &TenantContext, user_id: &str) -> Result<(), ClientError> {
        let url = self.tenant_url(ctx, &["Users", user_id])?;
        self.delete(url).await
    }
}

#[async_trait]
impl TypesApi for HttpHistorianClient {
    async fn get_or_create_type(
        &self,
        ctx: &TenantContext,
        sds_type: &SdsType,
    ) -> Result<SdsType, ClientError> {
        let url = self.namespace_url(ctx, &["Types", sds_type.id.as_str()])?;
        self.send_json(Method::POST, url, sds_type).await
    }

    async fn get_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
    ) -> Result<AccessControlList, ClientError> {
        let url = self.namespace_url(ctx, &["Types", type_id, "AccessControl"])?;
        self.get(url).await
    }

    async fn update_type_access_control(
        &self,
        ctx: &TenantContext,
        type_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Types", type_id, "AccessControl"])?;
        self.send_json_no_content(Method::PUT, url, acl).await
    }

    async fn delete_type(&self, ctx: &TenantContext, type_id: &str) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Types", type_id])?;
        self.delete(url).await
    }
}

#[async_trait]
impl StreamsApi for HttpHistorianClient {
    async fn get_or_create_stream(
        &self,
        ctx: &TenantContext,
        stream: &SdsStream,
    ) -> Result<SdsStream, ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream.id.as_str()])?;
        self.send_json(Method::POST, url, stream).await
    }

    async fn get_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<AccessControlList, ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "AccessControl"])?;
        self.get(url).await
    }

    async fn update_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "AccessControl"])?;
        self.send_json_no_content(Method::PUT, url, acl).await
    }

    async fn patch_stream_access_control(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        patch: &Patch,
    ) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "AccessControl"])?;
        let body = serde_json::to_vec(patch)?;
        let response = self
            .request(Method::PATCH, url)
            .await?
            .header(header::CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn get_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Trustee, ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "Owner"])?;
        self.get(url).await
    }

    async fn update_stream_owner(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
        owner: &Trustee,
    ) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "Owner"])?;
        self.send_json_no_content(Method::PUT, url, owner).await
    }

    async fn get_stream_access_rights(
        &self,
        ctx: &TenantContext,
        stream_id: &str,
    ) -> Result<Vec<String>, ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id, "AccessRights"])?;
        self.get(url).await
    }

    async fn get_default_stream_access_control(
        &self,
        ctx: &TenantContext,
    ) -> Result<AccessControlList, ClientError> {
        let url = self.namespace_url(ctx, &["AccessControl", "Streams"])?;
        self.get(url).await
    }

    async fn update_default_stream_access_control(
        &self,
        ctx: &TenantContext,
        acl: &AccessControlList,
    ) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["AccessControl", "Streams"])?;
        self.send_json_no_content(Method::PUT, url, acl).await
    }

    async fn delete_stream(&self, ctx: &TenantContext, stream_id: &str) -> Result<(), ClientError> {
        let url = self.namespace_url(ctx, &["Streams", stream_id])?;
        self.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adh_auth::StaticToken;

    fn client(resource: &str) -> HttpHistorianClient {
        HttpHistorianClient::new(
            reqwest::Client::new(),
            resource,
            "v1",
            Arc::new(StaticToken::new("token")),
        )
    }

    #[test]
    fn tenant_url_appends_segments() {
        let ctx = TenantContext::new("tenant-1", "namespace-1");
        let url = client("https://datahub.example.com/")
            .tenant_url(&ctx, &["Roles", "role-1"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://datahub.example.com/api/v1/Tenants/tenant-1/Roles/role-1"
        );
    }

    #[test]
    fn namespace_url_encodes_ids() {
        let ctx = TenantContext::new("tenant-1", "namespace-1");
        let url = client("https://datahub.example.com")
            .namespace_url(&ctx, &["Streams", "stream one", "AccessControl"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://datahub.example.com/api/v1/Tenants/tenant-1/Namespaces/namespace-1/Streams/stream%20one/AccessControl"
        );
    }

    #[test]
    fn default_acl_url_is_collection_scoped() {
        let ctx = TenantContext::new("tenant-1", "namespace-1");
        let url = client("https://datahub.example.com")
            .namespace_url(&ctx, &["AccessControl", "Streams"])
            .expect("url");
        assert!(url.as_str().ends_with("/Namespaces/namespace-1/AccessControl/Streams"));
    }

    #[test]
    fn invalid_resource_is_rejected() {
        let ctx = TenantContext::default();
        let result = client("not a url").tenant_url(&ctx, &["Roles"]);
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }
}
