//! Resource client over the backend REST API (base path `/api`).
//!
//! One method per endpoint. Every request first asks the [`TokenProvider`]
//! for the session token and attaches it as a bearer credential; non-success
//! statuses map onto [`ClientError`]. No retries, no client-side timeouts
//! beyond transport defaults, no cancellation once dispatched.

use api_types::{
    balance::Balance,
    group::{Group, GroupNew, GroupUpdate, MemberAdd},
    instance::{Instance, InstanceNew, InstanceUpdate},
    item::{Item, ItemNew, ItemUpdate},
};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::{
    auth::TokenProvider,
    error::{ClientError, Result},
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient<P> {
    http: reqwest::Client,
    base_url: String,
    tokens: P,
}

impl<P: TokenProvider> ApiClient<P> {
    pub fn new(base_url: impl Into<String>, tokens: P) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, tokens)
    }

    /// Builds the client around an existing `reqwest::Client`, e.g. one
    /// shared with other services.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, tokens: P) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Attaches the current session token, if any. A provider failure
    /// rejects the call before anything reaches the wire.
    async fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match self.tokens.id_token().await? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => {
                tracing::debug!("no session token, sending anonymous request");
                Ok(req)
            }
        }
    }

    async fn send_json<TResp: for<'de> serde::Deserialize<'de>>(
        &self,
        req: RequestBuilder,
    ) -> Result<TResp> {
        let resp = self.authorize(req).await?.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<TResp>().await?);
        }
        Err(error_for_status(status, resp).await)
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<()> {
        let resp = self.authorize(req).await?.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(error_for_status(status, resp).await)
    }

    async fn get_json<TResp: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> Result<TResp> {
        self.send_json(self.http.get(self.url(path))).await
    }

    async fn post_json<TReq, TResp>(&self, path: &str, body: &TReq) -> Result<TResp>
    where
        TReq: serde::Serialize + ?Sized,
        TResp: for<'de> serde::Deserialize<'de>,
    {
        self.send_json(self.http.post(self.url(path)).json(body))
            .await
    }

    async fn post_unit<TReq: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<()> {
        self.send_unit(self.http.post(self.url(path)).json(body))
            .await
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        self.send_unit(self.http.post(self.url(path))).await
    }

    async fn put_json<TReq, TResp>(&self, path: &str, body: &TReq) -> Result<TResp>
    where
        TReq: serde::Serialize + ?Sized,
        TResp: for<'de> serde::Deserialize<'de>,
    {
        self.send_json(self.http.put(self.url(path)).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send_unit(self.http.delete(self.url(path))).await
    }

    // Groups

    pub async fn groups(&self) -> Result<Vec<Group>> {
        self.get_json("groups/").await
    }

    pub async fn group(&self, id: i64) -> Result<Group> {
        self.get_json(&format!("groups/{id}/")).await
    }

    pub async fn create_group(&self, payload: &GroupNew) -> Result<Group> {
        self.post_json("groups/", payload).await
    }

    pub async fn update_group(&self, id: i64, payload: &GroupUpdate) -> Result<Group> {
        self.put_json(&format!("groups/{id}/"), payload).await
    }

    pub async fn delete_group(&self, id: i64) -> Result<()> {
        self.delete(&format!("groups/{id}/")).await
    }

    /// Removes the caller from the group's member list. A domain action
    /// rather than a field update: the server mutates membership.
    pub async fn leave_group(&self, id: i64) -> Result<()> {
        self.post_empty(&format!("groups/{id}/leave_group/")).await
    }

    /// Invites a user into the group by email. The server resolves the
    /// address and applies its invitation semantics.
    pub async fn add_member(&self, group_id: i64, payload: &MemberAdd) -> Result<()> {
        self.post_unit(&format!("groups/{group_id}/add_member/"), payload)
            .await
    }

    // Instances

    pub async fn instances(&self) -> Result<Vec<Instance>> {
        self.get_json("instances/").await
    }

    pub async fn instance(&self, id: i64) -> Result<Instance> {
        self.get_json(&format!("instances/{id}/")).await
    }

    pub async fn create_instance(&self, payload: &InstanceNew) -> Result<Instance> {
        self.post_json("instances/", payload).await
    }

    pub async fn update_instance(&self, id: i64, payload: &InstanceUpdate) -> Result<Instance> {
        self.put_json(&format!("instances/{id}/"), payload).await
    }

    pub async fn delete_instance(&self, id: i64) -> Result<()> {
        self.delete(&format!("instances/{id}/")).await
    }

    // Items

    pub async fn items(&self) -> Result<Vec<Item>> {
        self.get_json("items/").await
    }

    pub async fn item(&self, id: i64) -> Result<Item> {
        self.get_json(&format!("items/{id}/")).await
    }

    pub async fn create_item(&self, payload: &ItemNew) -> Result<Item> {
        self.post_json("items/", payload).await
    }

    pub async fn update_item(&self, id: i64, payload: &ItemUpdate) -> Result<Item> {
        self.put_json(&format!("items/{id}/"), payload).await
    }

    pub async fn delete_item(&self, id: i64) -> Result<()> {
        self.delete(&format!("items/{id}/")).await
    }

    // Balances (server-computed, read-only)

    pub async fn balances(&self) -> Result<Vec<Balance>> {
        self.get_json("balances/").await
    }
}

async fn error_for_status(status: StatusCode, resp: reqwest::Response) -> ClientError {
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => "unknown error".to_string(),
    };

    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        400 | 422 => ClientError::Validation(message),
        _ => ClientError::Server(message),
    }
}
