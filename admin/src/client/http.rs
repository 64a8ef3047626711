use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CrudClient, GetOptions, RequestError, Resource};
use crate::models::common::QueryParams;

/// reqwest-backed [`CrudClient`] for every [`Resource`].
///
/// Paths are `{base}/{PATH}` for create/list and `{base}/{PATH}/{id}` for
/// reads, with the id encoded as a single path segment. The caller's bearer
/// token, when set, is forwarded on each request.
#[derive(Clone, Debug)]
pub struct HttpCrudClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpCrudClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Remote base URL cannot carry a path: {}", base_url);
        }
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Copy of this client that acts on behalf of the given caller.
    pub fn authorized(&self, token: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends each segment percent-encoded, so `/`, `?` and `#` inside an id
    /// stay part of that id.
    pub fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.url_for(segments));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        op: &'static str,
        entity: &'static str,
    ) -> Result<T, RequestError> {
        let response = builder.send().await.map_err(|e| {
            warn!(op, entity, "Remote request failed: {}", e);
            RequestError::new(format!("Could not reach the server: {}", e))
        })?;

        let status = response.status();
        debug!(op, entity, status = status.as_u16(), "Remote response");

        if !status.is_success() {
            let err = error_from_response(response).await;
            warn!(op, entity, status = status.as_u16(), "Remote rejected request: {}", err);
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            warn!(op, entity, "Undecodable remote response: {}", e);
            RequestError::with_status(status.as_u16(), format!("Invalid response from server: {}", e))
        })
    }
}

/// Pulls a human-readable message out of an error response.
async fn error_from_response(response: Response) -> RequestError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    RequestError::with_status(status.as_u16(), message)
}

#[async_trait]
impl<R: Resource> CrudClient<R> for HttpCrudClient {
    async fn create(&self, input: &R::Input) -> Result<R, RequestError> {
        let builder = self.request(Method::POST, &[R::PATH]).json(input);
        self.send(builder, "create", R::ENTITY).await
    }

    async fn get_by_id(&self, id: &str, options: &GetOptions) -> Result<R, RequestError> {
        let mut builder = self.request(Method::GET, &[R::PATH, id]);
        if !options.relations.is_empty() {
            builder = builder.query(&[("relations", options.relations.join(","))]);
        }
        self.send(builder, "get_by_id", R::ENTITY).await
    }

    async fn list(&self, query: &R::Query) -> Result<Vec<R>, RequestError> {
        let pairs = query.query_pairs();
        let builder = self.request(Method::GET, &[R::PATH]).query(&pairs);
        self.send(builder, "list", R::ENTITY).await
    }
}
