pub mod access;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod detail;
pub mod entity;
pub mod error;
pub mod form;
pub mod models;
pub mod schema;

use std::time::Duration;

use auth::AccessContext;
use client::HttpCrudClient;
use config::Config;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub client: HttpCrudClient,
    pub jwt_secret: String,
    pub auth_redirect_to: String,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpCrudClient::new(
                &cfg.remote_api_url,
                Duration::from_secs(cfg.remote_timeout_secs),
            )?,
            jwt_secret: cfg.jwt_secret.clone(),
            auth_redirect_to: cfg.auth_redirect_to.clone(),
        })
    }

    /// Remote client acting on behalf of the caller.
    pub fn client_for(&self, ctx: &AccessContext) -> HttpCrudClient {
        match ctx.token() {
            Some(token) => self.client.authorized(token),
            None => self.client.clone(),
        }
    }
}
