//! CRUD client for the remote persistence service.
//!
//! One [`CrudClient`] operation is one network request: no retries, no
//! caching and no optimistic updates. Every failure collapses into a
//! [`RequestError`] that callers display as-is.

mod http;

pub use http::HttpCrudClient;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::models::common::QueryParams;

/// An entity type persisted by the remote service.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Singular entity name used for permission checks, e.g. `order`.
    const ENTITY: &'static str;
    /// Plural route and remote path segment, e.g. `orders`.
    const PATH: &'static str;
    /// Create payload.
    type Input: Serialize + Send + Sync;
    /// Listing filter.
    type Query: QueryParams + Send + Sync;

    fn list_route() -> String {
        format!("/{}", Self::PATH)
    }
}

/// Options for a single-record read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub relations: Vec<String>,
}

impl GetOptions {
    pub fn with_relations<I, S>(relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relations: relations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Any failure reported by the remote service or the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
    status: Option<u16>,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

#[async_trait]
pub trait CrudClient<R: Resource>: Send + Sync {
    /// Persists a new record; the returned record carries the assigned id
    /// and timestamps.
    async fn create(&self, input: &R::Input) -> Result<R, RequestError>;

    async fn get_by_id(&self, id: &str, options: &GetOptions) -> Result<R, RequestError>;

    /// Ordering and paging are whatever the remote service applies.
    async fn list(&self, query: &R::Query) -> Result<Vec<R>, RequestError>;
}
