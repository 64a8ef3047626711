//! Single-record detail view.
//!
//! Fetches are keyed by record id. A new id supersedes the previous fetch:
//! results are only applied while their key is still the latest one, so a
//! slow response for an old id can never overwrite the current view.

use std::marker::PhantomData;

use tracing::debug;

use crate::client::{CrudClient, GetOptions, RequestError, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<R> {
    Loading,
    Error(RequestError),
    Loaded(R),
}

impl<R> ViewState<R> {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Loaded(_) => "loaded",
        }
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            ViewState::Loaded(r) => Some(r),
            _ => None,
        }
    }
}

/// Ticket for one in-flight read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    key: String,
    generation: u64,
}

impl Fetch {
    pub fn id(&self) -> &str {
        &self.key
    }
}

pub struct DetailView<R, C> {
    client: C,
    options: GetOptions,
    key: Option<String>,
    generation: u64,
    state: ViewState<R>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, C> DetailView<R, C>
where
    R: Resource,
    C: CrudClient<R>,
{
    /// `relations` is the fixed expansion set used for every fetch.
    pub fn new(client: C, relations: &[&str]) -> Self {
        Self {
            client,
            options: GetOptions::with_relations(relations.iter().copied()),
            key: None,
            generation: 0,
            state: ViewState::Loading,
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> &ViewState<R> {
        &self.state
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Keys a fetch for `id`. Returns `None` when there is nothing to fetch:
    /// no id yet, or the same id as the current key.
    pub fn request(&mut self, id: Option<&str>) -> Option<Fetch> {
        let id = id.filter(|id| !id.is_empty())?;
        if self.key.as_deref() == Some(id) {
            return None;
        }

        self.generation += 1;
        self.key = Some(id.to_string());
        self.state = ViewState::Loading;

        Some(Fetch {
            key: id.to_string(),
            generation: self.generation,
        })
    }

    pub async fn run(&self, fetch: &Fetch) -> Result<R, RequestError> {
        self.client.get_by_id(&fetch.key, &self.options).await
    }

    /// Applies a finished fetch. Returns `false` if it was superseded.
    pub fn complete(&mut self, fetch: Fetch, result: Result<R, RequestError>) -> bool {
        if fetch.generation != self.generation {
            debug!(
                entity = R::ENTITY,
                id = %fetch.key,
                "Discarding superseded fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(record) => ViewState::Loaded(record),
            Err(e) => {
                debug!(entity = R::ENTITY, id = %fetch.key, "Fetch failed: {}", e);
                ViewState::Error(e)
            }
        };
        true
    }

    /// Requests, runs and applies a fetch for `id` if its key changed.
    pub async fn show(&mut self, id: Option<&str>) -> &ViewState<R> {
        if let Some(fetch) = self.request(id) {
            let result = self.run(&fetch).await;
            self.complete(fetch, result);
        }
        &self.state
    }
}
