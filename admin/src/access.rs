//! Access gate: an ordered chain of guards checked before a page renders.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{AccessContext, Grant, Operation, Service};
use crate::entity::resolve_route_entity;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The caller must be signed in; otherwise redirect to `redirect_to`.
    Authenticated { redirect_to: String },
    /// The caller must hold this grant.
    Permission(Grant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Redirect(String),
    Forbidden(Grant),
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        match self {
            Denial::Redirect(location) => Redirect::to(&location).into_response(),
            Denial::Forbidden(_) => AppError::Forbidden.into_response(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gate {
    guards: Vec<Guard>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_authenticated(mut self, redirect_to: &str) -> Self {
        self.guards.push(Guard::Authenticated {
            redirect_to: redirect_to.to_string(),
        });
        self
    }

    pub fn require(mut self, grant: Grant) -> Self {
        self.guards.push(Guard::Permission(grant));
        self
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Runs the guards in order; the first failure wins.
    pub fn check(&self, ctx: &AccessContext) -> Result<(), Denial> {
        for guard in &self.guards {
            match guard {
                Guard::Authenticated { redirect_to } => {
                    if !ctx.is_authenticated() {
                        return Err(Denial::Redirect(redirect_to.clone()));
                    }
                }
                Guard::Permission(grant) => {
                    if !ctx.has_access(&grant.entity, grant.operation, grant.service) {
                        return Err(Denial::Forbidden(grant.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Permission a page path needs: `/orders/create` -> (order, CREATE),
/// `/orders/view/1` -> (order, READ). `None` for the root path.
pub fn route_permission(path: &str) -> Option<Grant> {
    let mut segments = path.trim_matches('/').split('/');
    let resource = segments.next().filter(|s| !s.is_empty())?;
    let operation = match segments.next() {
        Some("create") => Operation::Create,
        Some("edit") => Operation::Update,
        Some("delete") => Operation::Delete,
        _ => Operation::Read,
    };
    Some(Grant::new(
        resolve_route_entity(resource),
        operation,
        Service::Project,
    ))
}

/// Middleware guarding every page route. On success the caller's context is
/// stored in the request extensions for the handler.
pub async fn enforce(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = AccessContext::from_headers(req.headers(), &state.jwt_secret);

    if let Some(grant) = route_permission(req.uri().path()) {
        let gate = Gate::new()
            .require_authenticated(&state.auth_redirect_to)
            .require(grant);
        if let Err(denial) = gate.check(&ctx) {
            tracing::debug!(
                path = %req.uri().path(),
                caller = ?ctx.caller().map(|c| c.id.as_str()),
                ?denial,
                "Access denied"
            );
            return denial.into_response();
        }
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}
