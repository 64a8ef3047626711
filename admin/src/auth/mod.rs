use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Service {
    Project,
    Platform,
}

/// One (entity, operation, service) permission held by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Grant {
    pub entity: String,
    pub operation: Operation,
    pub service: Service,
}

impl Grant {
    pub fn new(entity: &str, operation: Operation, service: Service) -> Self {
        Self {
            entity: entity.to_string(),
            operation,
            service,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    #[serde(default)]
    pub permissions: Vec<Grant>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct Caller {
    pub id: String,
    /// Raw bearer token, forwarded to the remote service.
    pub token: String,
    pub grants: Vec<Grant>,
}

/// Per-request authentication and authorization state.
///
/// Built once from the request headers and passed explicitly to whatever
/// needs to check access.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    caller: Option<Caller>,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    pub fn authenticated(caller: Caller) -> Self {
        Self {
            caller: Some(caller),
        }
    }

    /// Decodes the bearer token, if any. Bad tokens yield an anonymous context.
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Self {
        let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
            return Self::anonymous();
        };
        let token = bearer.token();

        let key = DecodingKey::from_secret(secret.as_bytes());
        match decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256)) {
            Ok(data) => Self::authenticated(Caller {
                id: data.claims.sub,
                token: token.to_string(),
                grants: data.claims.permissions,
            }),
            Err(e) => {
                tracing::warn!("JWT decode failed: {}", e);
                Self::anonymous()
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller.is_some()
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.caller.as_ref().map(|c| c.token.as_str())
    }

    pub fn has_access(&self, entity: &str, operation: Operation, service: Service) -> bool {
        self.caller.as_ref().is_some_and(|c| {
            c.grants
                .iter()
                .any(|g| g.entity == entity && g.operation == operation && g.service == service)
        })
    }
}

/// Handlers read the context placed by the gate middleware, falling back to
/// decoding the headers themselves when mounted outside it.
#[async_trait]
impl<S> FromRequestParts<S> for AccessContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AccessContext>() {
            return Ok(ctx.clone());
        }
        let app_state = AppState::from_ref(state);
        Ok(Self::from_headers(&parts.headers, &app_state.jwt_secret))
    }
}

pub fn create_token(
    user_id: &str,
    permissions: Vec<Grant>,
    secret: &str,
    expiry_hours: u64,
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = OffsetDateTime::now_utc();
    let exp = now + time::Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        permissions,
        exp: exp.unix_timestamp(),
        iat: now.unix_timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
