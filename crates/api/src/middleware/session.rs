//! Resolves the `Authorization: Bearer <token>` header into a [`Caller`].
//!
//! A missing, malformed or expired token yields an anonymous session rather
//! than a rejection; handlers decide what anonymous callers may do.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use weekplan_core::{
    access::{self, Action, Caller},
    errors::PlanError,
};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub caller: Caller,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Rejects the request unless the caller may perform `action`.
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        access::ensure(self.caller, action).map_err(AppError)
    }

    pub fn require_token(&self) -> Result<&str, AppError> {
        self.token()
            .ok_or_else(|| AppError(PlanError::Authentication("Not signed in".to_string())))
    }
}

pub fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts);
        let caller = state.profiles.caller(token.as_deref()).await;
        Ok(Session { token, caller })
    }
}
