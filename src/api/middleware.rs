//! Request extractors for the acting principal and the form locale.
//!
//! Authentication happens upstream; by the time a request reaches us the
//! authenticated username is carried in the `X-Principal` header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use std::convert::Infallible;
use uuid::Uuid;

use super::AppState;
use crate::models::Principal;

pub const PRINCIPAL_HEADER: &str = "x-principal";

/// Any known user. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

/// A user holding the manager role. Rejects other users with 403.
#[derive(Debug, Clone)]
pub struct ManagerPrincipal {
    pub principal: Principal,
    pub manager_id: Uuid,
}

/// Language tag used to read and render dates in forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let Some(username) = username else {
            tracing::warn!("Missing principal header");
            return Err((StatusCode::UNAUTHORIZED, "Authentication required".to_string()));
        };

        match state.db.get_principal(username) {
            Ok(Some(principal)) => Ok(Self(principal)),
            Ok(None) => {
                tracing::warn!("Unknown principal {:?}", username);
                Err((StatusCode::UNAUTHORIZED, "Unknown principal".to_string()))
            }
            Err(e) => {
                tracing::error!("Failed to resolve principal: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ))
            }
        }
    }
}

impl FromRequestParts<AppState> for ManagerPrincipal {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;

        match principal.manager_id {
            Some(manager_id) => Ok(Self {
                principal,
                manager_id,
            }),
            None => {
                tracing::warn!("{} is not a manager", principal.username);
                Err((StatusCode::FORBIDDEN, "Manager role required".to_string()))
            }
        }
    }
}

impl FromRequestParts<AppState> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = preferred_language(&parts.headers)
            .unwrap_or_else(|| state.config.default_locale.clone());
        Ok(Self(locale))
    }
}

/// Primary language subtag of the first Accept-Language entry.
fn preferred_language(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Accept-Language")?.to_str().ok()?;
    let first = value.split(',').next()?.split(';').next()?.trim();
    let language = first.split(['-', '_']).next()?.trim();

    if language.is_empty() || language == "*" {
        None
    } else {
        Some(language.to_ascii_lowercase())
    }
}
