//! Request identity extractors
//!
//! Resolves the caller from a bearer token or the `session` cookie.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::data::Profile;
use crate::error::AppError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| {
            let jar = CookieJar::from_headers(headers);
            jar.get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
                .filter(|token| !token.is_empty())
        })
}

async fn authenticate_token(token: &str, state: &AppState) -> Result<Identity, AppError> {
    let account_id = state
        .db
        .resolve_account(token)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let profile = state.db.resolve_profile(&account_id).await?;

    Ok(Identity {
        account_id,
        profile,
    })
}

/// Authenticated caller
///
/// `profile` is `None` for an account that has not registered yet.
/// Rejects with 401 when the token is missing or unknown.
#[derive(Debug, Clone)]
pub struct Identity {
    pub account_id: String,
    pub profile: Option<Profile>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>().cloned() {
            return Ok(identity);
        }

        let state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let identity = authenticate_token(&token, &state).await?;
        parts.extensions.insert(identity.clone());

        Ok(identity)
    }
}

/// Authenticated caller with a registered profile
///
/// Rejects with 403 when the account has no profile.
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentProfile(me): CurrentProfile) -> String {
///     me.username
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentProfile
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        identity
            .profile
            .map(CurrentProfile)
            .ok_or(AppError::Forbidden)
    }
}

/// Optional viewer for read endpoints
///
/// `None` for anonymous requests, unknown tokens and unregistered accounts.
/// Storage failures while resolving the token are still errors.
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Option<Profile>);

impl MaybeViewer {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|profile| profile.id.as_str())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeViewer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await {
            Ok(identity) => Ok(MaybeViewer(identity.profile)),
            Err(AppError::Unauthorized) => Ok(MaybeViewer(None)),
            Err(error) => Err(error),
        }
    }
}
