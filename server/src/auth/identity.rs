//! Resolution of the per-request [`Actor`].
//!
//! Session issuance lives outside this service. An upstream layer may place
//! an [`Actor`] in the request extensions directly; otherwise the configured
//! [`IdentityProvider`] is asked. The shipped [`HeaderIdentityProvider`]
//! trusts headers written by an authenticating gateway, which must strip
//! any client-supplied copies.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::auth::{Actor, Role};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_CLUB_HEADER: &str = "x-user-club";

pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, parts: &Parts) -> Option<Actor>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIdentityProvider;

impl HeaderIdentityProvider {
    fn actor_from_headers(headers: &HeaderMap) -> Option<Actor> {
        let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

        let id = header(USER_ID_HEADER)?.trim().parse::<i64>().ok()?;
        let role = header(USER_ROLE_HEADER)?.trim().parse::<Role>().ok()?;
        let club_name = header(USER_CLUB_HEADER)
            .map(str::trim)
            .filter(|club| !club.is_empty())
            .map(str::to_string);

        Some(Actor::new(id, role, club_name))
    }
}

impl IdentityProvider for HeaderIdentityProvider {
    fn resolve(&self, parts: &Parts) -> Option<Actor> {
        Self::actor_from_headers(&parts.headers)
    }
}

/// The actor making the request, if any.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<Actor>() {
            return Ok(Self(Some(actor.clone())));
        }

        Ok(Self(state.identity.resolve(parts)))
    }
}
