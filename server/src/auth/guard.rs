use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::auth::identity::CurrentActor;
use crate::auth::{Actor, Role};
use crate::state::AppState;
use crate::utils::error::AppError;

/// Proof that the request's actor passed the club-admin check.
///
/// Only [`authorize`] builds one, so every service operation taking a
/// `&ClubAdmin` runs behind the guard.
#[derive(Debug, Clone)]
pub struct ClubAdmin {
    actor: Actor,
}

impl ClubAdmin {
    pub fn id(&self) -> i64 {
        self.actor.id
    }

    pub fn club_name(&self) -> Option<&str> {
        self.actor.club_name.as_deref()
    }
}

pub fn authorize(actor: Option<Actor>) -> Result<ClubAdmin, AppError> {
    match actor {
        Some(actor) if actor.role == Role::ClubAdmin => Ok(ClubAdmin { actor }),
        Some(actor) => {
            debug!(actor_id = actor.id, role = %actor.role, "Actor lacks club_admin role");
            Err(AppError::Forbidden)
        }
        None => {
            debug!("No actor on request");
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClubAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = match CurrentActor::from_request_parts(parts, state).await {
            Ok(CurrentActor(actor)) => actor,
            Err(never) => match never {},
        };
        let admin = authorize(actor)?;

        parts.extensions.insert(admin.actor.clone());
        Ok(admin)
    }
}
