//! Actor identity and the club-admin access guard.

pub mod guard;
pub mod identity;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use guard::{authorize, ClubAdmin};
pub use identity::{CurrentActor, HeaderIdentityProvider, IdentityProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    ClubAdmin,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::ClubAdmin => "club_admin",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "club_admin" => Ok(Role::ClubAdmin),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated identity behind a request. Built once per request by an
/// [`IdentityProvider`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
    pub club_name: Option<String>,
}

impl Actor {
    pub fn new(id: i64, role: Role, club_name: Option<String>) -> Self {
        Self {
            id,
            role,
            club_name,
        }
    }
}
