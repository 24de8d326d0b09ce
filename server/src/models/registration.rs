use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A student registered for an event, as shown on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registrant {
    pub id: i64,
    pub name: String,
    pub email: String,
}
