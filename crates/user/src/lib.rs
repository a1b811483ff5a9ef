pub mod error;
pub mod password;

mod store;

use serde::Serialize;
use sqlx::prelude::FromRow;

pub use error::{UserError, UserResult};
pub use store::{SqliteUserStore, UserStore};

/// User record as exposed to the rest of the application
///
/// The credential column is never part of this type: every query that
/// produces a `User` selects an explicit column list without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}

/// Row used by the login flow, including the password hash
#[derive(Clone, FromRow)]
pub struct Login {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: i64,
}

impl From<Login> for User {
    fn from(value: Login) -> Self {
        Self {
            id: value.id,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

// Keep the hash out of logs
impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
