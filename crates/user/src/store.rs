use keycard_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use validator::ValidateEmail;

use crate::{Login, User, UserError, UserResult, password::hash_password};

/// Lookup side of the user table used by the authentication layer
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by id, without the credential field
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>>;

    /// Find the login row (including the password hash) for an email
    async fn find_login_by_email(&self, email: &str) -> UserResult<Option<Login>>;
}

#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user, hashing the password before it is stored
    pub async fn create(&self, email: &str, password: &str) -> UserResult<User> {
        let email = email.trim().to_lowercase();

        if !email.validate_email() {
            return Err(UserError::InvalidEmail);
        }

        if password.len() < 8 {
            return Err(UserError::PasswordTooShort);
        }

        let user = User {
            id: ulid::Ulid::new().to_string(),
            email,
            created_at: time::OffsetDateTime::now_utc().unix_timestamp(),
        };
        let password = hash_password(password)?;

        let statement = Query::insert()
            .into_table(UserTable::Table)
            .columns([
                UserTable::Id,
                UserTable::Email,
                UserTable::Password,
                UserTable::CreatedAt,
            ])
            .values_panic([
                user.id.clone().into(),
                user.email.clone().into(),
                password.into(),
                user.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    UserError::EmailAlreadyExists
                }
                e => UserError::DatabaseError(e),
            })?;

        tracing::info!(user_id = %user.id, "user created");

        Ok(user)
    }
}

#[async_trait::async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let statement = Query::select()
            .columns([UserTable::Id, UserTable::Email, UserTable::CreatedAt])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        Ok(sqlx::query_as_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_login_by_email(&self, email: &str) -> UserResult<Option<Login>> {
        let statement = Query::select()
            .columns([
                UserTable::Id,
                UserTable::Email,
                UserTable::Password,
                UserTable::CreatedAt,
            ])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Email).eq(email.trim().to_lowercase()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        Ok(sqlx::query_as_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?)
    }
}
