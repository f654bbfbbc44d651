//! PostgreSQL implementations of the credential store ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::account::{ApiKey, Session, User};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp, UserId};
use crate::ports::{ApiKeyRepository, SessionStore, UserRepository};

/// Users, API keys and sessions share one pool.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_id(raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e)))
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    name: Option<String>,
    stripe_customer_id: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: user_id(row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            stripe_customer_id: row.stripe_customer_id,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: String,
    key: String,
    user_id: String,
    expires_at: Option<DateTime<Utc>>,
    last_used: Option<DateTime<Utc>>,
}

impl TryFrom<ApiKeyRow> for ApiKey {
    type Error = DomainError;

    fn try_from(row: ApiKeyRow) -> Result<Self, Self::Error> {
        Ok(ApiKey {
            id: row.id,
            key: row.key,
            user_id: user_id(row.user_id)?,
            expires_at: row.expires_at.map(Timestamp::from_datetime),
            last_used: row.last_used.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: String,
    token: String,
    expires_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Session {
            id: SessionId::from_uuid(row.id),
            user_id: user_id(row.user_id)?,
            token: row.token,
            expires_at: Timestamp::from_datetime(row.expires_at),
        })
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, name, stripe_customer_id";

impl PostgresAccountStore {
    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user"))?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresAccountStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.find_user_where("id", id.as_str()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_user_where("email", email).await
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        self.find_user_where("stripe_customer_id", customer_id).await
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresAccountStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        let row: Option<ApiKeyRow> = sqlx::query_as(
            "SELECT id, key, user_id, expires_at, last_used FROM api_keys WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find API key"))?;

        row.map(ApiKey::try_from).transpose()
    }

    async fn touch_last_used(&self, id: &str, at: Timestamp) -> Result<(), DomainError> {
        sqlx::query("UPDATE api_keys SET last_used = $2 WHERE id = $1")
            .bind(id)
            .bind(at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update API key"))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PostgresAccountStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO sessions (id, user_id, token, expires_at) VALUES ($1, $2, $3, $4)")
            .bind(session.id.as_uuid())
            .bind(session.user_id.as_str())
            .bind(&session.token)
            .bind(session.expires_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create session"))?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, DomainError> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT id, user_id, token, expires_at FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find session"))?;

        row.map(Session::try_from).transpose()
    }
}
