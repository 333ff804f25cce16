//! Database repositories for users and sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portico_core::UserId;
use portico_platform_access::{
    Session, SessionId, SessionProfile, SessionStore, SessionStoreError, User, UserStore,
    UserStoreError,
};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    external_subject_id: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, UserStoreError> {
        let id = UserId::from_str(&self.id).map_err(|e| UserStoreError::Database {
            details: format!("invalid user id '{}': {}", self.id, e),
        })?;
        Ok(User::with_all_fields(
            id,
            self.external_subject_id,
            self.email,
            self.created_at,
        ))
    }
}

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    profile: Option<Json<SessionProfile>>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session::with_all_fields(
            SessionId::new(self.id),
            self.profile.map(|Json(profile)| profile),
            self.created_at,
            self.expires_at,
        )
    }
}

fn user_error(e: sqlx::Error) -> UserStoreError {
    UserStoreError::Database {
        details: e.to_string(),
    }
}

fn session_error(e: sqlx::Error) -> SessionStoreError {
    SessionStoreError::Backend {
        details: e.to_string(),
    }
}

/// Repository for user operations.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserStoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, external_subject_id, email, created_at
            FROM users
            WHERE external_subject_id = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(user_error)?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, external_subject_id, email, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.external_subject_id())
        .bind(user.email())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                UserStoreError::Conflict {
                    subject: user.external_subject_id().to_string(),
                }
            } else {
                user_error(e)
            }
        })?;

        Ok(())
    }
}

/// Repository for session operations.
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Deletes expired sessions.
    pub async fn delete_expired(&self) -> Result<u64, SessionStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(session_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, profile, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::ColumnDecode { source, .. } => SessionStoreError::Corrupt {
                session_id: id.to_string(),
                reason: source.to_string(),
            },
            other => session_error(other),
        })?;

        let Some(session) = row.map(SessionRow::into_session) else {
            return Ok(None);
        };

        if session.is_expired() {
            tracing::debug!(session_id = %id, "Removing expired session");
            self.destroy(id).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, profile, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET profile = EXCLUDED.profile, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.profile().map(Json))
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(session_error)?;

        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(session_error)?;

        Ok(())
    }
}
