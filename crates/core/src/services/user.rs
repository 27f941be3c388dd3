//! User and session service.

use chrono::{Duration, Utc};
use formhub_common::{AppError, AppResult, Config, hash_password, verify_password};
use formhub_db::{
    entities::{session, user},
    repositories::{SessionRepository, UserRepository},
};
use sea_orm::Set;
use uuid::Uuid;

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// User service for account and session business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
    session_ttl: Duration,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository, session_repo: SessionRepository, config: &Config) -> Self {
        Self {
            user_repo,
            session_repo,
            session_ttl: Duration::hours(config.auth.session_ttl_hours as i64),
        }
    }

    /// Create a new account and open a session for it.
    pub async fn signup(&self, input: CreateUserInput) -> AppResult<(user::Model, session::Model)> {
        if self
            .user_repo
            .exists_by_username_or_email(&input.username, &input.email)
            .await?
        {
            return Err(AppError::Conflict(
                "Username or email is already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let created = self
            .user_repo
            .create(user::ActiveModel {
                username: Set(input.username),
                first_name: Set(input.first_name),
                last_name: Set(input.last_name),
                email: Set(input.email),
                password_hash: Set(password_hash),
                avatar_url: Set(None),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await?;

        let session = self.start_session(created.id).await?;
        Ok((created, session))
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<(user::Model, session::Model)> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let session = self.start_session(user.id).await?;
        Ok((user, session))
    }

    /// Resolve a session cookie to its user.
    ///
    /// Sessions older than the configured TTL are rejected.
    pub async fn authenticate_by_session(&self, session_id: &str) -> AppResult<user::Model> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.created_at + self.session_ttl < Utc::now() {
            return Err(AppError::Unauthorized);
        }

        self.user_repo.get_by_id(session.user_id).await
    }

    /// Close a session.
    pub async fn logout(&self, session_id: &str) -> AppResult<()> {
        self.session_repo.delete(session_id).await
    }

    async fn start_session(&self, user_id: i64) -> AppResult<session::Model> {
        self.session_repo
            .create(session::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user_id),
                created_at: Set(Utc::now().into()),
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use formhub_common::config::{AuthConfig, DatabaseConfig, ServerConfig};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
            auth: AuthConfig {
                session_ttl_hours: 1,
            },
        }
    }

    fn test_user(id: i64, username: &str, password: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(password).unwrap(),
            avatar_url: None,
            created_at: Utc::now().into(),
        }
    }

    fn session_at(id: &str, user_id: i64, created_at: chrono::DateTime<Utc>) -> session::Model {
        session::Model {
            id: id.to_string(),
            user_id,
            created_at: created_at.into(),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(db.clone()),
            SessionRepository::new(db),
            &test_config(),
        );

        let result = service.login("ghost", "whatever").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let user = test_user(1, "alice", "right-password");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(db.clone()),
            SessionRepository::new(db),
            &test_config(),
        );

        let result = service.login("alice", "wrong-password").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_correct_password_opens_session() {
        let user = test_user(1, "alice", "right-password");
        let session = session_at("s-1", 1, Utc::now());

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(user_db),
            SessionRepository::new(session_db),
            &test_config(),
        );

        let (user, session) = service.login("alice", "right-password").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(session.user_id, 1);
    }

    #[tokio::test]
    async fn test_authenticate_expired_session_is_unauthorized() {
        // TTL is 1 hour in the test config; this session is two hours old.
        let stale = session_at("s-1", 1, Utc::now() - Duration::hours(2));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stale]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(db.clone()),
            SessionRepository::new(db),
            &test_config(),
        );

        let result = service.authenticate_by_session("s-1").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_fresh_session_loads_user() {
        let session = session_at("s-1", 1, Utc::now());
        let user = test_user(1, "alice", "pw");

        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(user_db),
            SessionRepository::new(session_db),
            &test_config(),
        );

        let user = service.authenticate_by_session("s-1").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_signup_taken_username_is_conflict() {
        // The existence check returns a count of 1.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::from(1i64),
                }]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(db.clone()),
            SessionRepository::new(db),
            &test_config(),
        );

        let result = service
            .signup(CreateUserInput {
                username: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Doe".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
