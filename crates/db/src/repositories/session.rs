//! Session repository.

use std::sync::Arc;

use crate::entities::{Session, session};
use formhub_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a session by its cookie ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<session::Model>> {
        Session::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new session.
    pub async fn create(&self, model: session::ActiveModel) -> AppResult<session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session by its cookie ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Session::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_session(id: &str, user_id: i64) -> session::Model {
        session::Model {
            id: id.to_string(),
            user_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let session = create_test_session("abc-123", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session]])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let result = repo.find_by_id("abc-123").await.unwrap();

        assert_eq!(result.unwrap().user_id, 1);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<session::Model>::new()])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_session() {
        let session = create_test_session("abc-123", 5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let active = session::ActiveModel {
            id: Set("abc-123".to_string()),
            user_id: Set(5),
            created_at: Set(Utc::now().into()),
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.user_id, 5);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        assert!(repo.delete("abc-123").await.is_ok());
    }
}
