//! Form repository.

use std::sync::Arc;

use crate::entities::{Form, Question, QuestionAnswer, User, form, question, question_answer, user};
use formhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// Input for one question created together with its form.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub description: Option<String>,
    pub question_type: question::QuestionType,
    pub required: bool,
    /// Predefined option texts; empty for free-text questions.
    pub options: Vec<String>,
}

/// Form repository for database operations.
#[derive(Clone)]
pub struct FormRepository {
    db: Arc<DatabaseConnection>,
}

impl FormRepository {
    /// Create a new form repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a form by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<form::Model>> {
        Form::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a form by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<form::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::FormNotFound(id))
    }

    /// Find a form together with its author.
    pub async fn find_by_id_with_author(
        &self,
        id: i64,
    ) -> AppResult<Option<(form::Model, Option<user::Model>)>> {
        Form::find_by_id(id)
            .find_also_related(User)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all forms with their authors, newest first.
    pub async fn find_all_with_authors(
        &self,
    ) -> AppResult<Vec<(form::Model, Option<user::Model>)>> {
        Form::find()
            .find_also_related(User)
            .order_by_desc(form::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a form's questions with their predefined options, in display order.
    pub async fn questions_with_options(
        &self,
        form_id: i64,
    ) -> AppResult<Vec<(question::Model, Vec<question_answer::Model>)>> {
        Question::find()
            .find_with_related(QuestionAnswer)
            .filter(question::Column::FormId.eq(form_id))
            .order_by_asc(question::Column::Position)
            .order_by_asc(question::Column::Id)
            .order_by_asc(question_answer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a form with its questions and predefined options in one transaction.
    ///
    /// Question positions are assigned from the input order. Returns the new
    /// form's ID.
    pub async fn create_with_questions(
        &self,
        form: form::ActiveModel,
        questions: Vec<NewQuestion>,
    ) -> AppResult<i64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let form = form
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for (position, new_question) in questions.into_iter().enumerate() {
            let inserted = question::ActiveModel {
                form_id: Set(form.id),
                title: Set(new_question.title),
                description: Set(new_question.description),
                question_type: Set(new_question.question_type),
                required: Set(new_question.required),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            for answer_text in new_question.options {
                question_answer::ActiveModel {
                    question_id: Set(inserted.id),
                    answer_text: Set(answer_text),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(form.id)
    }

    /// Delete a form. Questions, options and passages cascade in the schema.
    ///
    /// Returns the number of rows deleted (0 when the form did not exist).
    pub async fn delete(&self, id: i64) -> AppResult<u64> {
        let result = Form::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use question::QuestionType;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_form(id: i64, author_id: i64, anonymous: bool) -> form::Model {
        form::Model {
            id,
            title: "Team survey".to_string(),
            description: None,
            author_id,
            anonymous,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<form::Model>::new()])
                .into_connection(),
        );

        let repo = FormRepository::new(db);
        let result = repo.get_by_id(99).await;

        match result {
            Err(AppError::FormNotFound(id)) => assert_eq!(id, 99),
            _ => panic!("Expected FormNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let form = create_test_form(3, 1, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[form]])
                .into_connection(),
        );

        let repo = FormRepository::new(db);
        let result = repo.find_by_id(3).await.unwrap().unwrap();
        assert_eq!(result.title, "Team survey");
    }

    #[tokio::test]
    async fn test_create_with_questions_inserts_all_rows() {
        let form = create_test_form(1, 1, false);
        let question = question::Model {
            id: 10,
            form_id: 1,
            title: "Favorite color?".to_string(),
            description: None,
            question_type: QuestionType::SingleChoice,
            required: true,
            position: 0,
        };
        let option_red = question_answer::Model {
            id: 100,
            question_id: 10,
            answer_text: "Red".to_string(),
        };
        let option_blue = question_answer::Model {
            id: 101,
            question_id: 10,
            answer_text: "Blue".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[form.clone()]])
                .append_query_results([[question]])
                .append_query_results([[option_red]])
                .append_query_results([[option_blue]])
                .append_exec_results(vec![
                    MockExecResult {
                        last_insert_id: 1,
                        rows_affected: 1,
                    };
                    4
                ])
                .into_connection(),
        );

        let repo = FormRepository::new(db);
        let active = form::ActiveModel {
            title: Set("Team survey".to_string()),
            description: Set(None),
            author_id: Set(1),
            anonymous: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let questions = vec![NewQuestion {
            title: "Favorite color?".to_string(),
            description: None,
            question_type: QuestionType::SingleChoice,
            required: true,
            options: vec!["Red".to_string(), "Blue".to_string()],
        }];

        let form_id = repo.create_with_questions(active, questions).await.unwrap();
        assert_eq!(form_id, 1);
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FormRepository::new(db);
        assert_eq!(repo.delete(1).await.unwrap(), 1);
    }
}
