//! Passage repository.

use std::sync::Arc;

use crate::entities::{form_passage, passage_answer};
use formhub_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};

/// Passage repository for database operations.
#[derive(Clone)]
pub struct PassageRepository {
    db: Arc<DatabaseConnection>,
}

impl PassageRepository {
    /// Create a new passage repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record one submission with all of its answers in one transaction.
    pub async fn create_with_answers(
        &self,
        passage: form_passage::ActiveModel,
        answers: Vec<(i64, String)>,
    ) -> AppResult<form_passage::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let passage = passage
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for (question_id, answer_text) in answers {
            passage_answer::ActiveModel {
                form_passage_id: Set(passage.id),
                question_id: Set(question_id),
                answer_text: Set(answer_text),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(passage)
    }
}
