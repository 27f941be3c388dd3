//! Row source for form result aggregation.
//!
//! Results are computed from two flat, denormalized row streams rather than
//! entity graphs: one row per form x question x predefined-option combination
//! (the definition join) and one row per passage x submitted-answer
//! combination (the passage join). The aggregation engine in `formhub-core`
//! rebuilds the hierarchy and the counts from these streams.

use std::sync::Arc;

use crate::entities::{
    Form, FormPassage, form, form_passage, passage_answer, question, question_answer, user,
};
use formhub_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

/// One row of the definition join (form x author x question x option).
///
/// Question and option columns are nullable: a form with no questions yields
/// a single row with null question fields, and a free-text question yields a
/// row with null option fields.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct DefinitionRow {
    pub form_id: i64,
    pub form_title: String,
    pub form_description: Option<String>,
    pub form_anonymous: bool,
    pub form_created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_email: String,
    pub question_id: Option<i64>,
    pub question_title: Option<String>,
    pub question_description: Option<String>,
    pub question_type: Option<question::QuestionType>,
    pub question_required: Option<bool>,
    pub answer_id: Option<i64>,
    pub answer_text: Option<String>,
}

/// One row of the passage join (passage x respondent x submitted answer).
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PassageRow {
    pub passage_id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub respondent_id: i64,
    pub respondent_username: String,
    pub respondent_first_name: String,
    pub respondent_last_name: String,
    pub respondent_email: String,
}

/// Read-only repository producing the two row streams for one form.
#[derive(Clone)]
pub struct FormResultRepository {
    db: Arc<DatabaseConnection>,
}

impl FormResultRepository {
    /// Create a new form result repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetch the definition rows for a form.
    ///
    /// Ordered by question position, question id, option id, so repeated
    /// invocations observe the same first-seen order. An empty result means
    /// the form does not exist.
    pub async fn definition_rows(&self, form_id: i64) -> AppResult<Vec<DefinitionRow>> {
        Form::find()
            .filter(form::Column::Id.eq(form_id))
            .join(JoinType::InnerJoin, form::Relation::Author.def())
            .join(JoinType::LeftJoin, form::Relation::Questions.def())
            .join(JoinType::LeftJoin, question::Relation::Answers.def())
            .select_only()
            .column_as(form::Column::Id, "form_id")
            .column_as(form::Column::Title, "form_title")
            .column_as(form::Column::Description, "form_description")
            .column_as(form::Column::Anonymous, "form_anonymous")
            .column_as(form::Column::CreatedAt, "form_created_at")
            .column_as(user::Column::Id, "author_id")
            .column_as(user::Column::Username, "author_username")
            .column_as(user::Column::FirstName, "author_first_name")
            .column_as(user::Column::LastName, "author_last_name")
            .column_as(user::Column::Email, "author_email")
            .column_as(question::Column::Id, "question_id")
            .column_as(question::Column::Title, "question_title")
            .column_as(question::Column::Description, "question_description")
            .column_as(question::Column::QuestionType, "question_type")
            .column_as(question::Column::Required, "question_required")
            .column_as(question_answer::Column::Id, "answer_id")
            .column_as(question_answer::Column::AnswerText, "answer_text")
            .order_by_asc(question::Column::Position)
            .order_by_asc(question::Column::Id)
            .order_by_asc(question_answer::Column::Id)
            .into_model::<DefinitionRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the passage rows for a form.
    ///
    /// One row per submitted answer, with the respondent's identity attached.
    /// Ordered by passage id, answer id.
    pub async fn passage_rows(&self, form_id: i64) -> AppResult<Vec<PassageRow>> {
        FormPassage::find()
            .filter(form_passage::Column::FormId.eq(form_id))
            .join(JoinType::InnerJoin, form_passage::Relation::Respondent.def())
            .join(JoinType::InnerJoin, form_passage::Relation::Answers.def())
            .select_only()
            .column_as(form_passage::Column::Id, "passage_id")
            .column_as(passage_answer::Column::QuestionId, "question_id")
            .column_as(passage_answer::Column::AnswerText, "answer_text")
            .column_as(user::Column::Id, "respondent_id")
            .column_as(user::Column::Username, "respondent_username")
            .column_as(user::Column::FirstName, "respondent_first_name")
            .column_as(user::Column::LastName, "respondent_last_name")
            .column_as(user::Column::Email, "respondent_email")
            .order_by_asc(form_passage::Column::Id)
            .order_by_asc(passage_answer::Column::Id)
            .into_model::<PassageRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    fn definition_mock_row(
        question_id: Option<i64>,
        answer_id: Option<i64>,
        answer_text: Option<&str>,
    ) -> std::collections::BTreeMap<&'static str, Value> {
        let created_at: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        btreemap! {
            "form_id" => Value::from(1i64),
            "form_title" => Value::from("Team survey"),
            "form_description" => Value::String(None),
            "form_anonymous" => Value::from(false),
            "form_created_at" => Value::from(created_at),
            "author_id" => Value::from(7i64),
            "author_username" => Value::from("alice"),
            "author_first_name" => Value::from("Alice"),
            "author_last_name" => Value::from("Doe"),
            "author_email" => Value::from("alice@example.com"),
            "question_id" => Value::BigInt(question_id),
            "question_title" => question_id.map_or(Value::String(None), |_| Value::from("Favorite color?")),
            "question_description" => Value::String(None),
            "question_type" => question_id.map_or(Value::SmallInt(None), |_| Value::SmallInt(Some(1))),
            "question_required" => question_id.map_or(Value::Bool(None), |_| Value::from(true)),
            "answer_id" => Value::BigInt(answer_id),
            "answer_text" => answer_text.map_or(Value::String(None), Value::from),
        }
    }

    #[tokio::test]
    async fn test_definition_rows_decode_nullable_columns() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    definition_mock_row(Some(10), Some(100), Some("Red")),
                    definition_mock_row(Some(10), Some(101), Some("Blue")),
                    definition_mock_row(None, None, None),
                ]])
                .into_connection(),
        );

        let repo = FormResultRepository::new(db);
        let rows = repo.definition_rows(1).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].question_id, Some(10));
        assert_eq!(
            rows[0].question_type,
            Some(question::QuestionType::SingleChoice)
        );
        assert_eq!(rows[1].answer_text.as_deref(), Some("Blue"));
        assert!(rows[2].question_id.is_none());
        assert!(rows[2].answer_text.is_none());
    }

    #[tokio::test]
    async fn test_definition_rows_empty_for_unknown_form() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = FormResultRepository::new(db);
        let rows = repo.definition_rows(999).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_passage_rows_decode() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "passage_id" => Value::from(1i64),
                    "question_id" => Value::from(10i64),
                    "answer_text" => Value::from("Red"),
                    "respondent_id" => Value::from(3i64),
                    "respondent_username" => Value::from("bob"),
                    "respondent_first_name" => Value::from("Bob"),
                    "respondent_last_name" => Value::from("Roe"),
                    "respondent_email" => Value::from("bob@example.com"),
                }]])
                .into_connection(),
        );

        let repo = FormResultRepository::new(db);
        let rows = repo.passage_rows(1).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].passage_id, 1);
        assert_eq!(rows[0].respondent_username, "bob");
    }
}
