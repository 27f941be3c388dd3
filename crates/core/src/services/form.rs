//! Form service.

use chrono::Utc;
use formhub_common::{AppError, AppResult};
use formhub_db::{
    entities::{form, question::QuestionType, user},
    repositories::{FormRepository, NewQuestion},
};
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Input for one question of a new form.
#[derive(Debug, Clone)]
pub struct CreateQuestionInput {
    pub title: String,
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub required: bool,
    pub options: Vec<String>,
}

/// Input for creating a form.
#[derive(Debug, Clone)]
pub struct CreateFormInput {
    pub title: String,
    pub description: Option<String>,
    pub anonymous: bool,
    pub questions: Vec<CreateQuestionInput>,
}

/// A question with its predefined options, as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub required: bool,
    pub options: Vec<String>,
}

/// A form with its author and questions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub anonymous: bool,
    pub created_at: DateTimeWithTimeZone,
    pub author_id: i64,
    pub author_username: String,
    pub questions: Vec<QuestionDetail>,
}

/// Maximum number of predefined options per choice question.
const MAX_OPTIONS: usize = 50;

/// Form service for business logic.
#[derive(Clone)]
pub struct FormService {
    form_repo: FormRepository,
}

impl FormService {
    /// Create a new form service.
    #[must_use]
    pub const fn new(form_repo: FormRepository) -> Self {
        Self { form_repo }
    }

    /// Create a form with its questions. Returns the full form.
    pub async fn create(&self, author_id: i64, input: CreateFormInput) -> AppResult<FormDetail> {
        Self::validate_questions(&input.questions)?;

        let questions = input
            .questions
            .into_iter()
            .map(|q| NewQuestion {
                title: q.title,
                description: q.description,
                question_type: q.question_type,
                required: q.required,
                options: q.options,
            })
            .collect();

        let form_id = self
            .form_repo
            .create_with_questions(
                form::ActiveModel {
                    title: Set(input.title),
                    description: Set(input.description),
                    author_id: Set(author_id),
                    anonymous: Set(input.anonymous),
                    created_at: Set(Utc::now().into()),
                    ..Default::default()
                },
                questions,
            )
            .await?;

        self.get(form_id).await
    }

    /// Get a form with its author and questions.
    pub async fn get(&self, form_id: i64) -> AppResult<FormDetail> {
        let (form, author) = self
            .form_repo
            .find_by_id_with_author(form_id)
            .await?
            .ok_or(AppError::FormNotFound(form_id))?;

        let author = author.ok_or_else(|| {
            AppError::DataIntegrity(format!("form {form_id} has no author row"))
        })?;

        let questions = self
            .form_repo
            .questions_with_options(form_id)
            .await?
            .into_iter()
            .map(|(question, options)| QuestionDetail {
                id: question.id,
                title: question.title,
                description: question.description,
                question_type: question.question_type,
                required: question.required,
                options: options.into_iter().map(|o| o.answer_text).collect(),
            })
            .collect();

        Ok(Self::to_detail(form, &author, questions))
    }

    /// List all forms with their authors, newest first.
    pub async fn list(&self) -> AppResult<Vec<FormDetail>> {
        let forms = self.form_repo.find_all_with_authors().await?;

        forms
            .into_iter()
            .map(|(form, author)| {
                let author = author.ok_or_else(|| {
                    AppError::DataIntegrity(format!("form {} has no author row", form.id))
                })?;
                Ok(Self::to_detail(form, &author, Vec::new()))
            })
            .collect()
    }

    /// Delete a form. Only its author may delete it.
    pub async fn delete(&self, form_id: i64, requester_id: i64) -> AppResult<()> {
        let form = self.form_repo.get_by_id(form_id).await?;

        if form.author_id != requester_id {
            return Err(AppError::Forbidden(
                "Only the author can delete a form".to_string(),
            ));
        }

        self.form_repo.delete(form_id).await?;
        Ok(())
    }

    fn to_detail(
        form: form::Model,
        author: &user::Model,
        questions: Vec<QuestionDetail>,
    ) -> FormDetail {
        FormDetail {
            id: form.id,
            title: form.title,
            description: form.description,
            anonymous: form.anonymous,
            created_at: form.created_at,
            author_id: author.id,
            author_username: author.username.clone(),
            questions,
        }
    }

    fn validate_questions(questions: &[CreateQuestionInput]) -> AppResult<()> {
        for question in questions {
            if question.title.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "Question title cannot be empty".to_string(),
                ));
            }

            match question.question_type {
                QuestionType::SingleChoice | QuestionType::MultipleChoice => {
                    if question.options.len() < 2 {
                        return Err(AppError::BadRequest(
                            "Choice questions need at least 2 options".to_string(),
                        ));
                    }
                    if question.options.len() > MAX_OPTIONS {
                        return Err(AppError::BadRequest(format!(
                            "Choice questions cannot have more than {MAX_OPTIONS} options"
                        )));
                    }
                    if question.options.iter().any(|o| o.trim().is_empty()) {
                        return Err(AppError::BadRequest(
                            "Options cannot be empty".to_string(),
                        ));
                    }
                }
                QuestionType::FreeText => {
                    if !question.options.is_empty() {
                        return Err(AppError::BadRequest(
                            "Free-text questions cannot have predefined options".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn choice_question(options: &[&str]) -> CreateQuestionInput {
        CreateQuestionInput {
            title: "Favorite color?".to_string(),
            description: None,
            question_type: QuestionType::SingleChoice,
            required: true,
            options: options.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_validate_accepts_choice_with_two_options() {
        let questions = vec![choice_question(&["Red", "Blue"])];
        assert!(FormService::validate_questions(&questions).is_ok());
    }

    #[test]
    fn test_validate_rejects_choice_with_one_option() {
        let questions = vec![choice_question(&["Red"])];
        assert!(matches!(
            FormService::validate_questions(&questions),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_option_text() {
        let questions = vec![choice_question(&["Red", "  "])];
        assert!(matches!(
            FormService::validate_questions(&questions),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut question = choice_question(&["Red", "Blue"]);
        question.title = " ".to_string();
        assert!(matches!(
            FormService::validate_questions(&[question]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_options_on_free_text() {
        let question = CreateQuestionInput {
            title: "Thoughts?".to_string(),
            description: None,
            question_type: QuestionType::FreeText,
            required: false,
            options: vec!["unexpected".to_string()],
        };
        assert!(matches!(
            FormService::validate_questions(&[question]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_accepts_form_without_questions() {
        assert!(FormService::validate_questions(&[]).is_ok());
    }
}
