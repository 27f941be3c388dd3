//! Passage submission service.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use formhub_common::{AppError, AppResult};
use formhub_db::{
    entities::{form_passage, question, question_answer, question::QuestionType},
    repositories::{FormRepository, PassageRepository},
};
use sea_orm::Set;

/// One submitted answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerInput {
    pub question_id: i64,
    pub text: String,
}

/// One respondent's completed submission of a form.
#[derive(Debug, Clone)]
pub struct SubmitPassageInput {
    pub answers: Vec<SubmitAnswerInput>,
}

/// Passage service for submission business logic.
#[derive(Clone)]
pub struct PassageService {
    form_repo: FormRepository,
    passage_repo: PassageRepository,
}

impl PassageService {
    /// Create a new passage service.
    #[must_use]
    pub const fn new(form_repo: FormRepository, passage_repo: PassageRepository) -> Self {
        Self {
            form_repo,
            passage_repo,
        }
    }

    /// Validate and record one submission.
    pub async fn submit(
        &self,
        form_id: i64,
        respondent_id: i64,
        input: SubmitPassageInput,
    ) -> AppResult<form_passage::Model> {
        // 404 before validation errors for forms that do not exist.
        self.form_repo.get_by_id(form_id).await?;

        let questions = self.form_repo.questions_with_options(form_id).await?;
        validate_answers(&questions, &input.answers)?;

        let answers = input
            .answers
            .into_iter()
            .map(|a| (a.question_id, a.text))
            .collect();

        self.passage_repo
            .create_with_answers(
                form_passage::ActiveModel {
                    form_id: Set(form_id),
                    user_id: Set(respondent_id),
                    created_at: Set(Utc::now().into()),
                    ..Default::default()
                },
                answers,
            )
            .await
    }
}

/// Check one answer set against the form's question definitions.
///
/// Rules: every answer must target a question of this form; choice answers
/// must match a predefined option exactly; single-choice questions accept at
/// most one answer; required questions must be answered; a passage must
/// answer at least one question.
fn validate_answers(
    questions: &[(question::Model, Vec<question_answer::Model>)],
    answers: &[SubmitAnswerInput],
) -> AppResult<()> {
    if answers.is_empty() {
        return Err(AppError::BadRequest(
            "A passage must answer at least one question".to_string(),
        ));
    }

    let by_id: HashMap<i64, &(question::Model, Vec<question_answer::Model>)> = questions
        .iter()
        .map(|entry| (entry.0.id, entry))
        .collect();

    let mut answered: HashSet<i64> = HashSet::new();

    for answer in answers {
        let Some((question, options)) = by_id.get(&answer.question_id) else {
            return Err(AppError::BadRequest(format!(
                "Question {} is not part of this form",
                answer.question_id
            )));
        };

        if answer.text.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Empty answer for question {}",
                question.id
            )));
        }

        match question.question_type {
            QuestionType::SingleChoice => {
                if !answered.insert(question.id) {
                    return Err(AppError::BadRequest(format!(
                        "Question {} accepts a single answer",
                        question.id
                    )));
                }
                if !options.iter().any(|o| o.answer_text == answer.text) {
                    return Err(AppError::BadRequest(format!(
                        "Answer to question {} does not match any option",
                        question.id
                    )));
                }
            }
            QuestionType::MultipleChoice => {
                answered.insert(question.id);
                if !options.iter().any(|o| o.answer_text == answer.text) {
                    return Err(AppError::BadRequest(format!(
                        "Answer to question {} does not match any option",
                        question.id
                    )));
                }
            }
            QuestionType::FreeText => {
                answered.insert(question.id);
            }
        }
    }

    for (question, _) in questions {
        if question.required && !answered.contains(&question.id) {
            return Err(AppError::BadRequest(format!(
                "Question {} is required",
                question.id
            )));
        }
    }

    Ok(())
}
