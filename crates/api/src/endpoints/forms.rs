//! Form, passage and results endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use formhub_common::AppResult;
use formhub_core::{
    CreateFormInput, CreateQuestionInput, FormDetail, FormResult, SubmitAnswerInput,
    SubmitPassageInput,
};
use formhub_db::entities::question::QuestionType;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// One question of a form-creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    pub description: Option<String>,

    pub question_type: QuestionType,

    #[serde(default)]
    pub required: bool,

    /// Predefined option texts; omit for free-text questions.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Form-creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub anonymous: bool,

    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionRequest>,
}

/// Create a form.
async fn create_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateFormRequest>,
) -> AppResult<ApiResponse<FormDetail>> {
    req.validate()?;

    let input = CreateFormInput {
        title: req.title,
        description: req.description,
        anonymous: req.anonymous,
        questions: req
            .questions
            .into_iter()
            .map(|q| CreateQuestionInput {
                title: q.title,
                description: q.description,
                question_type: q.question_type,
                required: q.required,
                options: q.options,
            })
            .collect(),
    };

    let form = state.form_service.create(user.id, input).await?;
    Ok(ApiResponse::ok(form))
}

/// List all forms.
async fn list_forms(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FormDetail>>> {
    let forms = state.form_service.list().await?;
    Ok(ApiResponse::ok(forms))
}

/// Get one form with its questions.
async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
) -> AppResult<ApiResponse<FormDetail>> {
    let form = state.form_service.get(form_id).await?;
    Ok(ApiResponse::ok(form))
}

/// Delete a form (author only).
async fn delete_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.form_service.delete(form_id, user.id).await?;
    Ok(ok())
}

/// One answer of a passage submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: i64,
    pub text: String,
}

/// Passage submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPassageRequest {
    pub answers: Vec<AnswerRequest>,
}

/// Passage submission response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageResponse {
    pub id: i64,
    pub form_id: i64,
    pub created_at: String,
}

/// Submit a passage for a form.
async fn submit_passage(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
    Json(req): Json<SubmitPassageRequest>,
) -> AppResult<ApiResponse<PassageResponse>> {
    let input = SubmitPassageInput {
        answers: req
            .answers
            .into_iter()
            .map(|a| SubmitAnswerInput {
                question_id: a.question_id,
                text: a.text,
            })
            .collect(),
    };

    let passage = state.passage_service.submit(form_id, user.id, input).await?;

    Ok(ApiResponse::ok(PassageResponse {
        id: passage.id,
        form_id: passage.form_id,
        created_at: passage.created_at.to_rfc3339(),
    }))
}

/// Get the aggregated results for a form.
async fn form_results(
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
) -> AppResult<ApiResponse<FormResult>> {
    let results = state.results_service.form_results(form_id).await?;
    Ok(ApiResponse::ok(results))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_form).get(list_forms))
        .route("/{id}", get(get_form).delete(delete_form))
        .route("/{id}/passages", post(submit_passage))
        .route("/{id}/results", get(form_results))
}
