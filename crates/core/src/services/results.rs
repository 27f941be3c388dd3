//! Form results aggregation.
//!
//! Turns the two flat row streams produced by
//! [`FormResultRepository`] into one deduplicated result tree with response
//! statistics. The pipeline has three pure phases:
//!
//! 1. [`build_definition_tree`] rebuilds the form -> question -> option
//!    hierarchy from the definition join, collapsing join fan-out.
//! 2. [`collect_passage_stats`] derives distinct-passage counts from the
//!    passage join and keeps the raw facts for the merge.
//! 3. [`merge_results`] folds the statistics into the tree, registers
//!    free-text answers, and applies the anonymity rule.
//!
//! Every index used for deduplication lives inside one invocation; nothing
//! is shared across requests.

use std::collections::{HashMap, HashSet};

use formhub_common::{AppError, AppResult};
use formhub_db::entities::question::QuestionType;
use formhub_db::repositories::{DefinitionRow, FormResultRepository, PassageRow};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// The form author as shown in results. Present even for anonymous forms;
/// anonymity protects respondents, not the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAuthor {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One respondent who submitted at least one passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One answer bucket with its selection count.
///
/// Buckets are keyed by exact text within a question: predefined options are
/// registered at definition time with a zero count, and submitted free text
/// that matches no existing bucket creates a new one during the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub text: String,
    pub selected_times: u64,
}

/// One question with its answer buckets, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_type: QuestionType,
    pub required: bool,
    /// Distinct passages that answered this question at least once.
    pub passage_count: u64,
    pub answers: Vec<AnswerResult>,
}

/// The aggregated, privacy-filtered view of one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResult {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub anonymous: bool,
    pub author: ResultAuthor,
    /// Distinct passages submitted for this form.
    pub passage_count: u64,
    pub questions: Vec<QuestionResult>,
    /// Deduplicated respondents; always empty when the form is anonymous.
    pub participants: Vec<Participant>,
}

/// Aggregates derived from the passage stream, plus the raw facts.
#[derive(Debug, Clone, Default)]
pub struct PassageStats {
    /// Distinct passage ids in the stream.
    pub form_passage_count: u64,
    /// Distinct passage ids per question id.
    pub question_passage_counts: HashMap<i64, u64>,
    /// The stream itself, in row order, for the merge phase.
    pub facts: Vec<PassageRow>,
}

/// Rebuild the form tree from the definition join.
///
/// Returns `None` for an empty stream, which means the form does not exist.
/// Join fan-out repeats the form and question columns on every row; each
/// question id and each (question, option text) pair is registered exactly
/// once, in first-seen order. Lookups go through maps keyed by id so the
/// pass stays linear in the number of rows.
#[must_use]
pub fn build_definition_tree(rows: &[DefinitionRow]) -> Option<FormResult> {
    let first = rows.first()?;

    let mut result = FormResult {
        id: first.form_id,
        title: first.form_title.clone(),
        description: first.form_description.clone(),
        created_at: first.form_created_at,
        anonymous: first.form_anonymous,
        author: ResultAuthor {
            id: first.author_id,
            username: first.author_username.clone(),
            first_name: first.author_first_name.clone(),
            last_name: first.author_last_name.clone(),
            email: first.author_email.clone(),
        },
        passage_count: 0,
        questions: Vec::new(),
        participants: Vec::new(),
    };

    let mut question_slots: HashMap<i64, usize> = HashMap::new();
    let mut answers_seen: HashSet<(i64, String)> = HashSet::new();

    for row in rows {
        // A form with no questions produces one row with null question
        // columns; there is nothing to register.
        let Some(question_id) = row.question_id else {
            continue;
        };

        let slot = if let Some(&slot) = question_slots.get(&question_id) {
            slot
        } else {
            result.questions.push(QuestionResult {
                id: question_id,
                // Question columns are NOT NULL whenever the id is present.
                title: row.question_title.clone().unwrap_or_default(),
                description: row.question_description.clone(),
                question_type: row.question_type.unwrap_or(QuestionType::FreeText),
                required: row.question_required.unwrap_or(false),
                passage_count: 0,
                answers: Vec::new(),
            });
            let slot = result.questions.len() - 1;
            question_slots.insert(question_id, slot);
            slot
        };

        if row.answer_id.is_some()
            && let Some(text) = &row.answer_text
            && answers_seen.insert((question_id, text.clone()))
        {
            result.questions[slot].answers.push(AnswerResult {
                text: text.clone(),
                selected_times: 0,
            });
        }
    }

    Some(result)
}

/// Derive distinct-passage counts from the passage stream.
///
/// Counts are over distinct passage ids, never raw rows: a passage that
/// submitted several answers to one multiple-choice question still counts
/// once for that question. Answer-text identity is not decided here; that
/// happens exactly once, in [`merge_results`].
#[must_use]
pub fn collect_passage_stats(rows: Vec<PassageRow>) -> PassageStats {
    let mut form_passages: HashSet<i64> = HashSet::new();
    let mut question_passages: HashMap<i64, HashSet<i64>> = HashMap::new();

    for row in &rows {
        form_passages.insert(row.passage_id);
        question_passages
            .entry(row.question_id)
            .or_default()
            .insert(row.passage_id);
    }

    PassageStats {
        form_passage_count: form_passages.len() as u64,
        question_passage_counts: question_passages
            .into_iter()
            .map(|(question_id, passages)| (question_id, passages.len() as u64))
            .collect(),
        facts: rows,
    }
}

/// Fold passage statistics into the definition tree.
///
/// Selection counts go to the answer bucket matching the submitted text
/// exactly; text with no matching bucket (free-text answers) registers a new
/// bucket in first-seen order. A fact referencing a question id absent from
/// the definition tree is a referential inconsistency and fails the whole
/// merge; dropping it would produce an undercount indistinguishable from
/// "nobody answered".
///
/// Participants are collected for every fact and deduplicated by respondent
/// id, then cleared when the form is anonymous. The suppression sits here, at
/// the single point where the result is finalized, so no caller can forget
/// it.
pub fn merge_results(mut tree: FormResult, stats: PassageStats) -> AppResult<FormResult> {
    tree.passage_count = stats.form_passage_count;

    let question_slots: HashMap<i64, usize> = tree
        .questions
        .iter()
        .enumerate()
        .map(|(slot, question)| (question.id, slot))
        .collect();

    for question in &mut tree.questions {
        question.passage_count = stats
            .question_passage_counts
            .get(&question.id)
            .copied()
            .unwrap_or(0);
    }

    let mut answer_slots: HashMap<(i64, String), usize> = HashMap::new();
    for question in &tree.questions {
        for (slot, answer) in question.answers.iter().enumerate() {
            answer_slots.insert((question.id, answer.text.clone()), slot);
        }
    }

    let mut respondents_seen: HashSet<i64> = HashSet::new();

    for fact in &stats.facts {
        let &question_slot = question_slots.get(&fact.question_id).ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "passage {} answers question {} which is not part of form {}",
                fact.passage_id, fact.question_id, tree.id
            ))
        })?;

        let question = &mut tree.questions[question_slot];
        let key = (fact.question_id, fact.answer_text.clone());
        let answer_slot = if let Some(&slot) = answer_slots.get(&key) {
            slot
        } else {
            question.answers.push(AnswerResult {
                text: fact.answer_text.clone(),
                selected_times: 0,
            });
            let slot = question.answers.len() - 1;
            answer_slots.insert(key, slot);
            slot
        };
        question.answers[answer_slot].selected_times += 1;

        if respondents_seen.insert(fact.respondent_id) {
            tree.participants.push(Participant {
                id: fact.respondent_id,
                username: fact.respondent_username.clone(),
                first_name: fact.respondent_first_name.clone(),
                last_name: fact.respondent_last_name.clone(),
                email: fact.respondent_email.clone(),
            });
        }
    }

    if tree.anonymous {
        tree.participants.clear();
    }

    Ok(tree)
}

/// Results service: fetches the two row streams and runs the pipeline.
#[derive(Clone)]
pub struct ResultsService {
    result_repo: FormResultRepository,
}

impl ResultsService {
    /// Create a new results service.
    #[must_use]
    pub const fn new(result_repo: FormResultRepository) -> Self {
        Self { result_repo }
    }

    /// Compute the aggregated results for one form.
    ///
    /// The two streams are independent and fetched concurrently; the merge is
    /// the single join point. The whole result is materialized before
    /// returning. Retrying a partially consumed stream could double-count, so
    /// any retry re-enters here and re-fetches both streams.
    pub async fn form_results(&self, form_id: i64) -> AppResult<FormResult> {
        let (definition, passages) = tokio::try_join!(
            self.result_repo.definition_rows(form_id),
            self.result_repo.passage_rows(form_id),
        )?;

        tracing::debug!(
            form_id,
            definition_rows = definition.len(),
            passage_rows = passages.len(),
            "Aggregating form results"
        );

        let tree =
            build_definition_tree(&definition).ok_or(AppError::FormNotFound(form_id))?;
        let stats = collect_passage_stats(passages);

        merge_results(tree, stats)
    }
}
