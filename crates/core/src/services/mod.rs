//! Business logic services.

#![allow(missing_docs)]

pub mod form;
pub mod passage;
pub mod results;
pub mod user;

pub use form::{CreateFormInput, CreateQuestionInput, FormDetail, FormService, QuestionDetail};
pub use passage::{PassageService, SubmitAnswerInput, SubmitPassageInput};
pub use results::{
    AnswerResult, FormResult, Participant, PassageStats, QuestionResult, ResultAuthor,
    ResultsService, build_definition_tree, collect_passage_stats, merge_results,
};
pub use user::{CreateUserInput, UserService};
