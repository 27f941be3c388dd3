//! Database entities.

pub mod form;
pub mod form_passage;
pub mod passage_answer;
pub mod question;
pub mod question_answer;
pub mod session;
pub mod user;

pub use form::Entity as Form;
pub use form_passage::Entity as FormPassage;
pub use passage_answer::Entity as PassageAnswer;
pub use question::Entity as Question;
pub use question_answer::Entity as QuestionAnswer;
pub use session::Entity as Session;
pub use user::Entity as User;
