//! Database repositories.

pub mod form;
pub mod form_result;
pub mod passage;
pub mod session;
pub mod user;

pub use form::{FormRepository, NewQuestion};
pub use form_result::{DefinitionRow, FormResultRepository, PassageRow};
pub use passage::PassageRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
