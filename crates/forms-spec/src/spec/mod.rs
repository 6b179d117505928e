pub mod form;
mod nullable;
pub mod question;

pub use form::{DEFAULT_FORM_TITLE, FormConfig, FormInfo};
pub use question::{DEFAULT_QUESTION_TITLE, Feedback, QuestionConfig, QuestionType};
