#![allow(missing_docs)]

pub mod builder;
pub mod load;
pub mod placeholder;
pub mod request;
pub mod schema;
pub mod spec;

pub use builder::{BuildError, QuestionRequestBuilder, build_requests};
pub use load::{ConfigError, config_from_value, load_config, parse_config};
pub use placeholder::{DEFAULT_PLACEHOLDER_URL, PlaceholderPolicy};
pub use request::{Form, NewForm, Request};
pub use schema::config_schema;
pub use spec::{Feedback, FormConfig, FormInfo, QuestionConfig, QuestionType};
