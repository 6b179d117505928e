use forms_spec::{Form, Request};
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid service base URL: {0}")]
    InvalidBaseUrl(String),
}

/// The three remote operations form creation depends on.
pub trait FormsService {
    /// Create a form shell carrying only `title`.
    fn create_form(&self, title: &str) -> Result<Form, ServiceError>;

    /// Apply `requests` to the form in array order.
    fn batch_update(&self, form_id: &str, requests: &[Request]) -> Result<(), ServiceError>;

    fn get_form(&self, form_id: &str) -> Result<Form, ServiceError>;
}

impl<T: FormsService + ?Sized> FormsService for &T {
    fn create_form(&self, title: &str) -> Result<Form, ServiceError> {
        (**self).create_form(title)
    }

    fn batch_update(&self, form_id: &str, requests: &[Request]) -> Result<(), ServiceError> {
        (**self).batch_update(form_id, requests)
    }

    fn get_form(&self, form_id: &str) -> Result<Form, ServiceError> {
        (**self).get_form(form_id)
    }
}
