use std::time::Duration;

use forms_spec::{Form, NewForm, Request, request::BatchUpdateRequest};
use log::debug;
use reqwest::blocking::{Client, Response};
use url::Url;

use crate::{
    auth::AuthProvider,
    service::{FormsService, ServiceError},
};

pub const FORMS_API_BASE: &str = "https://forms.googleapis.com/v1";

/// Blocking HTTP client for the Google Forms REST API.
pub struct GoogleFormsClient<A> {
    auth: A,
    http: Client,
    base_url: Url,
}

impl<A: AuthProvider> GoogleFormsClient<A> {
    pub fn new(auth: A) -> Result<Self, ServiceError> {
        Self::with_base_url(auth, FORMS_API_BASE)
    }

    pub fn with_base_url(auth: A, base_url: impl AsRef<str>) -> Result<Self, ServiceError> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ServiceError::InvalidBaseUrl(base_url.to_string()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("form-builder/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            auth,
            http,
            base_url: parsed,
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check(operation: &'static str, response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        debug!("{} returned {}", operation, status);
        if status.is_success() {
            Ok(response)
        } else {
            Err(ServiceError::Status {
                operation,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

impl<A: AuthProvider> FormsService for GoogleFormsClient<A> {
    fn create_form(&self, title: &str) -> Result<Form, ServiceError> {
        let token = self.auth.access_token()?;
        let response = self
            .http
            .post(self.endpoint(&["forms"])?)
            .bearer_auth(token)
            .json(&NewForm::titled(title))
            .send()?;
        Ok(Self::check("forms.create", response)?.json()?)
    }

    fn batch_update(&self, form_id: &str, requests: &[Request]) -> Result<(), ServiceError> {
        let token = self.auth.access_token()?;
        let body = BatchUpdateRequest {
            requests: requests.to_vec(),
        };
        let operation = format!("{form_id}:batchUpdate");
        let response = self
            .http
            .post(self.endpoint(&["forms", &operation])?)
            .bearer_auth(token)
            .json(&body)
            .send()?;
        Self::check("forms.batchUpdate", response)?;
        Ok(())
    }

    fn get_form(&self, form_id: &str) -> Result<Form, ServiceError> {
        let token = self.auth.access_token()?;
        let response = self
            .http
            .get(self.endpoint(&["forms", form_id])?)
            .bearer_auth(token)
            .send()?;
        Ok(Self::check("forms.get", response)?.json()?)
    }
}
