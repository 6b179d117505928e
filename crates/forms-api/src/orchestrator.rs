use std::fmt;

use forms_spec::{BuildError, FormConfig, NewForm, PlaceholderPolicy, Request, build_requests};
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::service::{FormsService, ServiceError};

const FORMS_DOCS_BASE: &str = "https://docs.google.com/forms/d";

/// Remote interaction step, reported alongside failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Settings,
    Questions,
    Finalize,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Create => "create form",
            Phase::Settings => "apply form settings",
            Phase::Questions => "add questions",
            Phase::Finalize => "fetch form",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("failed to {phase}: {source}")]
    Remote {
        phase: Phase,
        #[source]
        source: ServiceError,
    },
    #[error("the service did not return a form identifier")]
    MissingFormId,
}

/// Identifiers and links of a created form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormResult {
    pub form_id: String,
    pub responder_uri: String,
    pub edit_uri: String,
}

/// Editor link for a form.
pub fn edit_uri(form_id: &str) -> String {
    format!("{}/{}/edit", FORMS_DOCS_BASE, form_id)
}

/// Every call a creation run makes, in order, with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationPlan {
    pub create: NewForm,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<Request>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Request>,
}

/// Lay out the calls a creation run makes for `config`.
pub fn plan_creation(
    config: &FormConfig,
    placeholders: &PlaceholderPolicy,
) -> Result<CreationPlan, BuildError> {
    let questions = build_requests(config, placeholders)?;

    let mut settings = Vec::new();
    if let Some(description) = config.description() {
        settings.push(Request::update_description(description));
    }
    // Quiz mode must be on before any question carries grading.
    if config.is_quiz {
        settings.push(Request::enable_quiz());
    }

    Ok(CreationPlan {
        create: NewForm::titled(config.form_info.title.clone()),
        settings,
        questions,
    })
}

/// Drives form creation against a [`FormsService`].
pub struct FormOrchestrator<S> {
    service: S,
    placeholders: PlaceholderPolicy,
}

impl<S: FormsService> FormOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            placeholders: PlaceholderPolicy::default(),
        }
    }

    pub fn with_placeholders(mut self, placeholders: PlaceholderPolicy) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Build every payload of a run without contacting the service.
    pub fn plan(&self, config: &FormConfig) -> Result<CreationPlan, BuildError> {
        plan_creation(config, &self.placeholders)
    }

    /// Create the form described by `config`.
    ///
    /// Question requests are built before the first remote call. A remote
    /// failure aborts the run and leaves whatever was already created in place.
    pub fn create(&self, config: &FormConfig) -> Result<FormResult, CreateError> {
        let plan = self.plan(config)?;
        let title = &plan.create.info.title;

        info!("creating form '{}'", title);
        let created = self
            .service
            .create_form(title)
            .map_err(remote(Phase::Create))?;
        let form_id = created
            .form_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CreateError::MissingFormId)?;
        info!("created form {}", form_id);

        if !plan.settings.is_empty() {
            info!("applying {} settings update(s)", plan.settings.len());
            debug!("settings batch: {:?}", plan.settings);
            self.service
                .batch_update(&form_id, &plan.settings)
                .map_err(remote(Phase::Settings))?;
        }

        if plan.questions.is_empty() {
            info!("no questions to add");
        } else {
            info!("adding {} question(s)", plan.questions.len());
            debug!("questions batch: {:?}", plan.questions);
            self.service
                .batch_update(&form_id, &plan.questions)
                .map_err(remote(Phase::Questions))?;
        }

        let form = self
            .service
            .get_form(&form_id)
            .map_err(remote(Phase::Finalize))?;
        let responder_uri = form.responder_uri.unwrap_or_else(|| {
            warn!("form {} has no responder link; using the viewform address", form_id);
            format!("{}/{}/viewform", FORMS_DOCS_BASE, form_id)
        });

        Ok(FormResult {
            edit_uri: edit_uri(&form_id),
            form_id,
            responder_uri,
        })
    }
}

fn remote(phase: Phase) -> impl Fn(ServiceError) -> CreateError {
    move |source| CreateError::Remote { phase, source }
}
