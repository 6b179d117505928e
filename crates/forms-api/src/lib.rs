#![allow(missing_docs)]

pub mod auth;
pub mod google;
pub mod orchestrator;
pub mod service;

pub use auth::{AuthError, AuthProvider, FORMS_BODY_SCOPE, InstalledAppAuth, StaticToken};
pub use google::{FORMS_API_BASE, GoogleFormsClient};
pub use orchestrator::{
    CreateError, CreationPlan, FormOrchestrator, FormResult, Phase, edit_uri,
    plan_creation,
};
pub use service::{FormsService, ServiceError};
