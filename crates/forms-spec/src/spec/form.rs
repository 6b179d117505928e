use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spec::{nullable, question::QuestionConfig};

/// Title used when the document does not name the form.
pub const DEFAULT_FORM_TITLE: &str = "API-created form";

/// Title and description shown at the top of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormInfo {
    #[serde(default = "default_form_title", deserialize_with = "nullable::form_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub(crate) fn default_form_title() -> String {
    DEFAULT_FORM_TITLE.into()
}

impl Default for FormInfo {
    fn default() -> Self {
        Self {
            title: default_form_title(),
            description: None,
        }
    }
}

/// Top-level form definition read from a configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormConfig {
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub form_info: FormInfo,
    #[serde(default = "default_is_quiz", deserialize_with = "nullable::is_quiz")]
    pub is_quiz: bool,
    /// Accepted for compatibility; only its presence is recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_settings: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub questions: Vec<QuestionConfig>,
}

pub(crate) fn default_is_quiz() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_info: FormInfo::default(),
            is_quiz: default_is_quiz(),
            quiz_settings: None,
            questions: Vec::new(),
        }
    }
}

impl FormConfig {
    /// Description to push in the settings phase, ignoring blank strings.
    pub fn description(&self) -> Option<&str> {
        self.form_info
            .description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }
}
