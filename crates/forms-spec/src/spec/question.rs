use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::nullable;

/// Title used for questions that do not carry one.
pub const DEFAULT_QUESTION_TITLE: &str = "Untitled Question";

/// Question kinds understood by the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Radio,
    Checkbox,
    Text,
    ParagraphText,
    Scale,
    Image,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Radio => "RADIO",
            QuestionType::Checkbox => "CHECKBOX",
            QuestionType::Text => "TEXT",
            QuestionType::ParagraphText => "PARAGRAPH_TEXT",
            QuestionType::Scale => "SCALE",
            QuestionType::Image => "IMAGE",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "RADIO" => Ok(QuestionType::Radio),
            "CHECKBOX" => Ok(QuestionType::Checkbox),
            "TEXT" => Ok(QuestionType::Text),
            "PARAGRAPH_TEXT" => Ok(QuestionType::ParagraphText),
            "SCALE" => Ok(QuestionType::Scale),
            "IMAGE" => Ok(QuestionType::Image),
            other => Err(other.to_string()),
        }
    }
}

/// Feedback texts shown to the respondent after grading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,
}

/// Definition of a single question inside a form.
///
/// `kind` stays as the raw text from the document; it is resolved when the
/// request is built so that loading never fails on an unknown type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionConfig {
    #[serde(rename = "type", default = "default_kind", deserialize_with = "nullable::kind")]
    pub kind: String,
    #[serde(default = "default_title", deserialize_with = "nullable::title")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub required: bool,
    #[serde(
        default,
        deserialize_with = "nullable::or_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub shuffle: bool,
    #[serde(
        default,
        deserialize_with = "nullable::or_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub correct_answers: Vec<String>,
    /// Single expected value for scale questions; numbers and booleans are
    /// accepted and compared as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Value>,
    #[serde(default = "default_points", deserialize_with = "nullable::points")]
    pub points: i64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub feedback: Feedback,
    #[serde(default = "default_low", deserialize_with = "nullable::low")]
    pub low: i64,
    #[serde(default = "default_high", deserialize_with = "nullable::high")]
    pub high: i64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub low_label: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub high_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

pub(crate) fn default_kind() -> String {
    QuestionType::Radio.as_str().into()
}

pub(crate) fn default_title() -> String {
    DEFAULT_QUESTION_TITLE.into()
}

pub(crate) fn default_points() -> i64 {
    1
}

pub(crate) fn default_low() -> i64 {
    1
}

pub(crate) fn default_high() -> i64 {
    5
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            title: default_title(),
            description: String::new(),
            required: false,
            options: Vec::new(),
            shuffle: false,
            correct_answers: Vec::new(),
            correct_answer: None,
            points: default_points(),
            feedback: Feedback::default(),
            low: default_low(),
            high: default_high(),
            low_label: String::new(),
            high_label: String::new(),
            image_url: None,
        }
    }
}

impl QuestionConfig {
    pub fn question_type(&self) -> Result<QuestionType, String> {
        self.kind.parse()
    }

    /// `correct_answer` rendered as text, or `None` when absent, null or blank.
    pub fn correct_answer_text(&self) -> Option<String> {
        let text = match self.correct_answer.as_ref()? {
            Value::Null => return None,
            Value::String(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            other => other.to_string(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
