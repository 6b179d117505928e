//! Wire model for the Google Forms `forms` resource and its `batchUpdate`
//! requests. Field names follow the service's camelCase JSON.

use serde::{Deserialize, Serialize};

/// One entry of a `batchUpdate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    CreateItem(CreateItemRequest),
    UpdateFormInfo(UpdateFormInfoRequest),
    UpdateSettings(UpdateSettingsRequest),
}

impl Request {
    pub fn as_create_item(&self) -> Option<&CreateItemRequest> {
        match self {
            Request::CreateItem(request) => Some(request),
            _ => None,
        }
    }
}

/// Body of `batchUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub item: Item,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    pub description: String,
    pub question_item: QuestionItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<Grading>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Exactly one of the question payloads the service understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    ChoiceQuestion(ChoiceQuestion),
    TextQuestion(TextQuestion),
    ScaleQuestion(ScaleQuestion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceType {
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    #[serde(rename = "type")]
    pub kind: ChoiceType,
    pub options: Vec<ChoiceOption>,
    pub shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuestion {
    pub paragraph: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleQuestion {
    pub low: i64,
    pub high: i64,
    pub low_label: String,
    pub high_label: String,
}

/// Grading block attached to quiz questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grading {
    pub point_value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<CorrectAnswers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_right: Option<FeedbackText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_wrong: Option<FeedbackText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_feedback: Option<FeedbackText>,
}

impl Grading {
    /// Points-only grading; the answer is marked by hand.
    pub fn points_only(point_value: i64) -> Self {
        Self {
            point_value,
            correct_answers: None,
            when_right: None,
            when_wrong: None,
            general_feedback: None,
        }
    }

    pub fn with_answers<I, S>(point_value: i64, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            correct_answers: Some(CorrectAnswers {
                answers: answers
                    .into_iter()
                    .map(|value| CorrectAnswer {
                        value: value.into(),
                    })
                    .collect(),
            }),
            ..Self::points_only(point_value)
        }
    }

    /// Correct answer values in declaration order.
    pub fn answer_values(&self) -> Vec<&str> {
        self.correct_answers
            .as_ref()
            .map(|answers| {
                answers
                    .answers
                    .iter()
                    .map(|answer| answer.value.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectAnswers {
    pub answers: Vec<CorrectAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectAnswer {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackText {
    pub text: String,
}

impl FeedbackText {
    /// Wraps non-blank text; blank feedback is left out of the payload.
    pub fn from_optional(text: Option<&str>) -> Option<Self> {
        text.filter(|text| !text.trim().is_empty())
            .map(|text| FeedbackText { text: text.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfoRequest {
    pub info: InfoUpdate,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoUpdate {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub settings: FormSettings,
    pub update_mask: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    #[serde(default)]
    pub quiz_settings: QuizSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    #[serde(default)]
    pub is_quiz: bool,
}

impl Request {
    pub fn update_description(description: impl Into<String>) -> Self {
        Request::UpdateFormInfo(UpdateFormInfoRequest {
            info: InfoUpdate {
                description: description.into(),
            },
            update_mask: "description".into(),
        })
    }

    pub fn enable_quiz() -> Self {
        Request::UpdateSettings(UpdateSettingsRequest {
            settings: FormSettings {
                quiz_settings: QuizSettings { is_quiz: true },
            },
            update_mask: "quizSettings.isQuiz".into(),
        })
    }
}

/// Body of `forms.create`; the service only honours the title here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForm {
    pub info: NewFormInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFormInfo {
    pub title: String,
}

impl NewForm {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            info: NewFormInfo {
                title: title.into(),
            },
        }
    }
}

/// The subset of the `forms` resource read back from the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<FormInfoResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfoResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
}
