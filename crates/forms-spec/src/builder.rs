use thiserror::Error;

use crate::{
    placeholder::PlaceholderPolicy,
    request::{
        ChoiceOption, ChoiceQuestion, ChoiceType, CreateItemRequest, FeedbackText, Grading, Image,
        Item, Location, Question, QuestionItem, QuestionKind, Request, ScaleQuestion,
        TextQuestion,
    },
    spec::{
        form::FormConfig,
        question::{QuestionConfig, QuestionType},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Unsupported question type: {value} (question {index})")]
    UnsupportedType { index: usize, value: String },
}

/// Maps question configurations onto `createItem` requests.
#[derive(Debug, Clone, Default)]
pub struct QuestionRequestBuilder {
    is_quiz: bool,
    placeholders: PlaceholderPolicy,
}

impl QuestionRequestBuilder {
    pub fn new(is_quiz: bool, placeholders: PlaceholderPolicy) -> Self {
        Self {
            is_quiz,
            placeholders,
        }
    }

    pub fn is_quiz(&self) -> bool {
        self.is_quiz
    }

    /// Build the request that inserts `question` at position `index`.
    pub fn build(&self, question: &QuestionConfig, index: usize) -> Result<Request, BuildError> {
        let kind = question
            .question_type()
            .map_err(|_| BuildError::UnsupportedType {
                index,
                value: question.kind.clone(),
            })?;

        let item = match kind {
            QuestionType::Radio => self.choice_item(question, ChoiceType::Radio),
            QuestionType::Checkbox => self.choice_item(question, ChoiceType::Checkbox),
            QuestionType::Text => self.text_item(question),
            QuestionType::ParagraphText => self.paragraph_item(question),
            QuestionType::Scale => self.scale_item(question),
            QuestionType::Image => self.image_item(question),
        };

        Ok(Request::CreateItem(CreateItemRequest {
            item,
            location: Location { index },
        }))
    }

    fn choice_item(&self, config: &QuestionConfig, kind: ChoiceType) -> Item {
        let question = Question {
            required: config.required,
            grading: self.answer_grading(config),
            kind: choice_kind(config, kind),
        };
        item(config, config.description.clone(), question, self.image(config))
    }

    fn text_item(&self, config: &QuestionConfig) -> Item {
        let grading = if !self.is_quiz {
            None
        } else if !config.correct_answers.is_empty() {
            Some(Grading {
                general_feedback: general_feedback(config),
                ..Grading::with_answers(config.points, config.correct_answers.iter().cloned())
            })
        } else {
            self.manual_grading(config)
        };

        let question = Question {
            required: config.required,
            grading,
            kind: QuestionKind::TextQuestion(TextQuestion { paragraph: false }),
        };
        item(config, config.description.clone(), question, self.image(config))
    }

    fn paragraph_item(&self, config: &QuestionConfig) -> Item {
        let question = Question {
            required: config.required,
            grading: self.manual_grading(config),
            kind: QuestionKind::TextQuestion(TextQuestion { paragraph: true }),
        };
        item(config, config.description.clone(), question, self.image(config))
    }

    fn scale_item(&self, config: &QuestionConfig) -> Item {
        let grading = match config.correct_answer_text() {
            Some(answer) if self.is_quiz => Some(Grading {
                when_right: FeedbackText::from_optional(config.feedback.correct.as_deref()),
                when_wrong: FeedbackText::from_optional(config.feedback.incorrect.as_deref()),
                ..Grading::with_answers(config.points, [answer])
            }),
            _ => self.manual_grading(config),
        };

        let question = Question {
            required: config.required,
            grading,
            kind: QuestionKind::ScaleQuestion(ScaleQuestion {
                low: config.low,
                high: config.high,
                low_label: config.low_label.clone(),
                high_label: config.high_label.clone(),
            }),
        };
        item(config, config.description.clone(), question, self.image(config))
    }

    fn image_item(&self, config: &QuestionConfig) -> Item {
        let question = Question {
            required: config.required,
            grading: self.answer_grading(config),
            kind: choice_kind(config, ChoiceType::Radio),
        };

        let placeholder = config
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| self.placeholders.is_placeholder(url));
        let description = match placeholder {
            Some(url) => append_note(
                &config.description,
                &format!("[Image omitted: placeholder URL {url}]"),
            ),
            None => config.description.clone(),
        };

        item(config, description, question, self.image(config))
    }

    /// Grading against `correct_answers`, with right/wrong feedback.
    fn answer_grading(&self, config: &QuestionConfig) -> Option<Grading> {
        if !self.is_quiz || config.correct_answers.is_empty() {
            return None;
        }
        Some(Grading {
            when_right: FeedbackText::from_optional(config.feedback.correct.as_deref()),
            when_wrong: FeedbackText::from_optional(config.feedback.incorrect.as_deref()),
            ..Grading::with_answers(config.points, config.correct_answers.iter().cloned())
        })
    }

    /// Points-only grading for answers marked by hand.
    fn manual_grading(&self, config: &QuestionConfig) -> Option<Grading> {
        if !self.is_quiz || config.points <= 0 {
            return None;
        }
        Some(Grading {
            general_feedback: general_feedback(config),
            ..Grading::points_only(config.points)
        })
    }

    fn image(&self, config: &QuestionConfig) -> Option<Image> {
        self.placeholders
            .filter(config.image_url.as_deref())
            .map(|url| Image {
                source_uri: url.to_string(),
            })
    }
}

/// Build every question request of `config` in source order.
///
/// Nothing is returned unless all questions build, so a bad question never
/// leaves a partial batch behind.
pub fn build_requests(
    config: &FormConfig,
    placeholders: &PlaceholderPolicy,
) -> Result<Vec<Request>, BuildError> {
    let builder = QuestionRequestBuilder::new(config.is_quiz, placeholders.clone());
    config
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| builder.build(question, index))
        .collect()
}

fn item(
    config: &QuestionConfig,
    description: String,
    question: Question,
    image: Option<Image>,
) -> Item {
    Item {
        title: config.title.clone(),
        description,
        question_item: QuestionItem { question, image },
    }
}

fn choice_kind(config: &QuestionConfig, kind: ChoiceType) -> QuestionKind {
    QuestionKind::ChoiceQuestion(ChoiceQuestion {
        kind,
        options: config
            .options
            .iter()
            .map(|option| ChoiceOption {
                value: option.clone(),
            })
            .collect(),
        shuffle: config.shuffle,
    })
}

fn general_feedback(config: &QuestionConfig) -> Option<FeedbackText> {
    FeedbackText::from_optional(config.feedback.general.as_deref())
}

fn append_note(description: &str, note: &str) -> String {
    if description.trim().is_empty() {
        note.to_string()
    } else {
        format!("{description}\n\n{note}")
    }
}
