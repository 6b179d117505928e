use serde_json::{Value, json};

use forms_spec::{
    BuildError, FormConfig, PlaceholderPolicy, QuestionConfig, QuestionRequestBuilder, Request,
    build_requests, config_from_value,
    request::{ChoiceType, CreateItemRequest, QuestionKind},
};

fn fixture() -> FormConfig {
    serde_json::from_str(include_str!("fixtures/quiz_form.json")).expect("deserialize")
}

fn question(value: Value) -> QuestionConfig {
    serde_json::from_value(value).expect("question")
}

fn build(value: Value, is_quiz: bool) -> CreateItemRequest {
    let builder = QuestionRequestBuilder::new(is_quiz, PlaceholderPolicy::default());
    match builder.build(&question(value), 0).expect("build") {
        Request::CreateItem(request) => request,
        other => panic!("unexpected request {:?}", other),
    }
}

#[test]
fn choice_questions_skip_grading_outside_quiz_mode() {
    for kind in ["RADIO", "CHECKBOX"] {
        let request = build(
            json!({
                "type": kind,
                "title": "Pick",
                "options": ["A", "B"],
                "correct_answers": ["A"],
                "points": 4
            }),
            false,
        );
        assert!(request.item.question_item.question.grading.is_none());
    }
}

#[test]
fn choice_question_carries_options_and_grading() {
    let request = build(
        json!({
            "type": "checkbox",
            "title": "Rivers",
            "options": ["Danube", "Alps", "Rhine"],
            "correct_answers": ["Danube", "Rhine"],
            "points": 2,
            "shuffle": true,
            "feedback": { "correct": "Yes", "incorrect": "No", "general": "unused" }
        }),
        true,
    );

    let question = &request.item.question_item.question;
    let QuestionKind::ChoiceQuestion(choice) = &question.kind else {
        panic!("expected choice question");
    };
    assert_eq!(choice.kind, ChoiceType::Checkbox);
    assert!(choice.shuffle);
    let values: Vec<_> = choice.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, ["Danube", "Alps", "Rhine"]);

    let grading = question.grading.as_ref().expect("grading");
    assert_eq!(grading.point_value, 2);
    assert_eq!(grading.answer_values(), ["Danube", "Rhine"]);
    assert_eq!(grading.when_right.as_ref().map(|f| f.text.as_str()), Some("Yes"));
    assert_eq!(grading.when_wrong.as_ref().map(|f| f.text.as_str()), Some("No"));
    assert!(grading.general_feedback.is_none());
}

#[test]
fn choice_question_without_answers_is_not_graded() {
    let request = build(json!({ "type": "RADIO", "options": ["A"] }), true);
    assert!(request.item.question_item.question.grading.is_none());
}

#[test]
fn text_question_prefers_correct_answers_over_points() {
    let request = build(
        json!({
            "type": "TEXT",
            "title": "Capital of France?",
            "correct_answers": ["Paris"],
            "points": 5,
            "feedback": { "general": "Paris since 508." }
        }),
        true,
    );

    let question = &request.item.question_item.question;
    assert!(matches!(
        question.kind,
        QuestionKind::TextQuestion(ref text) if !text.paragraph
    ));
    let grading = question.grading.as_ref().expect("grading");
    assert_eq!(grading.answer_values(), ["Paris"]);
    assert_eq!(grading.point_value, 5);
    assert_eq!(
        grading.general_feedback.as_ref().map(|f| f.text.as_str()),
        Some("Paris since 508.")
    );
}

#[test]
fn text_question_falls_back_to_points_only() {
    let request = build(json!({ "type": "TEXT", "points": 3 }), true);
    let grading = request.item.question_item.question.grading.expect("grading");
    assert_eq!(grading.point_value, 3);
    assert!(grading.correct_answers.is_none());

    let request = build(json!({ "type": "TEXT", "points": 0 }), true);
    assert!(request.item.question_item.question.grading.is_none());
}

#[test]
fn paragraph_question_never_carries_correct_answers() {
    let request = build(
        json!({
            "type": "PARAGRAPH_TEXT",
            "correct_answers": ["ignored"],
            "points": 5,
            "feedback": { "general": "Graded by hand." }
        }),
        true,
    );

    let question = &request.item.question_item.question;
    assert!(matches!(
        question.kind,
        QuestionKind::TextQuestion(ref text) if text.paragraph
    ));
    let grading = question.grading.as_ref().expect("grading");
    assert_eq!(grading.point_value, 5);
    assert!(grading.correct_answers.is_none());
    assert!(grading.general_feedback.is_some());
}

#[test]
fn scale_question_prefers_single_answer() {
    let request = build(
        json!({
            "type": "SCALE",
            "low": 1,
            "high": 10,
            "low_label": "Low",
            "high_label": "High",
            "correct_answer": "7",
            "points": 3
        }),
        true,
    );

    let question = &request.item.question_item.question;
    let QuestionKind::ScaleQuestion(scale) = &question.kind else {
        panic!("expected scale question");
    };
    assert_eq!((scale.low, scale.high), (1, 10));
    assert_eq!(scale.low_label, "Low");
    assert_eq!(scale.high_label, "High");

    let grading = question.grading.as_ref().expect("grading");
    assert_eq!(grading.answer_values(), ["7"]);
    assert_eq!(grading.point_value, 3);
}

#[test]
fn scale_question_coerces_numeric_answer() {
    let request = build(json!({ "type": "SCALE", "correct_answer": 4 }), true);
    let grading = request.item.question_item.question.grading.expect("grading");
    assert_eq!(grading.answer_values(), ["4"]);
}

#[test]
fn scale_question_without_answer_is_points_only() {
    let request = build(json!({ "type": "SCALE", "points": 2 }), true);
    let grading = request.item.question_item.question.grading.expect("grading");
    assert!(grading.correct_answers.is_none());
    assert_eq!(grading.point_value, 2);
}

#[test]
fn placeholder_images_are_never_attached() {
    for kind in ["RADIO", "CHECKBOX", "TEXT", "PARAGRAPH_TEXT", "SCALE", "IMAGE"] {
        let request = build(
            json!({
                "type": kind,
                "description": "Original",
                "image_url": "https://example.com/image.jpg"
            }),
            true,
        );
        assert!(request.item.question_item.image.is_none(), "{kind}");
        if kind == "IMAGE" {
            assert!(request.item.description.starts_with("Original\n\n"));
            assert!(request.item.description.contains("https://example.com/image.jpg"));
        } else {
            assert_eq!(request.item.description, "Original");
        }
    }
}

#[test]
fn placeholder_host_variants_are_never_attached() {
    for url in [
        "https://EXAMPLE.com/image.jpg",
        "https://example.com:443/image.jpg",
        "http://example.com/image.jpg",
    ] {
        let request = build(json!({ "type": "TEXT", "image_url": url }), true);
        assert!(request.item.question_item.image.is_none(), "{url}");
    }
}

#[test]
fn real_images_are_attached() {
    let request = build(
        json!({ "type": "TEXT", "image_url": "https://upload.wikimedia.org/cat.png" }),
        false,
    );
    let image = request.item.question_item.image.expect("image");
    assert_eq!(image.source_uri, "https://upload.wikimedia.org/cat.png");
}

#[test]
fn image_question_is_radio_shaped_and_graded() {
    let request = build(
        json!({
            "type": "IMAGE",
            "options": ["Italy", "Ireland"],
            "correct_answers": ["Ireland"],
            "image_url": "https://flags.example.org/ie.png"
        }),
        true,
    );
    let question = &request.item.question_item.question;
    assert!(matches!(
        question.kind,
        QuestionKind::ChoiceQuestion(ref choice) if choice.kind == ChoiceType::Radio
    ));
    assert_eq!(
        question.grading.as_ref().expect("grading").answer_values(),
        ["Ireland"]
    );
    assert!(request.item.question_item.image.is_some());
    assert_eq!(request.item.description, "");
}

#[test]
fn image_note_replaces_empty_description() {
    let request = build(
        json!({ "type": "IMAGE", "image_url": "https://example.com/a.png" }),
        false,
    );
    assert!(request.item.description.starts_with("[Image omitted"));
}

#[test]
fn insertion_indices_follow_source_order() {
    let config = fixture();
    let requests = build_requests(&config, &PlaceholderPolicy::default()).expect("build");
    assert_eq!(requests.len(), config.questions.len());
    for (position, request) in requests.iter().enumerate() {
        let create = request.as_create_item().expect("create item");
        assert_eq!(create.location.index, position);
        assert_eq!(create.item.title, config.questions[position].title);
    }
}

#[test]
fn unsupported_type_fails_the_whole_build() {
    let config = config_from_value(json!({
        "questions": [
            { "type": "RADIO", "title": "ok" },
            { "type": "DATE", "title": "bad" },
            { "type": "TEXT", "title": "ok" }
        ]
    }))
    .expect("deserialize");

    let err = build_requests(&config, &PlaceholderPolicy::default()).expect_err("bad type");
    assert_eq!(
        err,
        BuildError::UnsupportedType {
            index: 1,
            value: "DATE".into()
        }
    );
    assert!(err.to_string().contains("DATE"));
}

#[test]
fn serialized_request_uses_service_field_names() {
    let request = QuestionRequestBuilder::new(true, PlaceholderPolicy::default())
        .build(
            &question(json!({
                "type": "RADIO",
                "title": "Q1",
                "options": ["A", "B"],
                "correct_answers": ["A"],
                "points": 2
            })),
            0,
        )
        .expect("build");

    let value = serde_json::to_value(&request).expect("serialize");
    let question = &value["createItem"]["item"]["questionItem"]["question"];
    assert_eq!(value["createItem"]["location"]["index"], 0);
    assert_eq!(question["choiceQuestion"]["type"], "RADIO");
    assert_eq!(question["choiceQuestion"]["options"][1]["value"], "B");
    assert_eq!(question["grading"]["pointValue"], 2);
    assert_eq!(
        question["grading"]["correctAnswers"]["answers"],
        json!([{ "value": "A" }])
    );
    assert!(question["grading"].get("whenRight").is_none());
}
