use serde_json::{Value, json};

/// Survey used as a starting point for new configuration files.
pub fn survey() -> Value {
    json!({
        "form_info": {
            "title": "Sample Survey",
            "description": "This is a sample survey created via API"
        },
        "is_quiz": false,
        "questions": [
            {
                "type": "RADIO",
                "title": "In what year did the United States land on the moon?",
                "options": ["1965", "1967", "1969", "1971"],
                "required": true,
                "shuffle": true
            },
            {
                "type": "TEXT",
                "title": "What is your name?",
                "required": true
            },
            {
                "type": "SCALE",
                "title": "How satisfied are you with this service?",
                "low": 1,
                "high": 5,
                "low_label": "Very Dissatisfied",
                "high_label": "Very Satisfied",
                "required": true
            }
        ]
    })
}

/// Quiz exercising grading, feedback and images.
pub fn quiz() -> Value {
    json!({
        "form_info": {
            "title": "Sample Quiz",
            "description": "Answers are graded automatically where possible."
        },
        "is_quiz": true,
        "questions": [
            {
                "type": "RADIO",
                "title": "In what year did the United States land on the moon?",
                "options": ["1965", "1967", "1969", "1971"],
                "correct_answers": ["1969"],
                "points": 2,
                "feedback": {
                    "correct": "Apollo 11 landed in July 1969.",
                    "incorrect": "Review the Apollo program timeline."
                },
                "required": true,
                "shuffle": true
            },
            {
                "type": "CHECKBOX",
                "title": "Which of these are planets?",
                "options": ["Mars", "Pluto", "Venus", "Ceres"],
                "correct_answers": ["Mars", "Venus"],
                "points": 2
            },
            {
                "type": "TEXT",
                "title": "What is the capital of France?",
                "correct_answers": ["Paris"],
                "points": 1,
                "feedback": { "general": "Paris has been the capital since 508." }
            },
            {
                "type": "PARAGRAPH_TEXT",
                "title": "Explain why the sky is blue.",
                "points": 5,
                "feedback": { "general": "Graded by the instructor." }
            },
            {
                "type": "SCALE",
                "title": "How many continents are there?",
                "low": 1,
                "high": 10,
                "correct_answer": 7,
                "points": 1
            },
            {
                "type": "IMAGE",
                "title": "Which planet is shown?",
                "options": ["Jupiter", "Saturn"],
                "correct_answers": ["Saturn"],
                "image_url": "https://example.com/image.jpg"
            }
        ]
    })
}
