use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizCategory {
    Css,
    Scss,
    Stylus,
}

impl QuizCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizCategory::Css => "css",
            QuizCategory::Scss => "scss",
            QuizCategory::Stylus => "stylus",
        }
    }
}

impl fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Single, // Only one correct option
    Multi,  // Multiple correct options
    Bool,   // True/False question
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
}

/// One entry in the persisted question bank.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub category: QuizCategory,
    pub language: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<QuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
