use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::question::{QuestionKind, QuizCategory};
use crate::models::domain::SubscriptionTier;

static LANGUAGE_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-z]{2}(-[a-z]{2})?$").expect("LANGUAGE_REGEX is a valid regex pattern")
});

fn validate_language_code(language: &str) -> Result<(), ValidationError> {
    if LANGUAGE_REGEX.is_match(language) {
        Ok(())
    } else {
        Err(ValidationError::new("language_code"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,
}

/// Role flags set by admins. Granting `is_super_admin` is checked against the
/// acting user at the service layer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub is_admin: bool,
    pub is_super_admin: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubscriptionRequest {
    pub tier: SubscriptionTier,
    pub has_payment: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizTestParams {
    pub category: QuizCategory,

    #[validate(custom(function = validate_language_code))]
    pub language: Option<String>,
}

impl QuizTestParams {
    pub fn language(&self) -> String {
        self.language.as_deref().unwrap_or("en").to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1))]
    pub question_id: String, // UUID as string

    pub selected_option_ids: Vec<String>, // UUID strings
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitTestRequest {
    #[validate(length(min = 1))]
    pub test_id: String,

    pub category: QuizCategory,

    #[validate(custom(function = validate_language_code))]
    pub language: Option<String>,

    #[validate(length(min = 1, message = "At least one answer is required"))]
    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
}

impl SubmitTestRequest {
    pub fn language(&self) -> String {
        self.language.as_deref().unwrap_or("en").to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionOption {
    #[validate(length(min = 1, max = 200))]
    pub text: String,

    pub correct: bool,

    #[validate(length(max = 500))]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub category: QuizCategory,

    #[validate(custom(function = validate_language_code))]
    pub language: String,

    #[validate(length(min = 1, max = 500))]
    pub prompt: String,

    pub kind: QuestionKind,

    #[validate(length(min = 2, max = 8, message = "Questions need 2-8 options"))]
    #[validate(nested)]
    pub options: Vec<CreateQuestionOption>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeaderboardParams {
    pub category: QuizCategory,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl LeaderboardParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).min(100)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}
