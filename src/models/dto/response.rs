use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::question::{QuestionKind, QuizCategory, QuizQuestion};
use crate::models::domain::{QuizResult, QuizTest, SubscriptionTier, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub has_payment: bool,
    pub subscription_tier: SubscriptionTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            display_name: user.display_name,
            is_admin: user.is_admin,
            is_super_admin: user.is_super_admin,
            has_payment: user.has_payment,
            subscription_tier: user.subscription_tier,
            subscription_expires_at: user.subscription_expires_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListDto {
    pub users: Vec<UserDto>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Answer option as sent to the test taker. Deliberately omits the
/// `correct` flag and explanation carried by the stored question.
#[derive(Debug, Clone, Serialize)]
pub struct TestOptionDto {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestQuestionDto {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<TestOptionDto>,
}

impl From<&QuizQuestion> for TestQuestionDto {
    fn from(question: &QuizQuestion) -> Self {
        TestQuestionDto {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            kind: question.kind,
            options: question
                .options
                .iter()
                .map(|option| TestOptionDto {
                    id: option.id.clone(),
                    text: option.text.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizTestDto {
    pub test_id: String,
    pub category: QuizCategory,
    pub language: String,
    pub time_limit_secs: i64,
    pub issued_at: DateTime<Utc>,
    pub questions: Vec<TestQuestionDto>,
}

impl From<&QuizTest> for QuizTestDto {
    fn from(test: &QuizTest) -> Self {
        QuizTestDto {
            test_id: test.test_id.clone(),
            category: test.category,
            language: test.language.clone(),
            time_limit_secs: test.time_limit_secs,
            issued_at: test.issued_at,
            questions: test.questions.iter().map(TestQuestionDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResultDto {
    pub question_id: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResultDto {
    pub test_id: String,
    pub score: i64,
    pub total: i64,
    pub answers: Vec<AnswerResultDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryDto {
    pub display_name: String,
    pub score: i64,
    pub total: i64,
    pub completed_at: DateTime<Utc>,
}

impl From<QuizResult> for LeaderboardEntryDto {
    fn from(result: QuizResult) -> Self {
        LeaderboardEntryDto {
            display_name: result.display_name,
            score: result.score,
            total: result.total,
            completed_at: result.completed_at,
        }
    }
}
