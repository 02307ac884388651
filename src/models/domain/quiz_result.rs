use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::QuizCategory;

/// Persisted leaderboard row, written once when a test is graded.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject_key: String,
    pub display_name: String,
    pub category: QuizCategory,
    pub score: i64,
    pub total: i64,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(
        subject_key: &str,
        display_name: &str,
        category: QuizCategory,
        score: i64,
        total: i64,
    ) -> Self {
        Self {
            id: None,
            subject_key: subject_key.to_string(),
            display_name: display_name.to_string(),
            category,
            score,
            total,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = QuizResult::new("user-1", "Alice", QuizCategory::Css, 4, 5);

        assert_eq!(result.display_name, "Alice");
        assert_eq!(result.score, 4);
        assert_eq!(result.total, 5);
        assert!(result.id.is_none());
    }
}
