use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One row per subject per local calendar day. The count only ever grows
/// within a day; a new day gets a fresh row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptCounter {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject_key: String,
    pub date: String, // local calendar day, YYYY-MM-DD
    pub count: i64,
}

impl AttemptCounter {
    pub fn new(subject_key: &str, date: &str) -> Self {
        Self {
            id: None,
            subject_key: subject_key.to_string(),
            date: date.to_string(),
            count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_one() {
        let counter = AttemptCounter::new("user-1", "2026-08-21");

        assert_eq!(counter.subject_key, "user-1");
        assert_eq!(counter.date, "2026-08-21");
        assert_eq!(counter.count, 1);
        assert!(counter.id.is_none());
    }
}
