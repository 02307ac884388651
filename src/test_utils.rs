#[cfg(test)]
pub mod fixtures {
    use mongodb::bson::oid::ObjectId;

    use crate::models::domain::question::{
        QuestionKind, QuestionOption, QuizCategory, QuizQuestion,
    };
    use crate::models::domain::User;

    /// Creates a persisted-looking user with no capability flags set.
    pub fn make_user(email: &str) -> User {
        let mut user = User::new(email, "hashed-password", "Test User");
        user.id = Some(ObjectId::new());
        user
    }

    fn option(id: &str, correct: bool) -> QuestionOption {
        QuestionOption {
            id: id.to_string(),
            text: format!("Option {}", id),
            correct,
            explanation: String::new(),
        }
    }

    /// A single-choice CSS question where `correct_option_id` is the only
    /// correct option; a second wrong option is added alongside it.
    pub fn make_single_choice_question(question_id: &str, correct_option_id: &str) -> QuizQuestion {
        QuizQuestion {
            id: question_id.to_string(),
            category: QuizCategory::Css,
            language: "en".to_string(),
            prompt: format!("Prompt for {}", question_id),
            kind: QuestionKind::Single,
            options: vec![
                option(correct_option_id, true),
                option(&format!("{}-wrong", correct_option_id), false),
            ],
            created_at: None,
        }
    }

    pub fn make_multi_choice_question(
        question_id: &str,
        correct_option_ids: &[&str],
        wrong_option_ids: &[&str],
    ) -> QuizQuestion {
        let options = correct_option_ids
            .iter()
            .map(|id| option(id, true))
            .chain(wrong_option_ids.iter().map(|id| option(id, false)))
            .collect();

        QuizQuestion {
            id: question_id.to_string(),
            category: QuizCategory::Css,
            language: "en".to_string(),
            prompt: format!("Prompt for {}", question_id),
            kind: QuestionKind::Multi,
            options,
            created_at: None,
        }
    }

    pub fn make_bool_question(question_id: &str, answer_is_true: bool) -> QuizQuestion {
        QuizQuestion {
            id: question_id.to_string(),
            category: QuizCategory::Css,
            language: "en".to_string(),
            prompt: format!("Prompt for {}", question_id),
            kind: QuestionKind::Bool,
            options: vec![
                option("true", answer_is_true),
                option("false", !answer_is_true),
            ],
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::question::QuestionKind;

    #[test]
    fn test_fixtures_make_user() {
        let user = make_user("fixture@example.com");

        assert_eq!(user.email, "fixture@example.com");
        assert!(user.id.is_some());
        assert!(!user.is_admin);
        assert!(!user.is_super_admin);
    }

    #[test]
    fn test_fixtures_single_choice_question() {
        let question = make_single_choice_question("q-1", "opt-a");

        assert_eq!(question.kind, QuestionKind::Single);
        assert_eq!(question.options.len(), 2);
        assert_eq!(
            question.options.iter().filter(|o| o.correct).count(),
            1,
            "exactly one option should be correct"
        );
    }

    #[test]
    fn test_fixtures_multi_choice_question() {
        let question = make_multi_choice_question("q-1", &["a", "b"], &["c"]);

        assert_eq!(question.kind, QuestionKind::Multi);
        assert_eq!(question.options.len(), 3);
        assert_eq!(question.options.iter().filter(|o| o.correct).count(), 2);
    }

    #[test]
    fn test_fixtures_bool_question() {
        let question = make_bool_question("q-1", true);

        assert_eq!(question.kind, QuestionKind::Bool);
        assert_eq!(question.options.len(), 2);
        assert!(
            question
                .options
                .iter()
                .find(|o| o.id == "true")
                .expect("bool question should have a 'true' option")
                .correct
        );
    }
}
