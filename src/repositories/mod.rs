pub mod attempt_counter_repository;
pub mod question_repository;
pub mod quiz_result_repository;
pub mod user_repository;

pub use attempt_counter_repository::{AttemptCounterRepository, MongoAttemptCounterRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
