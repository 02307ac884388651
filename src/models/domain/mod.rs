pub mod attempt_counter;
pub mod question;
pub mod quiz_result;
pub mod user;

pub use attempt_counter::AttemptCounter;
pub use question::QuizQuestion;
pub use quiz_result::QuizResult;
pub use quiz_test::QuizTest;
pub use user::{SubscriptionTier, User};
