pub mod auth_service;
pub mod quiz_service;
pub mod rate_limit_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use quiz_service::QuizService;
pub use rate_limit_service::{RateLimitService, RateLimitStatus};
pub use user_service::UserService;
