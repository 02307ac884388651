pub mod auth_handler;
pub mod quiz_handler;
pub mod user_handler;

pub use auth_handler::{login, register};
pub use quiz_handler::{create_question, get_leaderboard, get_limit, start_test, submit_test};
pub use user_handler::{
    get_profile, health_check, health_check_live, health_check_ready, list_users,
    set_subscription, set_user_role, update_profile,
};
