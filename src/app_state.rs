use std::sync::Arc;

use chrono::Duration;

use crate::{
    auth::JwtService,
    cache::TtlCache,
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::quiz_test::MIN_TEST_TTL_SECS,
    repositories::{
        AttemptCounterRepository, MongoAttemptCounterRepository, MongoQuestionRepository,
        MongoQuizResultRepository, MongoUserRepository, QuestionRepository, QuizResultRepository,
        UserRepository,
    },
    services::{AuthService, QuizService, RateLimitService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub rate_limit_service: Arc<RateLimitService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoQuizResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let counter_repository = Arc::new(MongoAttemptCounterRepository::new(&db));
        counter_repository.ensure_indexes().await?;

        // One auth cache shared by the gate and the user mutations that
        // invalidate it.
        let auth_cache = Arc::new(TtlCache::new(Duration::seconds(
            config.auth_cache_ttl_secs,
        )));
        let test_cache = Arc::new(TtlCache::new(Duration::seconds(MIN_TEST_TTL_SECS)));

        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let rate_limit_service = Arc::new(RateLimitService::new(counter_repository));
        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            jwt_service,
            auth_cache.clone(),
            config.super_admin_email.clone(),
        ));
        let user_service = Arc::new(UserService::new(user_repository, auth_cache));
        let quiz_service = Arc::new(QuizService::new(
            question_repository,
            result_repository,
            test_cache,
            rate_limit_service.clone(),
        ));

        Ok(Self {
            db,
            config: Arc::new(config),
            auth_service,
            user_service,
            quiz_service,
            rate_limit_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
