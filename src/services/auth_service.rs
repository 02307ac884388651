use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{context::AuthContext, jwt::JwtService, password},
    cache::TtlCache,
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::request::{LoginRequest, RegisterRequest},
        dto::response::{AuthResponse, UserDto},
    },
    repositories::UserRepository,
};

/// Pulls the credential out of an authorization header value. The scheme
/// word is skipped without being checked; whatever follows it is the token.
pub fn extract_bearer_token(header: Option<&str>) -> AppResult<&str> {
    let value = header
        .ok_or_else(|| AppError::MissingCredential("Authorization header is missing".to_string()))?;

    value
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AppError::MissingCredential("Authorization header is malformed".to_string()))
}

/// Issues tokens, resolves them back to an identity, and keeps resolved
/// identities in a short-lived cache so each request costs at most one
/// user lookup.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_service: JwtService,
    auth_cache: Arc<TtlCache<AuthContext>>,
    super_admin_email: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_service: JwtService,
        auth_cache: Arc<TtlCache<AuthContext>>,
        super_admin_email: String,
    ) -> Self {
        Self {
            users,
            jwt_service,
            auth_cache,
            super_admin_email,
        }
    }

    /// Full credential check: header -> token -> claims -> resolved identity.
    pub async fn authenticate(&self, header: Option<&str>) -> AppResult<AuthContext> {
        let token = extract_bearer_token(header)?;
        let claims = self.jwt_service.validate_token(token)?;
        self.resolve_subject(&claims.sub).await
    }

    /// Like `authenticate`, but absent or bad credentials resolve to `None`
    /// instead of an error. Infrastructure failures still propagate.
    pub async fn authenticate_optional(
        &self,
        header: Option<&str>,
    ) -> AppResult<Option<AuthContext>> {
        match self.authenticate(header).await {
            Ok(context) => Ok(Some(context)),
            Err(AppError::MissingCredential(_)) | Err(AppError::InvalidCredential(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves a token subject to its identity, from cache when fresh. A
    /// valid token whose subject no longer exists is a credential failure,
    /// not a not-found.
    pub async fn resolve_subject(&self, subject_id: &str) -> AppResult<AuthContext> {
        self.auth_cache.sweep_expired(Utc::now()).await;

        if let Some(context) = self.auth_cache.get(subject_id).await {
            return Ok(context);
        }

        let user = self
            .users
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::InvalidCredential("Unknown subject".to_string()))?;

        let context = AuthContext::new(subject_id, &user, &self.super_admin_email);
        self.auth_cache.set(subject_id, context.clone()).await;

        Ok(context)
    }

    /// Drops the cached identity so the next request re-reads the record.
    /// Call after any mutation that changes what a token resolves to.
    pub async fn invalidate_subject(&self, subject_id: &str) {
        self.auth_cache.invalidate(subject_id).await;
        log::info!("Invalidated cached auth context for subject {}", subject_id);
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let password_hash = password::hash_password(&request.password);
        let user = User::new(&email, &password_hash, request.display_name.trim());
        let user = self.users.create(user).await?;

        let subject_id = user
            .id
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::InternalError("Created user has no id".to_string()))?;
        let token = self.jwt_service.create_token(&subject_id)?;

        log::info!("Registered new user: {}", user.email);

        Ok(AuthResponse {
            token,
            user: UserDto::from(user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();

        // Same error for unknown email and wrong password.
        let user = match self.users.find_by_email(&email).await? {
            Some(user) if password::verify_password(&request.password, &user.password_hash) => {
                user
            }
            _ => {
                log::warn!("Failed login attempt for {}", email);
                return Err(AppError::InvalidCredential(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        let subject_id = user
            .id
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::InternalError("Stored user has no id".to_string()))?;
        let token = self.jwt_service.create_token(&subject_id)?;

        log::info!(
            "User {} logged in, token valid for {}h",
            user.email,
            self.jwt_service.expiration_hours()
        );

        Ok(AuthResponse {
            token,
            user: UserDto::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_utils::fixtures::make_user;
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::eq;
    use mongodb::bson::oid::ObjectId;

    mock! {
        Users {}

        #[async_trait]
        impl UserRepository for Users {
            async fn create(&self, user: User) -> AppResult<User>;
            async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
            async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
            async fn find_all_paginated(&self, offset: i64, limit: i64)
                -> AppResult<(Vec<User>, i64)>;
            async fn update(&self, id: &str, user: User) -> AppResult<User>;
            async fn ensure_indexes(&self) -> AppResult<()>;
        }
    }

    fn service_with(users: MockUsers) -> AuthService {
        let config = Config::test_config();
        AuthService::new(
            Arc::new(users),
            JwtService::new(&config.jwt_secret, config.jwt_expiration_hours),
            Arc::new(TtlCache::new(Duration::seconds(60))),
            config.super_admin_email,
        )
    }

    #[test]
    fn test_bearer_extraction() {
        assert!(matches!(
            extract_bearer_token(None),
            Err(AppError::MissingCredential(_))
        ));
        assert!(matches!(
            extract_bearer_token(Some("")),
            Err(AppError::MissingCredential(_))
        ));
        assert!(matches!(
            extract_bearer_token(Some("token-only")),
            Err(AppError::MissingCredential(_))
        ));

        assert_eq!(extract_bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(Some("bearer abc")).unwrap(), "abc");
        // Scheme word is not checked
        assert_eq!(extract_bearer_token(Some("Token abc")).unwrap(), "abc");
        // Trailing segments are ignored
        assert_eq!(
            extract_bearer_token(Some("Bearer abc extra")).unwrap(),
            "abc"
        );
    }

    #[tokio::test]
    async fn test_authenticate_resolves_and_caches() {
        let subject = ObjectId::new();
        let subject_hex = subject.to_hex();

        let mut users = MockUsers::new();
        let stored = {
            let mut user = make_user("cached@example.com");
            user.id = Some(subject);
            user
        };
        let expected = subject_hex.clone();
        users
            .expect_find_by_id()
            .withf(move |id| id == expected)
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service_with(users);
        let config = Config::test_config();
        let jwt = JwtService::new(&config.jwt_secret, 1);
        let header = format!("Bearer {}", jwt.create_token(&subject_hex).unwrap());

        let first = service.authenticate(Some(&header)).await.unwrap();
        let second = service.authenticate(Some(&header)).await.unwrap();

        assert_eq!(first.email, "cached@example.com");
        assert_eq!(second.subject_id, subject_hex);
        // find_by_id expectation of times(1) proves the second hit was cached
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let subject = ObjectId::new();
        let subject_hex = subject.to_hex();

        let mut users = MockUsers::new();
        let stored = {
            let mut user = make_user("mutable@example.com");
            user.id = Some(subject);
            user
        };
        users
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service_with(users);

        service.resolve_subject(&subject_hex).await.unwrap();
        service.invalidate_subject(&subject_hex).await;
        service.resolve_subject(&subject_hex).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_subject_is_invalid_credential() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = service_with(users);
        let config = Config::test_config();
        let jwt = JwtService::new(&config.jwt_secret, 1);
        let header = format!(
            "Bearer {}",
            jwt.create_token(&ObjectId::new().to_hex()).unwrap()
        );

        let result = service.authenticate(Some(&header)).await;
        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_optional_auth_swallows_credential_errors() {
        let users = MockUsers::new();
        let service = service_with(users);

        let anonymous = service.authenticate_optional(None).await.unwrap();
        assert!(anonymous.is_none());

        let garbage = service
            .authenticate_optional(Some("Bearer not.a.jwt"))
            .await
            .unwrap();
        assert!(garbage.is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut users = MockUsers::new();
        users
            .expect_find_by_email()
            .with(eq("taken@example.com"))
            .returning(|email| Ok(Some(make_user(email))));

        let service = service_with(users);
        let result = service
            .register(RegisterRequest {
                email: "Taken@Example.com".to_string(),
                password: "password-123".to_string(),
                display_name: "Dup".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_returns_token_for_new_user() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(|mut user| {
            user.id = Some(ObjectId::new());
            Ok(user)
        });

        let service = service_with(users);
        let response = service
            .register(RegisterRequest {
                email: "Fresh@Example.com".to_string(),
                password: "password-123".to_string(),
                display_name: "  Fresh  ".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "fresh@example.com");
        assert_eq!(response.user.display_name, "Fresh");
        assert!(!response.user.id.is_empty());
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|email| {
            let mut user = make_user(email);
            user.password_hash = password::hash_password("correct-horse");
            Ok(Some(user))
        });

        let service = service_with(users);
        let response = service
            .login(LoginRequest {
                email: "known@example.com".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        // The issued token resolves back through the cache-less path too
        let claims_subject = response.user.id.clone();
        assert!(!response.token.is_empty());
        assert!(!claims_subject.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|email| {
            let mut user = make_user(email);
            user.password_hash = password::hash_password("the-real-one");
            Ok(Some(user))
        });

        let service = service_with(users);
        let result = service
            .login(LoginRequest {
                email: "known@example.com".to_string(),
                password: "a-guess".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = service_with(users);
        let result = service
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "whatever-long".to_string(),
            })
            .await;

        match result {
            Err(AppError::InvalidCredential(msg)) => {
                assert_eq!(msg, "Invalid email or password");
            }
            other => panic!("Expected InvalidCredential, got {:?}", other),
        }
    }
}
