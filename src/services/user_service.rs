use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{context::AuthContext, password},
    cache::TtlCache,
    errors::{AppError, AppResult},
    models::{
        dto::request::{UpdateProfileRequest, UpdateRoleRequest, UpdateSubscriptionRequest},
        dto::response::{UserDto, UserListDto},
    },
    repositories::UserRepository,
};

/// Profile and admin operations over user records. Every mutation evicts the
/// subject's cached auth context so stale role or tier data never outlives
/// the write.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    auth_cache: Arc<TtlCache<AuthContext>>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, auth_cache: Arc<TtlCache<AuthContext>>) -> Self {
        Self { users, auth_cache }
    }

    pub async fn get_profile(&self, subject_id: &str) -> AppResult<UserDto> {
        let user = self
            .users
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserDto::from(user))
    }

    pub async fn update_profile(
        &self,
        subject_id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<UserDto> {
        request.validate()?;

        let mut user = self
            .users
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(display_name) = request.display_name {
            user.display_name = display_name.trim().to_string();
        }
        if let Some(new_password) = request.password {
            user.password_hash = password::hash_password(&new_password);
        }

        let user = self.users.update(subject_id, user).await?;
        self.auth_cache.invalidate(subject_id).await;

        log::info!("Updated profile for user {}", user.email);
        Ok(UserDto::from(user))
    }

    pub async fn list_users(&self, offset: i64, limit: i64) -> AppResult<UserListDto> {
        let (users, total) = self.users.find_all_paginated(offset, limit).await?;

        Ok(UserListDto {
            users: users.into_iter().map(UserDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    /// Sets the admin flags on a target user. Granting the super-admin flag
    /// requires the acting user to hold it already.
    pub async fn set_role(
        &self,
        acting: &AuthContext,
        target_id: &str,
        request: UpdateRoleRequest,
    ) -> AppResult<UserDto> {
        if request.is_super_admin == Some(true) && !acting.is_super_admin() {
            return Err(AppError::Forbidden(
                "Only a super admin can grant super admin".to_string(),
            ));
        }

        let mut user = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(is_super_admin) = request.is_super_admin {
            user.is_super_admin = is_super_admin;
        }
        user.is_admin = request.is_admin;

        let user = self.users.update(target_id, user).await?;
        self.auth_cache.invalidate(target_id).await;

        log::info!(
            "Role updated for {} by {}: admin={}, super_admin={}",
            user.email,
            acting.email,
            user.is_admin,
            user.is_super_admin
        );
        Ok(UserDto::from(user))
    }

    pub async fn set_subscription(
        &self,
        target_id: &str,
        request: UpdateSubscriptionRequest,
    ) -> AppResult<UserDto> {
        let mut user = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.subscription_tier = request.tier;
        user.has_payment = request.has_payment;
        user.subscription_expires_at = request.expires_at;

        let user = self.users.update(target_id, user).await?;
        self.auth_cache.invalidate(target_id).await;

        log::info!(
            "Subscription for {} set to {} (paid: {})",
            user.email,
            user.subscription_tier.as_str(),
            user.has_payment
        );
        Ok(UserDto::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::User;
    use crate::test_utils::fixtures::make_user;
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;

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

    fn service_with(users: MockUsers) -> UserService {
        UserService::new(
            Arc::new(users),
            Arc::new(TtlCache::new(Duration::seconds(60))),
        )
    }

    fn moderator_context() -> AuthContext {
        let mut user = make_user("mod@example.com");
        user.is_admin = true;
        AuthContext::new("mod-subject", &user, "root@example.com")
    }

    #[tokio::test]
    async fn test_moderator_cannot_grant_super_admin() {
        // No expectations set: any repository call would panic
        let service = service_with(MockUsers::new());

        let result = service
            .set_role(
                &moderator_context(),
                "some-target",
                UpdateRoleRequest {
                    is_admin: true,
                    is_super_admin: Some(true),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_moderator_can_revoke_super_admin() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| {
            let mut user = make_user("target@example.com");
            user.is_super_admin = true;
            Ok(Some(user))
        });
        users.expect_update().returning(|_, user| Ok(user));

        let service = service_with(users);
        let dto = service
            .set_role(
                &moderator_context(),
                "some-target",
                UpdateRoleRequest {
                    is_admin: false,
                    is_super_admin: Some(false),
                },
            )
            .await
            .unwrap();

        assert!(!dto.is_super_admin);
        assert!(!dto.is_admin);
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = service_with(users);
        let result = service
            .update_profile(
                "ghost",
                UpdateProfileRequest {
                    display_name: Some("Ghost".to_string()),
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_password() {
        let mut users = MockUsers::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(make_user("user@example.com"))));
        users.expect_update().returning(|_, user| {
            assert_eq!(
                user.password_hash,
                password::hash_password("brand-new-password")
            );
            Ok(user)
        });

        let service = service_with(users);
        service
            .update_profile(
                "subject",
                UpdateProfileRequest {
                    display_name: None,
                    password: Some("brand-new-password".to_string()),
                },
            )
            .await
            .unwrap();
    }
}
