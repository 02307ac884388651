use crate::{
    auth::context::AuthContext,
    errors::{AppError, AppResult},
};

pub fn require_admin(context: &AuthContext) -> AppResult<()> {
    if !context.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

/// Moderation currently carries the same requirement as administration;
/// callers name the capability they need, not the flag that grants it.
pub fn require_moderator(context: &AuthContext) -> AppResult<()> {
    require_admin(context)
}
