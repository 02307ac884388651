use chrono::Utc;

use crate::{
    auth::roles::{resolve_role, ResolvedRole},
    models::domain::{SubscriptionTier, User},
};

/// Resolved identity attached to a request by the auth gate. Built once per
/// resolution and carried through the request so handlers need no second
/// identity fetch; never shared across requests.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub role: ResolvedRole,
    pub tier: SubscriptionTier,
}

impl AuthContext {
    pub fn new(subject_id: &str, user: &User, super_admin_email: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: resolve_role(super_admin_email, user),
            tier: user.effective_tier(Utc::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin
    }
}
