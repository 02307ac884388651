use serde::{Deserialize, Serialize};

use crate::models::domain::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Moderator,
    SuperAdmin,
}

/// Capability set derived from an identity plus configuration. Recomputed on
/// every resolution, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedRole {
    pub role: Role,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl ResolvedRole {
    fn super_admin() -> Self {
        Self {
            role: Role::SuperAdmin,
            is_admin: true,
            is_super_admin: true,
        }
    }

    fn moderator() -> Self {
        Self {
            role: Role::Moderator,
            is_admin: true,
            is_super_admin: false,
        }
    }

    fn user() -> Self {
        Self {
            role: Role::User,
            is_admin: false,
            is_super_admin: false,
        }
    }
}

/// Maps a user's stored flags plus the configured super-admin email to a
/// resolved role. The email match is authoritative and overrides stored flags;
/// the comparison is case-insensitive.
pub fn resolve_role(super_admin_email: &str, user: &User) -> ResolvedRole {
    if user.email.to_lowercase() == super_admin_email.to_lowercase() {
        return ResolvedRole::super_admin();
    }
    if user.is_super_admin {
        return ResolvedRole::super_admin();
    }
    if user.is_admin {
        return ResolvedRole::moderator();
    }
    ResolvedRole::user()
}
