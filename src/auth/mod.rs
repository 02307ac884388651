pub mod claims;
pub mod context;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod utils;

pub use claims::Claims;
pub use context::AuthContext;
pub use jwt::JwtService;
pub use middleware::{AuthGate, AuthenticatedUser, MaybeAuthenticated};
pub use password::{hash_password, verify_password};
pub use roles::{resolve_role, ResolvedRole, Role};
pub use utils::{require_admin, require_moderator};
