//! Authentication, tenant scoping and password handling

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod tenant;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{extract_token, optional_auth_middleware, AuthContext};
pub use password::PasswordHasher;
pub use tenant::TenantScope;
