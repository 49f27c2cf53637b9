//! Token authentication: JWT generation/validation and the request-side
//! plumbing that turns an `Authorization` header into a user id.

pub mod jwt;
pub mod middleware;

pub use jwt::{generate_token, validate_token, Claims};
pub use middleware::{auth_middleware, identify, require_user, CurrentUser};
