pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, authorize, bearer_token};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
