pub mod auth;
pub mod response;

pub use auth::{authenticate, basic_auth_middleware, Credentials};
pub use response::{ApiResponse, ApiResult};
