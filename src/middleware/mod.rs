pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{authenticate, Authentication};
pub use cors::with_permissive_cors;
pub use response::{error_response, respond, ApiResult};
