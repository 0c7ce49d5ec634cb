//! Middleware shared by the gateway routes.

pub mod auth;
pub mod request_id;

// Re-export commonly used types
pub use auth::{access_key_middleware, AccessKey, ACCESS_KEY_HEADER};
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
