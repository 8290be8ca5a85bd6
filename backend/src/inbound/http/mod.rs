//! Inbound HTTP adapter: handlers, session identity, error mapping and the
//! pagination envelope.

pub mod auth;
pub mod error;
pub mod ingredients;
pub mod pagination;
pub mod recipes;
pub mod routes;
pub mod session;
pub mod short_links;
pub mod state;
pub mod users;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use self::error::ApiResult;
pub use self::session::SessionContext;
pub use self::state::{HttpState, PublicBaseUrl};
