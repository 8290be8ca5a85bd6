//! Domain entities, validation, and ports.
//!
//! Types here are transport and storage agnostic: inbound adapters build
//! them from HTTP payloads, outbound adapters persist them. Serialisation
//! contracts (serde) are documented on each projection type.

pub mod error;
pub mod ingredient;
pub mod membership;
pub mod password;
pub mod ports;
pub mod recipe;
pub mod shopping_list;
pub mod short_link;
pub mod user;

pub use self::error::{Error, ErrorCode};

/// Primary key of a user row.
pub type UserId = i32;
/// Primary key of a recipe row.
pub type RecipeId = i32;
/// Primary key of an ingredient row.
pub type IngredientId = i32;

/// The requesting identity; `None` for anonymous reads.
pub type Viewer = Option<UserId>;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
