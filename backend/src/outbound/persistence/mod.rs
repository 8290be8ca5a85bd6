//! PostgreSQL persistence adapters implementing the domain ports.
//!
//! Adapters are thin translators between domain types and Diesel rows; they
//! contain no business rules beyond the constraint arbitration each port
//! documents. Table definitions live in [`schema`] and must match the
//! migrations under `migrations/`.

pub mod error_map;
pub mod ingredients;
pub mod memberships;
pub mod models;
pub mod pool;
pub mod recipes;
pub mod schema;
pub mod short_links;
pub mod subscriptions;
pub mod users;

pub use ingredients::DieselIngredientRepository;
pub use memberships::DieselMembershipRepository;
pub use pool::{DbPool, PoolError};
pub use recipes::DieselRecipeRepository;
pub use short_links::DieselShortLinkRepository;
pub use subscriptions::DieselSubscriptionRepository;
pub use users::DieselUserRepository;
