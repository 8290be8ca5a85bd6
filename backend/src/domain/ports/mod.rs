//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store, primarily). Each trait exposes a strongly typed
//! `thiserror` enum so adapters map their failures into predictable
//! variants instead of returning a catch-all error.

mod ingredients;
mod memberships;
mod recipes;
mod short_links;
mod subscriptions;
mod users;

pub use self::ingredients::{IngredientRepository, IngredientRepositoryError};
pub use self::memberships::{MembershipError, MembershipRepository};
pub use self::recipes::{RecipeFilter, RecipeRepository, RecipeRepositoryError};
pub use self::short_links::{ShortLinkError, ShortLinkRepository};
pub use self::subscriptions::{SubscriptionError, SubscriptionRepository};
pub use self::users::{Credentials, UserRepository, UserRepositoryError};

/// Limit/offset window for paginated port queries.
///
/// The HTTP layer converts page-number parameters into a window; ports stay
/// ignorant of envelope mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}
