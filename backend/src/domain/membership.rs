//! Membership relations between users and recipes.
//!
//! Favorites and the shopping cart share one relation shape, a unique
//! `(user, recipe)` row, so the domain models them as a single
//! parameterized kind selecting the target table.

/// Which user↔recipe membership table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    /// The user's favorites list.
    Favorite,
    /// The user's shopping cart.
    ShoppingCart,
}

impl MembershipKind {
    /// Human-readable relation name used in error messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}
