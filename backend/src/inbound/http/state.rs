//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::RecipeId;
use crate::domain::ports::{
    IngredientRepository, MembershipRepository, RecipeRepository, ShortLinkRepository,
    SubscriptionRepository, UserRepository,
};
use crate::domain::short_link::ShortLinkCode;

/// Public base URL used for building absolute short-link and redirect URLs.
#[derive(Debug, Clone)]
pub struct PublicBaseUrl(String);

impl PublicBaseUrl {
    /// Wrap a base URL, stripping any trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self(base)
    }

    /// Absolute URL of the short-link redirect endpoint for `code`.
    pub fn short_link(&self, code: &ShortLinkCode) -> String {
        format!("{}/s/{}/", self.0, code)
    }

    /// Absolute URL of the canonical recipe page.
    pub fn recipe_page(&self, id: RecipeId) -> String {
        format!("{}/recipes/{}/", self.0, id)
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub short_links: Arc<dyn ShortLinkRepository>,
    pub base_url: PublicBaseUrl,
}
