//! Short-link code storage and resolution port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RecipeId;
use crate::domain::short_link::ShortLinkCode;

/// Errors surfaced by the short-link adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortLinkError {
    /// Database connectivity failures.
    #[error("short-link persistence connection failed: {message}")]
    Connection { message: String },
    /// Query execution failures.
    #[error("short-link persistence query failed: {message}")]
    Query { message: String },
    /// The recipe to link does not exist.
    #[error("recipe not found")]
    RecipeNotFound,
    /// No short link with the requested code.
    #[error("unknown short-link code")]
    UnknownCode,
    /// Generation kept colliding with existing codes.
    #[error("could not allocate a unique short-link code")]
    Exhausted,
}

impl ShortLinkError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Storage port for recipe short links.
///
/// A recipe has at most one code, created lazily on the first link request
/// and reused verbatim afterwards. On a uniqueness collision the adapter
/// regenerates and retries rather than surfacing the raw storage error.
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// The recipe's code, generating and persisting one if absent.
    async fn get_or_create(&self, recipe: RecipeId) -> Result<ShortLinkCode, ShortLinkError>;

    /// Resolve a code to its recipe id.
    async fn resolve(&self, code: &ShortLinkCode) -> Result<RecipeId, ShortLinkError>;
}
