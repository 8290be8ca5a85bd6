//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON responses. Port errors gain
//! `From` conversions here so handlers can use `?` directly.
//!
//! Status convention: `Conflict` and `InvalidOperation` both map to 400,
//! not 409: uniqueness violations are reported as plain bad requests.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::ports::{
    IngredientRepositoryError, MembershipError, RecipeRepositoryError, ShortLinkError,
    SubscriptionError, UserRepositoryError,
};
use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::Conflict | ErrorCode::InvalidOperation => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), "internal error surfaced to client");
        }
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<UserRepositoryError> for Error {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound => Self::not_found("user not found"),
            UserRepositoryError::EmailTaken => Self::conflict("email is already registered"),
            UserRepositoryError::UsernameTaken => Self::conflict("username is already taken"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<IngredientRepositoryError> for Error {
    fn from(err: IngredientRepositoryError) -> Self {
        match err {
            IngredientRepositoryError::NotFound => Self::not_found("ingredient not found"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<RecipeRepositoryError> for Error {
    fn from(err: RecipeRepositoryError) -> Self {
        match err {
            RecipeRepositoryError::NotFound => Self::not_found("recipe not found"),
            RecipeRepositoryError::UnknownIngredient(id) => {
                Self::not_found(format!("ingredient {id} does not exist"))
            }
            RecipeRepositoryError::DuplicateName => {
                Self::conflict("you already have a recipe with this name")
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<SubscriptionError> for Error {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::TargetNotFound => Self::not_found("user not found"),
            SubscriptionError::SelfSubscription => {
                Self::invalid_operation("cannot subscribe to yourself")
            }
            SubscriptionError::AlreadySubscribed => {
                Self::conflict("already subscribed to this user")
            }
            SubscriptionError::NotSubscribed => {
                Self::invalid_operation("cannot remove a non-existent subscription")
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<ShortLinkError> for Error {
    fn from(err: ShortLinkError) -> Self {
        match err {
            ShortLinkError::RecipeNotFound => Self::not_found("recipe not found"),
            ShortLinkError::UnknownCode => Self::not_found("unknown short-link code"),
            other => Self::internal(other.to_string()),
        }
    }
}

/// Membership errors carry no relation name, so handlers pass the noun for
/// kind-specific messages.
pub fn map_membership_error(err: MembershipError, noun: &str) -> Error {
    match err {
        MembershipError::RecipeNotFound => Error::not_found("recipe not found"),
        MembershipError::AlreadyPresent => {
            Error::conflict(format!("recipe is already in {noun}"))
        }
        MembershipError::NotPresent => {
            Error::invalid_operation(format!("recipe is not in {noun}"))
        }
        MembershipError::EmptyCart => Error::not_found("shopping cart is empty"),
        other => Error::internal(other.to_string()),
    }
}
