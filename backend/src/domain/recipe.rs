//! Recipe aggregate: validated write input and read projections.
//!
//! The write path accepts a [`RecipeDraft`] whose ingredient list has been
//! validated up front (non-empty, positive amounts, no repeated ingredient
//! reference). Persistence replaces the whole ingredient set atomically, so
//! a draft that passes validation either lands in full or not at all.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::user::UserProfile;
use super::{IngredientId, RecipeId};

/// Maximum stored length for a recipe name.
pub const RECIPE_NAME_MAX_LEN: usize = 256;

/// One `(ingredient, amount)` pair of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

/// Validation errors for recipe submissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeValidationError {
    /// The ingredient list was empty.
    #[error("at least one ingredient is required")]
    NoIngredients,
    /// An amount was zero or negative.
    #[error("ingredient amount must be >= 1")]
    NonPositiveAmount,
    /// The same ingredient was referenced twice in one submission.
    #[error("ingredient {0} is repeated")]
    DuplicateIngredient(IngredientId),
    /// The recipe name was empty or too long.
    #[error("recipe name must be 1..={RECIPE_NAME_MAX_LEN} characters")]
    InvalidName,
    /// The description text was empty.
    #[error("recipe text must not be empty")]
    EmptyText,
    /// Cooking time below the minimum of one minute.
    #[error("cooking time must be >= 1")]
    InvalidCookingTime,
    /// The image payload was empty.
    #[error("image must not be empty")]
    EmptyImage,
}

/// Validated recipe write input.
///
/// Construction is the only way to obtain a draft, so downstream code can
/// rely on the invariants without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    cooking_time: i32,
    image: String,
    ingredients: Vec<IngredientAmount>,
}

impl RecipeDraft {
    /// Validate scalar fields and the ingredient list.
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        cooking_time: i32,
        image: impl Into<String>,
        ingredients: Vec<IngredientAmount>,
    ) -> Result<Self, RecipeValidationError> {
        let name = name.into();
        let text = text.into();
        let image = image.into();
        if name.trim().is_empty() || name.chars().count() > RECIPE_NAME_MAX_LEN {
            return Err(RecipeValidationError::InvalidName);
        }
        if text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        if cooking_time < 1 {
            return Err(RecipeValidationError::InvalidCookingTime);
        }
        if image.is_empty() {
            return Err(RecipeValidationError::EmptyImage);
        }
        if ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        let mut seen = HashSet::new();
        for pair in &ingredients {
            if pair.amount < 1 {
                return Err(RecipeValidationError::NonPositiveAmount);
            }
            if !seen.insert(pair.ingredient_id) {
                return Err(RecipeValidationError::DuplicateIngredient(
                    pair.ingredient_id,
                ));
            }
        }
        Ok(Self {
            name,
            text,
            cooking_time,
            image,
            ingredients,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cooking_time(&self) -> i32 {
        self.cooking_time
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// The validated ingredient pairs, in submission order.
    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }
}

/// Ingredient line of a read projection: catalogue fields plus the amount
/// used by this recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredientDetail {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full viewer-relative recipe projection.
///
/// `is_favorited` and `is_in_shopping_cart` are recomputed per request for
/// the viewing identity; both are `false` for anonymous viewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeProjection {
    pub id: RecipeId,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub is_in_shopping_cart: bool,
    pub is_favorited: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    #[serde(skip)]
    pub pub_date: DateTime<Utc>,
}

/// Compact recipe projection used by membership responses and
/// subscription listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeCard {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pair(ingredient_id: IngredientId, amount: i32) -> IngredientAmount {
        IngredientAmount {
            ingredient_id,
            amount,
        }
    }

    fn draft(ingredients: Vec<IngredientAmount>) -> Result<RecipeDraft, RecipeValidationError> {
        RecipeDraft::new("Borscht", "Chop and simmer.", 45, "base64-image", ingredients)
    }

    #[rstest]
    fn accepts_valid_submission() {
        let draft = draft(vec![pair(1, 200), pair(2, 50)]).expect("valid draft");
        assert_eq!(draft.ingredients().len(), 2);
        assert_eq!(draft.cooking_time(), 45);
    }

    #[rstest]
    fn rejects_empty_ingredient_list() {
        assert_eq!(draft(vec![]), Err(RecipeValidationError::NoIngredients));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn rejects_non_positive_amounts(#[case] amount: i32) {
        assert_eq!(
            draft(vec![pair(1, amount)]),
            Err(RecipeValidationError::NonPositiveAmount)
        );
    }

    #[rstest]
    fn rejects_repeated_ingredient_regardless_of_amounts() {
        assert_eq!(
            draft(vec![pair(1, 10), pair(2, 20), pair(1, 30)]),
            Err(RecipeValidationError::DuplicateIngredient(1))
        );
    }

    #[rstest]
    fn rejects_zero_cooking_time() {
        let result = RecipeDraft::new("Tea", "Boil water.", 0, "img", vec![pair(1, 1)]);
        assert_eq!(result, Err(RecipeValidationError::InvalidCookingTime));
    }

    #[rstest]
    fn rejects_blank_name() {
        let result = RecipeDraft::new("   ", "Boil water.", 5, "img", vec![pair(1, 1)]);
        assert_eq!(result, Err(RecipeValidationError::InvalidName));
    }
}
