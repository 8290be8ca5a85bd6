//! Ingredient catalogue entries.

use serde::Serialize;

use super::IngredientId;

/// A catalogue ingredient; `(name, measurement_unit)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}
