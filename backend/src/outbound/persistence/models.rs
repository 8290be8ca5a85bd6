//! Row structs bridging Diesel tables and domain types.
//!
//! Read rows derive `Queryable`/`Selectable`; insert rows borrow from the
//! validated domain input. Conversions into domain projections live with the
//! adapters, which alone know the viewer context.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{ingredients, recipe_ingredients, recipes, users};
use crate::domain::ingredient::Ingredient;

/// Full user row, including the stored password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Insert row for registration.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

/// Ingredient catalogue row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IngredientRow {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

/// Recipe row with scalar fields.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

/// Insert row for recipe creation; `pub_date` defaults in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipeRow<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: &'a str,
}

/// Insert row for one `(recipe, ingredient, amount)` join entry.
#[derive(Debug, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub struct NewRecipeIngredientRow {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}
