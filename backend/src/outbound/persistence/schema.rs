//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Registered accounts. `email` and `username` are globally unique.
    users (id) {
        id -> Int4,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        password_hash -> Text,
        avatar -> Nullable<Text>,
    }
}

diesel::table! {
    /// Ingredient catalogue; `(name, measurement_unit)` is unique.
    ingredients (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 20]
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Recipes; `(name, author_id)` is unique, `cooking_time >= 1`.
    recipes (id) {
        id -> Int4,
        author_id -> Int4,
        #[max_length = 256]
        name -> Varchar,
        text -> Text,
        cooking_time -> Int4,
        image -> Text,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    /// Join rows carrying quantities; `(recipe_id, ingredient_id)` is unique.
    recipe_ingredients (id) {
        id -> Int4,
        recipe_id -> Int4,
        ingredient_id -> Int4,
        amount -> Int4,
    }
}

diesel::table! {
    /// Favorite membership rows; `(user_id, recipe_id)` is unique.
    favorites (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
    }
}

diesel::table! {
    /// Shopping-cart membership rows; `(user_id, recipe_id)` is unique.
    shopping_carts (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
    }
}

diesel::table! {
    /// Subscriptions between users; `(subscriber_id, target_id)` is unique.
    subscriptions (id) {
        id -> Int4,
        subscriber_id -> Int4,
        target_id -> Int4,
    }
}

diesel::table! {
    /// One lazily generated 8-character code per recipe.
    short_links (id) {
        id -> Int4,
        recipe_id -> Int4,
        #[max_length = 10]
        code -> Varchar,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_carts -> users (user_id));
diesel::joinable!(shopping_carts -> recipes (recipe_id));
diesel::joinable!(short_links -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    ingredients,
    recipes,
    recipe_ingredients,
    favorites,
    shopping_carts,
    subscriptions,
    short_links,
);
