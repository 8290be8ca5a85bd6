//! In-memory port implementations for handler tests.
//!
//! A single [`MemoryStore`] implements every repository port over one
//! mutex-guarded state bag, so viewer-relative projections stay consistent
//! across ports without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;

use crate::domain::ingredient::Ingredient;
use crate::domain::membership::MembershipKind;
use crate::domain::ports::{
    Credentials, IngredientRepository, IngredientRepositoryError, MembershipError,
    MembershipRepository, PageWindow, RecipeFilter, RecipeRepository, RecipeRepositoryError,
    ShortLinkError, ShortLinkRepository, SubscriptionError, SubscriptionRepository,
    UserRepository, UserRepositoryError,
};
use crate::domain::recipe::{
    IngredientAmount, RecipeCard, RecipeDraft, RecipeIngredientDetail, RecipeProjection,
};
use crate::domain::shopping_list::ShoppingListItem;
use crate::domain::short_link::ShortLinkCode;
use crate::domain::user::{NewUser, SubscriptionProfile, UserProfile};
use crate::domain::{IngredientId, RecipeId, UserId, Viewer};
use crate::inbound::http::{HttpState, PublicBaseUrl};

#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    avatar: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredRecipe {
    id: RecipeId,
    author: UserId,
    name: String,
    text: String,
    cooking_time: i32,
    image: String,
    ingredients: Vec<IngredientAmount>,
    pub_date: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    next_user: UserId,
    next_ingredient: IngredientId,
    next_recipe: RecipeId,
    users: BTreeMap<UserId, StoredUser>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    favorites: HashSet<(UserId, RecipeId)>,
    carts: HashSet<(UserId, RecipeId)>,
    subscriptions: HashSet<(UserId, UserId)>,
    links_by_recipe: HashMap<RecipeId, ShortLinkCode>,
    links_by_code: HashMap<String, RecipeId>,
}

impl Inner {
    fn membership_set(&mut self, kind: MembershipKind) -> &mut HashSet<(UserId, RecipeId)> {
        match kind {
            MembershipKind::Favorite => &mut self.favorites,
            MembershipKind::ShoppingCart => &mut self.carts,
        }
    }

    fn profile(&self, user: &StoredUser, viewer: Viewer) -> UserProfile {
        let is_subscribed = viewer
            .map(|v| self.subscriptions.contains(&(v, user.id)))
            .unwrap_or(false);
        UserProfile {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: user.avatar.clone(),
        }
    }

    fn card(&self, recipe: &StoredRecipe) -> RecipeCard {
        RecipeCard {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }

    fn projection(&self, recipe: &StoredRecipe, viewer: Viewer) -> RecipeProjection {
        let author = self
            .users
            .get(&recipe.author)
            .map(|u| self.profile(u, viewer))
            .unwrap_or_else(|| UserProfile {
                id: recipe.author,
                email: String::new(),
                username: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                is_subscribed: false,
                avatar: None,
            });
        let ingredients = recipe
            .ingredients
            .iter()
            .filter_map(|pair| {
                self.ingredients
                    .get(&pair.ingredient_id)
                    .map(|i| RecipeIngredientDetail {
                        id: i.id,
                        name: i.name.clone(),
                        measurement_unit: i.measurement_unit.clone(),
                        amount: pair.amount,
                    })
            })
            .collect();
        let (is_favorited, is_in_shopping_cart) = viewer
            .map(|v| {
                (
                    self.favorites.contains(&(v, recipe.id)),
                    self.carts.contains(&(v, recipe.id)),
                )
            })
            .unwrap_or((false, false));
        RecipeProjection {
            id: recipe.id,
            author,
            ingredients,
            is_in_shopping_cart,
            is_favorited,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            pub_date: recipe.pub_date,
        }
    }

    fn author_cards(&self, author: UserId, limit: Option<i64>) -> (i64, Vec<RecipeCard>) {
        let mut recipes: Vec<&StoredRecipe> = self
            .recipes
            .values()
            .filter(|r| r.author == author)
            .collect();
        recipes.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        let count = recipes.len() as i64;
        let cards = recipes
            .into_iter()
            .take(limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX))
            .map(|r| self.card(r))
            .collect();
        (count, cards)
    }

    fn subscription_profile(
        &self,
        subscriber: UserId,
        target: &StoredUser,
        recipes_limit: Option<i64>,
    ) -> SubscriptionProfile {
        let (recipes_count, recipes) = self.author_cards(target.id, recipes_limit);
        SubscriptionProfile {
            profile: self.profile(target, Some(subscriber)),
            recipes,
            recipes_count,
        }
    }
}

/// Shared in-memory store implementing all repository ports.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

fn window_slice<T>(items: Vec<T>, window: PageWindow) -> Vec<T> {
    items
        .into_iter()
        .skip(window.offset.max(0) as usize)
        .take(window.limit.max(0) as usize)
        .collect()
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Handler dependency bundle backed by this store.
    pub fn http_state(self: &Arc<Self>, base_url: &str) -> HttpState {
        HttpState {
            users: self.clone(),
            ingredients: self.clone(),
            recipes: self.clone(),
            memberships: self.clone(),
            subscriptions: self.clone(),
            short_links: self.clone(),
            base_url: PublicBaseUrl::new(base_url),
        }
    }

    /// Insert a catalogue ingredient directly and return its id.
    pub fn seed_ingredient(&self, name: &str, measurement_unit: &str) -> IngredientId {
        let mut inner = self.lock();
        inner.next_ingredient += 1;
        let id = inner.next_ingredient;
        inner.ingredients.insert(
            id,
            Ingredient {
                id,
                name: name.to_owned(),
                measurement_unit: measurement_unit.to_owned(),
            },
        );
        id
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn register(&self, new_user: &NewUser) -> Result<UserId, UserRepositoryError> {
        let mut inner = self.lock();
        if inner
            .users
            .values()
            .any(|u| u.email == new_user.email.as_str())
        {
            return Err(UserRepositoryError::EmailTaken);
        }
        if inner
            .users
            .values()
            .any(|u| u.username == new_user.username.as_str())
        {
            return Err(UserRepositoryError::UsernameTaken);
        }
        inner.next_user += 1;
        let id = inner.next_user;
        inner.users.insert(
            id,
            StoredUser {
                id,
                email: new_user.email.as_str().to_owned(),
                username: new_user.username.as_str().to_owned(),
                first_name: new_user.first_name.clone(),
                last_name: new_user.last_name.clone(),
                password_hash: new_user.password_hash.clone(),
                avatar: None,
            },
        );
        Ok(id)
    }

    async fn fetch(&self, id: UserId, viewer: Viewer) -> Result<UserProfile, UserRepositoryError> {
        let inner = self.lock();
        let user = inner.users.get(&id).ok_or(UserRepositoryError::NotFound)?;
        Ok(inner.profile(user, viewer))
    }

    async fn list(
        &self,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<UserProfile>), UserRepositoryError> {
        let inner = self.lock();
        let count = inner.users.len() as i64;
        let profiles: Vec<UserProfile> = inner
            .users
            .values()
            .map(|u| inner.profile(u, viewer))
            .collect();
        Ok((count, window_slice(profiles, window)))
    }

    async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, UserRepositoryError> {
        let inner = self.lock();
        Ok(inner.users.values().find(|u| u.email == email).map(|u| {
            Credentials {
                user_id: u.id,
                password_hash: u.password_hash.clone(),
            }
        }))
    }

    async fn password_hash(&self, id: UserId) -> Result<String, UserRepositoryError> {
        let inner = self.lock();
        inner
            .users
            .get(&id)
            .map(|u| u.password_hash.clone())
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn set_password_hash(&self, id: UserId, hash: &str) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get_mut(&id)
            .ok_or(UserRepositoryError::NotFound)?;
        user.password_hash = hash.to_owned();
        Ok(())
    }

    async fn avatar(&self, id: UserId) -> Result<Option<String>, UserRepositoryError> {
        let inner = self.lock();
        inner
            .users
            .get(&id)
            .map(|u| u.avatar.clone())
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<&str>,
    ) -> Result<(), UserRepositoryError> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get_mut(&id)
            .ok_or(UserRepositoryError::NotFound)?;
        user.avatar = avatar.map(str::to_owned);
        Ok(())
    }
}

#[async_trait]
impl IngredientRepository for MemoryStore {
    async fn search(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let inner = self.lock();
        let mut matches: Vec<Ingredient> = inner
            .ingredients
            .values()
            .filter(|i| {
                name_prefix
                    .map(|p| i.name.to_lowercase().starts_with(&p.to_lowercase()))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }

    async fn fetch(&self, id: IngredientId) -> Result<Ingredient, IngredientRepositoryError> {
        let inner = self.lock();
        inner
            .ingredients
            .get(&id)
            .cloned()
            .ok_or(IngredientRepositoryError::NotFound)
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut inner = self.lock();
        for pair in draft.ingredients() {
            if !inner.ingredients.contains_key(&pair.ingredient_id) {
                return Err(RecipeRepositoryError::UnknownIngredient(pair.ingredient_id));
            }
        }
        if inner
            .recipes
            .values()
            .any(|r| r.author == author && r.name == draft.name())
        {
            return Err(RecipeRepositoryError::DuplicateName);
        }
        inner.next_recipe += 1;
        let id = inner.next_recipe;
        inner.recipes.insert(
            id,
            StoredRecipe {
                id,
                author,
                name: draft.name().to_owned(),
                text: draft.text().to_owned(),
                cooking_time: draft.cooking_time(),
                image: draft.image().to_owned(),
                ingredients: draft.ingredients().to_vec(),
                pub_date: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<(), RecipeRepositoryError> {
        let mut inner = self.lock();
        for pair in draft.ingredients() {
            if !inner.ingredients.contains_key(&pair.ingredient_id) {
                return Err(RecipeRepositoryError::UnknownIngredient(pair.ingredient_id));
            }
        }
        let author = inner
            .recipes
            .get(&id)
            .map(|r| r.author)
            .ok_or(RecipeRepositoryError::NotFound)?;
        if inner
            .recipes
            .values()
            .any(|r| r.id != id && r.author == author && r.name == draft.name())
        {
            return Err(RecipeRepositoryError::DuplicateName);
        }
        let recipe = inner
            .recipes
            .get_mut(&id)
            .ok_or(RecipeRepositoryError::NotFound)?;
        recipe.name = draft.name().to_owned();
        recipe.text = draft.text().to_owned();
        recipe.cooking_time = draft.cooking_time();
        recipe.image = draft.image().to_owned();
        recipe.ingredients = draft.ingredients().to_vec();
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut inner = self.lock();
        if inner.recipes.remove(&id).is_none() {
            return Err(RecipeRepositoryError::NotFound);
        }
        inner.favorites.retain(|(_, r)| *r != id);
        inner.carts.retain(|(_, r)| *r != id);
        if let Some(code) = inner.links_by_recipe.remove(&id) {
            inner.links_by_code.remove(code.as_str());
        }
        Ok(())
    }

    async fn author_of(&self, id: RecipeId) -> Result<UserId, RecipeRepositoryError> {
        let inner = self.lock();
        inner
            .recipes
            .get(&id)
            .map(|r| r.author)
            .ok_or(RecipeRepositoryError::NotFound)
    }

    async fn fetch(
        &self,
        id: RecipeId,
        viewer: Viewer,
    ) -> Result<RecipeProjection, RecipeRepositoryError> {
        let inner = self.lock();
        let recipe = inner
            .recipes
            .get(&id)
            .ok_or(RecipeRepositoryError::NotFound)?;
        Ok(inner.projection(recipe, viewer))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        window: PageWindow,
        viewer: Viewer,
    ) -> Result<(i64, Vec<RecipeProjection>), RecipeRepositoryError> {
        let inner = self.lock();
        if viewer.is_none() && (filter.only_favorited || filter.only_in_cart) {
            return Ok((0, vec![]));
        }
        let mut recipes: Vec<&StoredRecipe> = inner
            .recipes
            .values()
            .filter(|r| filter.author.map(|a| r.author == a).unwrap_or(true))
            .filter(|r| {
                !filter.only_favorited
                    || viewer
                        .map(|v| inner.favorites.contains(&(v, r.id)))
                        .unwrap_or(false)
            })
            .filter(|r| {
                !filter.only_in_cart
                    || viewer
                        .map(|v| inner.carts.contains(&(v, r.id)))
                        .unwrap_or(false)
            })
            .collect();
        recipes.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        let count = recipes.len() as i64;
        let projections = window_slice(recipes, window)
            .into_iter()
            .map(|r| inner.projection(r, viewer))
            .collect();
        Ok((count, projections))
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeCard, MembershipError> {
        let mut inner = self.lock();
        let card = inner
            .recipes
            .get(&recipe)
            .map(|r| inner.card(r))
            .ok_or(MembershipError::RecipeNotFound)?;
        if !inner.membership_set(kind).insert((user, recipe)) {
            return Err(MembershipError::AlreadyPresent);
        }
        Ok(card)
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipError> {
        let mut inner = self.lock();
        if !inner.recipes.contains_key(&recipe) {
            return Err(MembershipError::RecipeNotFound);
        }
        if !inner.membership_set(kind).remove(&(user, recipe)) {
            return Err(MembershipError::NotPresent);
        }
        Ok(())
    }

    async fn shopping_list(&self, user: UserId) -> Result<Vec<ShoppingListItem>, MembershipError> {
        let inner = self.lock();
        let cart: Vec<&StoredRecipe> = inner
            .carts
            .iter()
            .filter(|(u, _)| *u == user)
            .filter_map(|(_, r)| inner.recipes.get(r))
            .collect();
        if cart.is_empty() {
            return Err(MembershipError::EmptyCart);
        }
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for recipe in cart {
            for pair in &recipe.ingredients {
                if let Some(ingredient) = inner.ingredients.get(&pair.ingredient_id) {
                    *totals
                        .entry((
                            ingredient.name.clone(),
                            ingredient.measurement_unit.clone(),
                        ))
                        .or_default() += i64::from(pair.amount);
                }
            }
        }
        Ok(totals
            .into_iter()
            .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
                name,
                measurement_unit,
                total_amount,
            })
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn subscribe(
        &self,
        subscriber: UserId,
        target: UserId,
        recipes_limit: Option<i64>,
    ) -> Result<SubscriptionProfile, SubscriptionError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&target) {
            return Err(SubscriptionError::TargetNotFound);
        }
        if subscriber == target {
            return Err(SubscriptionError::SelfSubscription);
        }
        if !inner.subscriptions.insert((subscriber, target)) {
            return Err(SubscriptionError::AlreadySubscribed);
        }
        let user = inner.users.get(&target).cloned().expect("target checked");
        Ok(inner.subscription_profile(subscriber, &user, recipes_limit))
    }

    async fn unsubscribe(
        &self,
        subscriber: UserId,
        target: UserId,
    ) -> Result<(), SubscriptionError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&target) {
            return Err(SubscriptionError::TargetNotFound);
        }
        if !inner.subscriptions.remove(&(subscriber, target)) {
            return Err(SubscriptionError::NotSubscribed);
        }
        Ok(())
    }

    async fn subscriptions(
        &self,
        subscriber: UserId,
        window: PageWindow,
        recipes_limit: Option<i64>,
    ) -> Result<(i64, Vec<SubscriptionProfile>), SubscriptionError> {
        let inner = self.lock();
        let mut targets: Vec<&StoredUser> = inner
            .subscriptions
            .iter()
            .filter(|(s, _)| *s == subscriber)
            .filter_map(|(_, t)| inner.users.get(t))
            .collect();
        targets.sort_by(|a, b| a.username.cmp(&b.username));
        let count = targets.len() as i64;
        let profiles = window_slice(targets, window)
            .into_iter()
            .map(|u| inner.subscription_profile(subscriber, u, recipes_limit))
            .collect();
        Ok((count, profiles))
    }
}

#[async_trait]
impl ShortLinkRepository for MemoryStore {
    async fn get_or_create(&self, recipe: RecipeId) -> Result<ShortLinkCode, ShortLinkError> {
        let mut inner = self.lock();
        if !inner.recipes.contains_key(&recipe) {
            return Err(ShortLinkError::RecipeNotFound);
        }
        if let Some(code) = inner.links_by_recipe.get(&recipe) {
            return Ok(code.clone());
        }
        let mut rng = OsRng;
        let code = loop {
            let candidate = ShortLinkCode::generate(&mut rng);
            if !inner.links_by_code.contains_key(candidate.as_str()) {
                break candidate;
            }
        };
        inner.links_by_recipe.insert(recipe, code.clone());
        inner.links_by_code.insert(code.as_str().to_owned(), recipe);
        Ok(code)
    }

    async fn resolve(&self, code: &ShortLinkCode) -> Result<RecipeId, ShortLinkError> {
        let inner = self.lock();
        inner
            .links_by_code
            .get(code.as_str())
            .copied()
            .ok_or(ShortLinkError::UnknownCode)
    }
}
