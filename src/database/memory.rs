use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Ingredient, IngredientInput, NewRecipe, NewUser, Recipe, RecipeIngredientLink, User,
};
use crate::database::repository::{IngredientRepository, RecipeRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    recipe_ingredients: Vec<RecipeIngredientLink>,
    next_user_id: i64,
    next_ingredient_id: i64,
    next_recipe_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Process-local stand-in for the relational store. Same tables, same
/// cascade rules; ids come from per-table counters like a serial column.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Association rows, in insertion order
    pub async fn recipe_ingredient_links(&self) -> Vec<RecipeIngredientLink> {
        self.tables.read().await.recipe_ingredients.clone()
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create(&self, user: &NewUser) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_user_id);
        tables.users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl IngredientRepository for MemoryDatabase {
    async fn list(&self) -> Result<Vec<Ingredient>, DatabaseError> {
        Ok(self.tables.read().await.ingredients.clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Ingredient>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, input: &IngredientInput) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_ingredient_id);
        tables.ingredients.push(Ingredient {
            id,
            name: input.name.clone(),
            unit: input.unit.clone(),
        });
        Ok(id)
    }

    async fn update(&self, ingredient: &Ingredient) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.ingredients.iter_mut().find(|i| i.id == ingredient.id) {
            *existing = ingredient.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.recipe_ingredients.retain(|link| link.ingredient_id != id);
        tables.ingredients.retain(|i| i.id != id);
        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for MemoryDatabase {
    async fn list(&self) -> Result<Vec<Recipe>, DatabaseError> {
        Ok(self.tables.read().await.recipes.clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Recipe>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_recipe_id);
        tables.recipes.push(Recipe {
            id,
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
            photo: recipe.photo.clone(),
            user_id: recipe.user_id,
        });
        Ok(id)
    }

    async fn add_ingredient(&self, recipe_id: i64, ingredient_id: i64, amount: &str) -> Result<(), DatabaseError> {
        self.tables.write().await.recipe_ingredients.push(RecipeIngredientLink {
            recipe_id,
            ingredient_id,
            amount: amount.to_string(),
        });
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.recipes.iter_mut().find(|r| r.id == recipe.id) {
            existing.name = recipe.name.clone();
            existing.ingredients = recipe.ingredients.clone();
            existing.steps = recipe.steps.clone();
            existing.photo = recipe.photo.clone();
        }
        Ok(())
    }

    async fn is_owner(&self, recipe_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .recipes
            .iter()
            .any(|r| r.id == recipe_id && r.user_id == user_id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.recipe_ingredients.retain(|link| link.recipe_id != id);
        tables.recipes.retain(|r| r.id != id);
        Ok(())
    }
}
