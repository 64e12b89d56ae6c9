use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Ingredient, IngredientInput, NewRecipe, NewUser, Recipe, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return its id
    async fn create(&self, user: &NewUser) -> Result<i64, DatabaseError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Ingredient>, DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Ingredient>, DatabaseError>;

    async fn create(&self, input: &IngredientInput) -> Result<i64, DatabaseError>;

    async fn update(&self, ingredient: &Ingredient) -> Result<(), DatabaseError>;

    /// Remove every association row referencing the ingredient, then the ingredient.
    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Recipe>, DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Recipe>, DatabaseError>;

    async fn create(&self, recipe: &NewRecipe) -> Result<i64, DatabaseError>;

    /// Append one association row; duplicates are allowed
    async fn add_ingredient(&self, recipe_id: i64, ingredient_id: i64, amount: &str) -> Result<(), DatabaseError>;

    /// Overwrite name, ingredients, steps and photo. Owner is never touched.
    async fn update(&self, recipe: &Recipe) -> Result<(), DatabaseError>;

    /// Whether a recipe with `recipe_id` exists and belongs to `user_id`
    async fn is_owner(&self, recipe_id: i64, user_id: i64) -> Result<bool, DatabaseError>;

    /// Remove the recipe's association rows, then the recipe
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}
