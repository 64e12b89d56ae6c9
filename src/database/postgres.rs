use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::recipe::RecipeRow;
use crate::database::models::{Ingredient, IngredientInput, NewRecipe, NewUser, Recipe, User};
use crate::database::repository::{IngredientRepository, RecipeRepository, UserRepository};

/// Repositories over a PostgreSQL pool. Every statement is parameterized and
/// runs on its own; multi-statement operations are not wrapped in a transaction.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl IngredientRepository for PgRepository {
    async fn list(&self) -> Result<Vec<Ingredient>, DatabaseError> {
        let rows = sqlx::query_as::<_, Ingredient>("SELECT id, name, unit FROM ingredients ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Ingredient>, DatabaseError> {
        let row = sqlx::query_as::<_, Ingredient>("SELECT id, name, unit FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, input: &IngredientInput) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO ingredients (name, unit) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.unit)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, ingredient: &Ingredient) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE ingredients SET name = $1, unit = $2 WHERE id = $3")
            .bind(&ingredient.name)
            .bind(&ingredient.unit)
            .bind(ingredient.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE ingredient_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for PgRepository {
    async fn list(&self) -> Result<Vec<Recipe>, DatabaseError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            "SELECT id, name, ingredients, steps, photo, user_id FROM recipes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Recipe>, DatabaseError> {
        let row = sqlx::query_as::<_, RecipeRow>(
            "SELECT id, name, ingredients, steps, photo, user_id FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Recipe::from))
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO recipes (name, ingredients, steps, photo, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&recipe.name)
        .bind(Json(&recipe.ingredients))
        .bind(Json(&recipe.steps))
        .bind(&recipe.photo)
        .bind(recipe.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn add_ingredient(&self, recipe_id: i64, ingredient_id: i64, amount: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)")
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(amount)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE recipes SET name = $1, ingredients = $2, steps = $3, photo = $4 WHERE id = $5",
        )
        .bind(&recipe.name)
        .bind(Json(&recipe.ingredients))
        .bind(Json(&recipe.steps))
        .bind(&recipe.photo)
        .bind(recipe.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_owner(&self, recipe_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE id = $1 AND user_id = $2",
        )
        .bind(recipe_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
