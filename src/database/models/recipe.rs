use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// One `{id, amount}` entry of a recipe's ingredient list; `id` is the ingredient id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
    pub photo: Option<String>,
    /// Owner, fixed at creation
    pub user_id: i64,
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInput {
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
    pub photo: Option<String>,
    pub user_id: i64,
}

/// Row of the `recipe_ingredients` association table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeIngredientLink {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: String,
}

/// `recipes` row; the ingredient list and steps live in JSONB columns
#[derive(Debug, FromRow)]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub ingredients: Json<Vec<RecipeIngredient>>,
    pub steps: Json<Vec<String>>,
    pub photo: Option<String>,
    pub user_id: i64,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            ingredients: row.ingredients.0,
            steps: row.steps.0,
            photo: row.photo,
            user_id: row.user_id,
        }
    }
}

impl Recipe {
    /// Replace the editable fields; owner and photo are left alone
    pub fn apply(&mut self, input: RecipeInput) {
        self.name = input.name;
        self.ingredients = input.ingredients;
        self.steps = input.steps;
    }
}

impl NewRecipe {
    pub fn new(input: RecipeInput, photo: Option<String>, user_id: i64) -> Self {
        Self {
            name: input.name,
            ingredients: input.ingredients,
            steps: input.steps,
            photo,
            user_id,
        }
    }
}
