use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub unit: String,
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientInput {
    pub name: String,
    pub unit: String,
}

impl Ingredient {
    pub fn apply(&mut self, input: IngredientInput) {
        self.name = input.name;
        self.unit = input.unit;
    }
}
