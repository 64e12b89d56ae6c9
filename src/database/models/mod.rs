pub mod ingredient;
pub mod recipe;
pub mod user;

pub use ingredient::{Ingredient, IngredientInput};
pub use recipe::{NewRecipe, Recipe, RecipeIngredient, RecipeIngredientLink, RecipeInput};
pub use user::{NewUser, User};
