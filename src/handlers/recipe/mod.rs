pub mod delete;
pub mod read;
pub mod write;

use std::collections::HashMap;

use serde_json::Value;

use crate::api::Payload;
use crate::database::models::{RecipeIngredient, RecipeInput};
use crate::error::ApiError;
use crate::handlers::utils::{required_text, value_as_id};
use crate::router::{action, Resource};

pub use delete::{delete, delete_multiple};
pub use read::{get, list};
pub use write::{create, update};

/// Recipes belong to the user who created them; only the owner may change one
pub fn resource() -> Resource {
    Resource::new("recipe", "index")
        .action("index", action(get))
        .action("list", action(list))
        .action("get", action(get))
        .action("getByRecipeId", action(get))
        .action("create", action(create))
        .action("update", action(update))
        .action("delete", action(delete))
        .action("deleteMultiple", action(delete_multiple))
}

/// One `{id, amount}` entry. Form bodies may send each entry as a JSON string.
fn parse_ingredient(value: &Value) -> Option<RecipeIngredient> {
    let entry = match value {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
        other => other.clone(),
    };
    let id = value_as_id(entry.get("id")?)?;
    let amount = entry.get("amount")?.as_str()?.to_string();
    Some(RecipeIngredient { id, amount })
}

/// Shape check for create and update. Ingredient ids are not looked up.
pub fn validate_input(payload: &Payload) -> Result<RecipeInput, ApiError> {
    let mut field_errors = HashMap::new();

    let name = required_text(payload, "name");
    if name.is_none() {
        field_errors.insert("name".to_string(), "This field is required".to_string());
    }

    let ingredients = match payload.list("ingredients") {
        Some(items) if !items.is_empty() => {
            match items.iter().map(parse_ingredient).collect::<Option<Vec<_>>>() {
                Some(parsed) => Some(parsed),
                None => {
                    field_errors.insert(
                        "ingredients".to_string(),
                        "Each ingredient needs an integer id and a string amount".to_string(),
                    );
                    None
                }
            }
        }
        _ => {
            field_errors.insert("ingredients".to_string(), "At least one ingredient is required".to_string());
            None
        }
    };

    let steps = match payload.list("steps") {
        Some(items) if !items.is_empty() => {
            match items
                .iter()
                .map(|step| step.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
            {
                Some(parsed) => Some(parsed),
                None => {
                    field_errors.insert("steps".to_string(), "Steps must be strings".to_string());
                    None
                }
            }
        }
        _ => {
            field_errors.insert("steps".to_string(), "At least one step is required".to_string());
            None
        }
    };

    match (name, ingredients, steps) {
        (Some(name), Some(ingredients), Some(steps)) => Ok(RecipeInput { name, ingredients, steps }),
        _ => Err(ApiError::validation_error("Invalid recipe data", Some(field_errors))),
    }
}
