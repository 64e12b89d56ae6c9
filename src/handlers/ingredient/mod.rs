pub mod delete;
pub mod read;
pub mod write;

use crate::api::Payload;
use crate::database::models::IngredientInput;
use crate::error::ApiError;
use crate::handlers::utils::required_text;
use crate::router::{action, Resource};

pub use delete::{delete, delete_multiple};
pub use read::{get, list};
pub use write::{create, update};

/// Ingredients are shared: any logged-in user may change any of them
pub fn resource() -> Resource {
    Resource::new("ingredient", "index")
        .action("index", action(get))
        .action("list", action(list))
        .action("get", action(get))
        .action("getByIngredientId", action(get))
        .action("create", action(create))
        .action("update", action(update))
        .action("delete", action(delete))
        .action("deleteMultiple", action(delete_multiple))
}

/// `name` and `unit` must both be non-empty strings
pub fn validate_input(payload: &Payload) -> Result<IngredientInput, ApiError> {
    match (required_text(payload, "name"), required_text(payload, "unit")) {
        (Some(name), Some(unit)) => Ok(IngredientInput { name, unit }),
        (name, unit) => {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push("name");
            }
            if unit.is_none() {
                missing.push("unit");
            }
            Err(ApiError::missing_fields("Invalid ingredient data", &missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn both_fields_are_required() {
        let ok = validate_input(&Payload::json(json!({"name": "flour", "unit": "g"}))).unwrap();
        assert_eq!(ok.name, "flour");
        assert_eq!(ok.unit, "g");

        let err = validate_input(&Payload::json(json!({"name": "flour", "unit": ""}))).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["unit"], "This field is required");
        assert!(body["field_errors"].get("name").is_none());
    }

    #[test]
    fn non_string_values_are_rejected() {
        let err = validate_input(&Payload::json(json!({"name": 5, "unit": ["g"]}))).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_json()["field_errors"].get("name").is_some());
    }
}
