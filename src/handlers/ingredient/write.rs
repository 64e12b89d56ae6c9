use axum::response::IntoResponse;
use serde_json::json;
use tracing::info;

use super::validate_input;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// POST /ingredient/create - `{name, unit}` in, `{id}` out
pub async fn create(mut ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let input = validate_input(&ctx.payload().await?)?;
    let id = ctx.state.ingredients.create(&input).await?;
    info!("Created ingredient {} ({})", id, input.name);

    Ok(ApiResponse::created(json!({ "id": id })).into_response())
}

/// PUT /ingredient/update/:id - overwrite name and unit
pub async fn update(mut ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;
    let id = ctx.require_id()?;

    let mut ingredient = ctx
        .state
        .ingredients
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient not found"))?;

    ingredient.apply(validate_input(&ctx.payload().await?)?);
    ctx.state.ingredients.update(&ingredient).await?;

    Ok(ApiResponse::ok(ingredient).into_response())
}
