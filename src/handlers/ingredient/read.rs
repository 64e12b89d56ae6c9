use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// GET /ingredient/list - every ingredient, ordered by id
pub async fn list(ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let ingredients = ctx.state.ingredients.list().await?;
    Ok(ApiResponse::ok(ingredients).into_response())
}

/// GET /ingredient[/get][/:id] - one ingredient by id, or all of them without one
pub async fn get(ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let id = match ctx.id_arg()? {
        Some(id) => id,
        None => return list(ctx).await,
    };

    match ctx.state.ingredients.find(id).await? {
        Some(ingredient) => Ok(ApiResponse::ok(ingredient).into_response()),
        None => Err(ApiError::not_found("Ingredient not found")),
    }
}
