use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// GET /recipe/list - every recipe, ordered by id
pub async fn list(ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let recipes = ctx.state.recipes.list().await?;
    Ok(ApiResponse::ok(recipes).into_response())
}

/// GET /recipe[/get][/:id] - one recipe by id, or all of them without one
pub async fn get(ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let id = match ctx.id_arg()? {
        Some(id) => id,
        None => return list(ctx).await,
    };

    match ctx.state.recipes.find(id).await? {
        Some(recipe) => Ok(ApiResponse::ok(recipe).into_response()),
        None => Err(ApiError::not_found("Recipe not found")),
    }
}
