use axum::response::IntoResponse;
use serde_json::json;
use tracing::{info, warn};

use super::validate_input;
use crate::database::models::NewRecipe;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// POST /recipe/create - recipe owned by the session user
///
/// The optional `photo` upload is stored only after the body validates.
/// Association rows are written one per ingredient entry after the recipe.
pub async fn create(mut ctx: ActionContext) -> ActionResult {
    let user_id = ctx.session.require_user()?;
    let mut payload = ctx.payload().await?;
    let input = validate_input(&payload)?;

    let photo = match payload.take_photo() {
        Some(file) => Some(ctx.state.photos.save(&file).await?),
        None => None,
    };

    let recipe = NewRecipe::new(input, photo, user_id);
    let id = ctx.state.recipes.create(&recipe).await?;
    for ingredient in &recipe.ingredients {
        ctx.state
            .recipes
            .add_ingredient(id, ingredient.id, &ingredient.amount)
            .await?;
    }
    info!("User {} created recipe {} ({})", user_id, id, recipe.name);

    Ok(ApiResponse::created(json!({ "id": id })).into_response())
}

/// PUT /recipe/update/:id - owner only
///
/// Ownership is checked before the body is read. Association rows are
/// left as they were at creation; the photo changes only when a new one is sent.
pub async fn update(mut ctx: ActionContext) -> ActionResult {
    let user_id = ctx.session.require_user()?;
    let id = ctx.require_id()?;

    if !ctx.state.recipes.is_owner(id, user_id).await? {
        warn!("User {} denied update of recipe {}", user_id, id);
        return Err(ApiError::forbidden("Access denied"));
    }

    let mut payload = ctx.payload().await?;
    let input = validate_input(&payload)?;
    let mut recipe = ctx
        .state
        .recipes
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    recipe.apply(input);

    if let Some(file) = payload.take_photo() {
        recipe.photo = Some(ctx.state.photos.save(&file).await?);
    }

    ctx.state.recipes.update(&recipe).await?;
    info!("User {} updated recipe {}", user_id, id);

    Ok(ApiResponse::ok(recipe).into_response())
}
