use axum::response::IntoResponse;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::handlers::utils::value_as_id;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// DELETE /recipe/delete/:id - owner only; association rows go first
pub async fn delete(ctx: ActionContext) -> ActionResult {
    let user_id = ctx.session.require_user()?;
    let id = ctx.require_id()?;

    if !ctx.state.recipes.is_owner(id, user_id).await? {
        warn!("User {} denied delete of recipe {}", user_id, id);
        return Err(ApiError::forbidden("Access denied"));
    }

    ctx.state.recipes.delete(id).await?;
    info!("User {} deleted recipe {}", user_id, id);

    Ok(ApiResponse::no_content().into_response())
}

/// POST /recipe/deleteMultiple - delete the caller's recipes among the listed ids
///
/// Ids the caller does not own, and entries that are not ids at all, are skipped.
pub async fn delete_multiple(mut ctx: ActionContext) -> ActionResult {
    let user_id = ctx.session.require_user()?;

    let values = ctx
        .payload()
        .await?
        .id_list()
        .ok_or_else(|| ApiError::bad_request("Missing list of recipes to delete"))?;

    let mut deleted = 0;
    for value in &values {
        let Some(id) = value_as_id(value) else {
            debug!("Skipping non-id entry {}", value);
            continue;
        };
        if !ctx.state.recipes.is_owner(id, user_id).await? {
            debug!("Skipping recipe {} not owned by user {}", id, user_id);
            continue;
        }
        ctx.state.recipes.delete(id).await?;
        deleted += 1;
    }
    info!("User {} deleted {} of {} listed recipes", user_id, deleted, values.len());

    Ok(ApiResponse::no_content().into_response())
}
