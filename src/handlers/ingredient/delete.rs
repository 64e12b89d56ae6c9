use axum::response::IntoResponse;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::utils::value_as_id;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// DELETE /ingredient/delete/:id - drop the ingredient and every recipe link to it
pub async fn delete(ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;
    let id = ctx.require_id()?;

    ctx.state.ingredients.delete(id).await?;
    info!("Deleted ingredient {}", id);

    Ok(ApiResponse::no_content().into_response())
}

/// POST /ingredient/deleteMultiple - body is a JSON array of ids (or an `ids` field)
///
/// The whole list is checked before anything is deleted. A storage failure
/// stops the loop; ingredients already deleted stay deleted.
pub async fn delete_multiple(mut ctx: ActionContext) -> ActionResult {
    ctx.session.require_user()?;

    let values = ctx
        .payload()
        .await?
        .id_list()
        .ok_or_else(|| ApiError::bad_request("Missing list of ingredients to delete"))?;
    let ids = values
        .iter()
        .map(value_as_id)
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| ApiError::bad_request("Invalid ingredient id in list"))?;

    for id in &ids {
        ctx.state.ingredients.delete(*id).await?;
    }
    info!("Deleted {} ingredients", ids.len());

    Ok(ApiResponse::no_content().into_response())
}
