use crate::error::ApiError;
use crate::router::{ActionContext, ActionResult};

/// Anything the route table cannot place
pub async fn not_found(_ctx: ActionContext) -> ActionResult {
    Err(ApiError::not_found("Page not found"))
}
