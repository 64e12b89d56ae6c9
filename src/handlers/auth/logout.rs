use axum::response::IntoResponse;
use tracing::info;

use crate::handlers::utils::require_post;
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// POST /auth/logout - forget the session's user. Idempotent.
pub async fn logout(mut ctx: ActionContext) -> ActionResult {
    require_post(&ctx.method)?;

    if let Some(user_id) = ctx.session.user_id() {
        info!("User {} logged out", user_id);
    }
    ctx.session.logout().await?;

    Ok(ApiResponse::no_content().into_response())
}
