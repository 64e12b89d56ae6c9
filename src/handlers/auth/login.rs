use axum::response::IntoResponse;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{generate_token, verify_password};
use crate::error::ApiError;
use crate::handlers::utils::{require_post, required_text};
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// POST /auth/login - authenticate and bind the user to the session
///
/// Unknown usernames and wrong passwords get the same 401 and leave the
/// session untouched.
pub async fn login(mut ctx: ActionContext) -> ActionResult {
    require_post(&ctx.method)?;

    let payload = ctx.payload().await?;
    let username = required_text(&payload, "username");
    let password = required_text(&payload, "password");
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) => (u, p),
        (u, p) => {
            let mut missing = Vec::new();
            if u.is_none() {
                missing.push("username");
            }
            if p.is_none() {
                missing.push("password");
            }
            return Err(ApiError::missing_fields("Missing required fields", &missing));
        }
    };

    let user = match ctx.state.users.find_by_username(&username).await? {
        Some(user) if verify_password(&password, &user.password_hash) => user,
        _ => {
            warn!("Failed login for {}", username);
            return Err(ApiError::unauthorized("Authentication failed"));
        }
    };

    let token = generate_token();
    ctx.session.login(user.id, token.clone()).await?;
    info!("User {} logged in", user.id);

    Ok(ApiResponse::ok(json!({
        "message": "Authentication successful",
        "token": token
    }))
    .into_response())
}
