use axum::response::IntoResponse;
use serde_json::json;
use tracing::info;

use crate::auth::{generate_token, hash_password, validate_email_format};
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::handlers::utils::{require_post, required_text};
use crate::middleware::ApiResponse;
use crate::router::{ActionContext, ActionResult};

/// POST /auth/register - create an account
///
/// Takes `username`, `email` and `password`. The session receives a fresh
/// token but is not logged in; a separate login is required.
pub async fn register(mut ctx: ActionContext) -> ActionResult {
    require_post(&ctx.method)?;

    let payload = ctx.payload().await?;
    let username = required_text(&payload, "username");
    let email = required_text(&payload, "email");
    let password = required_text(&payload, "password");

    let (username, email, password) = match (username, email, password) {
        (Some(u), Some(e), Some(p)) => (u, e, p),
        (u, e, p) => {
            let missing: Vec<&str> = [("username", u.is_none()), ("email", e.is_none()), ("password", p.is_none())]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
            return Err(ApiError::missing_fields("Missing required fields", &missing));
        }
    };

    if let Err(msg) = validate_email_format(&email) {
        let field_errors = [("email".to_string(), msg.clone())].into_iter().collect();
        return Err(ApiError::validation_error(msg, Some(field_errors)));
    }

    if ctx.state.users.find_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash = hash_password(&password, ctx.state.config.security.insecure_password_hashing)?;
    let user_id = ctx
        .state
        .users
        .create(&NewUser { username: username.clone(), email, password_hash })
        .await?;
    info!("Registered user {} (id {})", username, user_id);

    let token = generate_token();
    ctx.session.issue_token(token.clone()).await?;

    Ok(ApiResponse::created(json!({
        "message": "Registration successful",
        "token": token
    }))
    .into_response())
}
