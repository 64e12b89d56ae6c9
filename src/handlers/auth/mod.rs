pub mod login;
pub mod logout;
pub mod register;

use crate::error::ApiError;
use crate::router::{action, ActionContext, ActionResult, Resource};

pub use login::login;
pub use logout::logout;
pub use register::register;

pub fn resource() -> Resource {
    Resource::new("auth", "index")
        .action("index", action(index))
        .action("register", action(register))
        .action("login", action(login))
        .action("logout", action(logout))
}

/// /auth with no recognised action
pub async fn index(_ctx: ActionContext) -> ActionResult {
    Err(ApiError::not_found("Unknown action"))
}
