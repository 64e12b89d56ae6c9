use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};

use crate::app::AppState;
use crate::error::ApiError;
use crate::session::{session_cookie, SessionContext};

/// Session middleware that loads the caller's session and injects it into the request.
///
/// A session id the store does not know is discarded and replaced. The
/// cookie is only issued once a fresh session has actually been written.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = jar
        .get(&state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let (session, fresh) = match presented {
        Some(id) => match state.sessions.load(&id).await? {
            Some(data) => (SessionContext::new(id, data, state.sessions.clone()), false),
            None => {
                debug!("Discarding unknown session id");
                (SessionContext::fresh(state.sessions.clone()), true)
            }
        },
        None => (SessionContext::fresh(state.sessions.clone()), true),
    };

    let session_id = session.id().to_string();
    request.extensions_mut().insert(session);

    let response = next.run(request).await;

    if !fresh {
        return Ok(response);
    }

    match state.sessions.load(&session_id).await {
        Ok(Some(_)) => {
            let jar = jar.add(session_cookie(&state.config.session, session_id));
            Ok((jar, response).into_response())
        }
        Ok(None) => Ok(response),
        Err(e) => {
            error!("Failed to confirm session persistence: {}", e);
            Ok(response)
        }
    }
}
