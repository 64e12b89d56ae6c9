use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tracing::debug;

use crate::api::Payload;
use crate::app::AppState;
use crate::error::ApiError;
use crate::session::SessionContext;

/// Everything an action gets to work with
pub struct ActionContext {
    pub state: AppState,
    pub session: SessionContext,
    pub method: Method,
    /// Path segments left after the resource and action were consumed
    pub args: Vec<String>,
    /// Undecoded request; read at most once through `payload()`
    request: Option<Request>,
}

impl ActionContext {
    pub fn new(state: AppState, session: SessionContext, request: Request, args: Vec<String>) -> Self {
        Self {
            state,
            session,
            method: request.method().clone(),
            args,
            request: Some(request),
        }
    }

    /// Read and decode the request body.
    ///
    /// Actions call this after their session and ownership checks, so a
    /// rejected caller never has its body buffered or parsed.
    pub async fn payload(&mut self) -> Result<Payload, ApiError> {
        match self.request.take() {
            Some(req) => Payload::from_request(req, &self.state).await,
            None => Err(ApiError::internal_server_error("Request body already consumed")),
        }
    }

    /// First positional argument as a record id; `None` when absent
    pub fn id_arg(&self) -> Result<Option<i64>, ApiError> {
        match self.args.first() {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw))),
        }
    }

    /// Like `id_arg`, but the id must be present
    pub fn require_id(&self) -> Result<i64, ApiError> {
        self.id_arg()?
            .ok_or_else(|| ApiError::bad_request("Missing id"))
    }
}

pub type ActionResult = Result<Response, ApiError>;

pub type BoxedAction = Arc<dyn Fn(ActionContext) -> BoxFuture<'static, ActionResult> + Send + Sync>;

/// Box an async fn so it can sit in the route table
pub fn action<F, Fut>(f: F) -> BoxedAction
where
    F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// A resource and the actions it answers to
pub struct Resource {
    name: &'static str,
    default_action: &'static str,
    actions: HashMap<String, (&'static str, BoxedAction)>,
}

impl Resource {
    /// `default_action` runs when the second segment names no action
    pub fn new(name: &'static str, default_action: &'static str) -> Self {
        Self {
            name,
            default_action,
            actions: HashMap::new(),
        }
    }

    pub fn action(mut self, name: &'static str, handler: BoxedAction) -> Self {
        self.actions.insert(name.to_ascii_lowercase(), (name, handler));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lookup(&self, action: &str) -> Option<&(&'static str, BoxedAction)> {
        self.actions.get(&action.to_ascii_lowercase())
    }
}

pub struct Resolution {
    pub resource: &'static str,
    pub action: &'static str,
    pub handler: BoxedAction,
    pub args: Vec<String>,
}

/// Front-controller table: `{resource -> {action -> handler}}`, built once at startup
pub struct RouteTable {
    resources: HashMap<String, Resource>,
    not_found: BoxedAction,
}

pub const NOT_FOUND: &str = "notFound";

impl RouteTable {
    pub fn new(not_found: BoxedAction) -> Self {
        Self {
            resources: HashMap::new(),
            not_found,
        }
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.insert(resource.name.to_ascii_lowercase(), resource);
        self
    }

    fn not_found(&self, args: Vec<String>) -> Resolution {
        Resolution {
            resource: NOT_FOUND,
            action: "index",
            handler: self.not_found.clone(),
            args,
        }
    }

    /// Map a request path onto a handler.
    ///
    /// Segment 0 picks the resource. Segment 1 picks the action when it names
    /// one, otherwise the default action runs and segment 1 stays positional.
    pub fn resolve(&self, path: &str) -> Resolution {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return self.not_found(segments);
        }

        let resource = match self.resources.get(&segments[0].to_ascii_lowercase()) {
            Some(resource) => resource,
            None => return self.not_found(segments),
        };
        segments.remove(0);

        if let Some((name, handler)) = segments.first().and_then(|s| resource.lookup(s)) {
            let (name, handler) = (*name, handler.clone());
            segments.remove(0);
            return Resolution {
                resource: resource.name,
                action: name,
                handler,
                args: segments,
            };
        }

        match resource.lookup(resource.default_action) {
            Some((name, handler)) => Resolution {
                resource: resource.name,
                action: name,
                handler: handler.clone(),
                args: segments,
            },
            None => self.not_found(segments),
        }
    }
}

/// Fallback handler: every request outside the fixed routes goes through here
pub async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let resolution = state.routes.resolve(req.uri().path());
    let session = match req.extensions().get::<SessionContext>() {
        Some(session) => session.clone(),
        None => SessionContext::fresh(state.sessions.clone()),
    };

    debug!(
        "Dispatching {} {} to {}::{}",
        req.method(),
        req.uri().path(),
        resolution.resource,
        resolution.action
    );

    let ctx = ActionContext::new(state, session, req, resolution.args);

    match (resolution.handler)(ctx).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn stub() -> BoxedAction {
        action(|_ctx| async { Ok(StatusCode::OK.into_response()) })
    }

    fn table() -> RouteTable {
        RouteTable::new(stub())
            .resource(
                Resource::new("auth", "index")
                    .action("index", stub())
                    .action("register", stub())
                    .action("login", stub()),
            )
            .resource(
                Resource::new("ingredient", "index")
                    .action("index", stub())
                    .action("get", stub())
                    .action("getByIngredientId", stub())
                    .action("deleteMultiple", stub()),
            )
    }

    #[test]
    fn empty_path_is_not_found() {
        let table = table();
        assert_eq!(table.resolve("/").resource, NOT_FOUND);
        assert_eq!(table.resolve("").resource, NOT_FOUND);
        assert_eq!(table.resolve("//").resource, NOT_FOUND);
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let resolution = table().resolve("/widgets/list");
        assert_eq!(resolution.resource, NOT_FOUND);
        assert_eq!(resolution.args, vec!["widgets", "list"]);
    }

    #[test]
    fn named_action_consumes_its_segment() {
        let resolution = table().resolve("/ingredient/get/7");
        assert_eq!(resolution.resource, "ingredient");
        assert_eq!(resolution.action, "get");
        assert_eq!(resolution.args, vec!["7"]);
    }

    #[test]
    fn unknown_action_falls_back_to_default_and_stays_positional() {
        let resolution = table().resolve("/ingredient/7");
        assert_eq!(resolution.action, "index");
        assert_eq!(resolution.args, vec!["7"]);

        let resolution = table().resolve("/ingredient");
        assert_eq!(resolution.action, "index");
        assert!(resolution.args.is_empty());
    }

    #[test]
    fn matching_ignores_ascii_case() {
        let resolution = table().resolve("/Ingredient/DELETEMULTIPLE");
        assert_eq!(resolution.resource, "ingredient");
        assert_eq!(resolution.action, "deleteMultiple");

        let resolution = table().resolve("/INGREDIENT/getbyingredientid/3");
        assert_eq!(resolution.action, "getByIngredientId");
        assert_eq!(resolution.args, vec!["3"]);
    }

    #[test]
    fn trailing_segments_pass_through_untyped() {
        let resolution = table().resolve("/auth/login/extra/abc/");
        assert_eq!(resolution.action, "login");
        assert_eq!(resolution.args, vec!["extra", "abc"]);
    }

    #[tokio::test]
    async fn body_is_decoded_only_when_asked_for() {
        use crate::config::AppConfig;
        use crate::database::{Database, MemoryDatabase};
        use crate::session::MemorySessionStore;
        use axum::body::Body;

        let config = AppConfig::testing(std::env::temp_dir().join("recipes-api-router-tests"));
        let sessions = Arc::new(MemorySessionStore::new());
        let state = AppState::new(config, Database::Memory(Arc::new(MemoryDatabase::new())), sessions.clone());
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/ingredient/create")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let mut ctx = ActionContext::new(state, SessionContext::fresh(sessions), req, Vec::new());
        assert_eq!(ctx.method, Method::POST);
        assert_eq!(ctx.session.require_user().unwrap_err().status_code(), 401);

        assert_eq!(ctx.payload().await.unwrap_err().error_code(), "INVALID_JSON");
        assert_eq!(ctx.payload().await.unwrap_err().status_code(), 500);
    }

    #[test]
    fn resource_without_default_handler_is_not_found() {
        let table = RouteTable::new(stub()).resource(Resource::new("auth", "index").action("login", stub()));
        assert_eq!(table.resolve("/auth/whatever").resource, NOT_FOUND);
        assert_eq!(table.resolve("/auth/login").action, "login");
    }
}
