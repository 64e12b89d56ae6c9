use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::any,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::database::{Database, IngredientRepository, RecipeRepository, UserRepository};
use crate::handlers::route_table;
use crate::middleware::session_middleware;
use crate::router::{dispatch, RouteTable};
use crate::session::{MemorySessionStore, SessionStore};
use crate::uploads::PhotoStore;

/// Shared state handed to the middleware and every action
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Database,
    pub users: Arc<dyn UserRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub photos: PhotoStore,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(config: AppConfig, database: Database, sessions: Arc<dyn SessionStore>) -> Self {
        let repositories = database.repositories();
        let photos = PhotoStore::new(&config.uploads);

        Self {
            config: Arc::new(config),
            database,
            users: repositories.users,
            ingredients: repositories.ingredients,
            recipes: repositories.recipes,
            sessions,
            photos,
            routes: Arc::new(route_table()),
        }
    }

    /// Connect the configured backend and start with an empty in-memory session store
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let database = Database::from_config(&config.database).await?;
        Ok(Self::new(config, database, Arc::new(MemorySessionStore::new())))
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .route("/health", any(health))
        .nest_service(&config.uploads.public_path, ServeDir::new(&config.uploads.directory))
        .fallback(dispatch)
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.database.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable",
                "error": e.to_string()
            })),
        ),
    }
}
