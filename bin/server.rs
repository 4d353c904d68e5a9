// Pokédex Favorites - Web Server
// Serves the view model as JSON plus a static page that draws it

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use pokedex_favorites::{
    init_logging, Action, App, CatalogClient, Config, EntityId, FavoritesStore, ViewModel,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pokedex-server", version, about = "Serve the Pokédex favorites page")]
struct ServerArgs {
    #[command(flatten)]
    config: Config,

    /// Listen address
    #[arg(long, env = "POKEDEX_BIND", default_value = "127.0.0.1:3000")]
    bind: String,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    app: Arc<Mutex<App>>,
    client: Arc<CatalogClient>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Catalog fetch failed; the page offers a retry
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retry: bool,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
            retry: false,
        }
    }
}

/// View response: the view model plus the last failure, if any
fn view_response(app: &App, view: ViewModel) -> Json<ApiResponse<ViewModel>> {
    Json(ApiResponse {
        success: app.last_error().is_none(),
        data: view,
        error: app.last_error().map(str::to_string),
        retry: app.fetch_error().is_some(),
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/view - Current view model
async fn get_view(State(state): State<AppState>) -> impl IntoResponse {
    let app = state.app.lock().await;
    let view = app.view();
    view_response(&app, view)
}

/// POST /api/favorites/:id/toggle - Favorite or unfavorite one entity
async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> impl IntoResponse {
    let mut app = state.app.lock().await;

    if app.partition().side_of(id).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse {
                success: false,
                data: app.view(),
                error: Some(format!("Unknown entity: {}", id)),
                retry: app.fetch_error().is_some(),
            }),
        )
            .into_response();
    }

    let view = app.dispatch(Action::ToggleFavorite(id));
    (StatusCode::OK, view_response(&app, view)).into_response()
}

/// POST /api/sort/toggle - Flip sort direction
async fn toggle_sort(State(state): State<AppState>) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    let view = app.dispatch(Action::ToggleSort);
    view_response(&app, view)
}

/// POST /api/reset - Clear favorites
async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    let view = app.dispatch(Action::Reset);
    view_response(&app, view)
}

/// POST /api/retry - Fetch the catalog again
async fn retry(State(state): State<AppState>) -> impl IntoResponse {
    // Fetch without holding the lock
    let result = state.client.fetch_catalog().await;

    let mut app = state.app.lock().await;
    app.apply_fetch(result);
    let view = app.view();
    view_response(&app, view)
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/view", get(get_view))
        .route("/favorites/:id/toggle", post(toggle_favorite))
        .route("/sort/toggle", post(toggle_sort))
        .route("/reset", post(reset))
        .route("/retry", post(retry))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let ServerArgs { config, bind } = ServerArgs::parse();
    init_logging(None)?;

    let db_path = config.resolved_db_path();
    let store = FavoritesStore::open(&db_path)?;
    info!(path = ?db_path, "favorites database opened");

    let client = CatalogClient::new(&config.api_url, config.limit)?;

    // A failed fetch is logged and the page starts empty (retry via /api/retry)
    let mut app = App::new(store);
    app.apply_fetch(client.fetch_catalog().await);

    let state = AppState {
        app: Arc::new(Mutex::new(app)),
        client: Arc::new(client),
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    info!(addr = %bind, "server running");
    println!("Server running on http://{}", bind);
    println!("   Press Ctrl+C to stop");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
