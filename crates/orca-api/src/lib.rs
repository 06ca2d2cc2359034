//! orca-api — HTTP surface for Orca.
//!
//! Serves a read-only JSON API over application configuration and mounts
//! the dashboard (pages and form actions) at the root.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/applications` | List all applications |
//! | GET | `/api/v1/applications/{name}` | Get one application |
//! | GET | `/api/v1/applications/{name}/{kind}` | List one sub-resource collection |
//! | GET | `/healthz` | Liveness |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use orca_dashboard::DashboardState;
use orca_state::{ApplicationRepository, ConfigStore};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState<S> {
    pub repo: ApplicationRepository<S>,
}

/// Build the complete router (JSON API + dashboard).
pub fn build_router<S: ConfigStore>(store: S) -> Router {
    let api_state = ApiState {
        repo: ApplicationRepository::new(store.clone()),
    };

    let api_routes = Router::new()
        .route("/applications", get(handlers::list_applications::<S>))
        .route("/applications/{name}", get(handlers::get_application::<S>))
        .route(
            "/applications/{name}/{kind}",
            get(handlers::list_collection::<S>),
        )
        .with_state(api_state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
        .merge(orca_dashboard::dashboard_router(DashboardState::new(store)))
}
