//! orca-dashboard — server-rendered web UI for Orca.
//!
//! Renders the application list and detail pages with Askama templates and
//! handles the form posts that edit an application's configuration. Every
//! mutation goes through [`ApplicationRepository`], which rewrites the whole
//! application document on the trainer.
//!
//! # Routes
//!
//! | Method | Route | Handler |
//! |---|---|---|
//! | GET | `/` | Application list |
//! | POST | `/application` | Create application |
//! | GET | `/application/{name}` | Application detail |
//! | POST | `/application/{name}` | Update type and scaling bounds |
//! | POST | `/application/{name}/{kind}` | Add sub-resource (generated id) |
//! | POST | `/application/{name}/{kind}/{id}` | Upsert sub-resource |
//! | GET | `/application/{name}/{kind}/{id}` | Sub-resource as JSON |
//! | DELETE | `/application/{name}/{kind}/{id}` | Delete sub-resource |
//!
//! `kind` is one of `files`, `healthchecks`, `installcommands`,
//! `removecommands`.

pub mod actions;
pub mod pages;
pub mod views;

use axum::Router;
use axum::routing::{get, post};
use orca_state::{ApplicationRepository, ConfigStore};

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState<S> {
    pub repo: ApplicationRepository<S>,
}

impl<S: ConfigStore> DashboardState<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: ApplicationRepository::new(store),
        }
    }
}

/// Build the dashboard router.
pub fn dashboard_router<S: ConfigStore>(state: DashboardState<S>) -> Router {
    Router::new()
        .route("/", get(pages::dashboard::<S>))
        .route("/application", post(actions::create_application::<S>))
        .route(
            "/application/{name}",
            get(pages::application_detail::<S>).post(actions::update_scaling::<S>),
        )
        .route(
            "/application/{name}/{kind}",
            post(actions::add_sub_resource::<S>),
        )
        .route(
            "/application/{name}/{kind}/{id}",
            get(actions::get_sub_resource::<S>)
                .post(actions::set_sub_resource::<S>)
                .delete(actions::delete_sub_resource::<S>),
        )
        .with_state(state)
}
