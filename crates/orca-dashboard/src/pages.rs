//! Dashboard page handlers.
//!
//! Each handler reads through the repository, builds view types, and
//! renders an Askama template.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::warn;

use orca_state::{ConfigStore, StateError};

use crate::DashboardState;
use crate::views::*;

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Errors ──────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

/// Render an error page with the given status.
pub(crate) fn error_page(status: StatusCode, message: &str) -> Response {
    let page = render(ErrorTemplate {
        status: status.as_u16(),
        message: message.to_string(),
    });
    (status, page).into_response()
}

/// Map a repository failure to an error page.
///
/// A missing record is a 404; anything that went wrong talking to the
/// trainer is a 502.
pub(crate) fn state_error_page(err: &StateError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        warn!(error = %err, "trainer request failed");
        StatusCode::BAD_GATEWAY
    };
    error_page(status, &err.to_string())
}

// ── Application list ────────────────────────────────────────────

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    applications: Vec<ApplicationRow>,
}

pub async fn dashboard<S: ConfigStore>(State(state): State<DashboardState<S>>) -> Response {
    match state.repo.list().await {
        Ok(applications) => {
            let applications = applications
                .iter()
                .map(ApplicationRow::from_application)
                .collect();
            render(DashboardTemplate { applications }).into_response()
        }
        Err(e) => state_error_page(&e),
    }
}

// ── Application detail ──────────────────────────────────────────

#[derive(Template)]
#[template(path = "application.html")]
struct ApplicationTemplate {
    application: ApplicationView,
}

pub async fn application_detail<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path(name): Path<String>,
) -> Response {
    match state.repo.get(&name).await {
        Ok(Some(app)) => render(ApplicationTemplate {
            application: ApplicationView::from_application(&app),
        })
        .into_response(),
        Ok(None) => error_page(
            StatusCode::NOT_FOUND,
            &format!("application {name} not found"),
        ),
        Err(e) => state_error_page(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use orca_state::{Application, CollectionKind, CommandPatch, MemoryStore};

    fn test_state(apps: Vec<Application>) -> DashboardState<MemoryStore> {
        DashboardState::new(MemoryStore::with_applications(apps))
    }

    async fn body_text(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dashboard_lists_applications() {
        let state = test_state(vec![Application::new("web"), Application::new("db")]);
        let resp = dashboard(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_text(resp).await;
        assert!(html.contains("/application/web"));
        assert!(html.contains("/application/db"));
    }

    #[tokio::test]
    async fn dashboard_empty_store() {
        let resp = dashboard(State(test_state(vec![]))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("No applications"));
    }

    #[tokio::test]
    async fn detail_renders_sub_resources() {
        let mut app = Application::new("web");
        app.upsert(
            CollectionKind::HealthChecks,
            Some("h1"),
            CommandPatch::new("/usr/bin/curl", "-f http://localhost/healthz"),
            CollectionKind::HealthChecks.default_type(),
        );
        let resp = application_detail(State(test_state(vec![app])), Path("web".to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_text(resp).await;
        assert!(html.contains("/application/web/healthchecks/h1"));
        assert!(html.contains("/usr/bin/curl"));
    }

    #[tokio::test]
    async fn detail_escapes_user_content() {
        let mut app = Application::new("web");
        app.upsert(
            CollectionKind::InstallCommands,
            Some("i1"),
            CommandPatch::new("/bin/sh", "<script>alert(1)</script>"),
            CollectionKind::InstallCommands.default_type(),
        );
        let resp = application_detail(State(test_state(vec![app])), Path("web".to_string())).await;

        let html = body_text(resp).await;
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[tokio::test]
    async fn detail_missing_application() {
        let resp = application_detail(State(test_state(vec![])), Path("nope".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
