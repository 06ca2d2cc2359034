//! Dashboard action endpoints.
//!
//! Form handlers that edit an application's configuration and redirect
//! back to its detail page. Each one is a full read → mutate → write of the
//! application document; concurrent edits of the same application are not
//! serialized and the last write wins.

use axum::Json;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use orca_state::{CollectionKind, CommandPatch, ConfigStore};

use crate::DashboardState;
use crate::pages::{error_page, state_error_page};
use crate::views::application_href;

fn detail_redirect(name: &str) -> Response {
    Redirect::to(&application_href(name)).into_response()
}

fn parse_kind(kind: &str) -> Result<CollectionKind, Response> {
    kind.parse::<CollectionKind>()
        .map_err(|e| error_page(StatusCode::NOT_FOUND, &e.to_string()))
}

// ── Create ──────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
pub struct CreateForm {
    pub name: String,
}

pub async fn create_application<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Form(form): Form<CreateForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() || name.chars().any(|c| c == '/' || c.is_control()) {
        return error_page(
            StatusCode::BAD_REQUEST,
            "application name is required and may not contain '/' or control characters",
        );
    }

    match state.repo.create(name).await {
        Ok(app) => detail_redirect(&app.name),
        Err(e) => state_error_page(&e),
    }
}

// ── Scaling ─────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
pub struct ScalingForm {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Min")]
    pub min: u32,
    #[serde(rename = "Max")]
    pub max: u32,
}

pub async fn update_scaling<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path(name): Path<String>,
    Form(form): Form<ScalingForm>,
) -> Response {
    match state
        .repo
        .update_scaling(&name, &form.kind, form.min, form.max)
        .await
    {
        Ok(_) => detail_redirect(&name),
        Err(e) => state_error_page(&e),
    }
}

// ── Sub-resources ───────────────────────────────────────────────

/// Sub-resource edit form.
///
/// File entries are posted as `name`/`contents`, commands as
/// `path`/`args`; either spelling is accepted for every collection.
#[derive(serde::Deserialize, Default)]
pub struct SubResourceForm {
    pub path: Option<String>,
    pub name: Option<String>,
    pub args: Option<String>,
    pub contents: Option<String>,
}

impl SubResourceForm {
    pub fn into_patch(self) -> CommandPatch {
        CommandPatch::new(
            self.path.or(self.name).unwrap_or_default(),
            self.args.or(self.contents).unwrap_or_default(),
        )
    }
}

async fn upsert<S: ConfigStore>(
    state: &DashboardState<S>,
    name: &str,
    kind: &str,
    id: Option<&str>,
    form: SubResourceForm,
) -> Response {
    let kind = match parse_kind(kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };

    match state
        .repo
        .upsert_sub_resource(name, kind, id, form.into_patch())
        .await
    {
        Ok(_) => detail_redirect(name),
        Err(e) => state_error_page(&e),
    }
}

/// POST /application/{name}/{kind} — add an entry under a generated id.
pub async fn add_sub_resource<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path((name, kind)): Path<(String, String)>,
    Form(form): Form<SubResourceForm>,
) -> Response {
    upsert(&state, &name, &kind, None, form).await
}

/// POST /application/{name}/{kind}/{id} — update the entry, or create it
/// under that id.
pub async fn set_sub_resource<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path((name, kind, id)): Path<(String, String, String)>,
    Form(form): Form<SubResourceForm>,
) -> Response {
    upsert(&state, &name, &kind, Some(&id), form).await
}

/// GET /application/{name}/{kind}/{id} — the entry as JSON.
///
/// A missing application or entry answers 404 with an empty body.
pub async fn get_sub_resource<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path((name, kind, id)): Path<(String, String, String)>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };

    match state.repo.find_sub_resource(&name, kind, &id).await {
        Ok(Some(entry)) => Json(entry).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) if e.is_not_found() => StatusCode::NOT_FOUND.into_response(),
        Err(e) => state_error_page(&e),
    }
}

/// DELETE /application/{name}/{kind}/{id}
///
/// Deleting an id that does not exist succeeds without changing anything.
pub async fn delete_sub_resource<S: ConfigStore>(
    State(state): State<DashboardState<S>>,
    Path((name, kind, id)): Path<(String, String, String)>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };

    match state.repo.delete_sub_resource(&name, kind, &id).await {
        Ok(_) => {
            debug!(%name, collection = %kind, %id, "delete handled");
            StatusCode::OK.into_response()
        }
        Err(e) => state_error_page(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use orca_state::{Application, CommandType, MemoryStore, SubResource};

    fn test_state() -> DashboardState<MemoryStore> {
        DashboardState::new(MemoryStore::with_applications(vec![Application::new("svc")]))
    }

    fn location(resp: &Response) -> &str {
        resp.headers().get("location").unwrap().to_str().unwrap()
    }

    fn file_form(name: &str, contents: &str) -> SubResourceForm {
        SubResourceForm {
            name: Some(name.to_string()),
            contents: Some(contents.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_redirects_to_detail() {
        let state = DashboardState::new(MemoryStore::new());
        let resp = create_application(
            State(state.clone()),
            Form(CreateForm {
                name: "web".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/application/web");
        assert!(state.repo.get("web").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let state = DashboardState::new(MemoryStore::new());
        let resp = create_application(
            State(state.clone()),
            Form(CreateForm {
                name: "  ".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_control_characters() {
        let state = DashboardState::new(MemoryStore::new());
        let resp = create_application(
            State(state.clone()),
            Form(CreateForm {
                name: "a\nb".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn redirects_encode_reserved_characters() {
        let state = DashboardState::new(MemoryStore::new());
        let resp = create_application(
            State(state.clone()),
            Form(CreateForm {
                name: "a?b".to_string(),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/application/a%3Fb");

        let resp = add_sub_resource(
            State(state.clone()),
            Path(("a?b".to_string(), "files".to_string())),
            Form(file_form("/etc/a.conf", "")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/application/a%3Fb");

        let app = state.repo.require("a?b").await.unwrap();
        assert_eq!(app.install_files.len(), 1);
    }

    #[tokio::test]
    async fn scaling_update_redirects() {
        let state = test_state();
        let resp = update_scaling(
            State(state.clone()),
            Path("svc".to_string()),
            Form(ScalingForm {
                kind: "T".to_string(),
                min: 1,
                max: 5,
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let app = state.repo.require("svc").await.unwrap();
        assert_eq!((app.min, app.max), (Some(1), Some(5)));
    }

    #[tokio::test]
    async fn scaling_update_missing_application() {
        let state = test_state();
        let resp = update_scaling(
            State(state),
            Path("ghost".to_string()),
            Form(ScalingForm {
                kind: "T".to_string(),
                min: 1,
                max: 5,
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_file_then_get_as_json() {
        let state = test_state();
        let resp = add_sub_resource(
            State(state.clone()),
            Path(("svc".to_string(), "files".to_string())),
            Form(file_form("/etc/svc.conf", "port=8080")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let app = state.repo.require("svc").await.unwrap();
        let id = app.install_files[0].id.clone();

        let resp = get_sub_resource(
            State(state),
            Path(("svc".to_string(), "files".to_string(), id.clone())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let entry: SubResource = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.kind, CommandType::FileCommand);
        assert_eq!(entry.command.path, "/etc/svc.conf");
        assert_eq!(entry.command.args, "port=8080");
    }

    #[tokio::test]
    async fn set_with_id_creates_exec_entry() {
        let state = test_state();
        let resp = set_sub_resource(
            State(state.clone()),
            Path((
                "svc".to_string(),
                "healthchecks".to_string(),
                "h1".to_string(),
            )),
            Form(SubResourceForm {
                path: Some("/bin/check".to_string()),
                args: Some("--fast".to_string()),
                ..Default::default()
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let app = state.repo.require("svc").await.unwrap();
        let entry = app.find(CollectionKind::HealthChecks, "h1").unwrap();
        assert_eq!(entry.kind, CommandType::ExecCommand);
        assert_eq!(entry.command.args, "--fast");
    }

    #[tokio::test]
    async fn unknown_kind_is_not_found() {
        let state = test_state();
        let resp = add_sub_resource(
            State(state.clone()),
            Path(("svc".to_string(), "volumes".to_string())),
            Form(SubResourceForm::default()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            state.repo.require("svc").await.unwrap(),
            Application::new("svc")
        );
    }

    #[tokio::test]
    async fn get_missing_entry_is_empty_404() {
        let state = test_state();
        let resp = get_sub_resource(
            State(state),
            Path(("svc".to_string(), "files".to_string(), "nope".to_string())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn delete_entry_and_missing_entry() {
        let state = test_state();
        set_sub_resource(
            State(state.clone()),
            Path((
                "svc".to_string(),
                "removecommands".to_string(),
                "r1".to_string(),
            )),
            Form(SubResourceForm {
                path: Some("/bin/rm".to_string()),
                ..Default::default()
            }),
        )
        .await;

        let resp = delete_sub_resource(
            State(state.clone()),
            Path((
                "svc".to_string(),
                "removecommands".to_string(),
                "r1".to_string(),
            )),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.repo.require("svc").await.unwrap().remove_command.is_empty());

        let resp = delete_sub_resource(
            State(state),
            Path((
                "svc".to_string(),
                "removecommands".to_string(),
                "r1".to_string(),
            )),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn form_prefers_path_and_args() {
        let patch = SubResourceForm {
            path: Some("/a".to_string()),
            name: Some("/b".to_string()),
            args: None,
            contents: Some("c".to_string()),
        }
        .into_patch();
        assert_eq!(patch, CommandPatch::new("/a", "c"));
        assert_eq!(SubResourceForm::default().into_patch(), CommandPatch::default());
    }
}
