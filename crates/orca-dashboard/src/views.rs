//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings so templates stay simple.

use orca_state::{Application, CollectionKind, SubResource};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Longest argument text shown inline before it is cut.
const ARGS_PREVIEW_CHARS: usize = 60;

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `value` for use as one URL path segment.
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Link to an application's detail page.
pub fn application_href(name: &str) -> String {
    format!("/application/{}", path_segment(name))
}

// ── Application list ────────────────────────────────────────────

pub struct ApplicationRow {
    pub name: String,
    pub href: String,
    pub kind_display: String,
    pub bounds_display: String,
    pub files: usize,
    pub health_checks: usize,
    pub install_commands: usize,
    pub remove_commands: usize,
}

impl ApplicationRow {
    pub fn from_application(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            href: application_href(&app.name),
            kind_display: kind_display(app),
            bounds_display: bounds_display(app),
            files: app.install_files.len(),
            health_checks: app.query_state_command.len(),
            install_commands: app.install_commands.len(),
            remove_commands: app.remove_command.len(),
        }
    }
}

// ── Application detail ──────────────────────────────────────────

pub struct ApplicationView {
    pub name: String,
    pub href: String,
    pub kind: String,
    pub kind_display: String,
    pub min: String,
    pub max: String,
    pub bounds_display: String,
    pub collections: Vec<CollectionView>,
}

impl ApplicationView {
    pub fn from_application(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            href: application_href(&app.name),
            kind: app.kind.clone().unwrap_or_default(),
            kind_display: kind_display(app),
            min: app.min.map(|v| v.to_string()).unwrap_or_default(),
            max: app.max.map(|v| v.to_string()).unwrap_or_default(),
            bounds_display: bounds_display(app),
            collections: CollectionKind::ALL
                .into_iter()
                .map(|kind| CollectionView::from_application(app, kind))
                .collect(),
        }
    }
}

pub struct CollectionView {
    pub segment: &'static str,
    pub label: &'static str,
    pub default_type: &'static str,
    /// Form field names; files take a name and contents.
    pub path_field: &'static str,
    pub args_field: &'static str,
    pub path_label: &'static str,
    pub args_label: &'static str,
    pub entries: Vec<SubResourceView>,
}

impl CollectionView {
    pub fn from_application(app: &Application, kind: CollectionKind) -> Self {
        let is_file = kind == CollectionKind::InstallFiles;
        Self {
            segment: kind.route_segment(),
            label: kind.label(),
            default_type: kind.default_type().as_str(),
            path_field: if is_file { "name" } else { "path" },
            args_field: if is_file { "contents" } else { "args" },
            path_label: if is_file { "Destination path" } else { "Executable" },
            args_label: if is_file { "Contents" } else { "Arguments" },
            entries: app
                .collection(kind)
                .iter()
                .map(SubResourceView::from_sub_resource)
                .collect(),
        }
    }
}

pub struct SubResourceView {
    pub id: String,
    /// `id` encoded for the entry's URL.
    pub id_segment: String,
    pub kind: &'static str,
    pub path: String,
    pub args: String,
    pub args_preview: String,
    pub multiline: bool,
}

impl SubResourceView {
    pub fn from_sub_resource(entry: &SubResource) -> Self {
        let args = &entry.command.args;
        Self {
            id: entry.id.clone(),
            id_segment: path_segment(&entry.id),
            kind: entry.kind.as_str(),
            path: entry.command.path.clone(),
            args: args.clone(),
            args_preview: preview(args, ARGS_PREVIEW_CHARS),
            multiline: args.contains('\n'),
        }
    }
}

// ── Formatting ──────────────────────────────────────────────────

fn kind_display(app: &Application) -> String {
    match app.kind.as_deref() {
        Some(kind) if !kind.is_empty() => kind.to_string(),
        _ => "—".to_string(),
    }
}

fn bounds_display(app: &Application) -> String {
    match (app.min, app.max) {
        (Some(min), Some(max)) => format!("{min}–{max}"),
        (Some(min), None) => format!("≥ {min}"),
        (None, Some(max)) => format!("≤ {max}"),
        (None, None) => "unset".to_string(),
    }
}

/// First line of `text`, cut to `max_chars` characters.
fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(max_chars).collect();
    if first_line.chars().count() > max_chars || text.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}
