//! Domain types for application configuration documents.
//!
//! These mirror the JSON documents held by the trainer's configuration
//! store: PascalCase keys, four list-shaped sub-resource collections, and
//! whatever extra top-level keys the trainer attaches (kept verbatim so a
//! whole-record replace never drops them).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Unique name of an application; the only lookup key.
pub type ApplicationName = String;

/// Opaque identifier of a sub-resource within one collection.
pub type SubResourceId = String;

// ── Application ───────────────────────────────────────────────────

/// Deployment configuration for one application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
    pub name: ApplicationName,
    /// Deployment strategy tag. Unset until scaling is first configured.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Lower scaling bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Upper scaling bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// Files placed on the host before install.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub install_files: Vec<SubResource>,
    /// Health checks.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query_state_command: Vec<SubResource>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub install_commands: Vec<SubResource>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remove_command: Vec<SubResource>,
    /// Trainer fields this layer does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    /// A fresh application with empty collections and no scaling bounds.
    pub fn new(name: impl Into<ApplicationName>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ── Sub-resources ─────────────────────────────────────────────────

/// One file or command entry inside an application collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SubResource {
    pub id: SubResourceId,
    #[serde(rename = "Type")]
    pub kind: CommandType,
    #[serde(default)]
    pub command: Command,
}

/// Distinguishes files to place from commands to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    FileCommand,
    ExecCommand,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::FileCommand => "FILE_COMMAND",
            CommandType::ExecCommand => "EXEC_COMMAND",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path and argument payload of a sub-resource.
///
/// For `FILE_COMMAND` entries `path` is the destination file and `args`
/// its contents; for `EXEC_COMMAND` entries `path` is the executable and
/// `args` its command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Command {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub args: String,
}

/// The mutable part of a sub-resource, as supplied by an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandPatch {
    pub path: String,
    pub args: String,
}

impl CommandPatch {
    pub fn new(path: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: args.into(),
        }
    }
}

impl From<CommandPatch> for Command {
    fn from(patch: CommandPatch) -> Self {
        Command {
            path: patch.path,
            args: patch.args,
        }
    }
}

/// The trainer serializes empty collections as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SubResource>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SubResource>>::deserialize(deserializer)?.unwrap_or_default())
}
