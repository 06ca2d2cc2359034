//! Sub-resource collections and the upsert/delete rules over them.
//!
//! An application carries four parallel lists of [`SubResource`]. The same
//! find / upsert / delete logic applies to all of them; [`CollectionKind`]
//! selects which list an operation targets.
//!
//! Collections are small and human-authored, so every lookup is a linear
//! scan. The trainer does not enforce `Id` uniqueness, so [`Application::upsert`]
//! does it on write.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::types::{Application, CommandPatch, CommandType, SubResource};

/// Selects one of the four sub-resource collections of an [`Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `InstallFiles`
    InstallFiles,
    /// `QueryStateCommand`
    HealthChecks,
    /// `InstallCommands`
    InstallCommands,
    /// `RemoveCommand`
    RemoveCommands,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::InstallFiles,
        CollectionKind::HealthChecks,
        CollectionKind::InstallCommands,
        CollectionKind::RemoveCommands,
    ];

    /// URL path segment naming this collection.
    pub fn route_segment(self) -> &'static str {
        match self {
            CollectionKind::InstallFiles => "files",
            CollectionKind::HealthChecks => "healthchecks",
            CollectionKind::InstallCommands => "installcommands",
            CollectionKind::RemoveCommands => "removecommands",
        }
    }

    /// Human-readable heading.
    pub fn label(self) -> &'static str {
        match self {
            CollectionKind::InstallFiles => "Install files",
            CollectionKind::HealthChecks => "Health checks",
            CollectionKind::InstallCommands => "Install commands",
            CollectionKind::RemoveCommands => "Remove commands",
        }
    }

    /// `Type` given to entries written into this collection.
    pub fn default_type(self) -> CommandType {
        match self {
            CollectionKind::InstallFiles => CommandType::FileCommand,
            _ => CommandType::ExecCommand,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_segment())
    }
}

/// Error returned when a path segment names no collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl FromStr for CollectionKind {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionKind::ALL
            .into_iter()
            .find(|kind| kind.route_segment() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

/// Generate a fresh sub-resource identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Application {
    /// Borrow the selected collection.
    pub fn collection(&self, kind: CollectionKind) -> &[SubResource] {
        match kind {
            CollectionKind::InstallFiles => &self.install_files,
            CollectionKind::HealthChecks => &self.query_state_command,
            CollectionKind::InstallCommands => &self.install_commands,
            CollectionKind::RemoveCommands => &self.remove_command,
        }
    }

    /// Mutably borrow the selected collection.
    pub fn collection_mut(&mut self, kind: CollectionKind) -> &mut Vec<SubResource> {
        match kind {
            CollectionKind::InstallFiles => &mut self.install_files,
            CollectionKind::HealthChecks => &mut self.query_state_command,
            CollectionKind::InstallCommands => &mut self.install_commands,
            CollectionKind::RemoveCommands => &mut self.remove_command,
        }
    }

    /// Find the entry with the given id in the selected collection.
    pub fn find(&self, kind: CollectionKind, id: &str) -> Option<&SubResource> {
        self.collection(kind).iter().find(|entry| entry.id == id)
    }

    /// Update-if-present-else-insert, keyed by `id`.
    ///
    /// An empty or absent `id` gets a freshly generated one. On a match the
    /// entry's path and args are replaced and its `Type` is reset to
    /// `default_type` (overwrite, not merge); further entries carrying the
    /// same id are dropped. On a miss a new entry is appended.
    ///
    /// Only the in-memory record changes; persisting it is up to the caller.
    pub fn upsert(
        &mut self,
        kind: CollectionKind,
        id: Option<&str>,
        patch: CommandPatch,
        default_type: CommandType,
    ) -> &SubResource {
        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_id(),
        };

        let collection = self.collection_mut(kind);
        let index = match collection.iter().position(|entry| entry.id == id) {
            Some(first) => {
                let entry = &mut collection[first];
                entry.kind = default_type;
                entry.command = patch.into();

                let mut seen = 0usize;
                collection.retain(|entry| {
                    if entry.id != id {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
                first
            }
            None => {
                collection.push(SubResource {
                    id,
                    kind: default_type,
                    command: patch.into(),
                });
                collection.len() - 1
            }
        };

        &collection[index]
    }

    /// Remove every entry with the given id from the selected collection.
    ///
    /// Returns whether anything was removed. A missing id leaves the
    /// collection untouched.
    pub fn delete(&mut self, kind: CollectionKind, id: &str) -> bool {
        let collection = self.collection_mut(kind);
        let before = collection.len();
        collection.retain(|entry| entry.id != id);
        collection.len() != before
    }
}
