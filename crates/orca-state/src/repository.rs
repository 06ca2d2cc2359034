//! ApplicationRepository — application-level operations over a [`ConfigStore`].
//!
//! Every mutation reads the whole application, changes it in memory and
//! writes the whole document back. Nothing here serializes concurrent
//! writers: two overlapping read → mutate → save sequences on the same
//! application end with the last save winning, silently discarding the
//! other writer's change. The trainer offers no version token to detect it.

use tracing::{debug, info};

use crate::client::ConfigStore;
use crate::collection::CollectionKind;
use crate::error::{StateError, StateResult};
use crate::types::{Application, CommandPatch, SubResource};

/// Application configuration repository.
#[derive(Clone)]
pub struct ApplicationRepository<S> {
    store: S,
}

impl<S: ConfigStore> ApplicationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List all applications.
    pub async fn list(&self) -> StateResult<Vec<Application>> {
        self.store.list_applications().await
    }

    /// Get an application by name.
    pub async fn get(&self, name: &str) -> StateResult<Option<Application>> {
        self.store.get_application(name).await
    }

    /// Like [`get`](Self::get), but a missing application is an error.
    pub async fn require(&self, name: &str) -> StateResult<Application> {
        self.get(name)
            .await?
            .ok_or_else(|| StateError::NotFound(format!("application {name}")))
    }

    /// Persist `app` as-is, replacing whatever the store holds for its name.
    pub async fn save(&self, app: &Application) -> StateResult<()> {
        self.store.put_application(app).await
    }

    /// Create an application with empty collections and no scaling bounds.
    ///
    /// The store upserts by name, so creating a name that already exists
    /// replaces that record and discards its collections and bounds.
    pub async fn create(&self, name: &str) -> StateResult<Application> {
        let app = Application::new(name);
        self.save(&app).await?;
        info!(%name, "application created");
        Ok(app)
    }

    /// Overwrite the deployment type and scaling bounds of an application.
    pub async fn update_scaling(
        &self,
        name: &str,
        kind: &str,
        min: u32,
        max: u32,
    ) -> StateResult<Application> {
        let mut app = self.require(name).await?;
        app.kind = Some(kind.to_string());
        app.min = Some(min);
        app.max = Some(max);
        self.save(&app).await?;
        info!(%name, %kind, min, max, "scaling updated");
        Ok(app)
    }

    /// Look up one sub-resource of an application.
    pub async fn find_sub_resource(
        &self,
        name: &str,
        kind: CollectionKind,
        id: &str,
    ) -> StateResult<Option<SubResource>> {
        let app = self.require(name).await?;
        Ok(app.find(kind, id).cloned())
    }

    /// Upsert a sub-resource and persist the application.
    ///
    /// The entry's `Type` becomes the collection's default type. Returns
    /// the stored entry, including a generated id when none was given.
    pub async fn upsert_sub_resource(
        &self,
        name: &str,
        kind: CollectionKind,
        id: Option<&str>,
        patch: CommandPatch,
    ) -> StateResult<SubResource> {
        let mut app = self.require(name).await?;
        let entry = app.upsert(kind, id, patch, kind.default_type()).clone();
        self.save(&app).await?;
        info!(%name, collection = %kind, id = %entry.id, "sub-resource upserted");
        Ok(entry)
    }

    /// Remove a sub-resource and persist the application.
    ///
    /// Deleting an id that is not present still rewrites the (unchanged)
    /// application and is not an error.
    pub async fn delete_sub_resource(
        &self,
        name: &str,
        kind: CollectionKind,
        id: &str,
    ) -> StateResult<Application> {
        let mut app = self.require(name).await?;
        let removed = app.delete(kind, id);
        self.save(&app).await?;
        debug!(%name, collection = %kind, %id, removed, "sub-resource delete");
        Ok(app)
    }
}
