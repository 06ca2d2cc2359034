//! In-process configuration store.
//!
//! Mirrors the trainer's contract (list everything, upsert one document by
//! `Name`) without a network hop. Used by tests and by `orcaweb serve
//! --memory` for local work without a trainer.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::client::ConfigStore;
use crate::error::StateResult;
use crate::types::Application;

/// Shared in-memory list of application documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    applications: Arc<RwLock<Vec<Application>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing documents.
    pub fn with_applications(applications: Vec<Application>) -> Self {
        Self {
            applications: Arc::new(RwLock::new(applications)),
        }
    }

    /// Copy of every stored document, in insertion order.
    pub async fn snapshot(&self) -> Vec<Application> {
        self.applications.read().await.clone()
    }
}

impl ConfigStore for MemoryStore {
    async fn list_applications(&self) -> StateResult<Vec<Application>> {
        Ok(self.snapshot().await)
    }

    async fn put_application(&self, app: &Application) -> StateResult<()> {
        let mut applications = self.applications.write().await;
        match applications.iter_mut().find(|existing| existing.name == app.name) {
            Some(existing) => *existing = app.clone(),
            None => applications.push(app.clone()),
        }
        debug!(name = %app.name, "application stored in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_replaces_by_name() {
        let store = MemoryStore::new();
        store.put_application(&Application::new("a")).await.unwrap();
        store.put_application(&Application::new("b")).await.unwrap();

        let mut updated = Application::new("a");
        updated.min = Some(2);
        store.put_application(&updated).await.unwrap();

        let all = store.list_applications().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].min, Some(2));
    }

    #[tokio::test]
    async fn get_application_matches_exact_name() {
        let store = MemoryStore::with_applications(vec![
            Application::new("svc"),
            Application::new("svc-canary"),
        ]);

        let found = store.get_application("svc").await.unwrap();
        assert_eq!(found.map(|app| app.name), Some("svc".to_string()));
        assert!(store.get_application("sv").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_application_returns_first_duplicate() {
        let mut first = Application::new("svc");
        first.min = Some(1);
        let mut second = Application::new("svc");
        second.min = Some(2);
        let store =
            MemoryStore::with_applications(vec![Application::new("other"), first, second]);

        let found = store.get_application("svc").await.unwrap().unwrap();
        assert_eq!(found.min, Some(1));
    }
}
