use super::ApplicationStore;
use crate::application::Application;
use crate::{PetsError, PetsResult};
use async_trait::async_trait;
use pets_uuid::ApplicationId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    applications: RwLock<HashMap<ApplicationId, Application>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
    async fn create(&self, application: &Application) -> PetsResult<()> {
        let mut applications = self.applications.write().await;
        if applications.contains_key(&application.id) {
            return Err(PetsError::InvalidInput(format!(
                "application {} already exists",
                application.id
            )));
        }
        applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn get(&self, id: ApplicationId) -> PetsResult<Option<Application>> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn put(&self, application: &Application) -> PetsResult<()> {
        let mut applications = self.applications.write().await;
        match applications.get_mut(&application.id) {
            Some(stored) => {
                *stored = application.clone();
                Ok(())
            }
            None => Err(PetsError::ApplicationNotFound(application.id.to_string())),
        }
    }

    async fn list(&self) -> PetsResult<Vec<Application>> {
        let mut all: Vec<Application> = self.applications.read().await.values().cloned().collect();
        all.sort_by_key(|application| (application.created_at, application.id));
        Ok(all)
    }
}
