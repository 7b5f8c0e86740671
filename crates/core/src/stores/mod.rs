//! Application stores.
//!
//! The service only talks to the [`ApplicationStore`] trait. Two implementations
//! are provided:
//! - [`InMemoryStore`] keeps applications for the life of the process.
//! - [`FileStore`] writes one YAML file per application under a sharded directory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use crate::application::Application;
use crate::PetsResult;
use async_trait::async_trait;
use pets_uuid::ApplicationId;

/// Storage for screening applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Stores a new application.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::InvalidInput` if an application with the same id exists.
    async fn create(&self, application: &Application) -> PetsResult<()>;

    /// Loads an application, or `None` if it does not exist.
    async fn get(&self, id: ApplicationId) -> PetsResult<Option<Application>>;

    /// Replaces a stored application.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::ApplicationNotFound` if it was never created.
    async fn put(&self, application: &Application) -> PetsResult<()>;

    /// All stored applications, oldest first.
    async fn list(&self) -> PetsResult<Vec<Application>>;
}
