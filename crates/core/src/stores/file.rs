use super::ApplicationStore;
use crate::application::Application;
use crate::constants::APPLICATION_YAML_FILENAME;
use crate::{PetsError, PetsResult};
use async_trait::async_trait;
use pets_uuid::ApplicationId;
use std::fs;
use std::path::{Path, PathBuf};

/// YAML file store.
///
/// Layout:
/// ```text
/// <applications_dir>/<s1>/<s2>/<id>/application.yaml
/// ```
/// where `s1`/`s2` are the first four hex characters of the id.
#[derive(Debug, Clone)]
pub struct FileStore {
    applications_dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `applications_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::StorageDirCreation` if the directory cannot be created.
    pub fn open(applications_dir: impl Into<PathBuf>) -> PetsResult<Self> {
        let applications_dir = applications_dir.into();
        fs::create_dir_all(&applications_dir).map_err(PetsError::StorageDirCreation)?;
        Ok(Self { applications_dir })
    }

    pub fn applications_dir(&self) -> &Path {
        &self.applications_dir
    }

    fn application_file(&self, id: ApplicationId) -> PathBuf {
        id.sharded_dir(&self.applications_dir)
            .join(APPLICATION_YAML_FILENAME)
    }

    fn write(&self, application: &Application) -> PetsResult<()> {
        let path = self.application_file(application.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(PetsError::StorageDirCreation)?;
        }
        let yaml = application.to_yaml()?;
        fs::write(&path, yaml).map_err(PetsError::FileWrite)
    }

    fn read(path: &Path) -> PetsResult<Application> {
        let contents = fs::read_to_string(path).map_err(PetsError::FileRead)?;
        Application::from_yaml(&contents)
    }

    fn application_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let Ok(s1_iter) = fs::read_dir(&self.applications_dir) else {
            return files;
        };
        for s1 in s1_iter.flatten().filter(|entry| entry.path().is_dir()) {
            let Ok(s2_iter) = fs::read_dir(s1.path()) else {
                continue;
            };
            for s2 in s2_iter.flatten().filter(|entry| entry.path().is_dir()) {
                let Ok(id_iter) = fs::read_dir(s2.path()) else {
                    continue;
                };
                for id_dir in id_iter.flatten() {
                    let path = id_dir.path().join(APPLICATION_YAML_FILENAME);
                    if path.is_file() {
                        files.push(path);
                    }
                }
            }
        }
        files
    }
}

#[async_trait]
impl ApplicationStore for FileStore {
    async fn create(&self, application: &Application) -> PetsResult<()> {
        if self.application_file(application.id).exists() {
            return Err(PetsError::InvalidInput(format!(
                "application {} already exists",
                application.id
            )));
        }
        self.write(application)
    }

    async fn get(&self, id: ApplicationId) -> PetsResult<Option<Application>> {
        let path = self.application_file(id);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    async fn put(&self, application: &Application) -> PetsResult<()> {
        if !self.application_file(application.id).is_file() {
            return Err(PetsError::ApplicationNotFound(application.id.to_string()));
        }
        self.write(application)
    }

    async fn list(&self) -> PetsResult<Vec<Application>> {
        let mut applications = Vec::new();
        for path in self.application_files() {
            match Self::read(&path) {
                Ok(application) => applications.push(application),
                Err(e) => {
                    tracing::warn!("failed to parse {}: {} - {}", APPLICATION_YAML_FILENAME, path.display(), e);
                }
            }
        }
        applications.sort_by_key(|application| (application.created_at, application.id));
        Ok(applications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{FieldValue, Section, SectionKind, SectionStatus};
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_through_sharded_yaml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path().join("applications")).unwrap();

        let mut app = Application::new(ApplicationId::new(), Utc::now());
        store.create(&app).await.unwrap();

        let id = app.id.to_string();
        let expected = temp_dir
            .path()
            .join("applications")
            .join(&id[0..2])
            .join(&id[2..4])
            .join(&id)
            .join(APPLICATION_YAML_FILENAME);
        assert!(expected.is_file());

        let mut section = Section {
            status: SectionStatus::Completed,
            version: 1,
            ..Section::default()
        };
        section
            .data
            .insert("isSputumRequired".into(), FieldValue::from("No"));
        app.set_section(SectionKind::SputumDecision, section.clone());
        store.put(&app).await.unwrap();

        let loaded = store.get(app.id).await.unwrap().unwrap();
        assert_eq!(loaded.section(SectionKind::SputumDecision), section);
    }

    #[tokio::test]
    async fn test_list_skips_unparseable_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();

        let first = Application::new(ApplicationId::new(), Utc::now());
        let second = Application::new(ApplicationId::new(), Utc::now());
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();

        let broken = temp_dir.path().join("ab").join("cd").join("abcd0000000000000000000000000000");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(APPLICATION_YAML_FILENAME), "not: [valid").unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_and_put_unknown() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::open(temp_dir.path()).unwrap();
        let app = Application::new(ApplicationId::new(), Utc::now());

        assert!(store.get(app.id).await.unwrap().is_none());
        assert!(matches!(
            store.put(&app).await,
            Err(PetsError::ApplicationNotFound(_))
        ));
        store.create(&app).await.unwrap();
        assert!(store.create(&app).await.is_err());
    }
}
