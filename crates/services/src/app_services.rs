use std::sync::Arc;

use storage::repository::Storage;

use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::load_gate::LoadGate;
use crate::pack_client::PackClient;
use crate::progress_store::ProgressStore;
use crate::study_service::StudyService;

/// Assembles app-facing services from a storage backend.
#[derive(Clone)]
pub struct AppServices {
    study: Arc<StudyService>,
    load_gate: LoadGate,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, config: ClientConfig) -> Self {
        let packs = PackClient::http(config, Arc::clone(&storage.session));
        let progress = ProgressStore::new(Arc::clone(&storage.local));
        Self::from_parts(StudyService::new(packs, progress))
    }

    #[must_use]
    pub fn from_parts(study: StudyService) -> Self {
        Self {
            study: Arc::new(study),
            load_gate: LoadGate::new(),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, config: ClientConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, config))
    }

    #[must_use]
    pub fn study(&self) -> Arc<StudyService> {
        Arc::clone(&self.study)
    }

    #[must_use]
    pub fn load_gate(&self) -> LoadGate {
        self.load_gate.clone()
    }
}
