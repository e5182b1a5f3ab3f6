use std::sync::Arc;

use services::{LoadGate, StudyService};

pub trait UiApp: Send + Sync {
    fn study(&self) -> Arc<StudyService>;
    fn load_gate(&self) -> LoadGate;
}

#[derive(Clone)]
pub struct AppContext {
    study: Arc<StudyService>,
    load_gate: LoadGate,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            study: app.study(),
            load_gate: app.load_gate(),
        }
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
