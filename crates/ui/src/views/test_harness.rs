use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use phrasebook_core::model::PackUrl;
use services::{
    ClientConfig, FetchError, LoadGate, PackClient, PackTransport, ProgressStore, StudyService,
};
use storage::repository::Storage;
use url::Url;

use crate::context::{UiApp, build_app_context};
use crate::views::StudyView;
use crate::views::study::StudyTestHandles;

pub const BASE: &str = "https://packs.example.org/";

pub const MANIFEST: &str = r#"{"packs": [
    {"url": "packs/a1-core.json", "name": "A1 Core"},
    {"url": "packs/a2-travel.json", "name": "A2 Travel"}
]}"#;

pub const A1_CORE: &str = r#"{
    "id": "a1-core",
    "name": "A1 Core",
    "language": "Norwegian Bokmål",
    "items": [
        {"id": "a1-0001", "no": "Hei", "en": "Hi"},
        {"id": "a1-0002", "no": "Takk", "en": "Thanks", "pron": "tahk",
         "tokens": [{"no": "Takk", "en": "Thanks"}]},
        {"id": "a1-0003", "no": "God morgen", "en": "Good morning"}
    ]
}"#;

pub const A2_TRAVEL: &str = r#"{
    "id": "a2-travel",
    "name": "A2 Travel",
    "language": "Norwegian Bokmål",
    "items": [
        {"id": "a2-0001", "no": "Billett", "en": "Ticket"},
        {"id": "a2-0002", "no": "Hvor er toget?", "en": "Where is the train?"}
    ]
}"#;

#[derive(Default)]
pub struct StaticTransport {
    bodies: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl StaticTransport {
    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(format!("{BASE}{path}"), body.to_string());
        self
    }

    /// Hold the response for `path` back by `delay`.
    pub fn delayed(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(format!("{BASE}{path}"), delay);
        self
    }
}

#[async_trait::async_trait]
impl PackTransport for StaticTransport {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.bodies
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::InvalidUrl {
                raw: url.to_string(),
                reason: "not found".to_string(),
            })
    }
}

pub fn full_transport() -> StaticTransport {
    StaticTransport::default()
        .with("packs/manifest.json", MANIFEST)
        .with("packs/a1-core.json", A1_CORE)
}

#[derive(Clone)]
struct TestApp {
    study: Arc<StudyService>,
    load_gate: LoadGate,
}

impl UiApp for TestApp {
    fn study(&self) -> Arc<StudyService> {
        Arc::clone(&self.study)
    }

    fn load_gate(&self) -> LoadGate {
        self.load_gate.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: StudyTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn StudyHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { StudyView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub handles: StudyTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    /// Keep polling the DOM until `total` has elapsed.
    pub async fn drive_for(&mut self, total: Duration) {
        let deadline = tokio::time::Instant::now() + total;
        while tokio::time::Instant::now() < deadline {
            let step = (tokio::time::Instant::now() + Duration::from_millis(50)).min(deadline);
            let _ = tokio::time::timeout_at(step, self.dom.wait_for_work()).await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Run `f` inside the root scope so signals and callbacks can be used.
    pub fn in_runtime<T>(&self, f: impl FnOnce() -> T) -> T {
        self.dom.in_runtime(f)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_study_harness(transport: StaticTransport) -> ViewHarness {
    setup_study_harness_with_storage(transport, Storage::in_memory())
}

pub fn setup_study_harness_with_storage(
    transport: StaticTransport,
    storage: Storage,
) -> ViewHarness {
    let config = ClientConfig::new(
        Url::parse(BASE).expect("valid base"),
        PackUrl::new("packs/manifest.json"),
    )
    .expect("valid config");
    let packs = PackClient::new(config, Arc::new(transport), Arc::clone(&storage.session));
    let progress = ProgressStore::new(Arc::clone(&storage.local));
    let app = Arc::new(TestApp {
        study: Arc::new(StudyService::new(packs, progress)),
        load_gate: LoadGate::new(),
    });
    let handles = StudyTestHandles::default();

    let dom = VirtualDom::new_with_props(
        StudyHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        handles,
    }
}
