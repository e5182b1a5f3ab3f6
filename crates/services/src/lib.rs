#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod load_gate;
pub mod pack_client;
pub mod progress_store;
pub mod study_service;
pub mod transport;

pub use app_services::AppServices;
pub use config::ClientConfig;
pub use error::{AppServicesError, ConfigError, FetchError, PackError};
pub use load_gate::{LoadGate, LoadTicket};
pub use pack_client::PackClient;
pub use progress_store::{ProgressStore, QueuedWrite};
pub use study_service::{Catalog, LoadedPack, StudyService};
pub use transport::{HttpTransport, PackTransport};
