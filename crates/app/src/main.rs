mod logging;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use phrasebook_core::model::PackUrl;
use services::config::parse_base_url;
use services::{AppServices, ClientConfig, LoadGate, StudyService};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://phrasebook.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    EmptyValue { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::EmptyValue { flag } => write!(f, "{flag} cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    let value = args.next().ok_or(ArgsError::MissingValue { flag })?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyValue { flag });
    }
    Ok(value)
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn study(&self) -> Arc<StudyService> {
        self.services.study()
    }

    fn load_gate(&self) -> LoadGate {
        self.services.load_gate()
    }
}

/// Command-line overrides on top of the `PHRASEBOOK_*` environment.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    db_url: Option<String>,
    manifest: Option<String>,
    base_url: Option<String>,
    debug: bool,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--manifest <url>] [--base-url <url>] [--debug]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --manifest {}", services::config::DEFAULT_MANIFEST);
    eprintln!("  --base-url <current directory>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PHRASEBOOK_DB_URL, PHRASEBOOK_MANIFEST_URL, PHRASEBOOK_BASE_URL, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => parsed.db_url = Some(require_value(args, "--db")?),
                "--manifest" => parsed.manifest = Some(require_value(args, "--manifest")?),
                "--base-url" => parsed.base_url = Some(require_value(args, "--base-url")?),
                "--debug" => parsed.debug = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn db_url(&self) -> String {
        self.db_url
            .clone()
            .or_else(|| {
                std::env::var("PHRASEBOOK_DB_URL")
                    .ok()
                    .filter(|raw| !raw.trim().is_empty())
            })
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url)
    }

    fn client_config(&self) -> Result<ClientConfig, Box<dyn std::error::Error>> {
        let mut config = ClientConfig::from_env()?;
        if let Some(raw) = &self.base_url {
            config = config.with_base_url(parse_base_url(raw)?);
        }
        if let Some(raw) = &self.manifest {
            config = config.with_manifest(PackUrl::new(raw.as_str()))?;
        }
        Ok(config)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if parsed.help {
        print_usage();
        return Ok(());
    }

    logging::setup_logging(parsed.debug);

    let config = parsed.client_config()?;
    let db_url = parsed.db_url();
    tracing::info!(
        manifest = %config.manifest(),
        base_url = %config.base_url(),
        db = %db_url,
        "starting phrasebook"
    );

    // Open + migrate SQLite at startup so core/services stay storage-agnostic.
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, config).await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Phrasebook")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
