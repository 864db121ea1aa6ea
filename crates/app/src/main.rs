mod logging;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::config::DEFAULT_APP_ID;
use services::{AppServices, ReachabilitySensor, ShellConfig, StaticLocationSensor};
use sheguard_core::model::LocationPermission;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://sheguard.sqlite3";
const DEFAULT_REACHABILITY_HOST: &str = "1.1.1.1:53";
const CHECK_INTERVAL: Duration = Duration::from_secs(5);
const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidAppId { raw: String },
    InvalidLocation { raw: String },
    InvalidReachabilityHost { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAppId { raw } => write!(f, "invalid --app-id value: {raw}"),
            ArgsError::InvalidLocation { raw } => {
                write!(f, "invalid --location value: {raw} (expected granted, denied or off)")
            }
            ArgsError::InvalidReachabilityHost { raw } => {
                write!(f, "invalid --reachability-host value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Simulated device location state for desktop builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationMode {
    Granted,
    Denied,
    Off,
}

impl LocationMode {
    fn parse(raw: &str) -> Result<Self, ArgsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "off" => Ok(Self::Off),
            _ => Err(ArgsError::InvalidLocation {
                raw: raw.to_string(),
            }),
        }
    }

    fn sensor(self) -> StaticLocationSensor {
        match self {
            Self::Granted => StaticLocationSensor::new(LocationPermission::Granted, true),
            Self::Denied => StaticLocationSensor::new(LocationPermission::Denied, true),
            Self::Off => StaticLocationSensor::new(LocationPermission::Granted, false),
        }
    }
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn app_services(&self) -> AppServices {
        self.services.clone()
    }

    fn request_exit(&self) {
        tracing::info!("exiting");
        std::process::exit(0);
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    app_id: String,
    location: LocationMode,
    reachability_host: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--app-id <id>] [--location granted|denied|off] [--reachability-host <host:port>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --app-id {DEFAULT_APP_ID}");
    eprintln!("  --location granted");
    eprintln!("  --reachability-host {DEFAULT_REACHABILITY_HOST}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SHEGUARD_DB_URL, SHEGUARD_APP_ID, SHEGUARD_LOCATION, SHEGUARD_REACHABILITY_HOST, RUST_LOG");
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Ok(Self {
            db_url: env("SHEGUARD_DB_URL")
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            app_id: env("SHEGUARD_APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.into()),
            location: env("SHEGUARD_LOCATION")
                .as_deref()
                .map_or(Ok(LocationMode::Granted), LocationMode::parse)?,
            reachability_host: env("SHEGUARD_REACHABILITY_HOST")
                .unwrap_or_else(|| DEFAULT_REACHABILITY_HOST.into()),
        })
    }

    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                "--app-id" => {
                    let value = require_value(args, "--app-id")?;
                    if value.trim().is_empty() || value.contains('/') {
                        return Err(ArgsError::InvalidAppId { raw: value });
                    }
                    self.app_id = value;
                }
                "--location" => {
                    let value = require_value(args, "--location")?;
                    self.location = LocationMode::parse(&value)?;
                }
                "--reachability-host" => {
                    let value = require_value(args, "--reachability-host")?;
                    if !value.contains(':') {
                        return Err(ArgsError::InvalidReachabilityHost { raw: value });
                    }
                    self.reachability_host = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
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
    if let Some(parent) = path.parent() {
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
    let args = Args::from_env()
        .and_then(|defaults| defaults.parse(&mut argv))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    if let Err(err) = logging::init_tracing() {
        eprintln!("tracing disabled: {err}");
    }
    tracing::info!(db = %args.db_url, app_id = %args.app_id, location = ?args.location, "starting");

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let connectivity =
        ReachabilitySensor::start(args.reachability_host, CHECK_INTERVAL, CHECK_TIMEOUT);
    let services = AppServices::new_sqlite(
        &args.db_url,
        Arc::new(args.location.sensor()),
        connectivity,
        ShellConfig::new(args.app_id),
    )
    .await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("SheGuard+")
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

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Args {
        Args {
            db_url: DEFAULT_DB_URL.into(),
            app_id: DEFAULT_APP_ID.into(),
            location: LocationMode::Granted,
            reachability_host: DEFAULT_REACHABILITY_HOST.into(),
        }
    }

    fn parse(argv: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = argv.iter().map(|s| (*s).to_string());
        defaults().parse(&mut iter)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--db",
            "sqlite:///tmp/x.sqlite3",
            "--app-id",
            "demo",
            "--location",
            "OFF",
            "--reachability-host",
            "example.com:443",
        ])
        .unwrap();
        assert_eq!(args.db_url, "sqlite:///tmp/x.sqlite3");
        assert_eq!(args.app_id, "demo");
        assert_eq!(args.location, LocationMode::Off);
        assert_eq!(args.reachability_host, "example.com:443");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--location", "maybe"]),
            Err(ArgsError::InvalidLocation { .. })
        ));
        assert!(matches!(
            parse(&["--app-id", "a/b"]),
            Err(ArgsError::InvalidAppId { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(parse(&["--wat"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/db.sqlite3".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/db.sqlite3"), "{url}");
    }
}
