//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU64, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "kiosk-admin";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_STATE_FILE: &str = "kiosk-admin-state.toml";
const DEFAULT_ROW_HEIGHT: f64 = 48.0;
const DEFAULT_TOAST_TIMEOUT_MS: u64 = 3000;

/// Command-line arguments for the kiosk admin console.
#[derive(Debug, Parser)]
#[command(
    name = "kiosk-admin",
    version,
    about = "Headless admin console for the kiosk content backend"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "KIOSK_ADMIN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the interactive console over stdin.
    Console(ConsoleArgs),
    /// Persist a new order for a reorderable list in one call.
    Reorder(ReorderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ConsoleArgs {
    /// Route to open instead of the last visited one (e.g. `#/buttons` or `pages`).
    #[arg(long, value_name = "ROUTE")]
    pub route: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ReorderArgs {
    /// List to reorder (`buttons` or `groups`).
    pub list: String,
    /// Item ids in their new order; positions are assigned 1..N.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the backend base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the admin access token.
    #[arg(long = "api-token", value_name = "TOKEN", global = true)]
    pub api_token: Option<String>,

    /// Override the request timeout.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

    /// Override the file holding the last visited route.
    #[arg(long = "state-file", value_name = "PATH", global = true)]
    pub state_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub state: StateSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StateSettings {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct UiSettings {
    /// Height of one rendered list row, used for drag hit testing.
    pub row_height: f64,
    pub toast_timeout: Duration,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            toast_timeout: Duration::from_millis(DEFAULT_TOAST_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("KIOSK_ADMIN").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_global_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    state: RawStateSettings,
    logging: RawLoggingSettings,
    ui: RawUiSettings,
}

impl RawSettings {
    fn apply_global_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(token) = overrides.api_token.as_ref() {
            self.api.token = Some(token.clone());
        }
        if let Some(seconds) = overrides.api_timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(path) = overrides.state_file.as_ref() {
            self.state.file = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            state,
            logging,
            ui,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            state: build_state_settings(state),
            logging: build_logging_settings(logging)?,
            ui: build_ui_settings(ui)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let mut base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("invalid url: {err}")))?;
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    let token = api.token.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let timeout = non_zero_u64(
        api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
        "api.timeout_seconds",
    )?;

    Ok(ApiSettings {
        base_url,
        token,
        timeout: Duration::from_secs(timeout.get()),
    })
}

fn build_state_settings(state: RawStateSettings) -> StateSettings {
    StateSettings {
        file: state
            .file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_ui_settings(ui: RawUiSettings) -> Result<UiSettings, LoadError> {
    let row_height = ui.row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
    if !row_height.is_finite() || row_height <= 0.0 {
        return Err(LoadError::invalid(
            "ui.row_height",
            "must be a positive number",
        ));
    }
    let toast_timeout = non_zero_u64(
        ui.toast_timeout_ms.unwrap_or(DEFAULT_TOAST_TIMEOUT_MS),
        "ui.toast_timeout_ms",
    )?;

    Ok(UiSettings {
        row_height,
        toast_timeout: Duration::from_millis(toast_timeout.get()),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStateSettings {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUiSettings {
    row_height: Option<f64>,
    toast_timeout_ms: Option<u64>,
}

fn non_zero_u64(value: u64, key: &'static str) -> Result<NonZeroU64, LoadError> {
    NonZeroU64::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
