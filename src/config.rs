//! Configuration management for docingest using the prefer crate.
//!
//! Precedence, lowest first: built-in defaults, config file, environment
//! (`DOCINGEST_DATA_DIR`, `HOST`, `PORT`), the `--data` flag, `DATABASE_URL`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{TextExtractor, ToolchainBackend};
use crate::repository::util::is_postgres_url;
use crate::repository::{DbContext, DbError};
use crate::services::FileProcessor;
use crate::utils::TypeDetector;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "docingest.db";

/// Default upload size cap (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("PostgreSQL is not supported ({0}); use a sqlite: URL or a file path")]
    UnsupportedDatabase(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// HTTP server section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<u64>,
}

/// Type detection section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct DetectionConfig {
    /// Sniff magic bytes before falling back to the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sniffing: Option<bool>,
}

/// Conversion tool section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct ConversionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdftotext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antiword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pandoc: Option<String>,
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
    /// Sniff magic bytes during type detection.
    pub content_sniffing: bool,
    /// pdftotext binary.
    pub pdftotext: String,
    /// antiword binary, for legacy Word documents.
    pub antiword: String,
    /// pandoc binary.
    pub pandoc: String,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/docingest/ for user data
        // Falls back gracefully: Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docingest");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES as usize,
            content_sniffing: true,
            pdftotext: "pdftotext".to_string(),
            antiword: "antiword".to_string(),
            pandoc: "pandoc".to_string(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Get the full path to the database file.
    pub fn database_path(&self) -> PathBuf {
        match self.database_url {
            Some(ref url) => PathBuf::from(url.strip_prefix("sqlite:").unwrap_or(url)),
            None => self.data_dir.join(&self.database_filename),
        }
    }

    /// Check if the database appears to be initialized.
    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Ensure the data directory and the database's parent directory exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        let db_dir = self.database_path().parent().map(Path::to_path_buf);
        for dir in std::iter::once(self.data_dir.clone()).chain(db_dir) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory '{}': {}", dir.display(), e),
                )
            })?;
        }
        Ok(())
    }

    /// Create a database context using the configured database URL or path.
    pub fn create_db_context(&self) -> Result<DbContext, DbError> {
        DbContext::from_url(&self.database_url())
    }

    /// Build the conversion toolchain from configured binaries.
    pub fn conversion_backend(&self) -> ToolchainBackend {
        ToolchainBackend::new()
            .with_pdftotext(&self.pdftotext)
            .with_antiword(&self.antiword)
            .with_pandoc(&self.pandoc)
    }

    /// Build the ingestion pipeline over a database context.
    pub fn file_processor(&self, ctx: &DbContext) -> FileProcessor {
        let extractor = TextExtractor::new(Arc::new(self.conversion_backend()));
        FileProcessor::new(ctx.file_store(), Arc::new(extractor))
            .with_detector(TypeDetector::new().with_content_sniffing(self.content_sniffing))
    }

    /// Apply environment overrides using the given lookup.
    fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(dir) = var("DOCINGEST_DATA_DIR") {
            tracing::debug!("Using DOCINGEST_DATA_DIR from environment: {}", dir);
            self.data_dir = expand_path(&dir, Path::new("."));
        }
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "PORT",
                    value: port.clone(),
                })?;
        }
        Ok(())
    }

    /// Apply `DATABASE_URL`, which takes highest precedence.
    fn apply_database_url_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            tracing::debug!("Using DATABASE_URL from environment: {}", url);
            self.database_url = Some(url);
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.database_url {
            Some(ref url) if is_postgres_url(url) => {
                Err(ConfigError::UnsupportedDatabase(url.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Full database URL (sqlite only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default)]
    #[prefer(default)]
    pub server: ServerConfig,
    #[serde(default)]
    #[prefer(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    #[prefer(default)]
    pub conversion: ConversionConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers docingest config files in standard locations.
    pub async fn load() -> Result<Self, ConfigError> {
        match prefer::load("docingest").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => {
                    tracing::debug!("Discovered config file: {}", path.display());
                    Self::load_from_path(path).await
                }
                None => Ok(Self::default()),
            },
            // No config file found, use defaults
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths (typically config file dir or CWD).
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) -> Result<(), ConfigError> {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = expand_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref url) = self.database_url {
            settings.database_url = Some(url.clone());
        }
        if let Some(ref host) = self.server.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.server.port {
            settings.port = u16::try_from(port).map_err(|_| ConfigError::InvalidValue {
                key: "server.port",
                value: port.to_string(),
            })?;
        }
        if let Some(max) = self.server.max_upload_bytes {
            settings.max_upload_bytes = max as usize;
        }
        if let Some(sniff) = self.detection.content_sniffing {
            settings.content_sniffing = sniff;
        }
        if let Some(ref bin) = self.conversion.pdftotext {
            settings.pdftotext = bin.clone();
        }
        if let Some(ref bin) = self.conversion.antiword {
            settings.antiword = bin.clone();
        }
        if let Some(ref bin) = self.conversion.pandoc {
            settings.pandoc = bin.clone();
        }
        Ok(())
    }
}

/// Resolve a path that may be relative or start with `~`.
fn expand_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory or database file (--data flag).
    pub data: Option<PathBuf>,
}

/// Split a `--data` argument into a data directory and optional database filename.
///
/// A path ending in `.db`, `.sqlite` or `.sqlite3` names the database file;
/// anything else is treated as the data directory.
fn resolve_data_path(path: &Path) -> (PathBuf, Option<String>) {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    let is_db_file = path
        .extension()
        .is_some_and(|ext| ext == "db" || ext == "sqlite" || ext == "sqlite3");

    if is_db_file {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        (dir, filename)
    } else {
        (path, None)
    }
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    // Priority 1: Explicit --config flag, Priority 2: auto-discover via prefer
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await?,
    };

    let env = |key: &str| std::env::var(key).ok();
    let settings = build_settings(&config, options.data.as_deref(), env)?;
    Ok((settings, config))
}

fn build_settings(
    config: &Config,
    data: Option<&Path>,
    env: impl Fn(&str) -> Option<String> + Copy,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    config.apply_to_settings(&mut settings, &base_dir)?;
    settings.apply_env(env)?;

    // --data override takes precedence over config and env for data_dir
    if let Some(data) = data {
        let (dir, filename) = resolve_data_path(data);
        settings.data_dir = dir;
        if let Some(filename) = filename {
            settings.database_filename = filename;
        }
    }

    settings.apply_database_url_env(env)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> + Copy {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let settings = build_settings(&Config::default(), None, env_from(&[])).unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.max_upload_bytes, 50 * 1024 * 1024);
        assert!(settings.content_sniffing);
        assert!(settings.database_url().starts_with("sqlite:"));
        assert!(settings.database_url().ends_with(DEFAULT_DATABASE_FILENAME));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            data_dir = "/srv/docingest"
            database = "files.db"

            [server]
            port = 9000

            [detection]
            content_sniffing = false

            [conversion]
            pandoc = "/opt/pandoc/bin/pandoc"
            antiword = "/usr/local/bin/antiword"
        "#;
        let config = Config::parse(toml, Path::new("docingest.toml")).unwrap();
        let settings = build_settings(&config, None, env_from(&[])).unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/srv/docingest"));
        assert_eq!(settings.database_path(), PathBuf::from("/srv/docingest/files.db"));
        assert_eq!(settings.port, 9000);
        assert!(!settings.content_sniffing);
        assert_eq!(settings.pandoc, "/opt/pandoc/bin/pandoc");
        assert_eq!(settings.pdftotext, "pdftotext");
        assert_eq!(settings.antiword, "/usr/local/bin/antiword");

        let tools: Vec<String> = settings
            .conversion_backend()
            .check_tools()
            .into_iter()
            .map(|(tool, _)| tool)
            .collect();
        assert!(tools.contains(&"/usr/local/bin/antiword".to_string()));
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = "server:\n  host: 127.0.0.1\n";
        let config = Config::parse(yaml, Path::new("docingest.yaml")).unwrap();
        assert_eq!(config.server.host.as_deref(), Some("127.0.0.1"));

        let json = r#"{"database_url": "sqlite:/tmp/x.db"}"#;
        let config = Config::parse(json, Path::new("docingest.json")).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite:/tmp/x.db"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("not = [valid", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env = env_from(&[
            ("DOCINGEST_DATA_DIR", "/var/lib/docingest"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8123"),
        ]);
        let settings = build_settings(&Config::default(), None, env).unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/docingest"));
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 8123);
    }

    #[test]
    fn test_invalid_port() {
        let err = build_settings(&Config::default(), None, env_from(&[("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_data_flag_with_db_file() {
        let settings = build_settings(
            &Config::default(),
            Some(Path::new("/data/archive.sqlite")),
            env_from(&[("DOCINGEST_DATA_DIR", "/ignored")]),
        )
        .unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/data"));
        assert_eq!(settings.database_filename, "archive.sqlite");
    }

    #[test]
    fn test_database_url_wins() {
        let settings = build_settings(
            &Config::default(),
            Some(Path::new("/data")),
            env_from(&[("DATABASE_URL", "sqlite:/elsewhere/db.sqlite")]),
        )
        .unwrap();

        assert_eq!(settings.database_url(), "sqlite:/elsewhere/db.sqlite");
        assert_eq!(settings.database_path(), PathBuf::from("/elsewhere/db.sqlite"));
    }

    #[test]
    fn test_postgres_rejected() {
        let err = build_settings(
            &Config::default(),
            None,
            env_from(&[("DATABASE_URL", "postgres://u:p@localhost/db")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDatabase(_)));

        let mut config = Config::default();
        config.database_url = Some("postgresql://localhost/db".to_string());
        assert!(build_settings(&config, None, env_from(&[])).is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = Config::default();
        config.server.port = Some(1234);
        let json = serde_json::to_value(&config).unwrap();

        let keys: HashMap<String, serde_json::Value> = serde_json::from_value(json).unwrap();
        assert!(keys.contains_key("server"));
        assert!(!keys.contains_key("source_path"));
    }
}
