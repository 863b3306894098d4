use anyhow::{Context, Result};
use paysnap_core::ExtractionConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PAYSNAP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "paysnap.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Upper bound on request bodies, uploads included.
    pub body_limit_bytes: usize,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            body_limit_bytes: 10 * 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("payments.db") }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub tessdata_path: Option<String>,
    pub language: String,
    /// Downscale larger images before OCR. Off by default: glyph height is
    /// the font-size signal and the currency boost is in pixels.
    pub max_dimension: Option<u32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { tessdata_path: None, language: "eng".to_string(), max_dimension: None }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse config")?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Read the file named by `PAYSNAP_CONFIG` (default `paysnap.toml`; a
    /// missing file means defaults), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = get("PAYSNAP_BIND") {
            self.server.bind = bind;
        }
        if let Some(db) = get("PAYSNAP_DB") {
            self.database.path = PathBuf::from(db);
        }
    }
}
