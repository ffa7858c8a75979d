//! Layered configuration
//!
//! Resolution order, later layers winning:
//! 1. Embedded defaults (compiled into binary)
//! 2. Override file (`--config`, else ~/.local/share/gesso/config.toml)
//! 3. Environment variables

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/gesso.toml");

/// Which semantic-extraction backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenAICompatible,
    Mock,
    /// Rules only
    None,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(Self::OpenAICompatible)
            }
            "mock" => Ok(Self::Mock),
            "none" | "off" | "disabled" => Ok(Self::None),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic-extraction backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub backend: BackendKind,
    pub host: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ollama,
            host: None,
            model: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    /// Overlay `AI_BACKEND` and the host/model/key variables of the
    /// resulting backend
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = var("AI_BACKEND") {
            self.backend = backend.parse().unwrap_or_else(|e: String| {
                warn!("{}, falling back to ollama", e);
                BackendKind::Ollama
            });
        }

        let (host, model, key) = match self.backend {
            BackendKind::Ollama => ("OLLAMA_HOST", "OLLAMA_MODEL", None),
            BackendKind::OpenAICompatible => (
                "OPENAI_COMPATIBLE_HOST",
                "OPENAI_COMPATIBLE_MODEL",
                Some("OPENAI_COMPATIBLE_API_KEY"),
            ),
            BackendKind::Mock | BackendKind::None => return,
        };

        if let Some(v) = var(host).filter(|v| !v.is_empty()) {
            self.host = Some(v);
        }
        if let Some(v) = var(model).filter(|v| !v.is_empty()) {
            self.model = Some(v);
        }
        if let Some(v) = key.and_then(&var).filter(|v| !v.is_empty()) {
            self.api_key = Some(v);
        }
    }
}

/// Ledger settings
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub dir: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("ledger"),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub ai: AiConfig,
    /// Override file that was applied, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load all layers. An explicit `override_path` must exist; the default
    /// override location is optional.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::from_layers(override_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Embedded defaults plus the override file, without environment variables
    pub fn from_layers(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_toml(DEFAULT_CONFIG)?;

        let path = match override_path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            debug!("Loading config override from {}", path.display());
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config.apply_toml(&content)?;
            config.source = Some(path);
        }

        Ok(config)
    }

    /// Overlay one TOML document; absent keys keep their current value
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)?;

        if let Some(ledger) = raw.ledger {
            if let Some(dir) = ledger.dir {
                self.ledger.dir = dir;
            }
        }

        if let Some(ai) = raw.ai {
            if let Some(backend) = ai.backend {
                self.ai.backend = backend.parse().map_err(Error::Config)?;
            }
            if ai.host.is_some() {
                self.ai.host = ai.host.filter(|h| !h.is_empty());
            }
            if ai.model.is_some() {
                self.ai.model = ai.model.filter(|m| !m.is_empty());
            }
            if ai.api_key.is_some() {
                self.ai.api_key = ai.api_key.filter(|k| !k.is_empty());
            }
            if let Some(timeout) = ai.timeout_secs {
                self.ai.timeout_secs = timeout;
            }
        }

        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("GESSO_LEDGER_DIR").filter(|v| !v.is_empty()) {
            self.ledger.dir = PathBuf::from(dir);
        }
        self.ai.apply_vars(var);
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("gesso").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    ledger: Option<RawLedger>,
    ai: Option<RawAi>,
}

#[derive(Debug, Deserialize)]
struct RawLedger {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawAi {
    backend: Option<String>,
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}
