use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::i18n::Lang;
use crate::paths;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOAST_MS: u64 = 2000;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiSection {
    pub toast_ms: Option<u64>,
    pub dark: Option<bool>,
    pub lang: Option<String>,
}

impl Config {
    /// Load config from `~/.tdl/config.toml` (or `$TDL_CONFIG`).
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(&paths::config_path()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(url) = &self.server.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!(
                    "failed to parse {}: server.url must start with http:// or https://",
                    path.display()
                );
            }
        }
        if let Some(lang) = &self.ui.lang {
            if Lang::parse(lang).is_none() {
                bail!(
                    "failed to parse {}: unsupported ui.lang '{lang}'",
                    path.display()
                );
            }
        }
        if self.server.timeout_secs == Some(0) {
            bail!(
                "failed to parse {}: server.timeout_secs must be positive",
                path.display()
            );
        }
        Ok(())
    }

    pub fn server_url(&self) -> &str {
        self.server.url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.toast_ms.unwrap_or(DEFAULT_TOAST_MS))
    }

    pub fn dark(&self) -> bool {
        self.ui.dark.unwrap_or(false)
    }

    pub fn lang(&self) -> Lang {
        self.ui
            .lang
            .as_deref()
            .and_then(Lang::parse)
            .unwrap_or_default()
    }
}
