//! Lookup configuration and credential loading.
//!
//! Credentials are resolved once, before a client is built. Environment
//! variables win; otherwise the first secret file that exists is read as
//! `KEY=VALUE` lines. Nothing here is re-read during a run.
use crate::marvel::MarvelCredentials;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const PUBLIC_KEY_VAR: &str = "MARVEL_PUBLIC_KEY";
pub const PRIVATE_KEY_VAR: &str = "MARVEL_PRIVATE_KEY";

/// Secret files probed, relative to the working directory, when none is given.
pub const DEFAULT_SECRET_FILES: &[&str] = &[".env.marvel", "tests/.env.marvel"];

pub const DEFAULT_BASE_URL: &str = "https://gateway.marvel.com/v1/public";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Remote lookup settings. Every field has a default, so an empty JSON object
/// is a valid config file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!(
                "comic-enricher/{} (catalog enrichment)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// Load a lookup config from JSON, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<LookupConfig> {
    let Some(path) = path else {
        return Ok(LookupConfig::default());
    };
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: LookupConfig =
        serde_json::from_slice(&bytes).context("parse lookup config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &LookupConfig) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(anyhow!("base_url must be non-empty"));
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    if !(1..=100).contains(&config.page_size) {
        return Err(anyhow!(
            "page_size must be between 1 and 100 (got {})",
            config.page_size
        ));
    }
    Ok(())
}

/// Source of Marvel API keys.
pub trait CredentialProvider {
    fn credentials(&self) -> Result<MarvelCredentials>;
}

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Reads keys from the process environment, then from a secret file.
#[derive(Clone)]
pub struct EnvCredentialProvider {
    secret_files: Vec<PathBuf>,
    env: EnvLookup,
}

impl EnvCredentialProvider {
    pub fn new(secret_files: Vec<PathBuf>) -> Self {
        Self {
            secret_files,
            env: process_env,
        }
    }

    /// Replace the environment reader.
    #[cfg(test)]
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Use `explicit` when given, otherwise the default secret file locations.
    pub fn with_secret_file(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(path) => Self::new(vec![path]),
            None => Self::new(DEFAULT_SECRET_FILES.iter().map(PathBuf::from).collect()),
        }
    }

    fn secret_file_values(&self) -> Result<BTreeMap<String, String>> {
        let Some(path) = self.secret_files.iter().find(|path| path.is_file()) else {
            return Ok(BTreeMap::new());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read secret file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded secret file");
        Ok(parse_secret_file(&text))
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credentials(&self) -> Result<MarvelCredentials> {
        let file = self.secret_file_values()?;
        let lookup = |name: &str| {
            (self.env)(name)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file.get(name).cloned())
                .filter(|value| !value.trim().is_empty())
        };
        match (lookup(PUBLIC_KEY_VAR), lookup(PRIVATE_KEY_VAR)) {
            (Some(public), Some(private)) => Ok(MarvelCredentials::new(public, private)),
            _ => Err(anyhow!(
                "Marvel API keys not provided; set {PUBLIC_KEY_VAR} and {PRIVATE_KEY_VAR}"
            )),
        }
    }
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an
/// optional `export ` prefix is accepted, and matching quotes are stripped.
pub fn parse_secret_file(text: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        values.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
