use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::Deserialize;

use crate::catalog::PropertySelection;
use crate::error::MolpropError;
use crate::pubchem::PubchemSettings;

pub const CONFIG_FILE: &str = "molprop.json";
pub const DEFAULT_OUTPUT: &str = "molecular_properties.txt";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub properties: Option<PropertiesEntry>,
    #[serde(default)]
    pub color: Option<bool>,
    #[serde(default)]
    pub pubchem: Option<PubchemEntry>,
}

/// `"all"` / `"7,18,21"`, or an array mixing catalog indices and property names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertiesEntry {
    Shorthand(String),
    List(Vec<PropertyEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertyEntry {
    Index(usize),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct PubchemEntry {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub output: Utf8PathBuf,
    pub selection: Option<PropertySelection>,
    pub color: bool,
    pub pubchem: PubchemSettings,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or the first of `./molprop.json` and the user config directory's
    /// `molprop/molprop.json`. Without any config file the defaults apply.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, MolpropError> {
        let config_path = match path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::discover(),
        };
        let Some(config_path) = config_path else {
            return Self::resolve_config(Config::default());
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|_| MolpropError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| MolpropError::ConfigParse(err.to_string()))?;
        tracing::debug!(path = %config_path.display(), "loaded config");

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, MolpropError> {
        match config.schema_version {
            None | Some(SCHEMA_VERSION) => {}
            Some(version) => {
                return Err(MolpropError::ConfigParse(format!(
                    "unsupported schema_version {version}, expected {SCHEMA_VERSION}"
                )));
            }
        }

        let selection = match config.properties {
            None => None,
            Some(PropertiesEntry::Shorthand(text)) => Some(PropertySelection::parse(&text)?),
            Some(PropertiesEntry::List(entries)) => {
                let tokens = entries
                    .into_iter()
                    .map(|entry| match entry {
                        PropertyEntry::Index(index) => index.to_string(),
                        PropertyEntry::Name(name) => name,
                    })
                    .collect::<Vec<_>>();
                Some(PropertySelection::from_tokens(tokens.iter().map(String::as_str))?)
            }
        };

        let defaults = PubchemSettings::default();
        let pubchem = match config.pubchem {
            None => defaults,
            Some(entry) => PubchemSettings {
                base_url: entry.base_url.unwrap_or(defaults.base_url),
                timeout: entry
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                max_retries: entry.max_retries.unwrap_or(defaults.max_retries),
            },
        };

        Ok(ResolvedConfig {
            output: Utf8PathBuf::from(config.output.unwrap_or_else(|| DEFAULT_OUTPUT.to_string())),
            selection,
            color: config.color.unwrap_or(true),
            pubchem,
        })
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("molprop").join(CONFIG_FILE))
            .filter(|path| path.is_file())
    }
}
