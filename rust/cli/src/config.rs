use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub level: u8,
    pub seed: Option<u64>,
    pub color: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub data_dir: ValueSource,
    pub level: ValueSource,
    pub seed: ValueSource,
    pub color: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            data_dir: ValueSource::Default,
            level: ValueSource::Default,
            seed: ValueSource::Default,
            color: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            level: 0,
            seed: None,
            color: true,
        }
    }
}

#[derive(Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[allow(dead_code)]
pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("BJTRAIN_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.data_dir {
            cfg.data_dir = PathBuf::from(v);
            sources.data_dir = ValueSource::File;
        }
        if let Some(v) = f.level {
            cfg.level = v;
            sources.level = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.color {
            cfg.color = v;
            sources.color = ValueSource::File;
        }
    }

    if let Ok(dir) = std::env::var("BJTRAIN_DATA_DIR")
        && !dir.is_empty()
    {
        cfg.data_dir = PathBuf::from(dir);
        sources.data_dir = ValueSource::Env;
    }
    if let Ok(seed) = std::env::var("BJTRAIN_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(level) = std::env::var("BJTRAIN_DEFAULT_LEVEL")
        && !level.is_empty()
    {
        cfg.level = level
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid level".into()))?;
        sources.level = ValueSource::Env;
    }
    if let Ok(no_color) = std::env::var("BJTRAIN_NO_COLOR")
        && !no_color.is_empty()
    {
        let disabled = parse_bool(&no_color)
            .ok_or_else(|| ConfigError::Invalid("Invalid no_color".into()))?;
        cfg.color = !disabled;
        sources.color = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    data_dir: Option<String>,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    color: Option<bool>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.level > bjtrain_engine::levels::MAX_LEVEL {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: level must be <={}",
            bjtrain_engine::levels::MAX_LEVEL
        )));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
