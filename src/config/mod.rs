pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use schema::{
    default_color_for, Config, DisplayMode, COLOR_KEY_BAR_EMPTY, COLOR_KEY_BAR_FILLED,
    COLOR_KEY_SEPARATOR, DEFAULT_FIELD_ORDER, DEFAULT_PROGRESS_BAR_WIDTH, MAX_PROGRESS_BAR_WIDTH,
    MIN_PROGRESS_BAR_WIDTH,
};
pub use validate::{merge_with_defaults, sanitize, validate, Validated};

use crate::error::{Result, StatuslineError};

/// Overrides the config file location. Mostly for tests.
pub const CONFIG_ENV: &str = "CC_STATUSLINE_CONFIG";

const CONFIG_DIR_NAME: &str = ".claude-code-statusline";
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve the config path: `$CC_STATUSLINE_CONFIG`, else
/// `~/.claude-code-statusline/config.json`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| StatuslineError::Config("could not determine home directory".to_string()))
}

/// Loads, caches and persists the configuration document.
///
/// The cache is write-through: [`save`](Self::save) replaces it only after the
/// complete document has been renamed into place, so readers see either the
/// old or the new snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    cached: Option<Config>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    /// Store at the default location.
    pub fn discover() -> Result<Self> {
        Ok(Self::new(config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and sanitize the file without touching the cache.
    ///
    /// Never fails: a missing file yields defaults silently, an unreadable or
    /// malformed one yields defaults plus a warning.
    pub fn read(&self) -> Validated {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Validated {
                config: Config::default(),
                warnings: Vec::new(),
            };
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => return fallback(format!("Could not read config file: {}", e)),
        };

        match serde_json::from_str(&contents) {
            Ok(value) => validate(&merge_with_defaults(value)),
            Err(e) => fallback(format!("Config file contains invalid JSON: {}", e)),
        }
    }

    /// Cached configuration, loading it on first use. Warnings are logged.
    pub fn load(&mut self) -> &Config {
        if self.cached.is_none() {
            let Validated { config, warnings } = self.read();
            if !warnings.is_empty() {
                tracing::warn!(path = %self.path.display(), "configuration validation warnings:");
                for warning in &warnings {
                    tracing::warn!("  - {}", warning);
                }
            }
            self.cached = Some(config);
        }
        self.cached.get_or_insert_with(Config::default)
    }

    pub fn reload(&mut self) -> &Config {
        self.cached = None;
        self.load()
    }

    /// Validate and persist the complete document, then update the cache.
    /// Returns the warnings raised while validating.
    pub fn save(&mut self, config: &Config) -> Result<Vec<String>> {
        let Validated { config, warnings } = sanitize(config);
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let mut body = serde_json::to_string_pretty(&config)?;
        body.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), "saved configuration");

        self.cached = Some(config);
        Ok(warnings)
    }

    /// Write the defaults if no file exists yet. Returns whether it wrote.
    pub fn ensure_exists(&mut self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.save(&Config::default()).map(|_| ())
    }
}

fn fallback(warning: String) -> Validated {
    Validated {
        config: Config::default(),
        warnings: vec![warning, "Using default configuration instead".to_string()],
    }
}
