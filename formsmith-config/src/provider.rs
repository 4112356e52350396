//! Configuration provider using Figment

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::discovery::{discover, ConfigFile, ConfigFormat};
use crate::error::{ConfigError, ConfigResult};
use crate::types::FormsmithConfig;

/// Default prefix for environment overrides.
pub const ENV_PREFIX: &str = "FORMSMITH_";

/// Loads `FormsmithConfig` from all sources.
///
/// Precedence, later overriding earlier:
/// 1. Built-in defaults
/// 2. `formsmith.{toml,yaml,yml,json}` in the base directory, or one explicit file
/// 3. `FORMSMITH_*` environment variables, `__` separating nested keys
///    (`FORMSMITH_UPLOAD__MAX_BYTES=1024`)
///
/// Nothing is cached; every `load` reads the sources again.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    base_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self {
            base_dir: None,
            file: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Directory searched for configuration files. Defaults to the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Load exactly this file instead of discovering one. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate.
    pub fn load(&self) -> ConfigResult<FormsmithConfig> {
        let config: FormsmithConfig = self.build_figment()?.extract()?;
        config.validate()?;
        debug!(
            upload_dir = %config.upload.dir.display(),
            store_dir = %config.store.dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FormsmithConfig::default()));
        for file in self.config_files()? {
            trace!(path = %file.path.display(), format = ?file.format, "merging configuration file");
            figment = figment.merge(file_provider(&file));
        }
        Ok(figment.merge(Env::prefixed(&self.env_prefix).split("__")))
    }

    fn config_files(&self) -> ConfigResult<Vec<ConfigFile>> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            let format =
                ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
                    format: path
                        .extension()
                        .map(|e| e.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "<none>".to_string()),
                })?;
            return Ok(vec![ConfigFile {
                path: path.clone(),
                format,
            }]);
        }
        let base = self
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(discover(&base))
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn file_provider(file: &ConfigFile) -> Figment {
    let path: &Path = &file.path;
    match file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Json => Figment::from(Json::file(path)),
    }
}

/// Load configuration from the working directory and environment.
pub fn load_configuration() -> ConfigResult<FormsmithConfig> {
    ConfigProvider::new().load()
}
