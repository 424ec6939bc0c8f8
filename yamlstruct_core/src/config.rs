use crate::error::{Result, YamlStructError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

pub const CONFIG_FILE_NAME: &str = "yamlstruct.toml";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")
        .expect("Invalid regex for environment variable substitution")
});

/// Which schema files are picked up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extension of schema files, without the dot.
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: "yaml".to_string(),
        }
    }
}

/// Where reports are appended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for report files. Reports go beside their schema when unset.
    pub directory: Option<String>,
    /// Extension of the report file, without the dot.
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: "txt".to_string(),
        }
    }
}

/// Names substituted into the generated snippets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Function called by each validation line.
    pub check_call: String,
    /// Variable whose fields are validated.
    pub check_receiver: String,
    /// Variable fields are copied from in the assignment block.
    pub assign_source: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            check_call: "util.CheckParam".to_string(),
            check_receiver: "structNeededToCheck".to_string(),
            assign_source: "dataSource".to_string(),
        }
    }
}

/// What to do when a column closes without a `type`, `length` or `nullable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingFields {
    /// Reject the schema.
    #[default]
    Error,
    /// Reuse the value of the previous column.
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub missing_fields: MissingFields,
    /// Words in a column's Chinese name that make a `number` column a float.
    pub float_keywords: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            missing_fields: MissingFields::default(),
            float_keywords: ["价", "金", "额", "系数"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Convert the files of a directory concurrently.
    pub parallel: bool,
}

/// Root configuration, read from `yamlstruct.toml`. Every section is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct YamlStructConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
    pub scan: ScanConfig,
    pub batch: BatchConfig,
}

impl YamlStructConfig {
    /// Loads the configuration from `explicit`, or from the nearest
    /// `yamlstruct.toml` in the current directory or its ancestors. Falls back
    /// to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<YamlStructConfig> {
        info!("Loading yamlstruct configuration");
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file()?,
        };

        match config_path {
            Some(path) => {
                info!("Found configuration file at: {:?}", path);
                Self::from_file(&path)
            }
            None => {
                info!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(YamlStructConfig::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<YamlStructConfig> {
        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            YamlStructError::file_access(path, e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<YamlStructConfig> {
        let mut config: YamlStructConfig = toml::from_str(contents).inspect_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
        })?;
        config.expand_env_fields()?;

        if config.input.extension.is_empty() {
            return Err(YamlStructError::config("input.extension must not be empty"));
        }

        debug!(
            "Input extension: {}, output extension: {}, missing fields: {:?}, parallel: {}",
            config.input.extension,
            config.output.extension,
            config.scan.missing_fields,
            config.batch.parallel
        );

        Ok(config)
    }

    /// Report directory override, if configured.
    pub fn output_directory(&self) -> Option<PathBuf> {
        self.output.directory.as_ref().map(PathBuf::from)
    }

    /// Searches for `yamlstruct.toml` starting from the current directory
    /// and traversing up to the root.
    fn find_config_file() -> Result<Option<PathBuf>> {
        let current_dir = env::current_dir()?;
        debug!("Starting config file search from: {:?}", current_dir);

        for path in current_dir.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.is_file() {
                return Ok(Some(config_path));
            }
        }

        Ok(None)
    }

    /// Expands `${VAR}` references in the string settings that name paths
    /// or identifiers.
    fn expand_env_fields(&mut self) -> Result<()> {
        debug!("Expanding environment references in configuration");
        let render = &mut self.render;
        let fields = self.output.directory.iter_mut().chain([
            &mut render.check_call,
            &mut render.check_receiver,
            &mut render.assign_source,
        ]);
        for field in fields {
            *field = expand_env(field)?;
        }
        Ok(())
    }
}

/// Replaces each `${VAR}` or `${VAR:-default}` in `value`. An unset variable
/// without a default is an error naming the first such variable.
fn expand_env(value: &str) -> Result<String> {
    let mut unresolved: Option<String> = None;

    let expanded = ENV_VAR_RE.replace_all(value, |caps: &Captures<'_>| {
        let name = &caps[1];
        match (env::var(name), caps.get(2)) {
            (Ok(resolved), _) => {
                trace!("Resolved environment variable: {}", name);
                resolved
            }
            (Err(_), Some(default)) => {
                warn!("Environment variable {} not set, using default: {}", name, default.as_str());
                default.as_str().to_string()
            }
            (Err(_), None) => {
                unresolved.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match unresolved {
        Some(name) => {
            error!("Environment variable {} not set and no default provided", name);
            Err(YamlStructError::EnvVarNotSet(name))
        }
        None => Ok(expanded.into_owned()),
    }
}
