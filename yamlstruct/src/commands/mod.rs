//! Command handlers for the yamlstruct CLI.

pub mod convert;
pub mod init;
pub mod inspect;

use crate::cli::Cli;
use tracing::{debug, info};
use yamlstruct_core::{config::YamlStructConfig, error::Result};

/// Loads the configuration and applies the global command-line overrides.
pub fn load_config(cli: &Cli) -> Result<YamlStructConfig> {
    let mut config = YamlStructConfig::load(cli.config.as_deref())?;

    if let Some(output) = &cli.output {
        info!("Output directory overridden to {:?}", output);
        config.output.directory = Some(output.to_string_lossy().into_owned());
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}
