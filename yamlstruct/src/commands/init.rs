//! Init command - initializes yamlstruct.toml configuration.

use crate::cli::{Cli, InitArgs};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use yamlstruct_core::{
    config::CONFIG_FILE_NAME,
    error::{Result, YamlStructError},
};

/// Runs the init command.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    let config_path = write_config(Path::new("."), args.force)?;
    info!("Created {}", config_path.display());
    info!("Next steps:");
    info!("  1. Edit {} to match your project's naming", CONFIG_FILE_NAME);
    info!("  2. Run 'yamlstruct convert <schema.yaml | directory>'");
    Ok(())
}

fn write_config(directory: &Path, force: bool) -> Result<PathBuf> {
    let config_path = directory.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        error!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
        return Err(YamlStructError::config(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    fs::write(&config_path, default_config())
        .map_err(|e| YamlStructError::file_access(&config_path, e))?;
    Ok(config_path)
}

fn default_config() -> &'static str {
    r#"# yamlstruct configuration
# String values accept ${VAR} and ${VAR:-default} environment substitution.

[input]
# Extension of schema files picked up from a directory
extension = "yaml"

[output]
# Reports are appended beside each schema unless a directory is set
# directory = "./generated"
extension = "txt"

[render]
# Validation lines read: <check_call>(<check_receiver>.Field, "名称", length, fixed, nullable)
check_call = "util.CheckParam"
check_receiver = "structNeededToCheck"
# Assignment lines read: Field: <assign_source>.Field, //名称
assign_source = "dataSource"

[scan]
# What to do when a column has no type, length or nullable directive:
# "error" rejects the schema, "inherit" reuses the previous column's value
missing_fields = "error"
# A number column whose Chinese name contains one of these becomes float64
float_keywords = ["价", "金", "额", "系数"]

[batch]
# Convert directory contents concurrently
parallel = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use yamlstruct_core::config::YamlStructConfig;

    #[test]
    fn test_default_config_matches_built_in_defaults() {
        let config = YamlStructConfig::from_toml_str(default_config()).unwrap();
        assert_eq!(config, YamlStructConfig::default());
    }

    #[test]
    fn test_write_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), false).unwrap();
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(fs::read_to_string(path).unwrap(), default_config());
    }

    #[test]
    fn test_existing_config_needs_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(temp_dir.path(), false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(temp_dir.path(), true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), default_config());
    }
}
