//! Convert command - appends reports for a schema file or a directory of them.

use crate::cli::{Cli, ConvertArgs};
use crate::commands::load_config;
use std::fs;
use tracing::{error, info};
use yamlstruct_core::{
    config::YamlStructConfig,
    error::{Result, YamlStructError},
    session::Converter,
};

/// Runs the convert command.
pub fn run(cli: &Cli, args: ConvertArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.parallel {
        config.batch.parallel = true;
    }
    convert_path(&config, &args)
}

fn convert_path(config: &YamlStructConfig, args: &ConvertArgs) -> Result<()> {
    let metadata =
        fs::metadata(&args.path).map_err(|e| YamlStructError::file_access(&args.path, e))?;
    let converter = Converter::new(config);

    if metadata.is_dir() {
        let report = converter.convert_dir(&args.path)?;
        if report.failed() == 0 {
            info!("{}", report);
        } else {
            error!("{}", report);
        }
        return report.ensure_success();
    }

    let converted = converter.convert_file(&args.path)?;
    info!(
        "Extracted {} columns of {} into {}",
        converted.table.columns.len(),
        converted.source.display(),
        converted.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SCHEMA: &str = "table-name:t_user\ndescripion:用户\n-description:姓名\ntype:String\nlength:20\nnullable:no\nname:user_name\nprimary-keys:user_name\n";

    fn args(path: PathBuf) -> ConvertArgs {
        ConvertArgs {
            path,
            parallel: false,
        }
    }

    #[test]
    fn test_convert_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let schema = temp_dir.path().join("user.yaml");
        fs::write(&schema, SCHEMA).unwrap();

        convert_path(&YamlStructConfig::default(), &args(schema)).unwrap();
        assert!(temp_dir.path().join("user.txt").is_file());
    }

    #[test]
    fn test_convert_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let result = convert_path(
            &YamlStructConfig::default(),
            &args(temp_dir.path().join("missing.yaml")),
        );
        assert!(matches!(result, Err(YamlStructError::FileAccess { .. })));
    }

    #[test]
    fn test_convert_directory_with_failure_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("user.yaml"), SCHEMA).unwrap();
        fs::write(temp_dir.path().join("bad.yaml"), "table-name:t\n").unwrap();

        let result = convert_path(
            &YamlStructConfig::default(),
            &args(temp_dir.path().to_path_buf()),
        );
        assert!(matches!(
            result,
            Err(YamlStructError::BatchFailed { failed: 1, total: 2 })
        ));
        assert!(temp_dir.path().join("user.txt").is_file());
    }
}
