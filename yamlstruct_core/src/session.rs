//! Converting one schema file into an appended report.

use crate::config::YamlStructConfig;
use crate::error::{Result, YamlStructError};
use crate::scanner::{Clock, ScanOutput, local_now, scan_source};
use crate::types::TableDefinition;
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bytes appended to `output`.
    pub bytes_written: usize,
    pub table: TableDefinition,
}

/// Converts schema files according to a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    config: &'a YamlStructConfig,
    clock: Clock,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a YamlStructConfig) -> Self {
        Self::with_clock(config, local_now)
    }

    /// Uses `clock` for report timestamps instead of local time.
    pub fn with_clock(config: &'a YamlStructConfig, clock: Clock) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &'a YamlStructConfig {
        self.config
    }

    /// Report file a schema converts into: `<stem>.<output extension>` in the
    /// configured output directory, or beside the schema.
    pub fn output_path_for(&self, path: &Path) -> Result<PathBuf> {
        let stem = schema_stem(path, &self.config.input.extension)?;
        let file_name = format!("{stem}.{}", self.config.output.extension);

        let directory = match self.config.output_directory() {
            Some(directory) => directory,
            None => path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        };

        Ok(directory.join(file_name))
    }

    /// Scans a schema without writing anything.
    pub fn inspect_file(&self, path: &Path) -> Result<ScanOutput> {
        schema_stem(path, &self.config.input.extension)?;

        let source = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read schema {:?}: {}", path, e);
            YamlStructError::file_access(path, e)
        })?;
        debug!("Read {} bytes from {:?}", source.len(), path);

        scan_source(&source, &self.config.scan, &self.config.render, self.clock)
            .map_err(|e| YamlStructError::scan(path, e))
    }

    /// Scans a schema and appends its report to the report file. Nothing is
    /// written unless the whole schema scans cleanly.
    pub fn convert_file(&self, path: &Path) -> Result<ConvertedFile> {
        info!("Converting schema {:?}", path);
        let output_path = self.output_path_for(path)?;
        let ScanOutput { table, report } = self.inspect_file(path)?;

        if let Some(directory) = output_path.parent() {
            if !directory.as_os_str().is_empty() && !directory.exists() {
                debug!("Creating output directory {:?}", directory);
                fs::create_dir_all(directory)
                    .map_err(|e| YamlStructError::file_access(directory, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&output_path)
            .map_err(|e| YamlStructError::file_access(&output_path, e))?;
        file.write_all(report.as_str().as_bytes())
            .map_err(|e| YamlStructError::file_access(&output_path, e))?;

        info!(
            "Converted {:?} ({} columns) into {:?}",
            path,
            report.column_count(),
            output_path
        );

        Ok(ConvertedFile {
            source: path.to_path_buf(),
            output: output_path,
            bytes_written: report.as_str().len(),
            table,
        })
    }
}

/// File name of `path` without its `.{extension}` suffix.
///
/// Fails when the path is empty, does not end in `.{extension}`, or has
/// nothing before the suffix.
pub fn schema_stem(path: &Path, extension: &str) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(YamlStructError::invalid_path(path, "path is empty"));
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| YamlStructError::invalid_path(path, "path has no file name"))?
        .to_str()
        .ok_or_else(|| YamlStructError::invalid_path(path, "file name is not valid UTF-8"))?;

    let suffix = format!(".{extension}");
    let Some(stem) = file_name.strip_suffix(&suffix) else {
        return Err(YamlStructError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            expected: extension.to_string(),
        });
    };

    if stem.is_empty() {
        return Err(YamlStructError::invalid_path(path, "file name has no stem"));
    }

    Ok(stem.to_string())
}
