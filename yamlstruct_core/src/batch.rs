//! Directory conversion.

use crate::error::{Result, YamlStructError};
use crate::session::{ConvertedFile, Converter};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Conversion result for one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ConvertedFile>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Results of converting a directory, in file name order.
#[derive(Debug)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &YamlStructError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(_) => None,
            Err(e) => Some((o.path.as_path(), e)),
        })
    }

    /// `Err(BatchFailed)` when any file failed.
    pub fn ensure_success(&self) -> Result<()> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(YamlStructError::BatchFailed {
                failed,
                total: self.total(),
            }),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converted {} file(s) in {}", self.total(), self.directory.display())?;
        if self.failed() == 0 {
            return write!(f, ", all succeeded");
        }

        write!(f, ", {} succeeded, {} failed:", self.succeeded(), self.failed())?;
        for (index, (path, error)) in self.failures().enumerate() {
            let name = path.file_name().map_or_else(
                || path.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            write!(f, "\n\t{}. {}: {}", index + 1, name, error)?;
        }
        Ok(())
    }
}

/// Regular files (or links to them) directly inside `directory` whose name
/// ends in `.{extension}`, sorted by name. Subdirectories are not searched.
pub fn collect_schema_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| YamlStructError::Io(e.into()))?;
        // Follows symlinks; a dangling link is not a file.
        if !entry.path().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(entry.into_path());
        } else {
            debug!("Skipping {:?}", entry.path());
        }
    }

    Ok(files)
}

impl Converter<'_> {
    /// Converts every schema file directly inside `directory`. A failing file
    /// does not stop the others.
    pub fn convert_dir(&self, directory: &Path) -> Result<BatchReport> {
        if !directory.is_dir() {
            return Err(YamlStructError::invalid_path(directory, "not a directory"));
        }

        let files = collect_schema_files(directory, &self.config().input.extension)?;
        info!("Found {} schema file(s) in {:?}", files.len(), directory);

        let outcomes = self.convert_all(&files);
        let report = BatchReport {
            directory: directory.to_path_buf(),
            outcomes,
        };

        for (path, error) in report.failures() {
            warn!("Failed to convert {:?}: {}", path, error);
        }
        info!(
            "Batch finished: {} total, {} succeeded, {} failed",
            report.total(),
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }

    fn convert_one(&self, path: &Path) -> FileOutcome {
        FileOutcome {
            path: path.to_path_buf(),
            result: self.convert_file(path),
        }
    }

    #[cfg(feature = "parallel")]
    fn convert_all(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        use rayon::prelude::*;

        if self.config().batch.parallel {
            debug!("Converting {} files on the rayon pool", files.len());
            files.par_iter().map(|path| self.convert_one(path)).collect()
        } else {
            files.iter().map(|path| self.convert_one(path)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn convert_all(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        if self.config().batch.parallel {
            warn!("Built without the parallel feature, converting sequentially");
        }
        files.iter().map(|path| self.convert_one(path)).collect()
    }
}
