// yamlstruct - table schema YAML to Go struct, JSON template and validation snippets

// Line handling
pub mod directive;
pub mod naming;
pub mod scanner;

// Output
pub mod render;
pub mod types;

// Files and configuration
pub mod batch;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used items for convenience
pub use batch::{BatchReport, FileOutcome, collect_schema_files};
pub use config::YamlStructConfig;
pub use error::{Result, YamlStructError};
pub use render::{Report, Section};
pub use scanner::{ScanError, ScanOutput, Scanner, scan_source};
pub use session::{ConvertedFile, Converter, schema_stem};
pub use types::{Column, ColumnType, TableDefinition};
