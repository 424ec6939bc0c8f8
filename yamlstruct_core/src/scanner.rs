//! Single-pass schema scanner.
//!
//! The scanner walks a schema file line by line. A column is the run of lines
//! from a `- description:` item to the following `name:` line; the `type`,
//! `length` and `nullable` directives in between may come in any order. When
//! the `name:` line arrives the column is complete and is rendered into every
//! per-column section at once. The first `primary-keys:` line ends the table
//! and everything after it is ignored.
//!
//! ```text
//! table-name: t_order
//! descripion: 订单表
//! columns:
//!   - description: 订单编号，定长
//!     type: String
//!     length: 32
//!     nullable: no
//!     name: order_id
//! primary-keys: order_id
//! ```

use crate::config::{MissingFields, RenderConfig, ScanConfig};
use crate::directive::{ExtractError, Keyword, SchemaLine, extract_value};
use crate::naming::normalize;
use crate::render::{Report, ReportBuilder};
use crate::types::{Column, ColumnType, Length, TableDefinition};
use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, trace, warn};

const FIXED_LENGTH: &str = "定长";
const VARIABLE_LENGTH: &str = "不定长";

/// Source of report timestamps.
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Failure while scanning a schema. Positioned variants carry the 1-based
/// line number and the line as written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("line {line} ({text}): {source}")]
    Extract {
        line: usize,
        text: String,
        #[source]
        source: ExtractError,
    },

    #[error("line {line} ({text}): length {value:?} is not a non-negative integer")]
    InvalidLength {
        line: usize,
        text: String,
        value: String,
    },

    #[error("line {line} ({text}): column {column:?} is missing its {field} directive")]
    MissingColumnField {
        line: usize,
        text: String,
        column: String,
        field: &'static str,
    },

    #[error("schema ended without a primary-keys directive")]
    MissingPrimaryKeys,
}

impl ScanError {
    fn extract(line: &SchemaLine, source: ExtractError) -> Self {
        ScanError::Extract {
            line: line.number,
            text: line.raw.clone(),
            source,
        }
    }

    /// 1-based line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ScanError::Extract { line, .. }
            | ScanError::InvalidLength { line, .. }
            | ScanError::MissingColumnField { line, .. } => Some(*line),
            ScanError::MissingPrimaryKeys => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    AwaitingTable,
    ReadingTableHeader,
    ReadingColumn,
    Done,
}

/// Column fields seen so far in the current column window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ColumnDraft {
    chinese_name: Option<String>,
    fixed_length: Option<bool>,
    column_type: Option<ColumnType>,
    length: Option<Length>,
    nullable: Option<bool>,
}

/// Result of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub table: TableDefinition,
    pub report: Report,
}

pub struct Scanner<'a> {
    config: &'a ScanConfig,
    builder: ReportBuilder<'a>,
    clock: Clock,
    state: ScanState,
    table: TableDefinition,
    draft: Option<ColumnDraft>,
    report: Option<Report>,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a ScanConfig, render: &'a RenderConfig, clock: Clock) -> Self {
        Self {
            config,
            builder: ReportBuilder::new(render, clock()),
            clock,
            state: ScanState::AwaitingTable,
            table: TableDefinition::default(),
            draft: None,
            report: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ScanState::Done
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    /// Processes one line. Lines after the primary-keys directive are ignored.
    pub fn feed(&mut self, line: &SchemaLine) -> Result<ScanState, ScanError> {
        if self.is_done() {
            return Ok(self.state);
        }

        let keyword = match line.keyword().map_err(|e| ScanError::extract(line, e))? {
            Some(keyword) => keyword,
            None => {
                trace!(line = line.number, text = %line.raw, "Skipping non-directive line");
                return Ok(self.state);
            }
        };
        let value = extract_value(&line.text).map_err(|e| ScanError::extract(line, e))?;
        trace!(line = line.number, %keyword, value, "Directive");

        match keyword {
            Keyword::TableName => {
                let (struct_name, json_name) = normalize(value);
                debug!(table = value, %struct_name, "Table name");
                self.table.source_name = value.to_string();
                self.table.struct_name = struct_name;
                self.table.json_name = json_name;
                self.state = ScanState::ReadingTableHeader;
            }
            Keyword::TableDescription => {
                if self.table.struct_name.is_empty() {
                    warn!(
                        line = line.number,
                        "Table description appears before table-name, struct will be unnamed"
                    );
                }
                self.table.description = value.to_string();
                self.builder.open_table(value, &self.table.struct_name);
            }
            Keyword::ColumnDescription => {
                let fixed_length =
                    line.text.contains(FIXED_LENGTH) && !line.text.contains(VARIABLE_LENGTH);
                self.draft = Some(ColumnDraft {
                    chinese_name: Some(value.to_string()),
                    fixed_length: Some(fixed_length),
                    ..ColumnDraft::default()
                });
                self.state = ScanState::ReadingColumn;
            }
            Keyword::Type => {
                let chinese_name = self.current_chinese_name().to_string();
                let column_type =
                    ColumnType::classify(value, &chinese_name, &self.config.float_keywords);
                debug!(column = %chinese_name, raw = value, %column_type, "Column type");
                self.draft_mut().column_type = Some(column_type);
            }
            Keyword::Length => {
                let length = Length::parse(value).ok_or_else(|| ScanError::InvalidLength {
                    line: line.number,
                    text: line.raw.clone(),
                    value: value.to_string(),
                })?;
                self.draft_mut().length = Some(length);
            }
            Keyword::Nullable => {
                let nullable = match value.to_lowercase().as_str() {
                    "yes" => true,
                    "no" => false,
                    other => {
                        warn!(line = line.number, value = other, "Unrecognized nullable value, treating as not nullable");
                        false
                    }
                };
                self.draft_mut().nullable = Some(nullable);
            }
            Keyword::Name => {
                let draft = self.draft.take().unwrap_or_default();
                let column = self.complete_column(draft, value, line)?;
                debug!(
                    ordinal = self.table.columns.len() + 1,
                    column = %column.struct_name,
                    column_type = %column.column_type,
                    "Column complete"
                );
                self.builder.push_column(&column);
                self.table.columns.push(column);
            }
            Keyword::PrimaryKeys => {
                if self.draft.is_some() {
                    warn!(line = line.number, "Column without a name directive is dropped");
                }
                self.table.primary_keys = value.to_string();
                self.report = Some(self.builder.finish(value, (self.clock)()));
                self.state = ScanState::Done;
                debug!(columns = self.table.columns.len(), "Table complete");
            }
        }

        Ok(self.state)
    }

    /// Returns the table and its report, failing if the primary-keys directive
    /// was never seen.
    pub fn finish(self) -> Result<ScanOutput, ScanError> {
        let report = self.report.ok_or(ScanError::MissingPrimaryKeys)?;
        Ok(ScanOutput {
            table: self.table,
            report,
        })
    }

    fn draft_mut(&mut self) -> &mut ColumnDraft {
        self.draft.get_or_insert_with(ColumnDraft::default)
    }

    fn previous_column(&self) -> Option<&Column> {
        match self.config.missing_fields {
            MissingFields::Inherit => self.table.columns.last(),
            MissingFields::Error => None,
        }
    }

    fn current_chinese_name(&self) -> &str {
        self.draft
            .as_ref()
            .and_then(|d| d.chinese_name.as_deref())
            .or_else(|| self.previous_column().map(|c| c.chinese_name.as_str()))
            .unwrap_or_default()
    }

    fn complete_column(
        &self,
        draft: ColumnDraft,
        name: &str,
        line: &SchemaLine,
    ) -> Result<Column, ScanError> {
        let inherit = self.config.missing_fields == MissingFields::Inherit;
        let previous = self.previous_column();
        let missing = |field: &'static str| ScanError::MissingColumnField {
            line: line.number,
            text: line.raw.clone(),
            column: name.to_string(),
            field,
        };

        let chinese_name = draft
            .chinese_name
            .or_else(|| previous.map(|c| c.chinese_name.clone()))
            .or_else(|| inherit.then(String::new))
            .ok_or_else(|| missing("description"))?;
        let fixed_length = draft
            .fixed_length
            .or_else(|| previous.map(|c| c.fixed_length))
            .or_else(|| inherit.then_some(false))
            .ok_or_else(|| missing("description"))?;
        let column_type = draft
            .column_type
            .or_else(|| previous.map(|c| c.column_type))
            .or_else(|| inherit.then_some(ColumnType::String))
            .ok_or_else(|| missing("type"))?;
        let length = draft
            .length
            .or_else(|| previous.map(|c| c.length.clone()))
            .or_else(|| inherit.then(Length::default))
            .ok_or_else(|| missing("length"))?;
        let nullable = draft
            .nullable
            .or_else(|| previous.map(|c| c.nullable))
            .or_else(|| inherit.then_some(false))
            .ok_or_else(|| missing("nullable"))?;

        let (struct_name, json_name) = normalize(name);
        Ok(Column {
            chinese_name,
            column_type,
            length,
            fixed_length,
            nullable,
            struct_name,
            json_name,
        })
    }
}

/// Scans a whole schema text.
pub fn scan_source(
    source: &str,
    config: &ScanConfig,
    render: &RenderConfig,
    clock: Clock,
) -> Result<ScanOutput, ScanError> {
    let mut scanner = Scanner::new(config, render, clock);
    let mut lines = source.lines().enumerate();

    for (index, raw) in lines.by_ref() {
        scanner.feed(&SchemaLine::new(index + 1, raw))?;
        if scanner.is_done() {
            break;
        }
    }

    if let Some((index, _)) = lines.find(|(_, raw)| {
        matches!(
            SchemaLine::new(0, *raw).keyword(),
            Ok(Some(Keyword::TableName))
        )
    }) {
        warn!(
            line = index + 1,
            "Only the first table of a schema is converted, ignoring the rest"
        );
    }

    scanner.finish()
}
