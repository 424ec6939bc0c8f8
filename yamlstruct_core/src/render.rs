//! Report rendering.
//!
//! A report is built column by column while the schema is scanned. Every
//! completed column adds one entry to each of the five per-column sections
//! (struct field, JSON key, validation call, assignment, doc row), so the
//! sections always hold the same number of entries. The table-level sections
//! (table name, primary keys) and the closing braces are added when the report
//! is finished.

use crate::config::RenderConfig;
use crate::types::Column;
use chrono::NaiveDateTime;
use std::fmt;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const INDENT: &str = "\t";
const START_BANNER_RULE: &str = "--------------------------------";
const END_BANNER_RULE: &str = "================================";

/// Sections of a report, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    TableName,
    PrimaryKeys,
    Struct,
    Json,
    Validation,
    Assignment,
    Doc,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::TableName,
        Section::PrimaryKeys,
        Section::Struct,
        Section::Json,
        Section::Validation,
        Section::Assignment,
        Section::Doc,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Section::TableName => "*表名",
            Section::PrimaryKeys => "*主键序列",
            Section::Struct => "*结构体定义",
            Section::Json => "*对应的json字符串",
            Section::Validation => "*数据校验",
            Section::Assignment => "*初始化对象时给字段赋值用",
            Section::Doc => "*给前端的接口文档用(入参以及出参字段说明)",
        }
    }
}

/// Accumulates the sections of one report.
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    config: &'a RenderConfig,
    started_at: NaiveDateTime,
    table_names: String,
    structs: String,
    json: String,
    checks: String,
    assignments: String,
    docs: String,
    columns: usize,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(config: &'a RenderConfig, started_at: NaiveDateTime) -> Self {
        Self {
            config,
            started_at,
            table_names: String::new(),
            structs: String::new(),
            json: String::new(),
            checks: String::new(),
            assignments: String::new(),
            docs: String::new(),
            columns: 0,
        }
    }

    /// Records the table description and opens the struct block.
    pub fn open_table(&mut self, description: &str, struct_name: &str) {
        self.table_names
            .push_str(&format!("{INDENT}{description}\n"));
        self.structs.push_str(&format!(
            "{INDENT}//{description}\n{INDENT}type {struct_name} struct {{\n"
        ));
    }

    /// Appends one completed column to every per-column section.
    pub fn push_column(&mut self, column: &Column) {
        let Column {
            chinese_name,
            column_type,
            length,
            fixed_length,
            nullable,
            struct_name,
            json_name,
        } = column;

        self.structs.push_str(&format!(
            "{INDENT}{INDENT}{struct_name}\t{}\t`json:\"{json_name}\"`\t//{chinese_name}\n",
            column_type.go_type()
        ));

        self.checks.push_str(&format!(
            "{INDENT}{}({}.{struct_name}, \"{chinese_name}\", {length}, {fixed_length}, {nullable})\n",
            self.config.check_call, self.config.check_receiver
        ));

        if self.columns > 0 {
            self.json.push_str(",\n");
        }
        self.json.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}\"{json_name}\":{}",
            column_type.json_placeholder()
        ));

        self.assignments.push_str(&format!(
            "{INDENT}{struct_name}: {}.{struct_name}, //{chinese_name}\n",
            self.config.assign_source
        ));

        self.docs
            .push_str(&format!("{INDENT}{json_name}\t\t{chinese_name}\n"));

        self.columns += 1;
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Body of a section as accumulated so far, without its header and
    /// without the closing braces added by [`ReportBuilder::finish`].
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::TableName => &self.table_names,
            Section::PrimaryKeys => "",
            Section::Struct => &self.structs,
            Section::Json => &self.json,
            Section::Validation => &self.checks,
            Section::Assignment => &self.assignments,
            Section::Doc => &self.docs,
        }
    }

    /// Closes the struct and JSON blocks and assembles the report text.
    pub fn finish(&self, primary_keys: &str, finished_at: NaiveDateTime) -> Report {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{START_BANNER_RULE}生成时间：{}{START_BANNER_RULE}\n",
            timestamp_text(self.started_at)
        ));

        for section in Section::ALL {
            output.push('\n');
            output.push_str(section.header());
            output.push('\n');
            match section {
                Section::PrimaryKeys => {
                    output.push_str(&format!("{INDENT}{primary_keys}\n"));
                }
                Section::Struct => {
                    output.push_str(&self.structs);
                    output.push_str(&format!("{INDENT}}}\n"));
                }
                Section::Json => {
                    output.push_str(&format!(
                        "{INDENT}{{\n{INDENT}{INDENT}\"com\":\"\",\n{INDENT}{INDENT}\"data\":{{\n"
                    ));
                    output.push_str(&self.json);
                    output.push_str(&format!("\n{INDENT}{INDENT}}}\n{INDENT}}}\n"));
                }
                other => output.push_str(self.section(other)),
            }
        }

        output.push_str(&format!(
            "\n{END_BANNER_RULE}信息提取结束 {}{END_BANNER_RULE}\n",
            timestamp_text(finished_at)
        ));

        Report {
            text: output,
            column_count: self.columns,
        }
    }
}

fn timestamp_text(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The text appended to a report file for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    text: String,
    column_count: usize,
}

impl Report {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
