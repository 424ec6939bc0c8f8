use core::fmt;
use serde::{Deserialize, Serialize};

/// Column kinds the generator distinguishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Int,
    Float,
}

impl ColumnType {
    /// Classifies a raw `type:` value.
    ///
    /// Only `number` (any case) is numeric. A numeric column whose Chinese
    /// name contains one of `float_keywords` (price, amount, coefficient and
    /// the like) is a float, every other numeric column an int. Unknown type
    /// names fall back to string.
    pub fn classify(raw: &str, chinese_name: &str, float_keywords: &[String]) -> Self {
        if !raw.eq_ignore_ascii_case("number") {
            return ColumnType::String;
        }
        if float_keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && chinese_name.contains(keyword.as_str()))
        {
            ColumnType::Float
        } else {
            ColumnType::Int
        }
    }

    /// Go type used in the struct definition.
    pub fn go_type(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Int => "int",
            ColumnType::Float => "float64",
        }
    }

    /// Placeholder value used in the JSON template.
    pub fn json_placeholder(self) -> &'static str {
        match self {
            ColumnType::String => r#""""#,
            ColumnType::Int | ColumnType::Float => "0",
        }
    }

}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
        };
        f.pad(name)
    }
}

/// Storage length of a column, kept exactly as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(String);

impl Length {
    /// Accepts a non-empty run of ASCII digits. Signs, separators and
    /// anything else are rejected.
    pub fn parse(text: &str) -> Option<Length> {
        (!text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Length(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Length {
    fn default() -> Self {
        Length("0".to_string())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A fully described column, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Chinese display name taken from the column description.
    pub chinese_name: String,
    pub column_type: ColumnType,
    /// Maximum storage length.
    pub length: Length,
    pub fixed_length: bool,
    pub nullable: bool,
    /// PascalCase field name.
    pub struct_name: String,
    /// camelCase JSON key.
    pub json_name: String,
}

/// Everything a schema file says about its table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Name as written after `table-name:`.
    pub source_name: String,
    pub struct_name: String,
    pub json_name: String,
    /// Chinese table name from the table description.
    pub description: String,
    pub columns: Vec<Column>,
    pub primary_keys: String,
}

impl TableDefinition {
    pub fn column(&self, json_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.json_name == json_name)
    }
}
