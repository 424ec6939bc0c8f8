//! Schema line tokenizer and directive value extraction.
//!
//! A schema line is reduced to a canonical form before it is classified:
//! every whitespace character is removed and the full-width punctuation that
//! shows up in Chinese descriptions (`，` `。` `：`) is replaced by its ASCII
//! counterpart. The key is everything before the first `:`; a leading `-`
//! marks a YAML list item.

use thiserror::Error;

const FULL_WIDTH_PUNCTUATION: [(char, char); 3] = [('，', ','), ('。', '.'), ('：', ':')];
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Failure to pull a value out of a directive line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("directive has no ':' delimiter")]
    MalformedLine,

    #[error("directive value is empty")]
    EmptyValue,

    #[error("directive value {0:?} is not a usable value")]
    InvalidValue(char),
}

/// Directive keywords understood by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `table-name:` English table name.
    TableName,
    /// `descripion:` table description. The misspelling is what the schema
    /// files actually contain.
    TableDescription,
    /// `- description:` opens a column.
    ColumnDescription,
    Type,
    Length,
    Nullable,
    /// `name:` closes a column.
    Name,
    /// `primary-keys:` ends the table.
    PrimaryKeys,
}

impl Keyword {
    const PREFIXES: [&'static str; 8] = [
        "table-name",
        "descripion",
        "description",
        "type",
        "length",
        "nullable",
        "name",
        "primary-keys",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::TableName => "table-name",
            Keyword::TableDescription => "descripion",
            Keyword::ColumnDescription => "-description",
            Keyword::Type => "type",
            Keyword::Length => "length",
            Keyword::Nullable => "nullable",
            Keyword::Name => "name",
            Keyword::PrimaryKeys => "primary-keys",
        }
    }

    fn from_key(key: &str, list_item: bool) -> Option<Keyword> {
        match key {
            "table-name" => Some(Keyword::TableName),
            "descripion" => Some(Keyword::TableDescription),
            "description" if list_item => Some(Keyword::ColumnDescription),
            "type" => Some(Keyword::Type),
            "length" => Some(Keyword::Length),
            "nullable" => Some(Keyword::Nullable),
            "name" => Some(Keyword::Name),
            "primary-keys" => Some(Keyword::PrimaryKeys),
            _ => None,
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input line, kept both as written and in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLine {
    /// 1-based line number.
    pub number: usize,
    pub raw: String,
    pub text: String,
}

impl SchemaLine {
    pub fn new(number: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = normalize_line(&raw);
        Self { number, raw, text }
    }

    /// Classifies the line, see [`classify`].
    pub fn keyword(&self) -> Result<Option<Keyword>, ExtractError> {
        classify_normalized(&self.text, &self.raw)
    }
}

/// Strips whitespace and converts full-width punctuation.
pub fn normalize_line(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != BYTE_ORDER_MARK)
        .map(|c| {
            FULL_WIDTH_PUNCTUATION
                .iter()
                .find(|(wide, _)| *wide == c)
                .map_or(c, |(_, ascii)| *ascii)
        })
        .collect()
}

/// Decides which directive a line carries.
///
/// The key must equal a keyword exactly, so free text that merely mentions
/// `type:` is not mistaken for a directive. `description` only opens a column
/// when written as a list item. A line without any `:` is rejected only when it
/// is a single word glued to a keyword (`typeNumber`, `primary-keys`), which is
/// a directive that lost its delimiter. Every other line (blank, comment,
/// `columns:`, unknown keys, prose that wraps onto its own line) yields `None`.
pub fn classify(raw: &str) -> Result<Option<Keyword>, ExtractError> {
    classify_normalized(&normalize_line(raw), raw)
}

fn classify_normalized(text: &str, raw: &str) -> Result<Option<Keyword>, ExtractError> {
    let (list_item, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    match body.split_once(':') {
        Some((key, _)) => Ok(Keyword::from_key(key, list_item)),
        None if lost_delimiter(raw) => Err(ExtractError::MalformedLine),
        None => Ok(None),
    }
}

/// Whether a colon-less raw line is one bare word starting with a keyword.
fn lost_delimiter(raw: &str) -> bool {
    let line = raw.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
    let (list_item, word) = match line.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };

    !word.is_empty()
        && !word.contains(char::is_whitespace)
        && Keyword::PREFIXES
            .iter()
            .any(|kw| word.starts_with(kw) && (list_item || *kw != "description"))
}

/// Returns the value of a normalized `key:value` line.
///
/// The value is the text after the first `:`, cut at the first `,` if there
/// is one, otherwise at the next `:`. Anything after the cut is a trailing
/// comment.
///
/// ```
/// use yamlstruct_core::directive::{extract_value, ExtractError};
///
/// assert_eq!(extract_value("-description:姓名,不可为空"), Ok("姓名"));
/// assert_eq!(extract_value("type:Number"), Ok("Number"));
/// assert_eq!(extract_value("typeNumber"), Err(ExtractError::MalformedLine));
/// ```
pub fn extract_value(line: &str) -> Result<&str, ExtractError> {
    let (_, candidate) = line.split_once(':').ok_or(ExtractError::MalformedLine)?;
    if candidate.is_empty() {
        return Err(ExtractError::EmptyValue);
    }

    for delimiter in [',', ':'] {
        if let Some(index) = candidate.find(delimiter) {
            if candidate.len() == 1 {
                return Err(ExtractError::InvalidValue(delimiter));
            }
            return Ok(&candidate[..index]);
        }
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_whitespace_and_tabs() {
        assert_eq!(normalize_line("  - description:\t用户 名称 "), "-description:用户名称");
        assert_eq!(normalize_line("type: Number\r"), "type:Number");
    }

    #[test]
    fn test_normalize_converts_full_width_punctuation() {
        assert_eq!(
            normalize_line("description：单价，定长。"),
            "description:单价,定长."
        );
    }

    #[test]
    fn test_normalize_removes_ideographic_space_and_bom() {
        assert_eq!(normalize_line("\u{feff}table-name:\u{3000}t_user"), "table-name:t_user");
    }

    #[test]
    fn test_schema_line_keeps_raw_text() {
        let line = SchemaLine::new(3, "  type: Number  ");
        assert_eq!(line.number, 3);
        assert_eq!(line.raw, "  type: Number  ");
        assert_eq!(line.text, "type:Number");
        assert_eq!(line.keyword(), Ok(Some(Keyword::Type)));
    }

    #[test]
    fn test_classify_each_keyword() {
        let cases = [
            ("table-name:t_user", Keyword::TableName),
            ("descripion:用户表", Keyword::TableDescription),
            ("-description:姓名", Keyword::ColumnDescription),
            ("type:String", Keyword::Type),
            ("length:32", Keyword::Length),
            ("nullable:no", Keyword::Nullable),
            ("name:user_name", Keyword::Name),
            ("primary-keys:user_id", Keyword::PrimaryKeys),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), Ok(Some(expected)), "{text}");
        }
    }

    #[test]
    fn test_classify_list_marker_on_any_key() {
        assert_eq!(classify("-name:user_id"), Ok(Some(Keyword::Name)));
        assert_eq!(classify("-type:Number"), Ok(Some(Keyword::Type)));
    }

    #[test]
    fn test_classify_table_name_is_not_column_name() {
        assert_eq!(classify("table-name:t_order"), Ok(Some(Keyword::TableName)));
    }

    #[test]
    fn test_classify_description_needs_list_marker() {
        assert_eq!(classify("description:订单"), Ok(None));
        assert_eq!(classify("-description:订单"), Ok(Some(Keyword::ColumnDescription)));
    }

    #[test]
    fn test_classify_free_text_mentioning_keyword() {
        assert_eq!(
            classify("-description:说明type:Number"),
            Ok(Some(Keyword::ColumnDescription))
        );
    }

    #[test]
    fn test_classify_ignores_unrelated_lines() {
        assert_eq!(classify(""), Ok(None));
        assert_eq!(classify("#注释"), Ok(None));
        assert_eq!(classify("columns:"), Ok(None));
        assert_eq!(classify("owner:dba"), Ok(None));
    }

    #[test]
    fn test_classify_keyword_without_delimiter_is_malformed() {
        assert_eq!(classify("typeNumber"), Err(ExtractError::MalformedLine));
        assert_eq!(classify("    typeNumber  "), Err(ExtractError::MalformedLine));
        assert_eq!(classify("-descriptionfoo"), Err(ExtractError::MalformedLine));
        assert_eq!(classify("  - description订单"), Err(ExtractError::MalformedLine));
        assert_eq!(classify("primary-keys"), Err(ExtractError::MalformedLine));
    }

    #[test]
    fn test_classify_skips_prose_starting_with_keyword() {
        assert_eq!(classify("    names must be unique across tenants"), Ok(None));
        assert_eq!(classify("type of the account, see docs"), Ok(None));
        assert_eq!(classify("- name of the owner"), Ok(None));
    }

    #[test]
    fn test_classify_colonless_description_needs_list_marker() {
        assert_eq!(classify("descriptionfoo"), Ok(None));
        assert_eq!(classify("description:foo"), Ok(None));
    }

    #[test]
    fn test_classify_normalizes_full_width_colon() {
        assert_eq!(classify("type： Number"), Ok(Some(Keyword::Type)));
    }

    #[test]
    fn test_extract_simple_value() {
        assert_eq!(extract_value("table-name:t_user"), Ok("t_user"));
    }

    #[test]
    fn test_extract_truncates_at_comma() {
        assert_eq!(extract_value("-description:姓名,不可为空"), Ok("姓名"));
        assert_eq!(extract_value("primary-keys:id,name"), Ok("id"));
    }

    #[test]
    fn test_extract_truncates_at_second_colon() {
        assert_eq!(extract_value("type:Number:精度2"), Ok("Number"));
    }

    #[test]
    fn test_extract_comma_wins_over_colon() {
        assert_eq!(extract_value("a:x:y,z"), Ok("x:y"));
    }

    #[test]
    fn test_extract_leading_delimiter_gives_empty_value() {
        assert_eq!(extract_value("type:,String"), Ok(""));
        assert_eq!(extract_value("type::String"), Ok(""));
    }

    #[test]
    fn test_extract_errors() {
        assert_eq!(extract_value("typeNumber"), Err(ExtractError::MalformedLine));
        assert_eq!(extract_value("type:"), Err(ExtractError::EmptyValue));
        assert_eq!(extract_value("type:,"), Err(ExtractError::InvalidValue(',')));
        assert_eq!(extract_value("type::"), Err(ExtractError::InvalidValue(':')));
    }

    proptest! {
        #[test]
        fn prop_extract_is_idempotent(key in "[a-z-]{1,12}", value in "[^\\s:：]{1,24}") {
            let line = normalize_line(&format!("{key}:{value}"));
            if let Ok(first) = extract_value(&line) {
                if !first.is_empty() {
                    let again = format!("{key}:{first}");
                    prop_assert_eq!(extract_value(&again), Ok(first));
                }
            }
        }

        #[test]
        fn prop_extracted_value_never_contains_comma(line in "[a-z]{1,8}:[a-z,:]{1,16}") {
            if let Ok(value) = extract_value(&line) {
                prop_assert!(!value.contains(','));
            }
        }
    }
}
