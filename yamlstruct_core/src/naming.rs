//! Schema name casing.
//!
//! Schema names are snake_case-ish (`group_id`, `_user_name_`, `group_Id`).
//! Generated code needs two spellings of each: a PascalCase identifier for
//! struct types and fields, and a camelCase key for JSON tags.

/// Converts a schema name into its `(PascalCase, camelCase)` spellings.
///
/// Leading and trailing underscores are dropped, the rest is split on `_` and
/// each segment after the first gets its first character upper-cased. Only the
/// first character of a segment is touched, so `group_ID` becomes `GroupID`.
///
/// ```
/// use yamlstruct_core::naming::normalize;
///
/// assert_eq!(normalize("group_id"), ("GroupId".to_string(), "groupId".to_string()));
/// assert_eq!(normalize("name"), ("Name".to_string(), "name".to_string()));
/// ```
pub fn normalize(name: &str) -> (String, String) {
    let trimmed = name.trim_matches('_');
    let mut pascal = String::with_capacity(trimmed.len());
    let mut camel = String::with_capacity(trimmed.len());

    for (index, segment) in trimmed.split('_').enumerate() {
        let upper = upper_first(segment);
        pascal.push_str(&upper);
        if index == 0 {
            camel.push_str(segment);
        } else {
            camel.push_str(&upper);
        }
    }

    (pascal, camel)
}

fn upper_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
