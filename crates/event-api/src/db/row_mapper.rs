//! Column-name translation applied to every row read from the database.
//!
//! PostgreSQL columns are snake_case; the HTTP API speaks camelCase. Only the
//! read path is translated. Writes bind positional parameters.

use crate::db::gateway::Row;

/// Convert a snake_case column name into a camelCase field name.
///
/// The first segment is lowercased; every later segment gets an uppercase
/// first letter and a lowercased remainder.
pub fn to_camel_case(column: &str) -> String {
    column
        .split('_')
        .enumerate()
        .map(|(index, segment)| {
            if index == 0 {
                segment.to_lowercase()
            } else {
                capitalize(segment)
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Rename every key of a row. Values are moved over untouched.
pub fn map_row(row: Row) -> Row {
    row.into_iter()
        .map(|(column, value)| (to_camel_case(&column), value))
        .collect()
}

/// Map an ordered sequence of rows, preserving order.
pub fn map_rows(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter().map(map_row).collect()
}
