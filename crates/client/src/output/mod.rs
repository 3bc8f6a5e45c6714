//! Output formatting functions.

pub mod json;
pub mod report;
pub mod table;

use crate::cli::OutputFormat;

/// Format a value for output, using `table` for the table format.
pub fn format_output<T, F>(value: &T, format: OutputFormat, table: F) -> String
where
    T: serde::Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Table => table(value),
    }
}
