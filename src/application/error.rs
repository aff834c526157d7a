use thiserror::Error;

/// Errors from reading console input. Malformed numbers typed into a cell
/// are not errors; they are coerced to zero when read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Unknown field: {0} (expected item, bags, kgs or rs)")]
    UnknownField(String),

    #[error("Invalid row id: {0}")]
    InvalidRowId(String),

    #[error("Missing argument for '{command}': {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unknown format: {0} (expected table, csv or json)")]
    UnknownFormat(String),
}
