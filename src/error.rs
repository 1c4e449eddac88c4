//! Centralized error handling for datacontract.
//!
//! ## Error Categories
//!
//! The field store only ever reports two kinds of failure, both of which
//! leave the store exactly as it was before the call:
//!
//! - [`ContractError::DuplicateName`]: an update tried to give a field a name
//!   that another field already uses.
//! - [`ContractError::IndexOutOfRange`]: a command addressed a position that
//!   does not exist.
//!
//! The remaining variants belong to the surfaces around the store (draft
//! files, the editing shell, configuration):
//!
//! ```
//! use datacontract::error::ContractError;
//!
//! fn describe(err: &ContractError) -> &'static str {
//!     match err {
//!         ContractError::DuplicateName { .. } => "pick another name",
//!         ContractError::IndexOutOfRange { .. } => "no such field",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! The `ResultExt` trait adds `.context()` to any `Result` whose error converts
//! into [`ContractError`]:
//!
//! ```no_run
//! use datacontract::error::ResultExt as _;
//!
//! fn read_draft() -> datacontract::error::Result<String> {
//!     let text = std::fs::read_to_string("contract.draft.json")
//!         .context("Failed to read draft")?;
//!     Ok(text)
//! }
//! ```

use std::fmt;

/// Main error type for datacontract operations.
#[derive(Debug)]
pub enum ContractError {
    /// Another field already carries the requested name
    DuplicateName {
        name: String,
        index: usize,
        existing: usize,
    },

    /// Position does not address a field
    IndexOutOfRange { index: usize, len: usize },

    /// Text that is not one of the supported field types
    InvalidFieldType(String),

    /// Malformed editing command
    InvalidCommand(String),

    /// I/O errors (draft and output files)
    Io(std::io::Error),

    /// Configuration or draft format errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName {
                name,
                index,
                existing,
            } => write!(
                f,
                "Field name {name:?} for field {index} is already used by field {existing}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Field index {index} is out of range (field count: {len})")
            }
            Self::InvalidFieldType(value) => write!(f, "Unknown field type: {value}"),
            Self::InvalidCommand(msg) => write!(f, "Invalid command: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ContractError {}

impl From<std::io::Error> for ContractError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for ContractError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for datacontract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error, wrapped with `msg`.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error, wrapped with the closure's message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ContractError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ContractError = e.into();
            ContractError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ContractError = e.into();
            ContractError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_display() {
        let err = ContractError::DuplicateName {
            name: "id".to_owned(),
            index: 2,
            existing: 0,
        };
        assert_eq!(
            err.to_string(),
            "Field name \"id\" for field 2 is already used by field 0"
        );
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = ContractError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "Field index 5 is out of range (field count: 3)"
        );
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "contract.draft.json",
        ));

        let result: Result<()> = result.context("Failed to read draft");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read draft")
        );
    }
}
