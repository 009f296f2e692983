use thiserror::Error;

/// Errors produced while normalising user input into Shelf types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}
