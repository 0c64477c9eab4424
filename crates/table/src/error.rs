use std::fmt;

#[derive(Debug)]
pub enum TableError {
    /// Named column absent from the table.
    ColumnNotFound(String),
    /// Column or row length inconsistent with the table shape.
    ShapeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "column '{name}' not found"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "expected {expected} value(s), got {actual}")
            }
        }
    }
}

impl std::error::Error for TableError {}
