use std::fmt;

#[derive(Debug)]
pub enum CompareError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad source combination, empty key, etc.).
    ConfigValidation(String),
    /// Selected key or extra column missing from its dataset. Aborts the
    /// whole comparison before any partial result is produced.
    MissingColumn { dataset: u8, column: String },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset {dataset}: column '{column}' not found")
            }
        }
    }
}

impl std::error::Error for CompareError {}
