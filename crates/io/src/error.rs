use std::fmt;

/// A source file could not be read or parsed. Aborts that source's load
/// only; the other source is unaffected.
#[derive(Debug)]
pub enum LoadError {
    Io(String),
    Malformed(String),
    SheetNotFound(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read source: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed source: {msg}"),
            Self::SheetNotFound(name) => write!(f, "sheet '{name}' not found"),
        }
    }
}

impl std::error::Error for LoadError {}

/// A SQLite query failed: bad SQL, connection failure, or a value shape
/// the table model does not carry.
#[derive(Debug)]
pub enum QueryError {
    Connection(String),
    Sql(String),
    UnsupportedValue { column: String, row: usize },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "cannot open database: {msg}"),
            Self::Sql(msg) => write!(f, "query failed: {msg}"),
            Self::UnsupportedValue { column, row } => {
                write!(f, "column '{column}', row {row}: unsupported value type")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// A result export could not be written.
#[derive(Debug)]
pub enum WriteError {
    Io(String),
    Format(String),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot write output: {msg}"),
            Self::Format(msg) => write!(f, "cannot render output: {msg}"),
        }
    }
}

impl std::error::Error for WriteError {}
