// File I/O operations

pub mod csv;
pub mod error;
pub mod sqlite;
pub mod xlsx;

pub use error::{LoadError, QueryError, WriteError};
