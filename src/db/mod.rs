//! Read-only query interface
//!
//! The chatbot only ever runs parameterized SELECTs and reads the rows back.
//! Parameters are bound positionally; query text never contains user input.
//!
//! # Example
//! ```no_run
//! use docentify::db::{QueryExecutor, SqliteExecutor, Value};
//!
//! let db = SqliteExecutor::new("docentify.db");
//! let rows = db.execute("SELECT name FROM Courses WHERE id = ?1", &[Value::Integer(1)])?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod sqlite;

pub use sqlite::SqliteExecutor;

use anyhow::Result;
use std::fmt;

/// An owned column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One result row, columns in SELECT order
pub type Row = Vec<Value>;

/// Executes read-only parameterized queries
pub trait QueryExecutor: Send + Sync {
    /// Run `query` with positional `params` and return every row
    fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Text("Rust".into()).to_string(), "Rust");
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
