use crate::{
    Driver, Result, RowLabeled, Value,
    stream::{Stream, TryStreamExt},
    truncate_long,
};
use std::{
    fmt::{self, Display},
    future::Future,
};

/// A parameterized SQL statement: text with positional placeholders and the values bound to them.
///
/// The value at index `i` of `params` is the one referenced by the `i + 1`-th placeholder.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl From<&str> for Statement {
    fn from(value: &str) -> Self {
        Statement::new(value, Vec::new())
    }
}

impl From<String> for Statement {
    fn from(value: String) -> Self {
        Statement::new(value, Vec::new())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// The SQL execution primitive: runs one statement and yields its rows.
///
/// Implementations report connectivity and syntax problems as errors, they never panic.
pub trait Executor: Send + Sync {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Execute the statement and stream the returned rows.
    fn fetch(&self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send;

    /// Execute the statement and collect all the returned rows.
    fn execute(
        &self,
        statement: Statement,
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send {
        self.fetch(statement).try_collect()
    }
}
