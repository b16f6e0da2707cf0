use crate::SqlWriter;

/// A backend: the dialect used to render statements for it.
pub trait Driver: Send + Sync {
    type SqlWriter: SqlWriter + Send + Sync;

    /// Identifier of the backend, also the expected URL scheme.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
