use crate::PostgresSqlWriter;
use comanda_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresDriver {}

impl Driver for PostgresDriver {
    type SqlWriter = PostgresSqlWriter;

    const NAME: &'static str = "postgres";

    fn sql_writer(&self) -> PostgresSqlWriter {
        PostgresSqlWriter {}
    }
}
