mod as_value;
mod client;
mod driver;
mod entity;
mod executor;
mod operations;
mod query;
mod row;
mod schema;
mod sql_writer;
mod sync;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use client::*;
pub use driver::*;
pub use entity::*;
pub use executor::*;
pub use operations::*;
pub use query::*;
pub use row::*;
pub use schema::*;
pub use sql_writer::*;
pub use sync::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
