mod as_value;
mod column;
mod config;
mod connection;
mod decode;
mod driver;
mod engine;
mod entity;
mod executor;
mod lookup;
mod operation;
mod prepared;
mod sql_writer;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use decode::*;
pub use driver::*;
pub use engine::*;
pub use entity::*;
pub use executor::*;
pub use lookup::*;
pub use operation::*;
pub use prepared::*;
pub use sql_writer::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
