use crate::{SqliteConnection, SqlitePrepared, sql_writer::SqliteSqlWriter};
use skiff_core::Driver;

#[derive(Debug)]
pub struct SqliteDriver {}

impl SqliteDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type SqlWriter = SqliteSqlWriter;
    type Prepared = SqlitePrepared;

    const NAME: &'static str = "sqlite";

    fn get_instance() -> Self {
        Self {}
    }

    fn sql_writer(&self) -> SqliteSqlWriter {
        SqliteSqlWriter {}
    }
}
