use crate::{Connection, Prepared, SqlWriter};

/// A database backend: its connection type, prepared statement handle and
/// SQL dialect writer.
pub trait Driver {
    type Connection: Connection;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// URL scheme accepted by [`Connection::connect`].
    const NAME: &'static str;

    fn get_instance() -> Self;
    fn sql_writer(&self) -> Self::SqlWriter;
}
