use crate::{
    Driver, QueryResult, Result, RowLabeled, RowsAffected, Statement,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

/// Something that can run statements: a connection, or later a transaction
/// handle delegating to one.
pub trait Executor: Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// General method to send any statement and stream back every result
    /// item (rows and affected counts, in arrival order).
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>>;

    /// Execute the statement and return the rows.
    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> {
        self.run(statement).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the statement and return the total number of rows affected.
    fn execute(&mut self, statement: Statement) -> impl Future<Output = Result<RowsAffected>> {
        self.run(statement)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}
