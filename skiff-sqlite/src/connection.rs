use crate::{
    CBox, SqliteDriver, SqlitePrepared, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_changes64, sqlite3_close, sqlite3_column_count,
    sqlite3_errmsg, sqlite3_last_insert_rowid, sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step,
};
use skiff_core::{
    Connection, Context, Driver, Error, Executor, Notice, NoticeSink, Prepared, QueryResult,
    Result, RowLabeled, RowNames, RowsAffected, Statement,
    stream::Stream,
};
use std::{
    ffi::{CStr, CString, c_char},
    ptr, thread,
    time::Duration,
};

const BUSY_RETRIES: u32 = 50;
const BUSY_BACKOFF: Duration = Duration::from_millis(10);

pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
    pub(crate) notice: Option<NoticeSink>,
}

fn last_error(connection: *mut sqlite3) -> Error {
    let error = unsafe { Error::msg(error_message_from_ptr(&sqlite3_errmsg(connection)).to_string()) };
    log::error!("{}", error);
    error
}

impl SqliteConnection {
    fn notify(&self, code: i32, message: &str) {
        log::warn!("{}", message);
        if let Some(sink) = &self.notice {
            sink(&Notice {
                code,
                message: message.into(),
            });
        }
    }

    /// Steps one prepared sub-statement to completion, yielding its rows,
    /// or its affected count when it produces no columns.
    fn drive(
        &self,
        prepared: SqlitePrepared,
    ) -> impl Stream<Item = Result<QueryResult>> {
        let connection = *self.connection;
        try_stream! {
            let statement = *prepared.statement;
            let count = unsafe { sqlite3_column_count(statement) };
            let labels = if count > 0 {
                Some(
                    (0..count)
                        .map(|i| extract_name(statement, i))
                        .collect::<Result<RowNames>>()?,
                )
            } else {
                None
            };
            let mut busy_retries = 0;
            loop {
                match unsafe { sqlite3_step(statement) } {
                    SQLITE_BUSY => {
                        busy_retries += 1;
                        if busy_retries > BUSY_RETRIES {
                            Err(Error::msg("The database is busy and did not yield in time"))?;
                        }
                        self.notify(SQLITE_BUSY, "The database is busy, retrying");
                        thread::sleep(BUSY_BACKOFF);
                        continue;
                    }
                    SQLITE_DONE => {
                        if labels.is_none() {
                            let changes = unsafe { sqlite3_changes64(connection) } as u64;
                            let last_id = unsafe { sqlite3_last_insert_rowid(connection) };
                            yield QueryResult::Affected(RowsAffected {
                                rows_affected: changes,
                                last_affected_id: (changes > 0 && last_id != 0).then_some(last_id),
                            });
                        }
                        break;
                    }
                    SQLITE_ROW => {
                        if let Some(labels) = &labels {
                            yield QueryResult::Row(RowLabeled::new(
                                labels.clone(),
                                (0..count)
                                    .map(|i| extract_value(statement, i))
                                    .collect::<Result<_>>()?,
                            ));
                        }
                    }
                    _ => {
                        Err(last_error(connection))?;
                    }
                }
            }
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    /// Prepares and runs every sub-statement of the batch in order,
    /// binding each one's share of the named parameters. A parameter
    /// whose name matches no placeholder in the whole batch is an error.
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>> {
        let Statement { sql, params } = statement;
        let connection = *self.connection;
        try_stream! {
            let sql = CString::new(sql).context("The statement contains a NUL byte")?;
            let mut tail = sql.as_ptr();
            let mut bound = vec![false; params.len()];
            loop {
                let mut handle = CBox::new(ptr::null_mut(), |p| unsafe {
                    libsqlite3_sys::sqlite3_finalize(p);
                });
                let mut next: *const c_char = ptr::null();
                let rc = unsafe {
                    sqlite3_prepare_v2(connection, tail, -1, &mut *handle, &mut next)
                };
                if rc != SQLITE_OK {
                    Err(last_error(connection))?;
                }
                tail = next;
                if !handle.is_null() {
                    let mut prepared = SqlitePrepared::new(handle);
                    for (seen, param) in bound.iter_mut().zip(&params) {
                        *seen |= prepared.bind(&param.name, &param.value)?;
                    }
                    for await item in self.drive(prepared) {
                        yield item?;
                    }
                }
                let remaining = unsafe { CStr::from_ptr(tail) };
                if remaining.to_bytes().iter().all(u8::is_ascii_whitespace) {
                    break;
                }
            }
            if let Some((_, param)) = bound.iter().zip(&params).find(|(seen, _)| !**seen) {
                Err(Error::msg(format!(
                    "Parameter `{}` does not match any placeholder in the statement",
                    param.name
                )))?;
            }
        }
    }
}

impl Connection for SqliteConnection {
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            return Err(Error::msg(format!(
                "Expected the sqlite connection url to start with `{}`",
                prefix
            )));
        };
        let context = || format!("Error while decoding the connection URL: `{}`", url);
        let path = urlencoding::decode(path).with_context(context)?;
        let path = CString::new(path.as_ref()).with_context(context)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            return Err(last_error(*connection).context(format!("Cannot open `{}`", url)));
        }
        Ok(Self {
            connection,
            notice: None,
        })
    }

    fn on_notice(&mut self, sink: NoticeSink) {
        self.notice = Some(sink);
    }
}
