use crate::{CBox, error_message_from_ptr};
use libsqlite3_sys::*;
use rust_decimal::prelude::ToPrimitive;
use skiff_core::{
    DATE_FORMAT, Error, Prepared, Result, TIME_FORMAT, TIMESTAMP_FORMAT, Value, truncate_long,
};
use std::{
    ffi::{CStr, CString, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};

pub struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
}

impl SqlitePrepared {
    pub(crate) fn new(statement: CBox<*mut sqlite3_stmt>) -> Self {
        unsafe {
            sqlite3_clear_bindings(*statement);
        }
        Self { statement }
    }

    fn bind_text(&mut self, index: c_int, v: &str) -> c_int {
        unsafe {
            sqlite3_bind_text(
                *self.statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl Prepared for SqlitePrepared {
    fn bind(&mut self, name: &str, value: &Value) -> Result<bool> {
        let placeholder = CString::new(format!("@{}", name))?;
        let index = unsafe { sqlite3_bind_parameter_index(*self.statement, placeholder.as_ptr()) };
        if index == 0 {
            return Ok(false);
        }
        let rc = unsafe {
            match value {
                Value::Null
                | Value::Boolean(None)
                | Value::Int8(None)
                | Value::Int16(None)
                | Value::Int32(None)
                | Value::Int64(None)
                | Value::UInt8(None)
                | Value::UInt16(None)
                | Value::UInt32(None)
                | Value::UInt64(None)
                | Value::Float32(None)
                | Value::Float64(None)
                | Value::Decimal(None)
                | Value::Varchar(None)
                | Value::Blob(None)
                | Value::Date(None)
                | Value::Time(None)
                | Value::Timestamp(None)
                | Value::Uuid(None) => sqlite3_bind_null(*self.statement, index),
                Value::Boolean(Some(v)) => {
                    sqlite3_bind_int(*self.statement, index, *v as c_int)
                }
                Value::Int8(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::Int16(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::Int32(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::Int64(Some(v)) => sqlite3_bind_int64(*self.statement, index, *v),
                Value::UInt8(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::UInt16(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::UInt32(Some(v)) => {
                    sqlite3_bind_int64(*self.statement, index, *v as sqlite3_int64)
                }
                Value::UInt64(Some(v)) => {
                    if *v as sqlite3_int64 as u64 != *v {
                        return Err(Error::msg(format!(
                            "Cannot bind u64 value `{}` into a sqlite integer because it's out of bounds",
                            v
                        )));
                    }
                    sqlite3_bind_int64(*self.statement, index, *v as sqlite3_int64)
                }
                Value::Float32(Some(v)) => {
                    sqlite3_bind_double(*self.statement, index, *v as f64)
                }
                Value::Float64(Some(v)) => sqlite3_bind_double(*self.statement, index, *v),
                Value::Decimal(Some(v)) => sqlite3_bind_double(
                    *self.statement,
                    index,
                    v.to_f64().ok_or_else(|| {
                        Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                    })?,
                ),
                Value::Varchar(Some(v)) => self.bind_text(index, v),
                Value::Blob(Some(v)) => sqlite3_bind_blob(
                    *self.statement,
                    index,
                    v.as_ptr() as *const c_void,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                ),
                Value::Date(Some(v)) => {
                    let v = v.format(DATE_FORMAT)?;
                    self.bind_text(index, &v)
                }
                Value::Time(Some(v)) => {
                    let v = v.format(TIME_FORMAT)?;
                    self.bind_text(index, &v)
                }
                Value::Timestamp(Some(v)) => {
                    let v = v.format(TIMESTAMP_FORMAT)?;
                    self.bind_text(index, &v)
                }
                Value::Uuid(Some(v)) => {
                    let v = v.to_string();
                    self.bind_text(index, &v)
                }
            }
        };
        if rc != SQLITE_OK {
            let error = unsafe {
                let db = sqlite3_db_handle(*self.statement);
                let sql = CStr::from_ptr(sqlite3_sql(*self.statement)).to_string_lossy();
                Error::msg(error_message_from_ptr(&sqlite3_errmsg(db)).to_string()).context(
                    format!(
                        "Cannot bind parameter `{}` of the statement:\n{}",
                        name,
                        truncate_long!(&*sql)
                    ),
                )
            };
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(true)
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", *self.statement)
    }
}
