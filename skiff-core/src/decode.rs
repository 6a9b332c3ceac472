use crate::{Error, Result, Value};
use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;
use time::{
    Date, PrimitiveDateTime, Time,
    format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

/// Text formats used when a temporal value travels through the backend as a
/// string. The driver encodes with these, `FromValue` parses them back.
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
pub const TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!(version = 2, "[hour]:[minute]:[second][optional [.[subsecond]]]");
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    version = 2,
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Conversion from a [`Value`] coming out of the backend into a Rust field
/// type, with the widening/narrowing coercions the backend's storage model
/// requires (SQLite surfaces every integer as `Int64`, every string as
/// `Varchar`).
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value) -> Result<T> {
    Err(Error::msg(format!(
        "Cannot decode {:?} into {}",
        value,
        std::any::type_name::<T>()
    )))
}

fn integer_of(value: &Value) -> Option<i128> {
    match value {
        Value::Int8(Some(v)) => Some(*v as i128),
        Value::Int16(Some(v)) => Some(*v as i128),
        Value::Int32(Some(v)) => Some(*v as i128),
        Value::Int64(Some(v)) => Some(*v as i128),
        Value::UInt8(Some(v)) => Some(*v as i128),
        Value::UInt16(Some(v)) => Some(*v as i128),
        Value::UInt32(Some(v)) => Some(*v as i128),
        Value::UInt64(Some(v)) => Some(*v as i128),
        _ => None,
    }
}

macro_rules! impl_from_value_int {
    ($target:ty) => {
        impl FromValue for $target {
            fn from_value(value: Value) -> Result<Self> {
                let Some(v) = integer_of(&value) else {
                    return mismatch(&value);
                };
                <$target>::try_from(v).with_context(|| {
                    format!(
                        "Integer {} is out of range for {}",
                        v,
                        std::any::type_name::<$target>()
                    )
                })
            }
        }
    };
}

impl_from_value_int!(i8);
impl_from_value_int!(i16);
impl_from_value_int!(i32);
impl_from_value_int!(i64);
impl_from_value_int!(u8);
impl_from_value_int!(u16);
impl_from_value_int!(u32);
impl_from_value_int!(u64);

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            _ => match integer_of(&value) {
                Some(v) => Ok(v != 0),
                None => mismatch(&value),
            },
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Float64(Some(v)) => Ok(*v),
            Value::Float32(Some(v)) => Ok(*v as f64),
            _ => match integer_of(&value) {
                Some(v) => Ok(v as f64),
                None => mismatch(&value),
            },
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Decimal(Some(v)) => Ok(*v),
            Value::Float64(Some(v)) => Decimal::from_f64(*v)
                .ok_or_else(|| Error::msg(format!("Cannot represent {} as a decimal", v))),
            Value::Varchar(Some(v)) => {
                Decimal::from_str(v).with_context(|| format!("Invalid decimal text `{}`", v))
            }
            _ => match integer_of(&value) {
                Some(v) => Decimal::from_i128(v)
                    .ok_or_else(|| Error::msg(format!("Integer {} overflows a decimal", v))),
                None => mismatch(&value),
            },
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            _ => mismatch(&value),
        }
    }
}

impl FromValue for Box<[u8]> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => mismatch(&value),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        <Box<[u8]>>::from_value(value).map(Into::into)
    }
}

impl FromValue for Date {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Date(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => {
                Date::parse(v, DATE_FORMAT).with_context(|| format!("Invalid date text `{}`", v))
            }
            _ => mismatch(&value),
        }
    }
}

impl FromValue for Time {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Time(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => {
                Time::parse(v, TIME_FORMAT).with_context(|| format!("Invalid time text `{}`", v))
            }
            _ => mismatch(&value),
        }
    }
}

impl FromValue for PrimitiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Timestamp(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => PrimitiveDateTime::parse(v, TIMESTAMP_FORMAT)
                .with_context(|| format!("Invalid timestamp text `{}`", v)),
            _ => mismatch(&value),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Uuid(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => {
                Uuid::parse_str(v).with_context(|| format!("Invalid uuid text `{}`", v))
            }
            Value::Blob(Some(v)) => Uuid::from_slice(v).context("Invalid uuid blob"),
            _ => mismatch(&value),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        if value.is_none() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}
