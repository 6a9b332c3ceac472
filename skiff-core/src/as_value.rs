use crate::Value;
use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion from a Rust field type into a [`Value`].
///
/// `as_empty_value` produces the valueless witness used in column
/// descriptors, `as_value` the populated counterpart bound as a parameter.
pub trait AsValue {
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
}

macro_rules! impl_as_value {
    ($source:ty, $into:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $into(None)
            }
            fn as_value(self) -> Value {
                $into(Some(self))
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean);
impl_as_value!(i8, Value::Int8);
impl_as_value!(i16, Value::Int16);
impl_as_value!(i32, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(u8, Value::UInt8);
impl_as_value!(u16, Value::UInt16);
impl_as_value!(u32, Value::UInt32);
impl_as_value!(u64, Value::UInt64);
impl_as_value!(f32, Value::Float32);
impl_as_value!(f64, Value::Float64);
impl_as_value!(Decimal, Value::Decimal);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(Uuid, Value::Uuid);

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_owned()))
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_folds_into_inner_variant() {
        assert_eq!(None::<i32>.as_value(), Value::Int32(None));
        assert_eq!(Some(5i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(<Option<i32>>::as_empty_value(), Value::Int32(None));
    }

    #[test]
    fn boxed_values_unwrap() {
        assert_eq!(Box::new(9u16).as_value(), Value::UInt16(Some(9)));
    }

    #[test]
    fn strings_and_blobs() {
        assert_eq!("hi".as_value(), Value::Varchar(Some("hi".into())));
        assert_eq!(
            vec![1u8, 2].as_value(),
            Value::Blob(Some(vec![1u8, 2].into_boxed_slice()))
        );
    }
}
