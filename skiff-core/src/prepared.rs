use crate::{Result, Value};
use std::fmt::Display;

/// A backend-prepared statement accepting named parameter bindings.
///
/// Binding is by name: `bind("driverId", ..)` attaches the value to the
/// `@driverId` placeholder. A batch is prepared one sub-statement at a
/// time, so a parameter may legitimately belong to a later sub-statement;
/// `bind` returns `false` when this statement has no such placeholder.
pub trait Prepared: Display {
    fn bind(&mut self, name: &str, value: &Value) -> Result<bool>;
}
