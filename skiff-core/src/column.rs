use crate::{Operation, OperationSet, Value};

/// Declarative mapping of one struct field onto a table column.
///
/// Built once per type by the `Entity` derive and stored in a `static`
/// descriptor slice, in field declaration order.
#[derive(Debug)]
pub struct ColumnDef {
    /// Column name (defaults to the field name).
    pub name: &'static str,
    /// Owning table name.
    pub table: &'static str,
    /// Type witness (always the valueless variant).
    pub value: Value,
    /// Whether the field type accepts NULL (`Option<..>`).
    pub nullable: bool,
    /// Single-column primary key marker.
    pub primary_key: bool,
    /// Operations this column is excluded from.
    pub skip: OperationSet,
}

impl ColumnDef {
    pub fn included_in(&self, op: Operation) -> bool {
        !self.skip.contains(op)
    }
}
