use crate::{ColumnDef, Operation, Result, RowLabeled, Value};

/// A struct mapped onto a same-named table, one column per field.
///
/// Implemented by `#[derive(Entity)]`; the descriptor is built at compile
/// time, so no runtime reflection or metadata caching is involved.
pub trait Entity {
    /// Table name, defaults to the type name verbatim.
    fn table_name() -> &'static str;

    /// Mapped columns in field declaration order.
    fn columns() -> &'static [ColumnDef];

    /// The single column marked as primary key, if any.
    fn primary_key_def() -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|c| c.primary_key)
    }

    /// Materialize an instance from a labeled result row.
    ///
    /// Columns without a matching field are ignored; a mapped field (not
    /// skipped for Retrieve) without a matching column is an error.
    fn from_row(row: &RowLabeled) -> Result<Self>
    where
        Self: Sized;

    /// Current field values as (column name, value) pairs, aligned with
    /// [`Entity::columns`].
    fn row(&self) -> Vec<(&'static str, Value)>;
}

/// The mapper contract: columns taking part in `op`, plus the primary key
/// column returned separately.
///
/// When `exclude_primary_key` is set the key is removed from the list but
/// still returned on the side, for callers building a WHERE clause around
/// it. Pure function of the descriptor.
pub fn fields_for<E: Entity>(
    op: Operation,
    exclude_primary_key: bool,
) -> (Vec<&'static ColumnDef>, Option<&'static ColumnDef>) {
    let primary_key = E::primary_key_def();
    let fields = E::columns()
        .iter()
        .filter(|c| c.included_in(op))
        .filter(|c| !(exclude_primary_key && c.primary_key))
        .collect();
    (fields, primary_key)
}

/// Field values of `entity` for the columns [`fields_for`] would select.
pub fn values_for<E: Entity>(
    entity: &E,
    op: Operation,
    exclude_primary_key: bool,
) -> Vec<(&'static str, Value)> {
    E::columns()
        .iter()
        .zip(entity.row())
        .filter(|(c, _)| c.included_in(op) && !(exclude_primary_key && c.primary_key))
        .map(|(_, pair)| pair)
        .collect()
}

/// The primary key's current value on `entity`, if the type has one.
pub fn primary_key_value<E: Entity>(entity: &E) -> Option<(&'static str, Value)> {
    let key = E::primary_key_def()?;
    entity.row().into_iter().find(|(name, _)| *name == key.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OperationSet, Value};

    struct Vehicle {
        id: i64,
        plate: String,
        mileage: f64,
    }

    impl Entity for Vehicle {
        fn table_name() -> &'static str {
            "Vehicle"
        }

        fn columns() -> &'static [ColumnDef] {
            static COLUMNS: [ColumnDef; 3] = [
                ColumnDef {
                    name: "Id",
                    table: "Vehicle",
                    value: Value::Int64(None),
                    nullable: false,
                    primary_key: true,
                    skip: OperationSet::empty().with(Operation::Create),
                },
                ColumnDef {
                    name: "Plate",
                    table: "Vehicle",
                    value: Value::Varchar(None),
                    nullable: false,
                    primary_key: false,
                    skip: OperationSet::empty(),
                },
                ColumnDef {
                    name: "Mileage",
                    table: "Vehicle",
                    value: Value::Float64(None),
                    nullable: false,
                    primary_key: false,
                    skip: OperationSet::empty().with(Operation::Update),
                },
            ];
            &COLUMNS
        }

        fn from_row(row: &RowLabeled) -> Result<Self> {
            Ok(Self {
                id: crate::FromValue::from_value(
                    row.get_column("Id").cloned().unwrap_or_default(),
                )?,
                plate: crate::FromValue::from_value(
                    row.get_column("Plate").cloned().unwrap_or_default(),
                )?,
                mileage: crate::FromValue::from_value(
                    row.get_column("Mileage").cloned().unwrap_or_default(),
                )?,
            })
        }

        fn row(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("Id", self.id.into()),
                ("Plate", self.plate.clone().into()),
                ("Mileage", self.mileage.into()),
            ]
        }
    }

    #[test]
    fn fields_for_excludes_skipped_and_key() {
        let (fields, key) = fields_for::<Vehicle>(Operation::Create, true);
        assert_eq!(
            fields.iter().map(|c| c.name).collect::<Vec<_>>(),
            ["Plate", "Mileage"]
        );
        assert_eq!(key.map(|c| c.name), Some("Id"));

        let (fields, _) = fields_for::<Vehicle>(Operation::Update, true);
        assert_eq!(fields.iter().map(|c| c.name).collect::<Vec<_>>(), ["Plate"]);

        let (fields, _) = fields_for::<Vehicle>(Operation::Retrieve, false);
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn values_follow_field_selection() {
        let v = Vehicle {
            id: 3,
            plate: "KX-11-A".into(),
            mileage: 120.5,
        };
        let values = values_for(&v, Operation::Create, true);
        assert_eq!(
            values,
            vec![
                ("Plate", Value::Varchar(Some("KX-11-A".into()))),
                ("Mileage", Value::Float64(Some(120.5))),
            ]
        );
        assert_eq!(
            primary_key_value(&v),
            Some(("Id", Value::Int64(Some(3))))
        );
    }
}
