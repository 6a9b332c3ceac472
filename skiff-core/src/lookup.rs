use crate::{Error, FromValue, Result, RowLabeled};

/// One row of a two-column lookup table ("enum table"), e.g. a `Status`
/// table of (Id, Name) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRow<V = i64> {
    pub name: String,
    pub value: V,
}

impl<V: FromValue> LookupRow<V> {
    /// Decode from a row produced by the lookup select, which aliases the
    /// two source columns onto `name` and `value`.
    pub fn from_row(row: &RowLabeled) -> Result<Self> {
        let column = |label: &str| {
            row.get_column(label).cloned().ok_or_else(|| {
                Error::msg(format!("Lookup row has no `{}` column", label))
            })
        };
        Ok(Self {
            name: String::from_value(column("name")?)?,
            value: V::from_value(column("value")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn decodes_aliased_columns() {
        let row = RowLabeled::new(
            vec!["value".to_string(), "name".to_string()].into(),
            vec![Value::Int64(Some(2)), Value::Varchar(Some("Active".into()))].into(),
        );
        let entry = LookupRow::<i64>::from_row(&row).unwrap();
        assert_eq!(entry.name, "Active");
        assert_eq!(entry.value, 2);
    }

    #[test]
    fn missing_column_is_an_error() {
        let row = RowLabeled::new(
            vec!["name".to_string()].into(),
            vec![Value::Varchar(Some("Active".into()))].into(),
        );
        assert!(LookupRow::<i64>::from_row(&row).is_err());
    }
}
