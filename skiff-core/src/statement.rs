use crate::Value;
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// A named parameter binding. The statement text refers to it as `@name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The placeholder as it appears in the statement text.
    pub fn placeholder(&self) -> String {
        format!("@{}", self.name)
    }
}

/// Generated SQL together with its ordered named bindings.
///
/// Invariant: each placeholder in `sql` matches exactly one parameter by
/// name; multi-row inserts suffix names with the 1-based row index so the
/// whole batch binds without collisions.
#[derive(Debug, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Parameter>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Whether a piece of text names a stored procedure or is literal SQL.
///
/// A string with no whitespace is taken as a procedure name, anything else
/// as ad hoc statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Text,
    Procedure,
}

impl CommandKind {
    pub fn of(text: &str) -> Self {
        if text.trim().is_empty() || text.contains(char::is_whitespace) {
            CommandKind::Text
        } else {
            CommandKind::Procedure
        }
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted identifier when available.
    pub last_affected_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
}

/// Heterogeneous items emitted by `Executor::run` combining rows and modify
/// results.
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_kind_whitespace_heuristic() {
        assert_eq!(CommandKind::of("GetDriverRoutes"), CommandKind::Procedure);
        assert_eq!(CommandKind::of("SELECT * FROM t"), CommandKind::Text);
        assert_eq!(CommandKind::of(""), CommandKind::Text);
        assert_eq!(CommandKind::of("  "), CommandKind::Text);
    }

    #[test]
    fn rows_affected_accumulates() {
        let mut total = RowsAffected::default();
        total.extend([
            RowsAffected {
                rows_affected: 2,
                last_affected_id: Some(7),
            },
            RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            },
        ]);
        assert_eq!(total.rows_affected, 3);
        assert_eq!(total.last_affected_id, Some(7));
    }

    #[test]
    fn row_lookup_by_label() {
        let row = RowLabeled::new(
            vec!["a".to_string(), "b".to_string()].into(),
            vec![Value::Int32(Some(1)), Value::Varchar(Some("x".into()))].into(),
        );
        assert_eq!(row.get_column("b"), Some(&Value::Varchar(Some("x".into()))));
        assert_eq!(row.get_column("missing"), None);
    }
}
