use crate::{
    CommandKind, Entity, Error, Operation, Parameter, Result, Statement, fields_for,
    primary_key_value, separated_by, values_for,
};
use std::fmt::Write;

/// Builds statement text and the matching named parameter list.
///
/// Default methods produce portable SQL; a driver writer can override the
/// pieces its backend spells differently.
pub trait SqlWriter {
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_placeholder(&self, out: &mut String, name: &str) {
        out.push('@');
        out.push_str(name);
    }

    /// One `INSERT INTO .. VALUES (..)` clause per entity, concatenated
    /// into a single batch. Parameter names carry the 1-based row index so
    /// the whole batch binds without collisions. The primary key is never
    /// part of the column list (assumed database-generated).
    fn insert_into<E: Entity>(&self, entities: &[E]) -> Result<Statement>
    where
        Self: Sized,
    {
        if entities.is_empty() {
            return Err(Error::msg("Cannot insert an empty collection"));
        }
        let (fields, _) = fields_for::<E>(Operation::Create, true);
        if fields.is_empty() {
            return Err(Error::msg(format!(
                "Type `{}` has no insertable columns",
                E::table_name()
            )));
        }
        let mut sql = String::with_capacity(128 * entities.len());
        let mut params = Vec::with_capacity(fields.len() * entities.len());
        for (index, entity) in entities.iter().enumerate() {
            let row = index + 1;
            if index > 0 {
                sql.push('\n');
            }
            sql.push_str("INSERT INTO ");
            self.write_identifier_quoted(&mut sql, E::table_name());
            sql.push_str(" (");
            separated_by(
                &mut sql,
                &fields,
                |out, c| self.write_identifier_quoted(out, c.name),
                ", ",
            );
            sql.push_str(") VALUES (");
            let values = values_for(entity, Operation::Create, true);
            separated_by(
                &mut sql,
                values,
                |out, (name, value)| {
                    let param = Parameter::new(format!("{}_{}", name, row), value);
                    self.write_placeholder(out, &param.name);
                    params.push(param);
                },
                ", ",
            );
            sql.push_str(");");
        }
        Ok(Statement::new(sql, params))
    }

    /// The no-argument retrieve: every row, every column.
    fn select_all<E: Entity>(&self) -> Statement
    where
        Self: Sized,
    {
        let mut sql = String::with_capacity(64);
        sql.push_str("SELECT * FROM ");
        self.write_identifier_quoted(&mut sql, E::table_name());
        sql.push(';');
        Statement::raw(sql)
    }

    /// SET over the non-key Update columns, WHERE on the primary key.
    fn update_by_key<E: Entity>(&self, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let (fields, key) = fields_for::<E>(Operation::Update, true);
        let Some(key) = key else {
            return Err(Error::msg(format!(
                "Type `{}` has no primary key column; cannot build an UPDATE",
                E::table_name()
            )));
        };
        if fields.is_empty() {
            return Err(Error::msg(format!(
                "Type `{}` has no updatable columns besides the key",
                E::table_name()
            )));
        }
        let mut sql = String::with_capacity(128);
        let mut params = Vec::with_capacity(fields.len() + 1);
        sql.push_str("UPDATE ");
        self.write_identifier_quoted(&mut sql, E::table_name());
        sql.push_str(" SET ");
        separated_by(
            &mut sql,
            values_for(entity, Operation::Update, true),
            |out, (name, value)| {
                self.write_identifier_quoted(out, name);
                out.push_str(" = ");
                self.write_placeholder(out, name);
                params.push(Parameter::new(name, value));
            },
            ", ",
        );
        sql.push_str(" WHERE ");
        self.write_identifier_quoted(&mut sql, key.name);
        sql.push_str(" = ");
        self.write_placeholder(&mut sql, key.name);
        let (_, key_value) = primary_key_value(entity).ok_or_else(|| {
            Error::msg(format!(
                "Primary key value of `{}` is not mapped",
                E::table_name()
            ))
        })?;
        params.push(Parameter::new(key.name, key_value));
        sql.push(';');
        Ok(Statement::new(sql, params))
    }

    /// Deletes the row matching the entity's primary key. The key travels
    /// as a bound parameter like every other value.
    fn delete_by_key<E: Entity>(&self, entity: &E) -> Result<Statement>
    where
        Self: Sized,
    {
        let Some((name, value)) = primary_key_value(entity) else {
            return Err(Error::msg(format!(
                "Type `{}` has no primary key column; cannot build a DELETE",
                E::table_name()
            )));
        };
        let mut sql = String::with_capacity(64);
        sql.push_str("DELETE FROM ");
        self.write_identifier_quoted(&mut sql, E::table_name());
        sql.push_str(" WHERE ");
        self.write_identifier_quoted(&mut sql, name);
        sql.push_str(" = ");
        self.write_placeholder(&mut sql, name);
        sql.push(';');
        Ok(Statement::new(sql, vec![Parameter::new(name, value)]))
    }

    /// Two-column lookup select, aliased onto the `name`/`value` labels the
    /// lookup row decoder expects.
    fn select_lookup(&self, table: &str, name_column: &str, value_column: &str) -> Statement {
        let mut sql = String::with_capacity(64);
        sql.push_str("SELECT ");
        self.write_identifier_quoted(&mut sql, value_column);
        sql.push_str(" AS \"value\", ");
        self.write_identifier_quoted(&mut sql, name_column);
        sql.push_str(" AS \"name\" FROM ");
        self.write_identifier_quoted(&mut sql, table);
        sql.push(';');
        Statement::raw(sql)
    }

    /// Stored procedure invocation with named arguments. The name must be
    /// a single token; anything containing whitespace is rejected.
    fn procedure_call(&self, name: &str, params: Vec<Parameter>) -> Result<Statement> {
        if CommandKind::of(name) != CommandKind::Procedure {
            return Err(Error::msg(format!(
                "`{}` is not a valid procedure name",
                name
            )));
        }
        let mut sql = String::with_capacity(64);
        sql.push_str("CALL ");
        self.write_identifier_quoted(&mut sql, name);
        sql.push('(');
        separated_by(
            &mut sql,
            &params,
            |out, p| self.write_placeholder(out, &p.name),
            ", ",
        );
        sql.push_str(");");
        Ok(Statement::new(sql, params))
    }

    fn transaction_begin(&self) -> Statement {
        Statement::raw("BEGIN TRANSACTION;")
    }

    fn transaction_commit(&self) -> Statement {
        Statement::raw("COMMIT;")
    }

    fn transaction_rollback(&self) -> Statement {
        Statement::raw("ROLLBACK;")
    }
}

/// Portable writer used when no driver-specific spelling is needed.
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {}
