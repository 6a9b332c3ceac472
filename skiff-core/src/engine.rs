use crate::{
    CommandKind, Config, Connection, Driver, Entity, Error, Executor, FromValue, LookupRow,
    NoticeSink, Parameter, Result, RowLabeled, RowsAffected, SqlWriter, Statement, truncate_long,
    stream::TryStreamExt,
};

/// The public mapping surface: CRUD, raw statements, procedure calls and
/// lookup tables over one backend.
///
/// Every call is its own session: a fresh connection is opened, the work
/// runs (inside BEGIN/COMMIT when `use_transactions` is set), and the
/// connection is dropped before returning. A transactional failure rolls
/// back and propagates as `Err`; it is never folded into a default value,
/// so "zero rows" and "failed" stay distinguishable.
pub struct Engine<D: Driver> {
    driver: D,
    url: String,
    use_transactions: bool,
    notice: Option<NoticeSink>,
}

impl<D: Driver> Engine<D> {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            driver: D::get_instance(),
            url: config.connection_url(D::NAME)?,
            use_transactions: config.use_transactions,
            notice: None,
        })
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            driver: D::get_instance(),
            url: url.into(),
            use_transactions: false,
            notice: None,
        }
    }

    /// Install the diagnostic sink forwarded to every connection this
    /// engine opens.
    pub fn on_notice(&mut self, sink: NoticeSink) -> &mut Self {
        self.notice = Some(sink);
        self
    }

    fn writer(&self) -> D::SqlWriter {
        self.driver.sql_writer()
    }

    /// Insert the whole slice as one batch, in a single round trip.
    /// Returns true iff at least one row was written.
    pub async fn create<E: Entity>(&self, entities: &[E]) -> Result<bool> {
        let statement = self.writer().insert_into(entities)?;
        let affected = self.execute_statement(statement).await?;
        Ok(affected.rows_affected > 0)
    }

    /// Every row of the entity's table.
    pub async fn retrieve<E: Entity>(&self) -> Result<Vec<E>> {
        let statement = self.writer().select_all::<E>();
        self.retrieve_rows(statement).await
    }

    /// Rows produced by literal query text, or by a stored procedure when
    /// `text` contains no whitespace.
    pub async fn retrieve_with<E: Entity>(
        &self,
        text: &str,
        params: Vec<Parameter>,
    ) -> Result<Vec<E>> {
        let statement = self.statement_for(text, params)?;
        self.retrieve_rows(statement).await
    }

    /// Number of rows matched by the entity's primary key and rewritten.
    pub async fn update<E: Entity>(&self, entity: &E) -> Result<u64> {
        let statement = self.writer().update_by_key(entity)?;
        Ok(self.execute_statement(statement).await?.rows_affected)
    }

    /// True iff a row matching the entity's primary key was removed.
    pub async fn delete<E: Entity>(&self, entity: &E) -> Result<bool> {
        let statement = self.writer().delete_by_key(entity)?;
        Ok(self.execute_statement(statement).await?.rows_affected > 0)
    }

    /// Lookup table with the conventional `Name`/`Id` columns.
    pub async fn lookup<V: FromValue>(&self, table: &str) -> Result<Vec<LookupRow<V>>> {
        self.lookup_with(table, "Name", "Id").await
    }

    pub async fn lookup_with<V: FromValue>(
        &self,
        table: &str,
        name_column: &str,
        value_column: &str,
    ) -> Result<Vec<LookupRow<V>>> {
        let statement = self.writer().select_lookup(table, name_column, value_column);
        let rows = self.fetch_statement(statement).await?;
        rows.iter().map(LookupRow::from_row).collect()
    }

    /// Raw escape hatch: arbitrary text or procedure name, affected count
    /// back.
    pub async fn execute(&self, text: &str, params: Vec<Parameter>) -> Result<u64> {
        let statement = self.statement_for(text, params)?;
        Ok(self.execute_statement(statement).await?.rows_affected)
    }

    /// Call the named stored procedure with the given parameters.
    pub async fn execute_procedure(&self, name: &str, params: Vec<Parameter>) -> Result<u64> {
        let statement = self.writer().procedure_call(name, params)?;
        Ok(self.execute_statement(statement).await?.rows_affected)
    }

    fn statement_for(&self, text: &str, params: Vec<Parameter>) -> Result<Statement> {
        if text.trim().is_empty() {
            return Err(Error::msg("Statement text is blank"));
        }
        Ok(match CommandKind::of(text) {
            CommandKind::Procedure => self.writer().procedure_call(text, params)?,
            CommandKind::Text => Statement::new(text, params),
        })
    }

    async fn retrieve_rows<E: Entity>(&self, statement: Statement) -> Result<Vec<E>> {
        let rows = self.fetch_statement(statement).await?;
        rows.iter().map(E::from_row).collect()
    }

    async fn session(&self) -> Result<D::Connection> {
        let mut connection = D::Connection::connect(&self.url).await?;
        if let Some(sink) = &self.notice {
            connection.on_notice(sink.clone());
        }
        Ok(connection)
    }

    async fn execute_statement(&self, statement: Statement) -> Result<RowsAffected> {
        log::debug!("Executing:\n{}", truncate_long!(statement.sql));
        let mut connection = self.session().await?;
        if !self.use_transactions {
            return connection.execute(statement).await;
        }
        connection.execute(self.writer().transaction_begin()).await?;
        let result = connection.execute(statement).await;
        self.settle(&mut connection, result).await
    }

    async fn fetch_statement(&self, statement: Statement) -> Result<Vec<RowLabeled>> {
        log::debug!("Fetching:\n{}", truncate_long!(statement.sql));
        let mut connection = self.session().await?;
        if !self.use_transactions {
            return connection.fetch(statement).try_collect().await;
        }
        connection.execute(self.writer().transaction_begin()).await?;
        let result = connection.fetch(statement).try_collect().await;
        self.settle(&mut connection, result).await
    }

    /// Commit on success; on failure roll back and propagate the original
    /// error, with the rollback failure attached when that fails too.
    async fn settle<T>(&self, connection: &mut D::Connection, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                connection
                    .execute(self.writer().transaction_commit())
                    .await?;
                Ok(value)
            }
            Err(error) => {
                log::error!("Rolling back: {:#}", error);
                if let Err(rollback_error) = connection
                    .execute(self.writer().transaction_rollback())
                    .await
                {
                    log::error!("Rollback failed: {:#}", rollback_error);
                    return Err(error.context(format!("Rollback failed: {:#}", rollback_error)));
                }
                Err(error)
            }
        }
    }
}
