use crate::{
    AsValue, Driver, Entity, Executor, Identity, MIGRATIONS, QueryDef, Record, Result, RowLabeled,
    Schema, Statement,
};
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// Message returned to the caller when a credential check finds no match.
pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

/// Outcome of a credential check. A rejection is a regular result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Granted(Identity),
    Rejected { message: String },
}

impl Authentication {
    pub fn rejected() -> Self {
        Authentication::Rejected {
            message: INVALID_CREDENTIALS.to_string(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Authentication::Granted(identity) => Some(identity),
            Authentication::Rejected { .. } => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Authentication::Granted(..))
    }
}

/// Entry point of the data access layer.
///
/// Every statement issued through the client waits for the schema bootstrap first. Cloning
/// is cheap and the clones share both the executor and the bootstrap state.
pub struct Client<E: Executor> {
    executor: Arc<E>,
    schema: Arc<Schema>,
}

impl<E: Executor> Clone for Client<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            schema: self.schema.clone(),
        }
    }
}

impl<E: Executor + 'static> Client<E> {
    /// Client that bootstraps the application tables on first use.
    pub fn new(executor: E) -> Self {
        let schema = Schema::from_migrations(&executor.driver().sql_writer(), MIGRATIONS);
        Self::with_schema(executor, schema)
    }

    pub fn with_schema(executor: E, schema: Schema) -> Self {
        Self {
            executor: Arc::new(executor),
            schema: Arc::new(schema),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        self.schema.ensure(&self.executor).await
    }

    /// Fresh builder bound to `table`. Nothing is executed until a terminal method is awaited.
    pub fn table(&self, table: impl Into<String>) -> TableQuery<'_, E> {
        TableQuery {
            client: self,
            query: QueryDef::new(table),
        }
    }

    pub(crate) async fn run(&self, statement: Statement) -> Result<Vec<RowLabeled>> {
        self.ensure_schema().await?;
        log::debug!("{}", statement);
        let context = format!("While running the query:\n{}", statement);
        self.executor.execute(statement).await.map_err(|e| {
            let e = e.context(context);
            log::error!("{:#}", e);
            e
        })
    }

    /// Looks up a staff member by name and secret, optionally within one store.
    ///
    /// The secret is compared with the stored value as is. An absent identifier or secret is
    /// rejected without querying the store.
    pub async fn verify_credentials(
        &self,
        identifier: Option<&str>,
        secret: Option<&str>,
        scope: Option<Uuid>,
    ) -> Result<Authentication> {
        let (Some(identifier), Some(secret)) = (identifier, secret) else {
            return Ok(Authentication::rejected());
        };
        let found = self
            .table(Identity::TABLE)
            .filter_eq("name", identifier)
            .filter_eq("password", secret)
            .filter_eq("store_id", scope)
            .fetch_one_as::<Identity>()
            .await?;
        Ok(match found {
            Some(identity) => {
                log::debug!("Credentials accepted for `{}`", identity.name);
                Authentication::Granted(identity)
            }
            None => Authentication::rejected(),
        })
    }
}

impl<E: Executor> fmt::Debug for Client<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("driver", &E::Driver::NAME)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Single shot query against one table.
///
/// Configuration methods take the builder by value, terminal methods consume it.
pub struct TableQuery<'c, E: Executor> {
    client: &'c Client<E>,
    query: QueryDef,
}

impl<'c, E: Executor + 'static> TableQuery<'c, E> {
    /// Appends `column = value`, an absent value is ignored.
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl AsValue) -> Self {
        self.query = self.query.filter_eq(column, value);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.query = self.query.order_by(column, ascending);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn query(&self) -> &QueryDef {
        &self.query
    }

    fn writer(&self) -> <E::Driver as Driver>::SqlWriter {
        self.client.executor.driver().sql_writer()
    }

    pub async fn fetch_all(self) -> Result<Vec<RowLabeled>> {
        let statement = self.query.select_statement(&self.writer())?;
        self.client.run(statement).await
    }

    /// First matching row, `None` when nothing matches. Limits to one row unless a limit
    /// was already set.
    pub async fn fetch_one(mut self) -> Result<Option<RowLabeled>> {
        if self.query.limit.is_none() {
            self.query = self.query.limit(1);
        }
        Ok(self.fetch_all().await?.into_iter().next())
    }

    pub async fn fetch_all_as<T: Entity>(self) -> Result<Vec<T>> {
        Ok(self.fetch_all().await?.iter().map(T::from_row).collect())
    }

    pub async fn fetch_one_as<T: Entity>(self) -> Result<Option<T>> {
        Ok(self.fetch_one().await?.as_ref().map(T::from_row))
    }

    /// Inserts the records one by one, each with its own column list.
    ///
    /// Returns for each record the row echoed by the store, or the record itself when the
    /// store echoes nothing.
    pub async fn insert(
        self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Vec<RowLabeled>> {
        let writer = self.writer();
        let mut result = Vec::new();
        for record in records {
            result.push(self.insert_one(&writer, record).await?);
        }
        Ok(result)
    }

    async fn insert_one(
        &self,
        writer: &<E::Driver as Driver>::SqlWriter,
        record: Record,
    ) -> Result<RowLabeled> {
        let statement = self.query.insert_statement(writer, &record)?;
        let rows = self.client.run(statement).await?;
        Ok(rows.into_iter().next().unwrap_or_else(|| record.into()))
    }

    /// Updates the records whose `id` already exists, inserts the others.
    ///
    /// Existence is checked with a separate read before writing. Two concurrent upserts of
    /// the same new id can both observe it missing and both insert.
    pub async fn upsert(
        self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Vec<RowLabeled>> {
        let writer = self.writer();
        let mut result = Vec::new();
        for record in records {
            let id = record.get("id").filter(|v| !v.is_null()).cloned();
            if let Some(id) = id {
                let existing = self
                    .client
                    .table(self.query.table.clone())
                    .filter_eq("id", &id)
                    .fetch_one()
                    .await?;
                if existing.is_some() {
                    let statement = QueryDef::new(self.query.table.clone())
                        .filter_eq("id", id)
                        .update_statement(&writer, &record)?;
                    let rows = self.client.run(statement).await?;
                    result.push(rows.into_iter().next().unwrap_or_else(|| record.into()));
                    continue;
                }
            }
            result.push(self.insert_one(&writer, record).await?);
        }
        Ok(result)
    }

    /// Sets the columns of `patch` on the matching rows, every row when unfiltered.
    pub async fn update(self, patch: Record) -> Result<Vec<RowLabeled>> {
        let statement = self.query.update_statement(&self.writer(), &patch)?;
        self.client.run(statement).await
    }

    /// Deletes the matching rows, every row when unfiltered.
    pub async fn delete(self) -> Result<()> {
        let statement = self.query.delete_statement(&self.writer())?;
        self.client.run(statement).await.map(|_| ())
    }
}
