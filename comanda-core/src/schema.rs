use crate::{Error, Executor, Result, SqlWriter, Statement};
use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    /// Auto incrementing integer key.
    Serial,
    Text,
    Boolean,
    Integer,
    BigInt,
    /// Fixed point decimal: precision, scale.
    Numeric(u8, u8),
    /// Structured blob.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Boolean(bool),
    GeneratedUuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
            primary_key: false,
            unique: false,
            default: None,
        }
    }
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
    pub const fn with_default(mut self, value: ColumnDefault) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    /// Multi column unique constraints.
    pub unique: &'static [&'static [&'static str]],
}

/// One idempotent DDL step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    CreateTable(&'static TableDef),
    AddColumn(&'static str, ColumnDef),
}

impl Migration {
    pub fn write(&self, writer: &impl SqlWriter, out: &mut String) {
        match self {
            Migration::CreateTable(table) => writer.write_create_table(out, table),
            Migration::AddColumn(table, column) => writer.write_add_column(out, table, column),
        }
    }
}

pub static STORE_PROFILES: TableDef = TableDef {
    name: "store_profiles",
    columns: &[
        ColumnDef::new("id", ColumnType::Uuid)
            .primary_key()
            .with_default(ColumnDefault::GeneratedUuid),
        ColumnDef::new("slug", ColumnType::Text).not_null().unique(),
        ColumnDef::new("name", ColumnType::Text).not_null(),
        ColumnDef::new("logoUrl", ColumnType::Text),
        ColumnDef::new("address", ColumnType::Text),
        ColumnDef::new("whatsapp", ColumnType::Text),
        ColumnDef::new("isActive", ColumnType::Boolean).with_default(ColumnDefault::Boolean(true)),
        ColumnDef::new("createdAt", ColumnType::BigInt),
        ColumnDef::new("settings", ColumnType::Json),
    ],
    unique: &[],
};

pub static CATEGORIES: TableDef = TableDef {
    name: "categories",
    columns: &[
        ColumnDef::new("id", ColumnType::Serial).primary_key(),
        ColumnDef::new("store_id", ColumnType::Uuid),
        ColumnDef::new("name", ColumnType::Text).not_null(),
    ],
    unique: &[&["store_id", "name"]],
};

pub static PRODUCTS: TableDef = TableDef {
    name: "products",
    columns: &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("store_id", ColumnType::Uuid),
        ColumnDef::new("name", ColumnType::Text).not_null(),
        ColumnDef::new("description", ColumnType::Text),
        ColumnDef::new("price", ColumnType::Numeric(10, 2)),
        ColumnDef::new("category", ColumnType::Text),
        ColumnDef::new("imageUrl", ColumnType::Text),
        ColumnDef::new("isActive", ColumnType::Boolean).with_default(ColumnDefault::Boolean(true)),
        ColumnDef::new("featuredDay", ColumnType::Integer),
        ColumnDef::new("isByWeight", ColumnType::Boolean)
            .with_default(ColumnDefault::Boolean(false)),
    ],
    unique: &[],
};

pub static WAITSTAFF: TableDef = TableDef {
    name: "waitstaff",
    columns: &[
        ColumnDef::new("id", ColumnType::Uuid)
            .primary_key()
            .with_default(ColumnDefault::GeneratedUuid),
        ColumnDef::new("store_id", ColumnType::Uuid),
        ColumnDef::new("name", ColumnType::Text).not_null(),
        ColumnDef::new("password", ColumnType::Text).not_null(),
        ColumnDef::new("role", ColumnType::Text).not_null(),
    ],
    unique: &[],
};

pub static ORDERS: TableDef = TableDef {
    name: "orders",
    columns: &[
        ColumnDef::new("id", ColumnType::Serial).primary_key(),
        ColumnDef::new("store_id", ColumnType::Uuid),
        ColumnDef::new("type", ColumnType::Text),
        ColumnDef::new("tableNumber", ColumnType::Text),
        ColumnDef::new("customerName", ColumnType::Text),
        ColumnDef::new("customerPhone", ColumnType::Text),
        ColumnDef::new("items", ColumnType::Json),
        ColumnDef::new("status", ColumnType::Text),
        ColumnDef::new("total", ColumnType::Numeric(10, 2)),
        ColumnDef::new("createdAt", ColumnType::BigInt),
        ColumnDef::new("paymentMethod", ColumnType::Text),
        ColumnDef::new("deliveryAddress", ColumnType::Text),
        ColumnDef::new("notes", ColumnType::Text),
        ColumnDef::new("changeFor", ColumnType::Numeric(10, 2)),
        ColumnDef::new("waitstaffName", ColumnType::Text),
        ColumnDef::new("couponApplied", ColumnType::Text),
        ColumnDef::new("discountAmount", ColumnType::Numeric(10, 2)),
    ],
    unique: &[],
};

/// Base tables first, then the columns added after the first release.
pub static MIGRATIONS: &[Migration] = &[
    Migration::CreateTable(&STORE_PROFILES),
    Migration::CreateTable(&CATEGORIES),
    Migration::CreateTable(&PRODUCTS),
    Migration::CreateTable(&WAITSTAFF),
    Migration::CreateTable(&ORDERS),
    Migration::AddColumn("waitstaff", ColumnDef::new("store_id", ColumnType::Uuid)),
    Migration::AddColumn("categories", ColumnDef::new("store_id", ColumnType::Uuid)),
    Migration::AddColumn("products", ColumnDef::new("store_id", ColumnType::Uuid)),
    Migration::AddColumn("orders", ColumnDef::new("store_id", ColumnType::Uuid)),
    Migration::AddColumn("products", ColumnDef::new("barcode", ColumnType::Text)),
];

/// Failure of a schema initialization attempt, shared by every caller that awaited it.
#[derive(Debug, Clone)]
pub struct BootstrapError(pub Arc<Error>);

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema initialization failed: {:#}", self.0)
    }
}

impl std::error::Error for BootstrapError {}

type Attempt = Shared<BoxFuture<'static, std::result::Result<(), BootstrapError>>>;

#[derive(Default)]
enum State {
    #[default]
    Uninitialized,
    Initializing(Attempt),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Uninitialized,
    Initializing,
    Ready,
}

/// Idempotent schema bootstrap, run at most once successfully per instance.
///
/// Concurrent callers share the attempt in flight. A failed attempt resets the state, the
/// next caller starts over from the first statement. The attempt is owned by the schema and
/// not by the caller that started it, so dropping that caller leaves it resumable.
pub struct Schema {
    statements: Arc<[Statement]>,
    state: Arc<Mutex<State>>,
}

impl Schema {
    pub fn new(statements: impl IntoIterator<Item = Statement>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
            state: Default::default(),
        }
    }

    /// Render `migrations` in the dialect of `writer`.
    pub fn from_migrations(writer: &impl SqlWriter, migrations: &[Migration]) -> Self {
        Self::new(migrations.iter().map(|v| {
            let mut sql = String::new();
            v.write(writer, &mut sql);
            Statement::from(sql)
        }))
    }

    /// A schema with nothing to apply, ready right away.
    pub fn empty() -> Self {
        let schema = Self::new([]);
        *schema.lock() = State::Ready;
        schema
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn status(&self) -> SchemaStatus {
        match *self.lock() {
            State::Uninitialized => SchemaStatus::Uninitialized,
            State::Initializing(..) => SchemaStatus::Initializing,
            State::Ready => SchemaStatus::Ready,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn ensure<E: Executor + 'static>(&self, executor: &Arc<E>) -> Result<()> {
        let attempt = {
            let mut state = self.lock();
            match &*state {
                State::Ready => return Ok(()),
                State::Initializing(attempt) => attempt.clone(),
                State::Uninitialized => {
                    let attempt = Self::attempt(
                        executor.clone(),
                        self.statements.clone(),
                        self.state.clone(),
                    )
                    .boxed()
                    .shared();
                    *state = State::Initializing(attempt.clone());
                    attempt
                }
            }
        };
        attempt.await.map_err(Error::new)
    }

    async fn attempt<E: Executor + 'static>(
        executor: Arc<E>,
        statements: Arc<[Statement]>,
        state: Arc<Mutex<State>>,
    ) -> std::result::Result<(), BootstrapError> {
        log::debug!("Initializing the schema ({} statements)", statements.len());
        let mut result = Ok(());
        for statement in statements.iter() {
            if let Err(e) = executor.execute(statement.clone()).await {
                result = Err(e.context(format!("While initializing the schema:\n{}", statement)));
                break;
            }
        }
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(()) => {
                *state = State::Ready;
                log::info!("Schema is ready");
                Ok(())
            }
            Err(e) => {
                *state = State::Uninitialized;
                log::error!("{:#}", e);
                Err(BootstrapError(Arc::new(e)))
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("statements", &self.statements.len())
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenericSqlWriter;

    #[test]
    fn migrations_render_in_declared_order() {
        let schema = Schema::from_migrations(&GenericSqlWriter, MIGRATIONS);
        let sql = schema
            .statements()
            .iter()
            .map(|v| v.sql.as_str())
            .collect::<Vec<_>>();
        assert_eq!(sql.len(), 10);
        assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS store_profiles (\n"));
        assert!(sql[4].starts_with("CREATE TABLE IF NOT EXISTS orders (\n"));
        assert!(sql[4].contains("createdat BIGINT"));
        assert_eq!(
            sql[9],
            "ALTER TABLE products ADD COLUMN IF NOT EXISTS barcode TEXT"
        );
        assert!(schema.statements().iter().all(|v| v.params.is_empty()));
        assert_eq!(schema.status(), SchemaStatus::Uninitialized);
    }

    #[test]
    fn empty_schema_is_ready() {
        assert_eq!(Schema::empty().status(), SchemaStatus::Ready);
    }
}
