use futures::future::{self, BoxFuture};
use sluice_core::{
    Connection, Result, SchemaField, SchemaProvider, Transaction, Value, normalize,
};
use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Tables described in memory, standing in for the catalog of a database.
///
/// Unknown tables have no columns.
#[derive(Default)]
pub struct InMemorySchemaProvider {
    tables: RwLock<HashMap<String, Vec<SchemaField>>>,
    fetches: AtomicUsize,
    transactional_fetches: AtomicUsize,
    stalled: AtomicBool,
}

impl InMemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider describing the [`Person`](crate::Person) and [`LedgerEntry`](crate::LedgerEntry)
    /// tables, plus an `Orders` table without entity.
    pub fn standard() -> Self {
        Self::new()
            .with_table("Person", person_columns())
            .with_table("[dbo].[Ledger]", ledger_columns())
            .with_table("Orders", order_columns())
    }

    pub fn with_table(self, table: &str, columns: Vec<SchemaField>) -> Self {
        self.set_table(table, columns);
        self
    }

    pub fn set_table(&self, table: &str, columns: Vec<SchemaField>) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize(table), columns);
    }

    /// While stalled the asynchronous fetches never complete.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::Relaxed);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Fetches that received a transaction.
    pub fn transactional_fetches(&self) -> usize {
        self.transactional_fetches.load(Ordering::Relaxed)
    }
}

impl SchemaProvider for InMemorySchemaProvider {
    fn fetch_columns(
        &self,
        _connection: &dyn Connection,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Vec<SchemaField>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if transaction.is_some() {
            self.transactional_fetches.fetch_add(1, Ordering::Relaxed);
        }
        Ok(self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize(table))
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_columns_async<'a>(
        &'a self,
        connection: &'a dyn Connection,
        table: &'a str,
        transaction: Option<&'a dyn Transaction>,
    ) -> BoxFuture<'a, Result<Vec<SchemaField>>> {
        if self.stalled.load(Ordering::Relaxed) {
            log::trace!("Stalling the column fetch of `{table}`");
            return Box::pin(future::pending());
        }
        Box::pin(async move { self.fetch_columns(connection, table, transaction) })
    }
}

pub fn person_columns() -> Vec<SchemaField> {
    vec![
        SchemaField::new("Id", Value::Int64(None))
            .primary()
            .identity()
            .column_type("bigint"),
        SchemaField::new("Name", Value::Varchar(None))
            .column_type("nvarchar")
            .size(128),
        SchemaField::new("Age", Value::Int32(None)).column_type("int"),
        SchemaField::new("Email", Value::Varchar(None))
            .column_type("nvarchar")
            .size(256),
    ]
}

pub fn ledger_columns() -> Vec<SchemaField> {
    vec![
        SchemaField::new("Code", Value::Varchar(None))
            .nullable(false)
            .column_type("varchar")
            .size(32),
        SchemaField::new("Amount", Value::Float64(None)).column_type("float"),
        SchemaField::new("Note", Value::Varchar(None)).column_type("nvarchar"),
    ]
}

/// Primary assigned by the caller, the identity is a separate sequence column.
pub fn order_columns() -> Vec<SchemaField> {
    vec![
        SchemaField::new("Id", Value::Uuid(None))
            .primary()
            .column_type("uniqueidentifier"),
        SchemaField::new("Seq", Value::Int64(None))
            .identity()
            .column_type("bigint"),
        SchemaField::new("Name", Value::Varchar(None))
            .column_type("nvarchar")
            .size(64),
    ]
}
