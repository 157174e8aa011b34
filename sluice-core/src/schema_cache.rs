use crate::{
    Cancelled, Connection, Result, SchemaField, SchemaProvider, Transaction, ValidationError,
    normalize,
};
use futures::future::{Either, select};
use std::{
    collections::HashMap,
    future::Future,
    pin::pin,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

type SchemaKey = (&'static str, String);

/// Column metadata per (driver, table), fetched once through the provider.
///
/// Failed or cancelled fetches leave nothing behind, the next call asks the
/// provider again.
pub struct SchemaCache {
    provider: Arc<dyn SchemaProvider>,
    entries: RwLock<HashMap<SchemaKey, Arc<[SchemaField]>>>,
    fetches: AtomicUsize,
}

impl SchemaCache {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            entries: Default::default(),
            fetches: AtomicUsize::new(0),
        }
    }

    fn key(connection: &dyn Connection, table: &str) -> Result<SchemaKey> {
        let table = normalize(table);
        if table.is_empty() {
            return Err(ValidationError::EmptyTableName.into());
        }
        Ok((connection.driver_name(), table))
    }

    fn lookup(&self, key: &SchemaKey) -> Option<Arc<[SchemaField]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: SchemaKey, fields: Vec<SchemaField>) -> Arc<[SchemaField]> {
        let fields: Arc<[SchemaField]> = fields.into();
        log::debug!(
            "Fetched {} columns for `{}` on {}",
            fields.len(),
            key.1,
            key.0
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, fields.clone());
        fields
    }

    pub fn get(
        &self,
        connection: &dyn Connection,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Arc<[SchemaField]>> {
        let key = Self::key(connection, table)?;
        if let Some(fields) = self.lookup(&key) {
            return Ok(fields);
        }
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let fields = self.provider.fetch_columns(connection, table, transaction)?;
        Ok(self.store(key, fields))
    }

    /// Same as [`SchemaCache::get`], aborting the fetch as soon as `cancellation` completes.
    pub async fn get_async(
        &self,
        connection: &dyn Connection,
        table: &str,
        transaction: Option<&dyn Transaction>,
        cancellation: impl Future<Output = ()>,
    ) -> Result<Arc<[SchemaField]>> {
        let key = Self::key(connection, table)?;
        if let Some(fields) = self.lookup(&key) {
            return Ok(fields);
        }
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let cancellation = pin!(cancellation);
        let fetch = self
            .provider
            .fetch_columns_async(connection, table, transaction);
        match select(cancellation, fetch).await {
            Either::Left(..) => {
                log::debug!("Cancelled the column fetch for `{}`", key.1);
                Err(Cancelled {
                    table: table.to_string(),
                }
                .into())
            }
            Either::Right((fields, ..)) => Ok(self.store(key, fields?)),
        }
    }

    pub fn flush(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times the provider was asked for columns.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}
