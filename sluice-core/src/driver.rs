use crate::{ConfigurationError, Connection, Result, SqlWriter};
use std::{collections::HashMap, fmt, sync::Arc};

pub trait Driver {
    type SqlWriter: SqlWriter + 'static;

    /// Name reported by the connections of this driver.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}

/// Statement builders indexed by driver name.
#[derive(Default, Clone)]
pub struct DialectRegistry {
    writers: HashMap<&'static str, Arc<dyn SqlWriter>>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<D: Driver>(&mut self, driver: &D) -> &mut Self {
        self.register_writer(D::NAME, Arc::new(driver.sql_writer()))
    }

    pub fn register_writer(&mut self, name: &'static str, writer: Arc<dyn SqlWriter>) -> &mut Self {
        if self.writers.insert(name, writer).is_some() {
            log::debug!("Replaced the statement builder registered for `{name}`");
        }
        self
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn SqlWriter>> {
        self.writers.get(name).cloned()
    }

    /// Statement builder for the connection, or a configuration error.
    pub fn resolve(&self, connection: &dyn Connection) -> Result<Arc<dyn SqlWriter>> {
        let driver = connection.driver_name();
        self.lookup(driver).ok_or_else(|| {
            log::warn!("No statement builder registered for `{driver}`");
            ConfigurationError::MissingDialect { driver }.into()
        })
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.writers.keys()).finish()
    }
}
