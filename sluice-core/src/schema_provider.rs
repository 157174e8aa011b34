use crate::{Connection, Result, SchemaField, Transaction};
use futures::future::BoxFuture;

/// Source of column metadata for a table.
///
/// How the metadata is fetched is up to the implementation, a typical one runs
/// the text produced by [`SqlWriter::write_fields_query`](crate::SqlWriter::write_fields_query)
/// through its own driver.
pub trait SchemaProvider: Send + Sync {
    fn fetch_columns(
        &self,
        connection: &dyn Connection,
        table: &str,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Vec<SchemaField>>;

    fn fetch_columns_async<'a>(
        &'a self,
        connection: &'a dyn Connection,
        table: &'a str,
        transaction: Option<&'a dyn Transaction>,
    ) -> BoxFuture<'a, Result<Vec<SchemaField>>> {
        Box::pin(async move { self.fetch_columns(connection, table, transaction) })
    }
}
