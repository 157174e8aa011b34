use crate::{
    Connection, EntityType, Field, MappingSource, Result, SchemaCache, SchemaField, Transaction,
    same_identifier,
};
use std::{future::Future, sync::Arc};

/// Requested fields that exist in the table, in the order they were requested.
///
/// Returns `None` when nothing was requested, meaning every column. An empty
/// schema leaves the request untouched.
pub fn reconcile_fields(schema: &[SchemaField], fields: &[Field]) -> Option<Vec<Field>> {
    if fields.is_empty() {
        return None;
    }
    if schema.is_empty() {
        return Some(fields.to_vec());
    }
    Some(
        fields
            .iter()
            .filter(|field| {
                let name = field.unquoted_name();
                schema.iter().any(|column| column.matches(&name))
            })
            .cloned()
            .collect(),
    )
}

/// Primary declared on the entity type, the identity flag is set only when the
/// declared identity is the same property.
pub fn declared_primary(
    mappings: &dyn MappingSource,
    entity: Option<EntityType>,
) -> Option<SchemaField> {
    let entity = entity?;
    let primary = mappings.primary(entity.id)?;
    let mut field = SchemaField::new(&primary.name, primary.value.clone()).primary();
    if let Some(identity) = mappings.identity(entity.id) {
        field.identity = same_identifier(&identity.name, &primary.name);
    }
    Some(field)
}

/// Identity declared on the entity type, the primary flag is set only when the
/// declared primary is the same property.
pub fn declared_identity(
    mappings: &dyn MappingSource,
    entity: Option<EntityType>,
) -> Option<SchemaField> {
    let entity = entity?;
    let identity = mappings.identity(entity.id)?;
    let mut field = SchemaField::new(&identity.name, identity.value.clone()).identity();
    if let Some(primary) = mappings.primary(entity.id) {
        field.primary = same_identifier(&primary.name, &identity.name);
    }
    Some(field)
}

pub fn resolve_primary(
    mappings: &dyn MappingSource,
    entity: Option<EntityType>,
    schema: &[SchemaField],
) -> Option<SchemaField> {
    declared_primary(mappings, entity).or_else(|| schema.iter().find(|v| v.primary).cloned())
}

pub fn resolve_identity(
    mappings: &dyn MappingSource,
    entity: Option<EntityType>,
    schema: &[SchemaField],
) -> Option<SchemaField> {
    declared_identity(mappings, entity).or_else(|| schema.iter().find(|v| v.identity).cloned())
}

/// Schema aware entry point for the functions above.
pub struct FieldReconciler {
    schema: Arc<SchemaCache>,
    mappings: Arc<dyn MappingSource>,
}

impl FieldReconciler {
    pub fn new(schema: Arc<SchemaCache>, mappings: Arc<dyn MappingSource>) -> Self {
        Self { schema, mappings }
    }

    pub fn schema(&self) -> &Arc<SchemaCache> {
        &self.schema
    }

    pub fn mappings(&self) -> &dyn MappingSource {
        self.mappings.as_ref()
    }

    pub fn reconcile(
        &self,
        connection: &dyn Connection,
        table: &str,
        fields: &[Field],
        transaction: Option<&dyn Transaction>,
    ) -> Result<Option<Vec<Field>>> {
        if fields.is_empty() {
            return Ok(None);
        }
        let schema = self.schema.get(connection, table, transaction)?;
        Ok(reconcile_fields(&schema, fields))
    }

    pub async fn reconcile_async(
        &self,
        connection: &dyn Connection,
        table: &str,
        fields: &[Field],
        transaction: Option<&dyn Transaction>,
        cancellation: impl Future<Output = ()>,
    ) -> Result<Option<Vec<Field>>> {
        if fields.is_empty() {
            return Ok(None);
        }
        let schema = self
            .schema
            .get_async(connection, table, transaction, cancellation)
            .await?;
        Ok(reconcile_fields(&schema, fields))
    }

    pub fn primary(
        &self,
        connection: &dyn Connection,
        table: &str,
        entity: Option<EntityType>,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Option<SchemaField>> {
        if let Some(field) = declared_primary(self.mappings(), entity) {
            return Ok(Some(field));
        }
        let schema = self.schema.get(connection, table, transaction)?;
        Ok(resolve_primary(self.mappings(), entity, &schema))
    }

    pub fn identity(
        &self,
        connection: &dyn Connection,
        table: &str,
        entity: Option<EntityType>,
        transaction: Option<&dyn Transaction>,
    ) -> Result<Option<SchemaField>> {
        if let Some(field) = declared_identity(self.mappings(), entity) {
            return Ok(Some(field));
        }
        let schema = self.schema.get(connection, table, transaction)?;
        Ok(resolve_identity(self.mappings(), entity, &schema))
    }
}
