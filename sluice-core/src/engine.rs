use crate::{
    BulkColumnMapping, CommandTextCache, ConfigurationError, Connection, DialectRegistry, Driver,
    Entity, EntityMappings, ExecutionContextProvider, FieldReconciler, MappingSource, Result,
    SchemaCache, SchemaProvider, Transaction, validate_entity_mappings,
};
use std::sync::Arc;

/// Rows per statement of the batched operations when not told otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// The caches and their collaborators, wired together.
pub struct Engine {
    schema: Arc<SchemaCache>,
    reconciler: Arc<FieldReconciler>,
    command_text: Arc<CommandTextCache>,
    contexts: Arc<ExecutionContextProvider>,
    registry: Arc<DialectRegistry>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn schema(&self) -> &Arc<SchemaCache> {
        &self.schema
    }

    pub fn reconciler(&self) -> &Arc<FieldReconciler> {
        &self.reconciler
    }

    pub fn command_text(&self) -> &Arc<CommandTextCache> {
        &self.command_text
    }

    pub fn contexts(&self) -> &Arc<ExecutionContextProvider> {
        &self.contexts
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    /// Drop every cached schema, command text and execution context.
    pub fn flush(&self) {
        log::debug!("Flushing every cache");
        self.contexts.flush();
        self.command_text.flush();
        self.schema.flush();
    }

    /// Check the bulk mappings from the properties of `E` into the columns of `table`.
    pub fn validate_bulk_mappings<E: Entity>(
        &self,
        connection: &dyn Connection,
        table: &str,
        mappings: &[BulkColumnMapping],
        transaction: Option<&dyn Transaction>,
    ) -> Result<()> {
        let target = self.schema.get(connection, table, transaction)?;
        validate_entity_mappings::<E>(mappings, &target)
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    schema_provider: Option<Arc<dyn SchemaProvider>>,
    mapping_source: Option<Arc<dyn MappingSource>>,
    registry: DialectRegistry,
}

impl EngineBuilder {
    pub fn schema_provider(mut self, provider: Arc<dyn SchemaProvider>) -> Self {
        self.schema_provider = Some(provider);
        self
    }

    pub fn mapping_source(mut self, mappings: Arc<dyn MappingSource>) -> Self {
        self.mapping_source = Some(mappings);
        self
    }

    pub fn mappings(self, mappings: EntityMappings) -> Self {
        self.mapping_source(Arc::new(mappings))
    }

    pub fn dialect<D: Driver>(mut self, driver: D) -> Self {
        self.registry.register(&driver);
        self
    }

    pub fn registry(mut self, registry: DialectRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<Engine> {
        let Some(provider) = self.schema_provider else {
            log::warn!("Cannot build the engine without a schema provider");
            return Err(ConfigurationError::MissingSchemaProvider.into());
        };
        let mappings = self
            .mapping_source
            .unwrap_or_else(|| Arc::new(EntityMappings::new()));
        let registry = Arc::new(self.registry);
        let schema = Arc::new(SchemaCache::new(provider));
        let reconciler = Arc::new(FieldReconciler::new(schema.clone(), mappings));
        let command_text = Arc::new(CommandTextCache::new(
            reconciler.clone(),
            registry.clone(),
        ));
        let contexts = Arc::new(ExecutionContextProvider::new(
            reconciler.clone(),
            command_text.clone(),
        ));
        log::debug!("Built the engine with dialects {:?}", registry);
        Ok(Engine {
            schema,
            reconciler,
            command_text,
            contexts,
            registry,
        })
    }
}
