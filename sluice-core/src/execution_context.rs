use crate::{
    CommandTextCache, Connection, Entity, EntityType, Field, FieldReconciler, Operation,
    OperationRequest, Parameter, Result, SchemaField, SqlWriter, Transaction, ValidationError,
    Value, declared_primary, parameter_name, resolve_identity, resolve_primary, same_identifier,
};
use futures::FutureExt;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
};

/// Statement kinds an execution context can be compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Insert,
    Merge,
    Update,
}

impl ContextKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContextKind::Insert => "Insert",
            ContextKind::Merge => "Merge",
            ContextKind::Update => "Update",
        }
    }

    fn operation(&self) -> Operation<'static> {
        match self {
            ContextKind::Insert => Operation::Insert,
            ContextKind::Merge => Operation::Merge,
            ContextKind::Update => Operation::Update { predicate: None },
        }
    }
}

/// Optional inputs of [`ExecutionContextProvider::create`].
#[derive(Default, Clone)]
pub struct ContextOptions<'a> {
    /// Match columns of a merge, the primary when empty.
    pub qualifiers: Vec<Field>,
    /// Columns to write, every entity property when empty.
    pub fields: Vec<Field>,
    pub hints: Option<String>,
    pub transaction: Option<&'a dyn Transaction>,
    pub statement_builder: Option<Arc<dyn SqlWriter>>,
}

pub type ParameterSetter<E> = Arc<dyn Fn(&E) -> Vec<Parameter> + Send + Sync>;
pub type PrimarySetter<E> = Arc<dyn Fn(&mut E, Value) -> Result<()> + Send + Sync>;

/// Everything needed to run one statement kind for an entity type, compiled once.
pub struct ExecutionContext<E> {
    pub command_text: Arc<str>,
    /// Columns bound as parameters, in parameter order.
    pub input_fields: Vec<SchemaField>,
    pub parameter_setter: ParameterSetter<E>,
    /// Writes the generated key back, `None` without a writable primary property.
    pub primary_setter: Option<PrimarySetter<E>>,
}

impl<E> ExecutionContext<E> {
    pub fn parameters(&self, entity: &E) -> Vec<Parameter> {
        (self.parameter_setter)(entity)
    }

    /// Store the key returned by the database, returns whether there was somewhere to store it.
    pub fn set_primary(&self, entity: &mut E, value: Value) -> Result<bool> {
        match &self.primary_setter {
            Some(setter) => setter(entity, value).map(|_| true),
            None => Ok(false),
        }
    }
}

impl<E> fmt::Debug for ExecutionContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("command_text", &self.command_text)
            .field("input_fields", &self.input_fields)
            .field("primary_setter", &self.primary_setter.is_some())
            .finish()
    }
}

type ContextKey = (TypeId, String);

/// Compiled execution contexts keyed by entity type and request shape.
pub struct ExecutionContextProvider {
    reconciler: Arc<FieldReconciler>,
    command_text: Arc<CommandTextCache>,
    entries: RwLock<HashMap<ContextKey, Arc<dyn Any + Send + Sync>>>,
}

impl ExecutionContextProvider {
    pub fn new(reconciler: Arc<FieldReconciler>, command_text: Arc<CommandTextCache>) -> Self {
        Self {
            reconciler,
            command_text,
            entries: Default::default(),
        }
    }

    fn key<E: Entity>(
        &self,
        kind: ContextKind,
        connection: &dyn Connection,
        table: &str,
        options: &ContextOptions,
    ) -> ContextKey {
        let join = |fields: &[Field]| {
            fields
                .iter()
                .map(Field::name)
                .collect::<Vec<_>>()
                .join(",")
        };
        let dialect = options
            .statement_builder
            .as_ref()
            .map(|v| v.name())
            .unwrap_or(connection.driver_name());
        let key = [
            kind.name(),
            dialect,
            EntityType::of::<E>().name,
            table,
            &join(&options.qualifiers),
            &join(&options.fields),
            options.hints.as_deref().unwrap_or_default(),
        ]
        .join(";");
        (TypeId::of::<E>(), key)
    }

    fn lookup<E: Entity>(&self, key: &ContextKey) -> Option<Arc<ExecutionContext<E>>> {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;
        entry.downcast::<ExecutionContext<E>>().ok()
    }

    fn store<E: Entity>(
        &self,
        key: ContextKey,
        context: ExecutionContext<E>,
    ) -> Arc<ExecutionContext<E>> {
        let context = Arc::new(context);
        log::debug!(
            "Compiled the execution context of {} with {} parameters",
            key.1,
            context.input_fields.len()
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, context.clone());
        context
    }

    fn request<'c, E: Entity>(
        kind: ContextKind,
        connection: &'c dyn Connection,
        table: &str,
        options: &ContextOptions<'c>,
    ) -> Result<OperationRequest<'c>> {
        let mut builder = OperationRequest::builder(connection, table, kind.operation())
            .entity::<E>()
            .fields(requested_fields::<E>(&options.fields)?)
            .qualifiers(options.qualifiers.iter().cloned());
        if let Some(hints) = &options.hints {
            builder = builder.hints(hints.as_str());
        }
        if let Some(transaction) = options.transaction {
            builder = builder.transaction(transaction);
        }
        if let Some(writer) = &options.statement_builder {
            builder = builder.statement_builder(writer.clone());
        }
        builder.build()
    }

    pub fn create<E: Entity>(
        &self,
        kind: ContextKind,
        connection: &dyn Connection,
        table: &str,
        options: ContextOptions,
    ) -> Result<Arc<ExecutionContext<E>>> {
        let key = self.key::<E>(kind, connection, table, &options);
        if let Some(context) = self.lookup::<E>(&key) {
            return Ok(context);
        }
        let schema = self
            .reconciler
            .schema()
            .get(connection, table, options.transaction)?;
        let request = Self::request::<E>(kind, connection, table, &options)?;
        let command_text = self.command_text.get(&request)?;
        let context = self.compile::<E>(kind, &schema, &request, command_text)?;
        Ok(self.store(key, context))
    }

    /// Same as [`ExecutionContextProvider::create`], schema fetches stop as soon as `cancellation` completes.
    pub async fn create_async<E: Entity>(
        &self,
        kind: ContextKind,
        connection: &dyn Connection,
        table: &str,
        options: ContextOptions<'_>,
        cancellation: impl Future<Output = ()>,
    ) -> Result<Arc<ExecutionContext<E>>> {
        let key = self.key::<E>(kind, connection, table, &options);
        if let Some(context) = self.lookup::<E>(&key) {
            return Ok(context);
        }
        let cancellation = cancellation.shared();
        let schema = self
            .reconciler
            .schema()
            .get_async(connection, table, options.transaction, cancellation.clone())
            .await?;
        let request = Self::request::<E>(kind, connection, table, &options)?;
        let command_text = self.command_text.get_async(&request, cancellation).await?;
        let context = self.compile::<E>(kind, &schema, &request, command_text)?;
        Ok(self.store(key, context))
    }

    fn compile<E: Entity>(
        &self,
        kind: ContextKind,
        schema: &[SchemaField],
        request: &OperationRequest,
        command_text: Arc<str>,
    ) -> Result<ExecutionContext<E>> {
        let properties = E::properties();
        let entity = EntityType::of::<E>();
        // Qualifiers the command text filters on, the primary unless a merge names its own
        let qualifiers = match kind {
            ContextKind::Insert => Vec::new(),
            ContextKind::Merge if !request.qualifiers().is_empty() => request.qualifiers().to_vec(),
            ContextKind::Merge | ContextKind::Update => {
                resolve_primary(self.reconciler.mappings(), Some(entity), schema)
                    .iter()
                    .map(SchemaField::as_field)
                    .collect::<Result<Vec<_>>>()?
            }
        };
        let mut requested = request.fields().to_vec();
        for qualifier in qualifiers {
            if !requested
                .iter()
                .any(|v| same_identifier(v.name(), qualifier.name()))
            {
                requested.push(qualifier);
            }
        }
        let identity = resolve_identity(self.reconciler.mappings(), Some(entity), schema);
        let input_fields = if schema.is_empty() {
            requested
                .iter()
                .filter_map(|field| {
                    properties
                        .iter()
                        .find(|p| same_identifier(p.name, field.name()))
                        .map(|p| {
                            let mut column = SchemaField::new(p.name, p.value.clone());
                            column.primary = p.primary;
                            column.identity = p.identity;
                            column
                        })
                })
                .collect::<Vec<_>>()
        } else {
            schema
                .iter()
                .filter(|column| requested.iter().any(|v| column.matches(v.name())))
                .cloned()
                .collect::<Vec<_>>()
        };
        let input_fields = input_fields
            .into_iter()
            .filter(|column| {
                kind != ContextKind::Insert
                    || !(column.identity
                        || identity.as_ref().is_some_and(|v| v.matches(&column.name)))
            })
            .collect::<Vec<_>>();
        let getters = input_fields
            .iter()
            .map(|column| {
                let property = properties
                    .iter()
                    .find(|p| column.matches(p.name))
                    .ok_or_else(|| ValidationError::UnknownProperty {
                        entity: entity.name,
                        column: column.name.clone(),
                    })?;
                Ok((parameter_name(&column.name), property.get))
            })
            .collect::<Result<Vec<_>>>()?;
        let parameter_setter: ParameterSetter<E> = Arc::new(move |value: &E| {
            getters
                .iter()
                .map(|(name, get)| Parameter::new(name.clone(), get(value)))
                .collect()
        });
        let primary = declared_primary(self.reconciler.mappings(), Some(entity))
            .map(|v| v.name)
            .or_else(|| {
                let column = schema.iter().find(|v| v.primary)?;
                Some(
                    properties
                        .iter()
                        .find(|p| column.matches(p.name))
                        .map(|p| p.name.to_string())
                        .unwrap_or_else(|| column.name.clone()),
                )
            });
        let primary_setter = primary
            .and_then(|name| properties.iter().find(|p| same_identifier(p.name, &name)))
            .and_then(|p| p.set)
            .map(|set| Arc::new(set) as PrimarySetter<E>);
        if primary_setter.is_none() {
            log::trace!("{} has no writable primary property", entity.name);
        }
        Ok(ExecutionContext {
            command_text,
            input_fields,
            parameter_setter,
            primary_setter,
        })
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
}

/// Requested fields, every property of the entity when none.
fn requested_fields<E: Entity>(fields: &[Field]) -> Result<Vec<Field>> {
    if !fields.is_empty() {
        return Ok(fields.to_vec());
    }
    E::properties()
        .iter()
        .map(|p| Field::typed(p.name, p.value.clone()))
        .collect()
}
