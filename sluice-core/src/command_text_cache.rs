use crate::{
    CommandKey, DialectRegistry, Field, FieldReconciler, Operation, OperationRequest, Result,
    SchemaField, SqlWriter, Statement, ValidationError, reconcile_fields, resolve_identity,
    resolve_primary, truncate_long,
};
use futures::FutureExt;
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Whether building the text of the operation looks at the table columns.
fn needs_schema(operation: &Operation) -> bool {
    !matches!(
        operation,
        Operation::Count { .. }
            | Operation::CountAll
            | Operation::Delete { .. }
            | Operation::DeleteAll
            | Operation::Truncate
            | Operation::QueryMultiple { .. }
    )
}

/// Fields spelled as their matching column, quoted identifiers are case sensitive in some dialects.
fn column_spelling(schema: &[SchemaField], fields: &[Field]) -> Result<Vec<Field>> {
    fields
        .iter()
        .map(|field| {
            let name = field.unquoted_name();
            match schema.iter().find(|column| column.matches(&name)) {
                Some(column) => column.as_field(),
                None => Ok(field.clone()),
            }
        })
        .collect()
}

/// Generated SQL text per request shape.
///
/// The text is built outside of the lock, two threads missing the same key at
/// once both build it and the last one stores it, the texts are identical.
pub struct CommandTextCache {
    reconciler: Arc<FieldReconciler>,
    registry: Arc<DialectRegistry>,
    entries: RwLock<HashMap<CommandKey, Arc<str>>>,
    builds: AtomicUsize,
}

impl CommandTextCache {
    pub fn new(reconciler: Arc<FieldReconciler>, registry: Arc<DialectRegistry>) -> Self {
        Self {
            reconciler,
            registry,
            entries: Default::default(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Builder given with the request, otherwise the one registered for its connection.
    pub fn statement_builder(&self, request: &OperationRequest) -> Result<Arc<dyn SqlWriter>> {
        match request.statement_builder() {
            Some(writer) => Ok(writer.clone()),
            None => self.registry.resolve(request.connection()),
        }
    }

    fn lookup(&self, key: &CommandKey) -> Option<Arc<str>> {
        let text = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        if text.is_some() {
            log::trace!("Command text hit: {}", key.as_str());
        }
        text
    }

    fn store(&self, request: &OperationRequest, text: String) -> Arc<str> {
        self.builds.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Built the {} command text for `{}`: {}",
            request.operation().name(),
            request.table(),
            truncate_long!(text)
        );
        let text: Arc<str> = text.into();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.key().clone(), text.clone());
        text
    }

    pub fn get(&self, request: &OperationRequest) -> Result<Arc<str>> {
        if let Some(text) = self.lookup(request.key()) {
            return Ok(text);
        }
        let text = match request.operation() {
            Operation::QueryMultiple { queries } => {
                let mut texts = Vec::with_capacity(queries.len());
                for query in queries {
                    texts.push(self.get(query)?);
                }
                texts.join("\n")
            }
            operation => {
                let schema = if needs_schema(operation) {
                    Some(self.reconciler.schema().get(
                        request.connection(),
                        request.table(),
                        request.transaction(),
                    )?)
                } else {
                    None
                };
                self.build(request, schema.as_deref().unwrap_or_default())?
            }
        };
        Ok(self.store(request, text))
    }

    /// Same as [`CommandTextCache::get`], a schema fetch stops as soon as `cancellation` completes.
    pub async fn get_async(
        &self,
        request: &OperationRequest<'_>,
        cancellation: impl Future<Output = ()>,
    ) -> Result<Arc<str>> {
        if let Some(text) = self.lookup(request.key()) {
            return Ok(text);
        }
        let cancellation = cancellation.shared();
        let text = match request.operation() {
            Operation::QueryMultiple { queries } => {
                let mut texts = Vec::with_capacity(queries.len());
                for query in queries {
                    let text = match self.lookup(query.key()) {
                        Some(text) => text,
                        None => {
                            let text = self.build_async(query, cancellation.clone()).await?;
                            self.store(query, text)
                        }
                    };
                    texts.push(text);
                }
                texts.join("\n")
            }
            _ => self.build_async(request, cancellation).await?,
        };
        Ok(self.store(request, text))
    }

    async fn build_async(
        &self,
        request: &OperationRequest<'_>,
        cancellation: impl Future<Output = ()>,
    ) -> Result<String> {
        let schema = if needs_schema(request.operation()) {
            Some(
                self.reconciler
                    .schema()
                    .get_async(
                        request.connection(),
                        request.table(),
                        request.transaction(),
                        cancellation,
                    )
                    .await?,
            )
        } else {
            None
        };
        self.build(request, schema.as_deref().unwrap_or_default())
    }

    /// Text of a single statement, `schema` is empty for the operations not needing it.
    fn build(&self, request: &OperationRequest, schema: &[SchemaField]) -> Result<String> {
        let writer = self.statement_builder(request)?;
        let mappings = self.reconciler.mappings();
        let primary = resolve_primary(mappings, request.entity(), schema);
        let identity = resolve_identity(mappings, request.entity(), schema);
        let fields = match reconcile_fields(schema, request.fields()) {
            Some(fields) => column_spelling(schema, &fields)?,
            None => schema
                .iter()
                .map(SchemaField::as_field)
                .collect::<Result<Vec<Field>>>()?,
        };
        let qualifiers = column_spelling(schema, request.qualifiers())?;
        let statement = Statement::new(request.table(), &fields)
            .hints(request.hints())
            .primary(primary.as_ref())
            .identity(identity.as_ref());
        let mut out = String::new();
        match request.operation() {
            Operation::Query {
                predicate,
                order_by,
                top,
            } => writer.write_query(&mut out, &statement, predicate.as_ref(), order_by, *top)?,
            Operation::QueryAll { order_by } => {
                writer.write_query_all(&mut out, &statement, order_by)?
            }
            Operation::BatchQuery {
                predicate,
                order_by,
                page,
                rows_per_batch,
            } => writer.write_batch_query(
                &mut out,
                &statement,
                predicate.as_ref(),
                order_by,
                *page,
                *rows_per_batch,
            )?,
            Operation::Count { predicate } => {
                writer.write_count(&mut out, &statement, predicate.as_ref())?
            }
            Operation::CountAll => writer.write_count_all(&mut out, &statement)?,
            Operation::Delete { predicate } => {
                writer.write_delete(&mut out, &statement, predicate.as_ref())?
            }
            Operation::DeleteAll => writer.write_delete_all(&mut out, &statement)?,
            Operation::Truncate => writer.write_truncate(&mut out, &statement)?,
            Operation::Insert => writer.write_insert(&mut out, &statement)?,
            Operation::InsertAll { batch_size } => {
                writer.write_insert_all(&mut out, &statement, *batch_size)?
            }
            Operation::Merge => writer.write_merge(&mut out, &statement, &qualifiers)?,
            Operation::MergeAll { batch_size } => {
                writer.write_merge_all(&mut out, &statement, &qualifiers, *batch_size)?
            }
            Operation::Update { predicate } => {
                writer.write_update(&mut out, &statement, predicate.as_ref())?
            }
            Operation::UpdateAll { batch_size } => {
                writer.write_update_all(&mut out, &statement, &qualifiers, *batch_size)?
            }
            Operation::QueryMultiple { .. } => {
                return Err(ValidationError::NotAQuery {
                    found: "QueryMultiple",
                }
                .into());
            }
        }
        Ok(out)
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

    /// Number of texts built since creation.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
