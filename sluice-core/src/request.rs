use crate::{
    Connection, Field, Order, OrderField, Predicate, Result, SqlWriter, Transaction,
    ValidationError, normalize,
};
use std::{
    any::{self, TypeId},
    fmt::{self, Write},
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

/// Kind of statement requested, with the data specific to that kind.
#[derive(Debug, Clone)]
pub enum Operation<'c> {
    Query {
        predicate: Option<Predicate>,
        order_by: Vec<OrderField>,
        /// Maximum number of rows, zero means no limit.
        top: u32,
    },
    QueryAll {
        order_by: Vec<OrderField>,
    },
    BatchQuery {
        predicate: Option<Predicate>,
        order_by: Vec<OrderField>,
        /// Zero based page index.
        page: u32,
        rows_per_batch: u32,
    },
    Count {
        predicate: Option<Predicate>,
    },
    CountAll,
    Delete {
        predicate: Option<Predicate>,
    },
    DeleteAll,
    Insert,
    InsertAll {
        batch_size: usize,
    },
    Merge,
    MergeAll {
        batch_size: usize,
    },
    Update {
        predicate: Option<Predicate>,
    },
    UpdateAll {
        batch_size: usize,
    },
    Truncate,
    QueryMultiple {
        queries: Vec<OperationRequest<'c>>,
    },
}

impl<'c> Operation<'c> {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Query { .. } => "Query",
            Operation::QueryAll { .. } => "QueryAll",
            Operation::BatchQuery { .. } => "BatchQuery",
            Operation::Count { .. } => "Count",
            Operation::CountAll => "CountAll",
            Operation::Delete { .. } => "Delete",
            Operation::DeleteAll => "DeleteAll",
            Operation::Insert => "Insert",
            Operation::InsertAll { .. } => "InsertAll",
            Operation::Merge => "Merge",
            Operation::MergeAll { .. } => "MergeAll",
            Operation::Update { .. } => "Update",
            Operation::UpdateAll { .. } => "UpdateAll",
            Operation::Truncate => "Truncate",
            Operation::QueryMultiple { .. } => "QueryMultiple",
        }
    }

    pub fn query(predicate: Option<Predicate>) -> Self {
        Operation::Query {
            predicate,
            order_by: Vec::new(),
            top: 0,
        }
    }
}

/// Rust type bound to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityType {
    pub id: TypeId,
    pub name: &'static str,
}

impl EntityType {
    pub fn of<E: 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: any::type_name::<E>(),
        }
    }
}

/// Structural key of a request.
///
/// Built once from the normalized names (no quotes, case folded), field and
/// qualifier sets are sorted so the order they are listed in does not matter.
#[derive(Clone)]
pub struct CommandKey {
    text: Arc<str>,
    hash: u64,
}

impl CommandKey {
    fn new(text: String) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            text: text.into(),
            hash: hasher.finish(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for CommandKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.text == other.text
    }
}

impl Eq for CommandKey {}

impl Hash for CommandKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandKey").field(&self.text).finish()
    }
}

/// Declarative description of one statement against a table.
#[derive(Clone)]
pub struct OperationRequest<'c> {
    operation: Operation<'c>,
    table: String,
    entity: Option<EntityType>,
    fields: Vec<Field>,
    qualifiers: Vec<Field>,
    hints: Option<String>,
    statement_builder: Option<Arc<dyn SqlWriter>>,
    connection: &'c dyn Connection,
    transaction: Option<&'c dyn Transaction>,
    key: CommandKey,
}

impl<'c> OperationRequest<'c> {
    pub fn builder(
        connection: &'c dyn Connection,
        table: impl Into<String>,
        operation: Operation<'c>,
    ) -> RequestBuilder<'c> {
        RequestBuilder {
            operation,
            table: table.into(),
            entity: None,
            fields: Vec::new(),
            qualifiers: Vec::new(),
            hints: None,
            statement_builder: None,
            connection,
            transaction: None,
        }
    }

    pub fn operation(&self) -> &Operation<'c> {
        &self.operation
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn entity(&self) -> Option<EntityType> {
        self.entity
    }
    /// Requested fields, empty means every column of the table.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
    pub fn qualifiers(&self) -> &[Field] {
        &self.qualifiers
    }
    pub fn hints(&self) -> Option<&str> {
        self.hints.as_deref()
    }
    pub fn statement_builder(&self) -> Option<&Arc<dyn SqlWriter>> {
        self.statement_builder.as_ref()
    }
    pub fn connection(&self) -> &'c dyn Connection {
        self.connection
    }
    pub fn transaction(&self) -> Option<&'c dyn Transaction> {
        self.transaction
    }
    pub fn key(&self) -> &CommandKey {
        &self.key
    }
}

impl<'c> fmt::Debug for OperationRequest<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRequest")
            .field("operation", &self.operation.name())
            .field("table", &self.table)
            .field("key", &self.key)
            .finish()
    }
}

pub struct RequestBuilder<'c> {
    operation: Operation<'c>,
    table: String,
    entity: Option<EntityType>,
    fields: Vec<Field>,
    qualifiers: Vec<Field>,
    hints: Option<String>,
    statement_builder: Option<Arc<dyn SqlWriter>>,
    connection: &'c dyn Connection,
    transaction: Option<&'c dyn Transaction>,
}

impl<'c> RequestBuilder<'c> {
    pub fn entity<E: 'static>(mut self) -> Self {
        self.entity = Some(EntityType::of::<E>());
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    pub fn qualifiers(mut self, qualifiers: impl IntoIterator<Item = Field>) -> Self {
        self.qualifiers = qualifiers.into_iter().collect();
        self
    }

    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        let hints = hints.into();
        self.hints = (!hints.trim().is_empty()).then_some(hints);
        self
    }

    pub fn transaction(mut self, transaction: &'c dyn Transaction) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Use this statement builder instead of the one registered for the connection.
    pub fn statement_builder(mut self, writer: Arc<dyn SqlWriter>) -> Self {
        self.statement_builder = Some(writer);
        self
    }

    pub fn build(self) -> Result<OperationRequest<'c>> {
        if self.table.trim().is_empty() {
            return Err(ValidationError::EmptyTableName.into());
        }
        match &self.operation {
            Operation::BatchQuery { rows_per_batch, .. } if *rows_per_batch == 0 => {
                return Err(ValidationError::InvalidBatchSize.into());
            }
            Operation::InsertAll { batch_size }
            | Operation::MergeAll { batch_size }
            | Operation::UpdateAll { batch_size }
                if *batch_size == 0 =>
            {
                return Err(ValidationError::InvalidBatchSize.into());
            }
            Operation::QueryMultiple { queries } => {
                if queries.is_empty() {
                    return Err(ValidationError::NoQueries.into());
                }
                if let Some(other) = queries.iter().find(|v| {
                    !matches!(
                        v.operation,
                        Operation::Query { .. } | Operation::QueryAll { .. }
                    )
                }) {
                    return Err(ValidationError::NotAQuery {
                        found: other.operation.name(),
                    }
                    .into());
                }
            }
            _ => {}
        }
        let key = self.command_key();
        Ok(OperationRequest {
            operation: self.operation,
            table: self.table,
            entity: self.entity,
            fields: self.fields,
            qualifiers: self.qualifiers,
            hints: self.hints,
            statement_builder: self.statement_builder,
            connection: self.connection,
            transaction: self.transaction,
            key,
        })
    }

    fn command_key(&self) -> CommandKey {
        let mut out = String::with_capacity(128);
        let dialect = self
            .statement_builder
            .as_ref()
            .map(|v| v.name())
            .unwrap_or(self.connection.driver_name());
        let _ = write!(
            out,
            "{}|{}|{}|{}|",
            self.operation.name(),
            dialect,
            normalize(&self.table),
            self.entity.map(|v| v.name).unwrap_or_default(),
        );
        write_name_set(&mut out, &self.fields);
        out.push('|');
        write_name_set(&mut out, &self.qualifiers);
        out.push('|');
        out.push_str(self.hints.as_deref().map(str::trim).unwrap_or_default());
        out.push('|');
        match &self.operation {
            Operation::Query {
                predicate,
                order_by,
                top,
            } => {
                let _ = write!(out, "top={top};");
                write_order_by(&mut out, order_by);
                write_predicate(&mut out, predicate.as_ref());
            }
            Operation::QueryAll { order_by } => write_order_by(&mut out, order_by),
            Operation::BatchQuery {
                predicate,
                order_by,
                page,
                rows_per_batch,
            } => {
                let _ = write!(out, "page={page};rows={rows_per_batch};");
                write_order_by(&mut out, order_by);
                write_predicate(&mut out, predicate.as_ref());
            }
            Operation::Count { predicate }
            | Operation::Delete { predicate }
            | Operation::Update { predicate } => write_predicate(&mut out, predicate.as_ref()),
            Operation::InsertAll { batch_size }
            | Operation::MergeAll { batch_size }
            | Operation::UpdateAll { batch_size } => {
                let _ = write!(out, "batch={batch_size};");
            }
            Operation::QueryMultiple { queries } => {
                for query in queries {
                    out.push('{');
                    out.push_str(query.key.as_str());
                    out.push('}');
                }
            }
            Operation::CountAll
            | Operation::DeleteAll
            | Operation::Insert
            | Operation::Merge
            | Operation::Truncate => {}
        }
        CommandKey::new(out)
    }
}

fn write_name_set(out: &mut String, fields: &[Field]) {
    let mut names = fields.iter().map(|v| normalize(v.name())).collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();
    out.push_str(&names.join(","));
}

fn write_order_by(out: &mut String, order_by: &[OrderField]) {
    out.push_str("order=");
    for (i, v) in order_by.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&normalize(v.field.name()));
        out.push_str(match v.order {
            Order::Asc => " asc",
            Order::Desc => " desc",
        });
    }
    out.push(';');
}

fn write_predicate(out: &mut String, predicate: Option<&Predicate>) {
    out.push_str("where=");
    if let Some(predicate) = predicate.filter(|v| !v.is_empty()) {
        out.push_str(&predicate.fingerprint());
    }
    out.push(';');
}
