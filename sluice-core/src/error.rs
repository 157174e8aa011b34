use crate::Value;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// ConfigurationError
///
/// The engine is wired incorrectly, these are never retried.
///
#[derive(Debug, ThisError)]
pub enum ConfigurationError {
    #[error("There is no statement builder registered for the `{driver}` connection")]
    MissingDialect { driver: &'static str },

    #[error("The engine requires a schema provider")]
    MissingSchemaProvider,
}

///
/// ValidationError
///
/// The request is malformed, raised before any statement is generated.
///
#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("The field name must not be empty")]
    EmptyFieldName,

    #[error("The table name must not be empty")]
    EmptyTableName,

    #[error("The {operation} statement for `{table}` has no columns to write")]
    NoColumns {
        operation: &'static str,
        table: String,
    },

    #[error("The {operation} statement for `{table}` has no qualifiers and no primary field")]
    MissingQualifiers {
        operation: &'static str,
        table: String,
    },

    #[error("Entity `{entity}` has no property mapped to column `{column}`")]
    UnknownProperty {
        entity: &'static str,
        column: String,
    },

    #[error("The {operation} statement for `{table}` needs an order by field")]
    MissingOrderBy {
        operation: &'static str,
        table: String,
    },

    #[error("The batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("Query multiple only accepts query requests, found {found}")]
    NotAQuery { found: &'static str },

    #[error("Query multiple needs at least one query")]
    NoQueries,
}

///
/// MappingConflict
///
/// One or more bulk column mappings would truncate or reinterpret data.
///
#[derive(Debug, ThisError)]
#[error("Invalid bulk column mappings: {}", describe_conflicts(.conflicts))]
pub struct MappingConflict {
    pub conflicts: Vec<ConflictingMapping>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictingMapping {
    pub source_column: String,
    pub target_column: String,
    pub reason: ConflictReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictReason {
    EmptyName,
    UnknownSource,
    UnknownTarget,
    Incompatible { source_type: Value, target_type: Value },
}

impl Display for ConflictingMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (", self.source_column, self.target_column)?;
        match &self.reason {
            ConflictReason::EmptyName => f.write_str("empty column name")?,
            ConflictReason::UnknownSource => f.write_str("unknown source column")?,
            ConflictReason::UnknownTarget => f.write_str("unknown target column")?,
            ConflictReason::Incompatible {
                source_type,
                target_type,
            } => write!(f, "{} is not compatible with {}", source_type, target_type)?,
        }
        f.write_str(")")
    }
}

fn describe_conflicts(conflicts: &[ConflictingMapping]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

///
/// Cancelled
///
#[derive(Debug, ThisError)]
#[error("Fetching the schema of `{table}` was cancelled")]
pub struct Cancelled {
    pub table: String,
}
