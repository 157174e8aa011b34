use crate::{
    ConflictReason, ConflictingMapping, Entity, MappingConflict, Result, SchemaField,
};

/// Source column copied into a target column by a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BulkColumnMapping {
    pub source: String,
    pub target: String,
}

impl BulkColumnMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

fn check(
    mapping: &BulkColumnMapping,
    source_columns: &[SchemaField],
    target_columns: &[SchemaField],
) -> Option<ConflictReason> {
    if mapping.source.trim().is_empty() || mapping.target.trim().is_empty() {
        return Some(ConflictReason::EmptyName);
    }
    let Some(source) = source_columns.iter().find(|v| v.matches(&mapping.source)) else {
        return Some(ConflictReason::UnknownSource);
    };
    let Some(target) = target_columns.iter().find(|v| v.matches(&mapping.target)) else {
        return Some(ConflictReason::UnknownTarget);
    };
    (!source.value.is_compatible_with(&target.value)).then(|| ConflictReason::Incompatible {
        source_type: source.value.clone(),
        target_type: target.value.clone(),
    })
}

/// Check that every mapping moves data between columns of compatible storage types.
///
/// All the offending mappings are reported together in a [`MappingConflict`].
pub fn validate_mappings(
    mappings: &[BulkColumnMapping],
    source_columns: &[SchemaField],
    target_columns: &[SchemaField],
) -> Result<()> {
    let conflicts = mappings
        .iter()
        .filter_map(|mapping| {
            check(mapping, source_columns, target_columns).map(|reason| ConflictingMapping {
                source_column: mapping.source.clone(),
                target_column: mapping.target.clone(),
                reason,
            })
        })
        .collect::<Vec<_>>();
    if !conflicts.is_empty() {
        log::debug!("Rejected {} bulk column mappings", conflicts.len());
        return Err(MappingConflict { conflicts }.into());
    }
    Ok(())
}

/// Same as [`validate_mappings`], the source columns are the properties of `E`.
pub fn validate_entity_mappings<E: Entity>(
    mappings: &[BulkColumnMapping],
    target_columns: &[SchemaField],
) -> Result<()> {
    let source_columns = E::properties()
        .iter()
        .map(|p| SchemaField::new(p.name, p.value.clone()))
        .collect::<Vec<_>>();
    validate_mappings(mappings, &source_columns, target_columns)
}
