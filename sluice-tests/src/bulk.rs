use crate::{InMemorySchemaProvider, LedgerEntry, Person, TestConnection, engine};
use sluice_core::{
    BulkColumnMapping, ConflictReason, Driver, MappingConflict, SchemaField, Value,
    validate_mappings,
};
use std::sync::Arc;

pub async fn bulk<D: Driver>(driver: D) {
    let provider = Arc::new(InMemorySchemaProvider::standard());
    let engine = engine(driver, provider);
    let connection = TestConnection::of::<D>();

    // Matching storage types
    engine
        .validate_bulk_mappings::<Person>(
            &connection,
            "Person",
            &[
                BulkColumnMapping::new("Name", "Name"),
                BulkColumnMapping::new("Age", "[Age]"),
                BulkColumnMapping::new("Id", "Id"),
            ],
            None,
        )
        .expect("Compatible mappings were rejected");

    // Integers widen into floating point columns
    engine
        .validate_bulk_mappings::<Person>(
            &connection,
            "[dbo].[Ledger]",
            &[BulkColumnMapping::new("Age", "Amount")],
            None,
        )
        .expect("Integer into float was rejected");

    // Text and numbers swapped, every conflict is reported
    let error = engine
        .validate_bulk_mappings::<LedgerEntry>(
            &connection,
            "Person",
            &[
                BulkColumnMapping::new("Code", "Age"),
                BulkColumnMapping::new("Amount", "Name"),
                BulkColumnMapping::new("Note", "Name"),
            ],
            None,
        )
        .expect_err("Swapped columns were accepted");
    let conflict = error
        .downcast_ref::<MappingConflict>()
        .expect("Expected a mapping conflict");
    assert_eq!(conflict.conflicts.len(), 2);
    assert_eq!(conflict.conflicts[0].source_column, "Code");
    assert_eq!(conflict.conflicts[0].target_column, "Age");
    assert_eq!(
        conflict.conflicts[0].reason,
        ConflictReason::Incompatible {
            source_type: Value::Varchar(None),
            target_type: Value::Int32(None),
        }
    );
    assert_eq!(conflict.conflicts[1].source_column, "Amount");

    // Unknown and empty names
    let source = [SchemaField::new("Amount", Value::Float64(None))];
    let target = [SchemaField::new("Total", Value::Decimal(None, 18, 2))];
    validate_mappings(&[BulkColumnMapping::new("Amount", "Total")], &source, &target)
        .expect("Float into decimal was rejected");
    let error = validate_mappings(
        &[
            BulkColumnMapping::new("Amount", "Missing"),
            BulkColumnMapping::new("Missing", "Total"),
            BulkColumnMapping::new(" ", "Total"),
        ],
        &source,
        &target,
    )
    .expect_err("Unknown columns were accepted");
    let reasons = error
        .downcast_ref::<MappingConflict>()
        .expect("Expected a mapping conflict")
        .conflicts
        .iter()
        .map(|v| v.reason.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        reasons,
        [
            ConflictReason::UnknownTarget,
            ConflictReason::UnknownSource,
            ConflictReason::EmptyName,
        ]
    );
}
