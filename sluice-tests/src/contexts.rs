use crate::{InMemorySchemaProvider, LedgerEntry, Person, TestConnection, engine};
use sluice_core::{
    ContextKind, ContextOptions, Driver, Field, Parameter, ValidationError, Value,
};
use std::sync::Arc;

pub async fn contexts<D: Driver>(driver: D) {
    let provider = Arc::new(InMemorySchemaProvider::standard());
    let engine = engine(driver, provider.clone());
    let connection = TestConnection::of::<D>();
    let contexts = engine.contexts();

    // Insert leaves the identity to the database and writes it back
    let insert = contexts
        .create::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions::default(),
        )
        .expect("Could not create the insert context");
    assert_eq!(
        insert
            .input_fields
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>(),
        ["Name", "Age"]
    );
    let mut person = Person {
        id: 0,
        name: "Ada".into(),
        age: Some(36),
    };
    assert_eq!(
        insert.parameters(&person),
        [
            Parameter::new("Name", Value::Varchar(Some("Ada".into()))),
            Parameter::new("Age", Value::Int32(Some(36))),
        ]
    );
    assert!(
        insert
            .set_primary(&mut person, Value::Int64(Some(7)))
            .expect("Could not set the primary")
    );
    assert_eq!(person.id, 7);
    let again = contexts
        .create::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions::default(),
        )
        .expect("Could not create the insert context");
    assert!(Arc::ptr_eq(&insert, &again));
    assert_eq!(contexts.len(), 1);
    assert_eq!(provider.fetches(), 1);

    // Update binds the key too
    let update = contexts
        .create::<Person>(
            ContextKind::Update,
            &connection,
            "Person",
            ContextOptions::default(),
        )
        .expect("Could not create the update context");
    assert_eq!(
        update
            .input_fields
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>(),
        ["Id", "Name", "Age"]
    );
    assert_ne!(insert.command_text, update.command_text);
    assert_eq!(update.parameters(&person)[0], Parameter::new("Id", Value::Int64(Some(7))));

    // A subset of the properties
    let named = contexts
        .create::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions {
                fields: Field::from_names(["Name"]).expect("Valid field names"),
                ..Default::default()
            },
        )
        .expect("Could not create the insert context");
    assert_eq!(named.parameters(&person).len(), 1);
    assert!(!Arc::ptr_eq(&insert, &named));

    // The key is bound even when the fields leave it out
    for kind in [ContextKind::Merge, ContextKind::Update] {
        let context = contexts
            .create::<Person>(
                kind,
                &connection,
                "Person",
                ContextOptions {
                    fields: Field::from_names(["Name", "Age"]).expect("Valid field names"),
                    ..Default::default()
                },
            )
            .expect("Could not create the context");
        let parameters = context.parameters(&person);
        assert_eq!(
            parameters.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            ["Id", "Name", "Age"]
        );
        for name in placeholders(&context.command_text) {
            assert!(
                parameters.iter().any(|v| v.name == name),
                "@{name} of {} is not bound",
                kind.name()
            );
        }
    }

    // Without a primary there is nowhere to write the key back
    let ledger = LedgerEntry {
        code: "A-1".into(),
        amount: 12.5,
        note: None,
    };
    let merge = |qualifiers: &[&'static str]| {
        contexts.create::<LedgerEntry>(
            ContextKind::Merge,
            &connection,
            "[dbo].[Ledger]",
            ContextOptions {
                qualifiers: Field::from_names(qualifiers.iter().copied())
                    .expect("Valid field names"),
                ..Default::default()
            },
        )
    };
    let by_code = merge(&["Code"]).expect("Could not create the merge context");
    assert!(by_code.primary_setter.is_none());
    let mut copy = ledger.clone();
    assert!(
        !by_code
            .set_primary(&mut copy, Value::Int64(Some(1)))
            .expect("Could not set the primary")
    );
    assert_eq!(copy, ledger);
    assert_eq!(
        by_code.parameters(&ledger),
        [
            Parameter::new("Code", Value::Varchar(Some("A-1".into()))),
            Parameter::new("Amount", Value::Float64(Some(12.5))),
            Parameter::new("Note", Value::Varchar(None)),
        ]
    );
    let by_code_and_note = merge(&["Code", "Note"]).expect("Could not create the merge context");
    assert_ne!(by_code.command_text, by_code_and_note.command_text);

    // Nothing to match on
    let count = contexts.len();
    let error = merge(&[]).expect_err("A merge without qualifiers and primary must fail");
    assert!(matches!(
        error.downcast_ref::<ValidationError>(),
        Some(ValidationError::MissingQualifiers { .. })
    ));
    assert_eq!(contexts.len(), count);

    // Columns of the table that the entity does not have
    let error = contexts
        .create::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions {
                fields: Field::from_names(["Email"]).expect("Valid field names"),
                ..Default::default()
            },
        )
        .expect_err("Email is not a property of Person");
    assert!(matches!(
        error.downcast_ref::<ValidationError>(),
        Some(ValidationError::UnknownProperty { .. })
    ));
}

/// Names of the `@` parameters in a command text.
fn placeholders(text: &str) -> Vec<&str> {
    text.split('@')
        .skip(1)
        .map(|v| {
            let end = v
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(v.len());
            &v[..end]
        })
        .collect()
}
