use crate::{InMemorySchemaProvider, LedgerEntry, Person, TestConnection, engine};
use sluice_core::{
    Driver, Engine, EntityMappings, EntityType, Field, Operation, OperationRequest, Value,
};
use std::sync::Arc;

pub async fn reconciliation<D: Driver + Clone>(driver: D) {
    let provider = Arc::new(InMemorySchemaProvider::standard());
    let engine = engine(driver.clone(), provider.clone());
    let connection = TestConnection::of::<D>();
    let reconciler = engine.reconciler();

    // Nothing requested means every column, without looking at the table
    let fields = reconciler
        .reconcile(&connection, "Person", &[], None)
        .expect("Could not reconcile the fields");
    assert_eq!(fields, None);
    assert_eq!(provider.fetches(), 0);

    // Unknown columns are dropped, the requested spelling is kept
    let fields = reconciler
        .reconcile(
            &connection,
            "Person",
            &Field::from_names(["[Name]", "Nickname", "age"]).expect("Valid field names"),
            None,
        )
        .expect("Could not reconcile the fields")
        .expect("Fields were requested");
    assert_eq!(
        fields.iter().map(Field::name).collect::<Vec<_>>(),
        ["[Name]", "age"]
    );

    // Statements spell the columns as the table does
    let text = engine
        .command_text()
        .get(
            &OperationRequest::builder(
                &connection,
                "Person",
                Operation::QueryAll {
                    order_by: Vec::new(),
                },
            )
            .fields(Field::from_names(["name", "AGE"]).expect("Valid field names"))
            .build()
            .expect("Could not build the query request"),
        )
        .expect("Could not build the query text");
    assert!(text.contains("Name") && text.contains("Age"));
    assert!(!text.contains("name") && !text.contains("AGE"));

    // A primary assigned by the caller is echoed back, not the identity
    let text = engine
        .command_text()
        .get(
            &OperationRequest::builder(&connection, "Orders", Operation::Insert)
                .build()
                .expect("Could not build the insert request"),
        )
        .expect("Could not build the insert text");
    assert!(text.contains("Id") && !text.contains("Seq"));
    assert!(!text.contains("SCOPE_IDENTITY") && !text.contains("LAST_INSERT_ID"));

    // Declared primary and identity
    let person = Some(EntityType::of::<Person>());
    let primary = reconciler
        .primary(&connection, "Person", person, None)
        .expect("Could not resolve the primary")
        .expect("Person has a primary");
    assert_eq!(primary.name, "Id");
    assert!(primary.primary);
    assert!(primary.identity);

    // No declaration and no key in the table
    let ledger = Some(EntityType::of::<LedgerEntry>());
    assert_eq!(
        reconciler
            .primary(&connection, "[dbo].[Ledger]", ledger, None)
            .expect("Could not resolve the primary"),
        None
    );
    assert_eq!(
        reconciler
            .identity(&connection, "[dbo].[Ledger]", ledger, None)
            .expect("Could not resolve the identity"),
        None
    );

    // A declaration wins over the table, the flags are only shared when both name the same property
    let mut mappings = EntityMappings::new();
    mappings
        .register::<Person>()
        .primary_override::<Person>("Name", Value::Varchar(None));
    let overridden = Engine::builder()
        .schema_provider(provider.clone())
        .mappings(mappings)
        .dialect(driver)
        .build()
        .expect("Could not build the engine");
    let primary = overridden
        .reconciler()
        .primary(&connection, "Person", person, None)
        .expect("Could not resolve the primary")
        .expect("Person has a primary");
    assert_eq!(primary.name, "Name");
    assert!(!primary.identity);
    let identity = overridden
        .reconciler()
        .identity(&connection, "Person", person, None)
        .expect("Could not resolve the identity")
        .expect("Person has an identity");
    assert_eq!(identity.name, "Id");
    assert!(!identity.primary);

    // The statements follow the declaration
    let text = overridden
        .command_text()
        .get(
            &OperationRequest::builder(&connection, "Person", Operation::Update { predicate: None })
                .entity::<Person>()
                .fields(Field::from_names(["Name", "Age"]).expect("Valid field names"))
                .build()
                .expect("Could not build the update request"),
        )
        .expect("Could not build the update text");
    assert!(text.contains("Age"));
    assert!(text.contains("WHERE"));
    assert!(!text.contains("Id"));
    let text = overridden
        .command_text()
        .get(
            &OperationRequest::builder(&connection, "Person", Operation::Insert)
                .entity::<Person>()
                .build()
                .expect("Could not build the insert request"),
        )
        .expect("Could not build the insert text");
    assert!(text.contains("Name") && !text.contains("Id"));
    assert!(!text.contains("SCOPE_IDENTITY") && !text.contains("LAST_INSERT_ID"));
}
