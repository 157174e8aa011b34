use crate::{InMemorySchemaProvider, Person, TestConnection, TestTransaction, engine, silent_logs};
use sluice_core::{ConfigurationError, Driver, Field, Operation, OperationRequest};
use std::sync::Arc;

pub async fn caching<D: Driver>(driver: D) {
    let provider = Arc::new(InMemorySchemaProvider::standard());
    let engine = engine(driver, provider.clone());
    let connection = TestConnection::of::<D>();
    let cache = engine.command_text();
    let query = |fields: &[&'static str], hints: &str| {
        OperationRequest::builder(&connection, "Person", Operation::query(None))
            .entity::<Person>()
            .fields(Field::from_names(fields.iter().copied()).expect("Valid field names"))
            .hints(hints)
            .build()
            .expect("Could not build the query request")
    };

    // Field order does not change the shape
    let first = cache
        .get(&query(&["Name", "Age"], ""))
        .expect("Could not build the query text");
    let second = cache
        .get(&query(&["Age", "[Name]"], ""))
        .expect("Could not build the query text");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.builds(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(provider.fetches(), 1);

    // Hints do
    let hinted = cache
        .get(&query(&["Name", "Age"], "WITH (NOLOCK)"))
        .expect("Could not build the hinted query text");
    assert_ne!(first, hinted);
    assert!(hinted.contains("WITH (NOLOCK)"));
    assert_eq!(cache.builds(), 2);
    assert_eq!(provider.fetches(), 1);

    // So do the qualifiers
    let merge = |qualifiers: &[&'static str]| {
        OperationRequest::builder(&connection, "Person", Operation::Merge)
            .entity::<Person>()
            .qualifiers(Field::from_names(qualifiers.iter().copied()).expect("Valid field names"))
            .build()
            .expect("Could not build the merge request")
    };
    let by_primary = cache.get(&merge(&[])).expect("Could not build the merge text");
    let by_name = cache
        .get(&merge(&["Name"]))
        .expect("Could not build the merge text");
    assert_ne!(by_primary, by_name);
    assert_eq!(cache.builds(), 4);

    // The table name is matched ignoring quotes and case
    let schema = engine.schema();
    let columns = schema
        .get(&connection, "[PERSON]", None)
        .expect("Could not get the columns");
    assert_eq!(columns.len(), 4);
    assert_eq!(schema.len(), 1);
    assert_eq!(provider.fetches(), 1);

    // Flushing forces everything to be built again
    engine.flush();
    assert!(cache.is_empty());
    assert!(schema.is_empty());
    assert!(engine.contexts().is_empty());
    let transaction = TestTransaction;
    let rebuilt = cache
        .get(
            &OperationRequest::builder(&connection, "Person", Operation::query(None))
                .entity::<Person>()
                .fields(Field::from_names(["Name", "Age"]).expect("Valid field names"))
                .transaction(&transaction)
                .build()
                .expect("Could not build the query request"),
        )
        .expect("Could not build the query text");
    assert_eq!(first, rebuilt);
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(cache.builds(), 5);
    assert_eq!(provider.fetches(), 2);
    assert_eq!(provider.transactional_fetches(), 1);

    // Connections of other drivers have no statement builder
    let unregistered = TestConnection::new("unregistered");
    silent_logs! {
        let error = cache
            .get(
                &OperationRequest::builder(&unregistered, "Person", Operation::CountAll)
                    .build()
                    .expect("Could not build the count request"),
            )
            .expect_err("The driver has no statement builder");
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingDialect { driver: "unregistered" })
        ));
    }
    assert_eq!(cache.builds(), 5);
}
