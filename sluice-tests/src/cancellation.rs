use crate::{InMemorySchemaProvider, Person, TestConnection, engine};
use futures::future;
use sluice_core::{Cancelled, ContextKind, ContextOptions, Driver, Operation, OperationRequest};
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;

pub async fn cancellation<D: Driver>(driver: D) {
    let provider = Arc::new(InMemorySchemaProvider::standard());
    let engine = engine(driver, provider.clone());
    let connection = TestConnection::of::<D>();
    provider.set_stalled(true);

    // A cancelled fetch leaves nothing behind
    let error = engine
        .schema()
        .get_async(&connection, "Person", None, sleep(Duration::from_millis(10)))
        .await
        .expect_err("The fetch should have been cancelled");
    assert!(error.downcast_ref::<Cancelled>().is_some());
    assert!(engine.schema().is_empty());

    let request = OperationRequest::builder(&connection, "Person", Operation::Insert)
        .entity::<Person>()
        .build()
        .expect("Could not build the insert request");
    let error = engine
        .command_text()
        .get_async(&request, future::ready(()))
        .await
        .expect_err("The build should have been cancelled");
    assert!(error.downcast_ref::<Cancelled>().is_some());
    assert!(engine.command_text().is_empty());

    let error = engine
        .contexts()
        .create_async::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions::default(),
            future::ready(()),
        )
        .await
        .expect_err("The context should have been cancelled");
    assert!(error.downcast_ref::<Cancelled>().is_some());
    assert!(engine.contexts().is_empty());

    // The next attempt fetches again
    provider.set_stalled(false);
    let text = engine
        .command_text()
        .get_async(&request, future::pending::<()>())
        .await
        .expect("Could not build the insert text");
    assert!(text.contains("INSERT INTO"));
    assert_eq!(engine.schema().len(), 1);
    assert_eq!(provider.fetches(), 1);

    // Cached entries never wait on the cancellation
    let context = engine
        .contexts()
        .create_async::<Person>(
            ContextKind::Insert,
            &connection,
            "Person",
            ContextOptions::default(),
            future::ready(()),
        )
        .await
        .expect("Could not create the insert context");
    assert!(context.command_text.contains("INSERT INTO"));
    assert_eq!(provider.fetches(), 1);
}
