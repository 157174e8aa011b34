#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sluice::{
        ConfigurationError, ContextKind, ContextOptions, Driver, Engine, Field, GenericSqlWriter,
        Operation, OperationRequest, OrderField, ValidationError, future,
    };
    use sluice_mysql::MySQLDriver;
    use sluice_postgres::{PostgresDriver, PostgresSqlWriter};
    use sluice_sqlserver::SqlServerDriver;
    use sluice_tests::{
        InMemorySchemaProvider, Person, TestConnection, engine, init_logs, standard_mappings,
    };
    use std::sync::Arc;

    const SQLSERVER: TestConnection = TestConnection::new(SqlServerDriver::NAME);
    const UNREGISTERED: TestConnection = TestConnection::new("oracle");

    fn validation_error(error: &sluice::Error) -> &ValidationError {
        error
            .downcast_ref::<ValidationError>()
            .expect("Expected a validation error")
    }

    #[test]
    fn engine_without_schema_provider() {
        init_logs();
        let Err(error) = Engine::builder().dialect(SqlServerDriver::new()).build() else {
            panic!("The engine must not build without a schema provider");
        };
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingSchemaProvider)
        ));
    }

    #[test]
    fn connection_without_dialect() {
        init_logs();
        let engine = engine(
            SqlServerDriver::new(),
            Arc::new(InMemorySchemaProvider::standard()),
        );
        assert_eq!(engine.registry().len(), 1);
        assert!(engine.registry().lookup(SqlServerDriver::NAME).is_some());
        assert!(engine.registry().lookup("oracle").is_none());

        let request = OperationRequest::builder(&UNREGISTERED, "Person", Operation::CountAll)
            .build()
            .expect("Could not build the request");
        let error = engine
            .command_text()
            .get(&request)
            .expect_err("There is no dialect for the connection");
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingDialect { driver: "oracle" })
        ));
        assert!(engine.command_text().is_empty());

        let error = engine
            .contexts()
            .create::<Person>(
                ContextKind::Insert,
                &UNREGISTERED,
                "Person",
                ContextOptions::default(),
            )
            .expect_err("There is no dialect for the connection");
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingDialect { .. })
        ));
        assert!(engine.contexts().is_empty());
    }

    #[test]
    fn explicit_statement_builder() {
        init_logs();
        let engine = engine(
            SqlServerDriver::new(),
            Arc::new(InMemorySchemaProvider::standard()),
        );
        let postgres = OperationRequest::builder(&UNREGISTERED, "Person", Operation::CountAll)
            .statement_builder(Arc::new(PostgresSqlWriter::default()))
            .build()
            .expect("Could not build the request");
        assert!(
            postgres
                .key()
                .as_str()
                .starts_with("CountAll|postgres|person|")
        );
        assert_eq!(
            &*engine
                .command_text()
                .get(&postgres)
                .expect("Could not build the command text"),
            indoc! {r#"
                SELECT COUNT(*) AS "Counted"
                FROM "Person";
            "#}
            .trim()
        );

        // Same shape, different writer
        let generic = OperationRequest::builder(&UNREGISTERED, "Person", Operation::CountAll)
            .statement_builder(Arc::new(GenericSqlWriter::new()))
            .build()
            .expect("Could not build the request");
        assert_ne!(postgres.key(), generic.key());
        engine
            .command_text()
            .get(&generic)
            .expect("Could not build the command text");
        assert_eq!(engine.command_text().len(), 2);

        // The explicit builder wins over the registered one
        let sqlserver = OperationRequest::builder(&SQLSERVER, "Person", Operation::CountAll)
            .statement_builder(Arc::new(PostgresSqlWriter::default()))
            .build()
            .expect("Could not build the request");
        assert_eq!(sqlserver.key(), postgres.key());
        assert_eq!(engine.command_text().builds(), 2);
    }

    #[tokio::test]
    async fn several_dialects() {
        init_logs();
        let engine = Engine::builder()
            .schema_provider(Arc::new(InMemorySchemaProvider::standard()))
            .mappings(standard_mappings())
            .dialect(SqlServerDriver::new())
            .dialect(PostgresDriver::new())
            .dialect(MySQLDriver::new())
            .build()
            .expect("Could not build the engine");
        assert_eq!(engine.registry().len(), 3);
        let connections = [
            TestConnection::of::<SqlServerDriver>(),
            TestConnection::of::<PostgresDriver>(),
            TestConnection::of::<MySQLDriver>(),
        ];
        let mut texts = Vec::new();
        for connection in &connections {
            let request = OperationRequest::builder(connection, "Person", Operation::Insert)
                .entity::<Person>()
                .fields(Field::from_names(["Name"]).expect("Valid field names"))
                .build()
                .expect("Could not build the request");
            let text = engine
                .command_text()
                .get_async(&request, future::pending())
                .await
                .expect("Could not build the command text");
            texts.push(text.to_string());
        }
        assert_eq!(
            texts,
            [
                "INSERT INTO [Person] ([Name])\nVALUES (@Name);\nSELECT SCOPE_IDENTITY() AS [Result];",
                "INSERT INTO \"Person\" (\"Name\")\nVALUES (@Name)\nRETURNING \"Id\";",
                "INSERT INTO `Person` (`Name`)\nVALUES (@Name);\nSELECT LAST_INSERT_ID() AS `Result`;",
            ]
        );
        // One schema entry per driver
        assert_eq!(engine.schema().len(), 3);
        engine.flush();
        assert!(engine.schema().is_empty());
        assert!(engine.command_text().is_empty());
    }

    #[test]
    fn request_validation() {
        let error = OperationRequest::builder(&SQLSERVER, "  ", Operation::CountAll)
            .build()
            .expect_err("The table name is blank");
        assert!(matches!(
            validation_error(&error),
            ValidationError::EmptyTableName
        ));

        let error = OperationRequest::builder(
            &SQLSERVER,
            "Person",
            Operation::BatchQuery {
                predicate: None,
                order_by: Vec::new(),
                page: 0,
                rows_per_batch: 0,
            },
        )
        .build()
        .expect_err("A batch of zero rows");
        assert!(matches!(
            validation_error(&error),
            ValidationError::InvalidBatchSize
        ));

        let error = OperationRequest::builder(
            &SQLSERVER,
            "Person",
            Operation::InsertAll { batch_size: 0 },
        )
        .build()
        .expect_err("A batch of zero rows");
        assert!(matches!(
            validation_error(&error),
            ValidationError::InvalidBatchSize
        ));

        let error = OperationRequest::builder(
            &SQLSERVER,
            "Person",
            Operation::QueryMultiple {
                queries: Vec::new(),
            },
        )
        .build()
        .expect_err("No queries to combine");
        assert!(matches!(
            validation_error(&error),
            ValidationError::NoQueries
        ));

        let count = OperationRequest::builder(&SQLSERVER, "Person", Operation::CountAll)
            .build()
            .expect("Could not build the request");
        let query = OperationRequest::builder(
            &SQLSERVER,
            "Person",
            Operation::QueryAll {
                order_by: vec![OrderField::asc("Name").expect("Valid order")],
            },
        )
        .build()
        .expect("Could not build the request");
        let error = OperationRequest::builder(
            &SQLSERVER,
            "Person",
            Operation::QueryMultiple {
                queries: vec![query, count],
            },
        )
        .build()
        .expect_err("Count is not a query");
        assert!(matches!(
            validation_error(&error),
            ValidationError::NotAQuery { found: "CountAll" }
        ));

        let error = Field::new(" ").expect_err("The field name is blank");
        assert!(matches!(
            validation_error(&error),
            ValidationError::EmptyFieldName
        ));
        assert!(Field::from_names(["Name", ""]).is_err());
    }

    #[test]
    fn request_keys() {
        let build = |table: &'static str, fields: &[&'static str]| {
            OperationRequest::builder(&SQLSERVER, table, Operation::Insert)
                .entity::<Person>()
                .fields(Field::from_names(fields.iter().copied()).expect("Valid field names"))
                .build()
                .expect("Could not build the request")
        };
        assert_eq!(
            build("Person", &["Name", "Age"]).key(),
            build("[PERSON]", &["age", "[Name]"]).key()
        );
        assert_eq!(
            build("Person", &["Name", "Name"]).key(),
            build("Person", &["Name"]).key()
        );
        assert_ne!(
            build("Person", &["Name"]).key(),
            build("Person", &["Name", "Age"]).key()
        );
        assert_ne!(
            build("Person", &["Name"]).key(),
            build("[dbo].[Person]", &["Name"]).key()
        );
        let untyped = OperationRequest::builder(&SQLSERVER, "Person", Operation::Insert)
            .fields(Field::from_names(["Name"]).expect("Valid field names"))
            .build()
            .expect("Could not build the request");
        assert_ne!(build("Person", &["Name"]).key(), untyped.key());
    }
}
