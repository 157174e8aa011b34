#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sluice_core::{
        Comparison, Condition, Driver, Engine, Field, Operation, OperationRequest, OrderField,
        Predicate, RequestBuilder, SqlWriter, Statement, ValidationError,
    };
    use sluice_sqlserver::{SqlServerDriver, SqlServerSqlWriter};
    use sluice_tests::{
        InMemorySchemaProvider, LedgerEntry, Person, TestConnection, engine, execute_tests,
        init_logs,
    };
    use std::sync::{Arc, LazyLock};

    const CONNECTION: TestConnection = TestConnection::new(SqlServerDriver::NAME);
    static ENGINE: LazyLock<Engine> = LazyLock::new(|| {
        engine(
            SqlServerDriver::new(),
            Arc::new(InMemorySchemaProvider::standard()),
        )
    });

    fn person(operation: Operation<'static>, fields: &[&'static str]) -> RequestBuilder<'static> {
        OperationRequest::builder(&CONNECTION, "Person", operation)
            .entity::<Person>()
            .fields(Field::from_names(fields.iter().copied()).expect("Valid field names"))
    }

    fn text(request: RequestBuilder<'static>) -> String {
        let request = request.build().expect("Could not build the request");
        ENGINE
            .command_text()
            .get(&request)
            .expect("Could not build the command text")
            .to_string()
    }

    #[tokio::test]
    async fn sqlserver() {
        init_logs();
        execute_tests(SqlServerDriver::new()).await;
    }

    #[test]
    fn query() {
        let predicate = Predicate::all([
            Condition::new("Age", Comparison::Greater).expect("Valid condition"),
            Condition::new("Name", Comparison::Like).expect("Valid condition"),
        ]);
        assert_eq!(
            text(person(
                Operation::Query {
                    predicate: Some(predicate),
                    order_by: vec![OrderField::desc("Age").expect("Valid order")],
                    top: 10,
                },
                &["Name", "Age"],
            )),
            indoc! {"
                SELECT TOP (10) [Name], [Age]
                FROM [Person]
                WHERE ([Age] > @Age AND [Name] LIKE @Name)
                ORDER BY [Age] DESC;
            "}
            .trim()
        );
    }

    #[test]
    fn query_all_with_hints() {
        assert_eq!(
            text(
                person(
                    Operation::QueryAll {
                        order_by: Vec::new()
                    },
                    &["Name"]
                )
                .hints("WITH (NOLOCK)")
            ),
            indoc! {"
                SELECT [Name]
                FROM [Person] WITH (NOLOCK);
            "}
            .trim()
        );
    }

    #[test]
    fn batch_query() {
        let batch = |page| {
            text(person(
                Operation::BatchQuery {
                    predicate: None,
                    order_by: Vec::new(),
                    page,
                    rows_per_batch: 20,
                },
                &["Id", "Name"],
            ))
        };
        assert_eq!(
            batch(0),
            indoc! {"
                WITH [CTE] AS
                (
                SELECT ROW_NUMBER() OVER (ORDER BY [Id] ASC) AS [RowNumber], [Id], [Name]
                FROM [Person]
                )
                SELECT [Id], [Name]
                FROM [CTE]
                WHERE [RowNumber] BETWEEN 1 AND 20
                ORDER BY [Id] ASC;
            "}
            .trim()
        );
        assert!(batch(2).contains("BETWEEN 41 AND 60"));
    }

    #[test]
    fn batch_query_without_order() {
        let request = OperationRequest::builder(
            &CONNECTION,
            "[dbo].[Ledger]",
            Operation::BatchQuery {
                predicate: None,
                order_by: Vec::new(),
                page: 0,
                rows_per_batch: 10,
            },
        )
        .entity::<LedgerEntry>()
        .build()
        .expect("Could not build the request");
        let error = ENGINE
            .command_text()
            .get(&request)
            .expect_err("Ledger has no primary to order by");
        assert!(matches!(
            error.downcast_ref::<ValidationError>(),
            Some(ValidationError::MissingOrderBy { .. })
        ));
    }

    #[test]
    fn count_and_delete() {
        assert_eq!(
            text(person(
                Operation::Count {
                    predicate: Some(Predicate::equal("Name").expect("Valid predicate")),
                },
                &[],
            )),
            indoc! {"
                SELECT COUNT_BIG(1) AS [Counted]
                FROM [Person]
                WHERE ([Name] = @Name);
            "}
            .trim()
        );
        assert_eq!(
            text(person(Operation::CountAll, &[])),
            indoc! {"
                SELECT COUNT_BIG(1) AS [Counted]
                FROM [Person];
            "}
            .trim()
        );
        assert_eq!(
            text(person(
                Operation::Delete {
                    predicate: Some(Predicate::all([
                        Condition::new("Age", Comparison::Less).expect("Valid condition"),
                        Condition::new("Age", Comparison::GreaterEqual).expect("Valid condition"),
                    ])),
                },
                &[],
            )),
            "DELETE FROM [Person]\nWHERE ([Age] < @Age AND [Age] >= @Age_2);"
        );
        assert_eq!(text(person(Operation::DeleteAll, &[])), "DELETE FROM [Person];");
        assert_eq!(text(person(Operation::Truncate, &[])), "TRUNCATE TABLE [Person];");
    }

    #[test]
    fn insert() {
        assert_eq!(
            text(person(Operation::Insert, &[])),
            indoc! {"
                INSERT INTO [Person] ([Name], [Age], [Email])
                VALUES (@Name, @Age, @Email);
                SELECT SCOPE_IDENTITY() AS [Result];
            "}
            .trim()
        );
        assert_eq!(
            text(person(Operation::InsertAll { batch_size: 2 }, &["Name", "Age"])),
            indoc! {"
                INSERT INTO [Person] ([Name], [Age])
                VALUES (@Name, @Age);
                SELECT SCOPE_IDENTITY() AS [Result];
                INSERT INTO [Person] ([Name], [Age])
                VALUES (@Name_1, @Age_1);
                SELECT SCOPE_IDENTITY() AS [Result];
            "}
            .trim()
        );
    }

    #[test]
    fn merge() {
        assert_eq!(
            text(person(Operation::Merge, &["Id", "Name", "Age"])),
            indoc! {"
                MERGE INTO [Person] AS T
                USING (SELECT @Id AS [Id], @Name AS [Name], @Age AS [Age]) AS S
                ON (S.[Id] = T.[Id])
                WHEN NOT MATCHED THEN
                INSERT ([Name], [Age]) VALUES (@Name, @Age)
                WHEN MATCHED THEN
                UPDATE SET [Name] = S.[Name], [Age] = S.[Age]
                OUTPUT INSERTED.[Id] AS [Result];
            "}
            .trim()
        );
        let request = OperationRequest::builder(
            &CONNECTION,
            "[dbo].[Ledger]",
            Operation::MergeAll { batch_size: 2 },
        )
        .entity::<LedgerEntry>()
        .fields(Field::from_names(["Amount"]).expect("Valid field names"))
        .qualifiers(Field::from_names(["Code"]).expect("Valid field names"));
        assert_eq!(
            text(request),
            indoc! {"
                MERGE INTO [dbo].[Ledger] AS T
                USING (SELECT @Amount AS [Amount], @Code AS [Code]) AS S
                ON (S.[Code] = T.[Code])
                WHEN NOT MATCHED THEN
                INSERT ([Amount], [Code]) VALUES (@Amount, @Code)
                WHEN MATCHED THEN
                UPDATE SET [Amount] = S.[Amount];
                MERGE INTO [dbo].[Ledger] AS T
                USING (SELECT @Amount_1 AS [Amount], @Code_1 AS [Code]) AS S
                ON (S.[Code] = T.[Code])
                WHEN NOT MATCHED THEN
                INSERT ([Amount], [Code]) VALUES (@Amount_1, @Code_1)
                WHEN MATCHED THEN
                UPDATE SET [Amount] = S.[Amount];
            "}
            .trim()
        );
    }

    #[test]
    fn assigned_primary() {
        let orders = |operation: Operation<'static>| {
            OperationRequest::builder(&CONNECTION, "Orders", operation)
                .fields(Field::from_names(["Id", "Name"]).expect("Valid field names"))
        };
        assert_eq!(
            text(orders(Operation::Insert)),
            indoc! {"
                INSERT INTO [Orders] ([Id], [Name])
                VALUES (@Id, @Name);
                SELECT @Id AS [Result];
            "}
            .trim()
        );
        assert_eq!(
            text(orders(Operation::Merge)),
            indoc! {"
                MERGE INTO [Orders] AS T
                USING (SELECT @Id AS [Id], @Name AS [Name]) AS S
                ON (S.[Id] = T.[Id])
                WHEN NOT MATCHED THEN
                INSERT ([Id], [Name]) VALUES (@Id, @Name)
                WHEN MATCHED THEN
                UPDATE SET [Name] = S.[Name]
                OUTPUT INSERTED.[Id] AS [Result];
            "}
            .trim()
        );
    }

    #[test]
    fn update() {
        assert_eq!(
            text(person(
                Operation::Update {
                    predicate: Some(Predicate::equal("Id").expect("Valid predicate")),
                },
                &["Name"],
            )),
            indoc! {"
                UPDATE [Person]
                SET [Name] = @Name
                WHERE ([Id] = @_Id);
            "}
            .trim()
        );
        assert_eq!(
            text(person(Operation::UpdateAll { batch_size: 2 }, &["Name", "Age"])),
            indoc! {"
                UPDATE [Person]
                SET [Name] = @Name, [Age] = @Age
                WHERE ([Id] = @Id);
                UPDATE [Person]
                SET [Name] = @Name_1, [Age] = @Age_1
                WHERE ([Id] = @Id_1);
            "}
            .trim()
        );
    }

    #[test]
    fn query_multiple() {
        let queries = vec![
            person(
                Operation::QueryAll {
                    order_by: vec![OrderField::asc("Name").expect("Valid order")],
                },
                &["Name"],
            )
            .build()
            .expect("Could not build the request"),
            OperationRequest::builder(
                &CONNECTION,
                "[dbo].[Ledger]",
                Operation::Query {
                    predicate: None,
                    order_by: Vec::new(),
                    top: 1,
                },
            )
            .fields(Field::from_names(["Code"]).expect("Valid field names"))
            .build()
            .expect("Could not build the request"),
        ];
        assert_eq!(
            text(OperationRequest::builder(
                &CONNECTION,
                "Person",
                Operation::QueryMultiple { queries },
            )),
            indoc! {"
                SELECT [Name]
                FROM [Person]
                ORDER BY [Name] ASC;
                SELECT TOP (1) [Code]
                FROM [dbo].[Ledger];
            "}
            .trim()
        );
    }

    #[test]
    fn identifiers() {
        let writer = SqlServerSqlWriter::default();
        let mut out = String::new();
        writer
            .write_truncate(&mut out, &Statement::new("Odd]Name", &[]))
            .expect("Could not write the truncate");
        assert_eq!(out, "TRUNCATE TABLE [Odd]]Name];");
    }

    #[test]
    fn fields_query() {
        let writer = SqlServerSqlWriter::default();
        let mut out = String::new();
        writer
            .write_fields_query(&mut out, "[dbo].[Person]")
            .expect("Could not write the fields query");
        assert!(out.starts_with("SELECT C.name AS [Name],"));
        assert!(out.contains("FROM sys.columns C\n"));
        assert!(out.contains("O.name = @TableName AND SCHEMA_NAME(O.schema_id) = @Schema"));
        assert!(out.ends_with("\nORDER BY C.column_id;"));
        assert!(writer.write_fields_query(&mut out, "[]").is_err());
    }
}
