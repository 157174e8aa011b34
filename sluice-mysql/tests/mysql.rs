#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sluice_core::{
        Comparison, Condition, Driver, Engine, Field, Operation, OperationRequest, OrderField,
        Predicate, RequestBuilder, SqlWriter, Statement,
    };
    use sluice_mysql::{MySQLDriver, MySQLSqlWriter};
    use sluice_tests::{
        InMemorySchemaProvider, LedgerEntry, Person, TestConnection, engine, execute_tests,
        init_logs,
    };
    use std::sync::{Arc, LazyLock};

    const CONNECTION: TestConnection = TestConnection::new(MySQLDriver::NAME);
    static ENGINE: LazyLock<Engine> = LazyLock::new(|| {
        engine(
            MySQLDriver::new(),
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
    async fn mysql() {
        init_logs();
        execute_tests(MySQLDriver::new()).await;
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
                SELECT `Name`, `Age`
                FROM `Person`
                WHERE (`Age` > @Age AND `Name` LIKE @Name)
                ORDER BY `Age` DESC
                LIMIT 10;
            "}
            .trim()
        );
        assert_eq!(
            text(person(
                Operation::Count {
                    predicate: Some(Predicate::equal("Name").expect("Valid predicate")),
                },
                &[],
            )),
            indoc! {"
                SELECT COUNT(*) AS `Counted`
                FROM `Person`
                WHERE (`Name` = @Name);
            "}
            .trim()
        );
    }

    #[test]
    fn batch_query() {
        assert_eq!(
            text(person(
                Operation::BatchQuery {
                    predicate: None,
                    order_by: Vec::new(),
                    page: 1,
                    rows_per_batch: 20,
                },
                &["Id", "Name"],
            )),
            indoc! {"
                WITH `CTE` AS
                (
                SELECT ROW_NUMBER() OVER (ORDER BY `Id` ASC) AS `RowNumber`, `Id`, `Name`
                FROM `Person`
                )
                SELECT `Id`, `Name`
                FROM `CTE`
                WHERE `RowNumber` BETWEEN 21 AND 40
                ORDER BY `Id` ASC;
            "}
            .trim()
        );
    }

    #[test]
    fn insert() {
        assert_eq!(
            text(person(Operation::Insert, &[])),
            indoc! {"
                INSERT INTO `Person` (`Name`, `Age`, `Email`)
                VALUES (@Name, @Age, @Email);
                SELECT LAST_INSERT_ID() AS `Result`;
            "}
            .trim()
        );
    }

    #[test]
    fn merge() {
        assert_eq!(
            text(person(Operation::Merge, &["Id", "Name", "Age"])),
            indoc! {"
                INSERT INTO `Person` (`Name`, `Age`)
                VALUES (@Name, @Age)
                ON DUPLICATE KEY UPDATE `Id` = LAST_INSERT_ID(`Id`), `Name` = VALUES(`Name`), `Age` = VALUES(`Age`);
                SELECT LAST_INSERT_ID() AS `Result`;
            "}
            .trim()
        );
        let request = OperationRequest::builder(&CONNECTION, "[dbo].[Ledger]", Operation::Merge)
            .entity::<LedgerEntry>()
            .fields(Field::from_names(["Code"]).expect("Valid field names"))
            .qualifiers(Field::from_names(["Code"]).expect("Valid field names"));
        assert_eq!(
            text(request),
            indoc! {"
                INSERT INTO `dbo`.`Ledger` (`Code`)
                VALUES (@Code)
                ON DUPLICATE KEY UPDATE `Code` = `Code`;
            "}
            .trim()
        );
    }

    #[test]
    fn assigned_primary() {
        let orders = |operation: Operation<'static>| {
            text(OperationRequest::builder(&CONNECTION, "Orders", operation))
        };
        assert_eq!(
            orders(Operation::Insert),
            indoc! {"
                INSERT INTO `Orders` (`Id`, `Name`)
                VALUES (@Id, @Name);
                SELECT @Id AS `Result`;
            "}
            .trim()
        );
        assert_eq!(
            orders(Operation::Merge),
            indoc! {"
                INSERT INTO `Orders` (`Id`, `Name`)
                VALUES (@Id, @Name)
                ON DUPLICATE KEY UPDATE `Name` = VALUES(`Name`);
                SELECT @Id AS `Result`;
            "}
            .trim()
        );
    }

    #[test]
    fn identifiers() {
        let writer = MySQLSqlWriter::default();
        let mut out = String::new();
        writer
            .write_truncate(&mut out, &Statement::new("Odd`Name", &[]))
            .expect("Could not write the truncate");
        assert_eq!(out, "TRUNCATE TABLE `Odd``Name`;");
    }

    #[test]
    fn fields_query() {
        let writer = MySQLSqlWriter::default();
        let mut out = String::new();
        writer
            .write_fields_query(&mut out, "Person")
            .expect("Could not write the fields query");
        assert!(out.contains("C.COLUMN_KEY = 'PRI' AS IS_PRIMARY"));
        assert!(out.contains("WHERE C.TABLE_NAME = @TableName AND C.TABLE_SCHEMA = DATABASE()"));
        assert!(out.ends_with("\nORDER BY C.ORDINAL_POSITION;"));
    }
}
