#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sluice_core::{
        Comparison, Condition, Field, GenericSqlWriter, OrderField, Predicate, SchemaField,
        SqlWriter, Statement, ValidationError, Value,
    };

    const WRITER: GenericSqlWriter = GenericSqlWriter;

    fn key() -> SchemaField {
        SchemaField::new("Id", Value::Int64(None))
            .primary()
            .identity()
    }

    fn fields(names: &[&'static str]) -> Vec<Field> {
        Field::from_names(names.iter().copied()).expect("Valid field names")
    }

    fn validation_error(result: sluice_core::Result<()>) -> ValidationError {
        result
            .expect_err("Expected the statement to be rejected")
            .downcast::<ValidationError>()
            .expect("Expected a validation error")
    }

    #[test]
    fn batch_query_with_order() {
        let key = key();
        let fields = fields(&["Id", "Name"]);
        let statement = Statement::new("Person", &fields).primary(Some(&key));
        let mut out = String::new();
        WRITER
            .write_batch_query(
                &mut out,
                &statement,
                Some(&Predicate::all([
                    Condition::new("Name", Comparison::Like).expect("Valid condition")
                ])),
                &[OrderField::desc("Name").expect("Valid order")],
                0,
                5,
            )
            .expect("Could not write the batch query");
        assert_eq!(
            out,
            indoc! {r#"
                WITH "CTE" AS
                (
                SELECT ROW_NUMBER() OVER (ORDER BY "Name" DESC) AS "RowNumber", "Id", "Name"
                FROM "Person"
                WHERE ("Name" LIKE @Name)
                )
                SELECT "Id", "Name"
                FROM "CTE"
                WHERE "RowNumber" BETWEEN 1 AND 5
                ORDER BY "Name" DESC;
            "#}
            .trim()
        );
    }

    #[test]
    fn update_parameters() {
        let key = key();
        let set = fields(&["Name"]);
        let statement = Statement::new("Person", &set)
            .primary(Some(&key))
            .identity(Some(&key));
        let mut out = String::new();
        WRITER
            .write_update(
                &mut out,
                &statement,
                Some(&Predicate::all([
                    Condition::new("Age", Comparison::GreaterEqual).expect("Valid condition"),
                    Condition::new("Age", Comparison::Less).expect("Valid condition"),
                ])),
            )
            .expect("Could not write the update");
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "Person"
                SET "Name" = @Name
                WHERE ("Age" >= @_Age AND "Age" < @_Age_2);
            "#}
            .trim()
        );

        let all = fields(&["Id", "Name", "Age"]);
        let statement = Statement::new("Person", &all)
            .primary(Some(&key))
            .identity(Some(&key));
        let mut out = String::new();
        WRITER
            .write_update_all(&mut out, &statement, &fields(&["Name"]), 2)
            .expect("Could not write the update");
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "Person"
                SET "Age" = @Age
                WHERE ("Name" = @Name);
                UPDATE "Person"
                SET "Age" = @Age_1
                WHERE ("Name" = @Name_1);
            "#}
            .trim()
        );
    }

    #[test]
    fn generated_primary() {
        let primary = SchemaField::new("Id", Value::Uuid(None)).primary();
        let sequence = SchemaField::new("Seq", Value::Int64(None)).identity();
        let columns = fields(&["Id", "Seq", "Name"]);
        let statement = Statement::new("Orders", &columns)
            .primary(Some(&primary))
            .identity(Some(&sequence));
        assert!(!statement.is_generated_primary());
        let mut out = String::new();
        WRITER
            .write_insert(&mut out, &statement)
            .expect("Could not write the insert");
        assert_eq!(
            out,
            indoc! {r#"
                INSERT INTO "Orders" ("Id", "Name")
                VALUES (@Id, @Name)
                RETURNING "Id";
            "#}
            .trim()
        );

        // Declared primary without the flag, named like the identity of the table
        let declared = SchemaField::new("id", Value::Int64(None)).primary();
        let identity = SchemaField::new("[Id]", Value::Int64(None)).identity();
        assert!(
            Statement::new("Orders", &columns)
                .primary(Some(&declared))
                .identity(Some(&identity))
                .is_generated_primary()
        );
        assert!(
            !Statement::new("Orders", &columns)
                .identity(Some(&identity))
                .is_generated_primary()
        );
    }

    #[test]
    fn quoted_names() {
        let fields = fields(&["[First Name]"]);
        let mut out = String::new();
        WRITER
            .write_insert(&mut out, &Statement::new("[dbo].[People]", &fields))
            .expect("Could not write the insert");
        assert_eq!(
            out,
            indoc! {r#"
                INSERT INTO "dbo"."People" ("First Name")
                VALUES (@First_Name);
            "#}
            .trim()
        );
    }

    #[test]
    fn appends_statements() {
        let statement = Statement::new("Person", &[]).hints(Some("  "));
        let mut out = String::new();
        WRITER
            .write_count_all(&mut out, &statement)
            .expect("Could not write the count");
        WRITER
            .write_delete_all(&mut out, &statement)
            .expect("Could not write the delete");
        assert_eq!(
            out,
            indoc! {r#"
                SELECT COUNT(*) AS "Counted"
                FROM "Person";
                DELETE FROM "Person";
            "#}
            .trim()
        );
    }

    #[test]
    fn rejected_statements() {
        let key = key();
        let mut out = String::new();
        assert!(matches!(
            validation_error(WRITER.write_query(
                &mut out,
                &Statement::new("Person", &[]),
                None,
                &[],
                0
            )),
            ValidationError::NoColumns {
                operation: "Query",
                ..
            }
        ));

        let only_key = fields(&["Id"]);
        let statement = Statement::new("Person", &only_key)
            .primary(Some(&key))
            .identity(Some(&key));
        assert!(matches!(
            validation_error(WRITER.write_insert(&mut out, &statement)),
            ValidationError::NoColumns { .. }
        ));
        assert!(matches!(
            validation_error(WRITER.write_update(&mut out, &statement, None)),
            ValidationError::NoColumns {
                operation: "Update",
                ..
            }
        ));

        let ledger = fields(&["Code", "Amount"]);
        let statement = Statement::new("Ledger", &ledger);
        assert!(matches!(
            validation_error(WRITER.write_merge(&mut out, &statement, &[])),
            ValidationError::MissingQualifiers { .. }
        ));
        assert!(matches!(
            validation_error(WRITER.write_batch_query(&mut out, &statement, None, &[], 0, 10)),
            ValidationError::MissingOrderBy { .. }
        ));
        assert!(matches!(
            validation_error(WRITER.write_insert_all(&mut out, &statement, 0)),
            ValidationError::InvalidBatchSize
        ));
        assert!(matches!(
            validation_error(WRITER.write_fields_query(&mut out, " [] ")),
            ValidationError::EmptyTableName
        ));
        assert!(out.is_empty());
    }
}
