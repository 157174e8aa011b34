use sluice_core::{
    Field, Result, SqlWriter, Statement, ValidationError, separated_by, unquote,
    writer::{Context, Fragment, is_listed},
};

#[derive(Default, Debug, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(context, out, value, '`', "``");
        out.push('`');
    }

    fn write_insert_returning(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        if statement.is_generated_primary() {
            out.push_str(";\nSELECT LAST_INSERT_ID() AS ");
        } else if let Some(primary) = statement.primary {
            out.push_str(";\nSELECT ");
            self.write_parameter(context, out, &primary.name);
            out.push_str(" AS ");
        } else {
            return;
        }
        self.write_identifier_quoted(context, out, "Result");
    }

    fn write_merge_returning(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        self.write_insert_returning(context, out, statement);
    }

    /// Upsert through `ON DUPLICATE KEY UPDATE`, matching happens on the unique keys of the table.
    fn write_merge_row(
        &self,
        context: &mut Context,
        out: &mut String,
        statement: &Statement,
        qualifiers: &[Field],
    ) {
        let insertable = statement
            .fields
            .iter()
            .chain(qualifiers.iter().filter(|v| !is_listed(statement.fields, v)))
            .filter(|v| !statement.is_identity(v))
            .cloned()
            .collect::<Vec<_>>();
        let updatable = statement
            .fields
            .iter()
            .filter(|v| {
                !statement.is_primary(v) && !statement.is_identity(v) && !is_listed(qualifiers, v)
            })
            .cloned()
            .collect::<Vec<_>>();
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("INSERT INTO ");
        self.write_table_name(context, out, statement.table);
        self.write_hints(context, out, statement.hints);
        out.push_str(" (");
        self.write_columns(context, out, &insertable);
        out.push_str(")\nVALUES (");
        self.write_parameters(
            &mut context.switch_fragment(Fragment::SqlMergeInsert).current,
            out,
            &insertable,
        );
        out.push(')');
        {
            let mut context = context.switch_fragment(Fragment::SqlMergeUpdate);
            out.push_str("\nON DUPLICATE KEY UPDATE ");
            let generated = statement
                .primary
                .filter(|_| statement.is_generated_primary());
            if let Some(primary) = generated {
                // The updated row reports its key through LAST_INSERT_ID() too
                self.write_column(&mut context.current, out, &primary.name);
                out.push_str(" = LAST_INSERT_ID(");
                self.write_column(&mut context.current, out, &primary.name);
                out.push(')');
                if !updatable.is_empty() {
                    out.push_str(", ");
                }
            } else if updatable.is_empty() {
                // No-op assignment keeps the statement valid
                let key = qualifiers.first().or(insertable.first());
                if let Some(key) = key {
                    self.write_column(&mut context.current, out, key.name());
                    out.push_str(" = ");
                    self.write_column(&mut context.current, out, key.name());
                }
            }
            separated_by(
                out,
                &updatable,
                |out, v| {
                    self.write_column(&mut context.current, out, v.name());
                    out.push_str(" = VALUES(");
                    self.write_column(&mut context.current, out, v.name());
                    out.push(')');
                },
                ", ",
            );
        }
        self.write_merge_returning(
            &mut context
                .switch_fragment(Fragment::SqlInsertIntoReturning)
                .current,
            out,
            statement,
        );
        out.push(';');
    }

    fn write_fields_query(&self, out: &mut String, table: &str) -> Result<()> {
        let table = unquote(table);
        if table.is_empty() {
            return Err(ValidationError::EmptyTableName.into());
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::SqlFieldsQuery);
        out.push_str(concat!(
            "SELECT C.COLUMN_NAME, C.COLUMN_KEY = 'PRI' AS IS_PRIMARY,",
            " C.EXTRA LIKE '%auto_increment%' AS IS_IDENTITY, C.IS_NULLABLE = 'YES' AS IS_NULLABLE,",
            " C.DATA_TYPE, C.CHARACTER_MAXIMUM_LENGTH, C.NUMERIC_PRECISION, C.NUMERIC_SCALE,",
            " C.COLUMN_DEFAULT\n",
            "FROM INFORMATION_SCHEMA.COLUMNS C\n",
            "WHERE C.TABLE_NAME = ",
        ));
        self.write_parameter(&mut context, out, "TableName");
        if table.contains('.') {
            out.push_str(" AND C.TABLE_SCHEMA = ");
            self.write_parameter(&mut context, out, "Schema");
        } else {
            out.push_str(" AND C.TABLE_SCHEMA = DATABASE()");
        }
        out.push_str("\nORDER BY C.ORDINAL_POSITION;");
        Ok(())
    }
}
