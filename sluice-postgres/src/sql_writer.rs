use sluice_core::{
    Field, OrderField, Predicate, Result, SqlWriter, Statement, ValidationError, separated_by,
    unquote,
    writer::{Context, Fragment, ensure_columns, is_listed, order_or_primary},
    write_integer,
};

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn write_batch_query(
        &self,
        out: &mut String,
        statement: &Statement,
        predicate: Option<&Predicate>,
        order_by: &[OrderField],
        page: u32,
        rows_per_batch: u32,
    ) -> Result<()> {
        ensure_columns(statement.fields, "BatchQuery", statement.table)?;
        if rows_per_batch == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        let order_by = order_or_primary(order_by, statement, "BatchQuery")?;
        out.reserve(96 + statement.fields.len() * 24);
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::SqlSelect);
        out.push_str("SELECT ");
        self.write_columns(&mut context, out, statement.fields);
        out.push_str("\nFROM ");
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
            self.write_table_name(&mut context.current, out, statement.table);
            self.write_hints(&mut context.current, out, statement.hints);
        }
        self.write_where(
            &mut context.switch_fragment(Fragment::SqlSelectWhere).current,
            out,
            predicate,
        );
        out.push_str("\nORDER BY ");
        self.write_order_by(
            &mut context.switch_fragment(Fragment::SqlSelectOrderBy).current,
            out,
            &order_by,
        );
        out.push_str("\nLIMIT ");
        write_integer!(out, rows_per_batch);
        out.push_str(" OFFSET ");
        write_integer!(out, page as u64 * rows_per_batch as u64);
        out.push(';');
        Ok(())
    }

    /// Upsert through `ON CONFLICT`, the qualifiers must be covered by a unique constraint.
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
        out.push_str(")\nON CONFLICT (");
        self.write_columns(
            &mut context.switch_fragment(Fragment::SqlMergeOn).current,
            out,
            qualifiers,
        );
        out.push(')');
        if updatable.is_empty() {
            out.push_str(" DO NOTHING");
        } else {
            let mut context = context.switch_fragment(Fragment::SqlMergeUpdate);
            out.push_str(" DO UPDATE SET ");
            separated_by(
                out,
                &updatable,
                |out, v| {
                    self.write_column(&mut context.current, out, v.name());
                    out.push_str(" = ");
                    self.write_column(
                        &mut context.current.switch_alias("EXCLUDED").current,
                        out,
                        v.name(),
                    );
                },
                ", ",
            );
        }
        self.write_insert_returning(
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
            "SELECT C.column_name, C.is_nullable = 'YES' AS is_nullable,",
            " C.is_identity = 'YES' OR C.column_default LIKE 'nextval(%' AS is_identity,",
            " EXISTS (SELECT 1 FROM information_schema.table_constraints TC",
            " INNER JOIN information_schema.key_column_usage K",
            " ON K.constraint_name = TC.constraint_name AND K.table_schema = TC.table_schema",
            " WHERE TC.constraint_type = 'PRIMARY KEY' AND TC.table_schema = C.table_schema",
            " AND TC.table_name = C.table_name AND K.column_name = C.column_name) AS is_primary,",
            " C.data_type, C.character_maximum_length, C.numeric_precision, C.numeric_scale,",
            " C.column_default\n",
            "FROM information_schema.columns C\n",
            "WHERE C.table_name = ",
        ));
        self.write_parameter(&mut context, out, "TableName");
        if table.contains('.') {
            out.push_str(" AND C.table_schema = ");
            self.write_parameter(&mut context, out, "Schema");
        }
        out.push_str("\nORDER BY C.ordinal_position;");
        Ok(())
    }
}
