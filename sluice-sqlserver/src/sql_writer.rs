use sluice_core::{
    Result, SqlWriter, Statement, ValidationError, unquote,
    writer::{Context, Fragment},
    write_integer,
};

#[derive(Default, Debug, Clone, Copy)]
pub struct SqlServerSqlWriter {}

impl SqlWriter for SqlServerSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('[');
        self.write_escaped(context, out, value, ']', "]]");
        out.push(']');
    }

    fn write_select_top(&self, _context: &mut Context, out: &mut String, top: u32) {
        out.push_str("TOP (");
        write_integer!(out, top);
        out.push_str(") ");
    }

    fn write_limit(&self, _context: &mut Context, _out: &mut String, _top: u32) {}

    fn write_count_expression(&self, _context: &mut Context, out: &mut String) {
        out.push_str("COUNT_BIG(1)");
    }

    fn write_insert_returning(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        out.push_str(";\nSELECT ");
        if statement.is_generated_primary() {
            out.push_str("SCOPE_IDENTITY()");
        } else if let Some(primary) = statement.primary {
            self.write_parameter(context, out, &primary.name);
        } else {
            out.push_str("NULL");
        }
        out.push_str(" AS ");
        self.write_identifier_quoted(context, out, "Result");
    }

    fn write_merge_returning(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        if let Some(primary) = statement.primary {
            out.push_str("\nOUTPUT INSERTED.");
            self.write_identifier_quoted(context, out, &primary.name);
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, "Result");
        }
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
            "SELECT C.name AS [Name],",
            " CONVERT(BIT, CASE WHEN EXISTS (SELECT 1 FROM sys.index_columns IC",
            " INNER JOIN sys.indexes I ON I.object_id = IC.object_id AND I.index_id = IC.index_id",
            " WHERE IC.object_id = C.object_id AND IC.column_id = C.column_id",
            " AND I.is_primary_key = 1) THEN 1 ELSE 0 END) AS [IsPrimary],",
            " C.is_identity AS [IsIdentity], C.is_nullable AS [IsNullable],",
            " T.name AS [ColumnType], C.max_length AS [Size], C.precision AS [Precision],",
            " C.scale AS [Scale], OBJECT_DEFINITION(C.default_object_id) AS [DefaultValue]\n",
            "FROM sys.columns C\n",
            "INNER JOIN sys.types T ON T.user_type_id = C.user_type_id\n",
            "INNER JOIN sys.objects O ON O.object_id = C.object_id\n",
            "WHERE O.type = 'U' AND O.name = ",
        ));
        self.write_parameter(&mut context, out, "TableName");
        if table.contains('.') {
            out.push_str(" AND SCHEMA_NAME(O.schema_id) = ");
            self.write_parameter(&mut context, out, "Schema");
        }
        out.push_str("\nORDER BY C.column_id;");
        Ok(())
    }
}
