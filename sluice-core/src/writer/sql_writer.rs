use crate::{
    Field, Order, OrderField, Predicate, Result, SchemaField, ValidationError, parameter_name,
    separated_by, unquote,
    writer::{Context, Fragment},
    write_integer,
};
use std::{borrow::Cow, collections::HashMap};

/// Reconciled inputs of a statement.
#[derive(Default, Debug, Clone, Copy)]
pub struct Statement<'a> {
    pub table: &'a str,
    /// Columns to read or write, already matched against the table.
    pub fields: &'a [Field],
    /// Table hints, written verbatim after the table name.
    pub hints: Option<&'a str>,
    pub primary: Option<&'a SchemaField>,
    pub identity: Option<&'a SchemaField>,
}

impl<'a> Statement<'a> {
    pub fn new(table: &'a str, fields: &'a [Field]) -> Self {
        Self {
            table,
            fields,
            ..Default::default()
        }
    }

    pub fn hints(self, hints: Option<&'a str>) -> Self {
        Self { hints, ..self }
    }

    pub fn primary(self, primary: Option<&'a SchemaField>) -> Self {
        Self { primary, ..self }
    }

    pub fn identity(self, identity: Option<&'a SchemaField>) -> Self {
        Self { identity, ..self }
    }

    pub fn is_identity(&self, field: &Field) -> bool {
        self.identity
            .is_some_and(|v| v.matches(&field.unquoted_name()))
    }

    pub fn is_primary(&self, field: &Field) -> bool {
        self.primary
            .is_some_and(|v| v.matches(&field.unquoted_name()))
    }

    /// Whether the database generates the value of the primary.
    pub fn is_generated_primary(&self) -> bool {
        self.primary.is_some_and(|primary| {
            primary.identity || self.identity.is_some_and(|v| v.matches(&primary.name))
        })
    }
}

/// Whether `field` appears in `fields`, ignoring quotes and case.
pub fn is_listed(fields: &[Field], field: &Field) -> bool {
    let name = field.unquoted_name();
    fields
        .iter()
        .any(|v| v.unquoted_name().eq_ignore_ascii_case(&name))
}

/// Fails with [`ValidationError::NoColumns`] when there is nothing to select or write.
pub fn ensure_columns(fields: &[Field], operation: &'static str, table: &str) -> Result<()> {
    if fields.is_empty() {
        return Err(ValidationError::NoColumns {
            operation,
            table: table.to_string(),
        }
        .into());
    }
    Ok(())
}

fn ensure_insertable(statement: &Statement, operation: &'static str) -> Result<()> {
    if statement.fields.iter().all(|v| statement.is_identity(v)) {
        return Err(ValidationError::NoColumns {
            operation,
            table: statement.table.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Explicit qualifiers, or the primary when there are none.
pub fn qualifiers_or_primary<'q>(
    qualifiers: &'q [Field],
    statement: &Statement,
    operation: &'static str,
) -> Result<Cow<'q, [Field]>> {
    if !qualifiers.is_empty() {
        return Ok(Cow::Borrowed(qualifiers));
    }
    match statement.primary {
        Some(primary) => Ok(Cow::Owned(vec![primary.as_field()?])),
        None => Err(ValidationError::MissingQualifiers {
            operation,
            table: statement.table.to_string(),
        }
        .into()),
    }
}

/// Explicit ordering, or the primary ascending when there is none.
pub fn order_or_primary<'o>(
    order_by: &'o [OrderField],
    statement: &Statement,
    operation: &'static str,
) -> Result<Cow<'o, [OrderField]>> {
    if !order_by.is_empty() {
        return Ok(Cow::Borrowed(order_by));
    }
    match statement.primary {
        Some(primary) => Ok(Cow::Owned(vec![OrderField {
            field: primary.as_field()?,
            order: Order::Asc,
        }])),
        None => Err(ValidationError::MissingOrderBy {
            operation,
            table: statement.table.to_string(),
        }
        .into()),
    }
}

/// Dialect printer turning reconciled operation inputs into SQL text.
///
/// Every statement method receives a buffer, and appends to it, separating from
/// any previous content with a newline.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Dialect name, part of the command cache key when the writer is given explicitly.
    fn name(&self) -> &'static str {
        "generic"
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Table name, every dotted part quoted on its own.
    fn write_table_name(&self, context: &mut Context, out: &mut String, table: &str) {
        let table = unquote(table);
        separated_by(
            out,
            table.split('.'),
            |out, part| self.write_identifier_quoted(context, out, part),
            ".",
        );
    }

    /// Column name, prefixed by the alias of the context if any.
    fn write_column(&self, context: &mut Context, out: &mut String, name: &str) {
        if let Some(alias) = context.alias {
            out.push_str(alias);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, &unquote(name));
    }

    fn write_columns(&self, context: &mut Context, out: &mut String, fields: &[Field]) {
        separated_by(
            out,
            fields,
            |out, v| self.write_column(context, out, v.name()),
            ", ",
        );
    }

    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Parameter bound to a column.
    ///
    /// Filters of an update get an underscore in front, batched rows after the
    /// first get the row index as a suffix.
    fn write_parameter(&self, context: &mut Context, out: &mut String, name: &str) {
        out.push(self.parameter_prefix());
        if context.fragment == Fragment::SqlUpdateWhere {
            out.push('_');
        }
        out.push_str(&parameter_name(name));
        if context.row > 0 {
            out.push('_');
            write_integer!(out, context.row);
        }
    }

    fn write_parameters(&self, context: &mut Context, out: &mut String, fields: &[Field]) {
        separated_by(
            out,
            fields,
            |out, v| self.write_parameter(context, out, v.name()),
            ", ",
        );
    }

    /// Table hints, verbatim.
    fn write_hints(&self, _context: &mut Context, out: &mut String, hints: Option<&str>) {
        if let Some(hints) = hints.map(str::trim).filter(|v| !v.is_empty()) {
            out.push(' ');
            out.push_str(hints);
        }
    }

    fn write_predicate(&self, context: &mut Context, out: &mut String, predicate: &Predicate) {
        match predicate {
            Predicate::Raw(text) => out.push_str(text.trim()),
            Predicate::Conditions {
                conjunction,
                conditions,
            } => {
                let mut seen = HashMap::<String, usize>::new();
                let separator = [" ", conjunction.as_str(), " "].concat();
                out.push('(');
                separated_by(
                    out,
                    conditions,
                    |out, condition| {
                        self.write_column(context, out, condition.field.name());
                        out.push(' ');
                        out.push_str(condition.comparison.as_str());
                        if condition.comparison.has_parameter() {
                            out.push(' ');
                            let name = condition.field.unquoted_name();
                            let count = seen.entry(name.to_ascii_lowercase()).or_default();
                            *count += 1;
                            self.write_parameter(context, out, &name);
                            if *count > 1 {
                                out.push('_');
                                write_integer!(out, *count);
                            }
                        }
                    },
                    &separator,
                );
                out.push(')');
            }
        }
    }

    fn write_where(&self, context: &mut Context, out: &mut String, predicate: Option<&Predicate>) {
        if let Some(predicate) = predicate.filter(|v| !v.is_empty()) {
            out.push_str("\nWHERE ");
            self.write_predicate(context, out, predicate);
        }
    }

    fn write_order_by(&self, context: &mut Context, out: &mut String, order_by: &[OrderField]) {
        separated_by(
            out,
            order_by,
            |out, v| {
                self.write_column(context, out, v.field.name());
                out.push_str(match v.order {
                    Order::Asc => " ASC",
                    Order::Desc => " DESC",
                });
            },
            ", ",
        );
    }

    /// Row limit written right after `SELECT`.
    fn write_select_top(&self, _context: &mut Context, _out: &mut String, _top: u32) {}

    /// Row limit written at the end of the statement.
    fn write_limit(&self, _context: &mut Context, out: &mut String, top: u32) {
        out.push_str("\nLIMIT ");
        write_integer!(out, top);
    }

    fn write_count_expression(&self, _context: &mut Context, out: &mut String) {
        out.push_str("COUNT(*)");
    }

    /// Tail of an insert reporting the primary of the new row.
    fn write_insert_returning(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        if let Some(primary) = statement.primary {
            out.push_str("\nRETURNING ");
            self.write_column(context, out, &primary.name);
        }
    }

    /// Tail of a merge reporting the key of the affected row.
    fn write_merge_returning(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _statement: &Statement,
    ) {
    }

    fn write_query(
        &self,
        out: &mut String,
        statement: &Statement,
        predicate: Option<&Predicate>,
        order_by: &[OrderField],
        top: u32,
    ) -> Result<()> {
        ensure_columns(statement.fields, "Query", statement.table)?;
        out.reserve(64 + statement.fields.len() * 24);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("SELECT ");
        let mut context = Context::new(Fragment::SqlSelect);
        if top > 0 {
            self.write_select_top(&mut context, out, top);
        }
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
        if !order_by.is_empty() {
            out.push_str("\nORDER BY ");
            self.write_order_by(
                &mut context.switch_fragment(Fragment::SqlSelectOrderBy).current,
                out,
                order_by,
            );
        }
        if top > 0 {
            self.write_limit(&mut context, out, top);
        }
        out.push(';');
        Ok(())
    }

    fn write_query_all(
        &self,
        out: &mut String,
        statement: &Statement,
        order_by: &[OrderField],
    ) -> Result<()> {
        self.write_query(out, statement, None, order_by, 0)
    }

    /// Page of rows ranked by `ROW_NUMBER()` over the ordering, `page` is zero based.
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
        let first = page as u64 * rows_per_batch as u64 + 1;
        let last = (page as u64 + 1) * rows_per_batch as u64;
        out.reserve(192 + statement.fields.len() * 48);
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::SqlSelectRanked);
        out.push_str("WITH ");
        self.write_identifier_quoted(&mut context, out, "CTE");
        out.push_str(" AS\n(\nSELECT ROW_NUMBER() OVER (ORDER BY ");
        self.write_order_by(&mut context, out, &order_by);
        out.push_str(") AS ");
        self.write_identifier_quoted(&mut context, out, "RowNumber");
        out.push_str(", ");
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
        out.push_str("\n)\nSELECT ");
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        self.write_columns(&mut context.current, out, statement.fields);
        out.push_str("\nFROM ");
        self.write_identifier_quoted(&mut context.current, out, "CTE");
        out.push_str("\nWHERE ");
        self.write_identifier_quoted(&mut context.current, out, "RowNumber");
        out.push_str(" BETWEEN ");
        write_integer!(out, first);
        out.push_str(" AND ");
        write_integer!(out, last);
        out.push_str("\nORDER BY ");
        self.write_order_by(
            &mut context
                .current
                .switch_fragment(Fragment::SqlSelectOrderBy)
                .current,
            out,
            &order_by,
        );
        out.push(';');
        Ok(())
    }

    fn write_count(
        &self,
        out: &mut String,
        statement: &Statement,
        predicate: Option<&Predicate>,
    ) -> Result<()> {
        out.reserve(64);
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::SqlCount);
        out.push_str("SELECT ");
        self.write_count_expression(&mut context, out);
        out.push_str(" AS ");
        self.write_identifier_quoted(&mut context, out, "Counted");
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
        out.push(';');
        Ok(())
    }

    fn write_count_all(&self, out: &mut String, statement: &Statement) -> Result<()> {
        self.write_count(out, statement, None)
    }

    fn write_delete(
        &self,
        out: &mut String,
        statement: &Statement,
        predicate: Option<&Predicate>,
    ) -> Result<()> {
        out.reserve(64);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("DELETE FROM ");
        let mut context = Context::new(Fragment::SqlDeleteFrom);
        self.write_table_name(&mut context, out, statement.table);
        self.write_where(
            &mut context
                .switch_fragment(Fragment::SqlDeleteFromWhere)
                .current,
            out,
            predicate,
        );
        out.push(';');
        Ok(())
    }

    fn write_delete_all(&self, out: &mut String, statement: &Statement) -> Result<()> {
        self.write_delete(out, statement, None)
    }

    fn write_truncate(&self, out: &mut String, statement: &Statement) -> Result<()> {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("TRUNCATE TABLE ");
        self.write_table_name(&mut Context::new(Fragment::SqlTruncate), out, statement.table);
        out.push(';');
        Ok(())
    }

    /// Single row insert, used once per row by the batched form.
    fn write_insert_row(&self, context: &mut Context, out: &mut String, statement: &Statement) {
        let fields = statement
            .fields
            .iter()
            .filter(|v| !statement.is_identity(v))
            .cloned()
            .collect::<Vec<_>>();
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("INSERT INTO ");
        self.write_table_name(context, out, statement.table);
        self.write_hints(context, out, statement.hints);
        out.push_str(" (");
        self.write_columns(context, out, &fields);
        out.push_str(")\nVALUES (");
        self.write_parameters(
            &mut context.switch_fragment(Fragment::SqlInsertIntoValues).current,
            out,
            &fields,
        );
        out.push(')');
        self.write_insert_returning(
            &mut context
                .switch_fragment(Fragment::SqlInsertIntoReturning)
                .current,
            out,
            statement,
        );
        out.push(';');
    }

    /// Insert of a row, the identity column is left to the database.
    fn write_insert(&self, out: &mut String, statement: &Statement) -> Result<()> {
        ensure_insertable(statement, "Insert")?;
        out.reserve(96 + statement.fields.len() * 32);
        self.write_insert_row(&mut Context::new(Fragment::SqlInsertInto), out, statement);
        Ok(())
    }

    fn write_insert_all(
        &self,
        out: &mut String,
        statement: &Statement,
        batch_size: usize,
    ) -> Result<()> {
        ensure_insertable(statement, "InsertAll")?;
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        out.reserve(batch_size * (96 + statement.fields.len() * 32));
        for row in 0..batch_size {
            self.write_insert_row(
                &mut Context::with_row(Fragment::SqlInsertInto, row),
                out,
                statement,
            );
        }
        Ok(())
    }

    /// Single row merge, matching the rows on `qualifiers`.
    fn write_merge_row(
        &self,
        context: &mut Context,
        out: &mut String,
        statement: &Statement,
        qualifiers: &[Field],
    ) {
        let mut source = statement.fields.to_vec();
        source.extend(
            qualifiers
                .iter()
                .filter(|v| !is_listed(statement.fields, v))
                .cloned(),
        );
        let insertable = source
            .iter()
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
        out.push_str("MERGE INTO ");
        self.write_table_name(context, out, statement.table);
        self.write_hints(context, out, statement.hints);
        out.push_str(" AS T\nUSING (SELECT ");
        {
            let mut context = context.switch_fragment(Fragment::SqlMergeUsing);
            separated_by(
                out,
                &source,
                |out, v| {
                    self.write_parameter(&mut context.current, out, v.name());
                    out.push_str(" AS ");
                    self.write_column(&mut context.current, out, v.name());
                },
                ", ",
            );
        }
        out.push_str(") AS S\nON (");
        {
            let mut context = context.switch_fragment(Fragment::SqlMergeOn);
            separated_by(
                out,
                qualifiers,
                |out, v| {
                    self.write_column(&mut context.current.switch_alias("S").current, out, v.name());
                    out.push_str(" = ");
                    self.write_column(&mut context.current.switch_alias("T").current, out, v.name());
                },
                " AND ",
            );
        }
        out.push(')');
        {
            let mut context = context.switch_fragment(Fragment::SqlMergeInsert);
            out.push_str("\nWHEN NOT MATCHED THEN\nINSERT (");
            self.write_columns(&mut context.current, out, &insertable);
            out.push_str(") VALUES (");
            self.write_parameters(&mut context.current, out, &insertable);
            out.push(')');
        }
        if !updatable.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlMergeUpdate);
            out.push_str("\nWHEN MATCHED THEN\nUPDATE SET ");
            separated_by(
                out,
                &updatable,
                |out, v| {
                    self.write_column(&mut context.current, out, v.name());
                    out.push_str(" = ");
                    self.write_column(&mut context.current.switch_alias("S").current, out, v.name());
                },
                ", ",
            );
        }
        self.write_merge_returning(context, out, statement);
        out.push(';');
    }

    /// Insert or update of a row, `qualifiers` default to the primary.
    fn write_merge(
        &self,
        out: &mut String,
        statement: &Statement,
        qualifiers: &[Field],
    ) -> Result<()> {
        ensure_insertable(statement, "Merge")?;
        let qualifiers = qualifiers_or_primary(qualifiers, statement, "Merge")?;
        out.reserve(192 + statement.fields.len() * 64);
        self.write_merge_row(&mut Context::new(Fragment::None), out, statement, &qualifiers);
        Ok(())
    }

    fn write_merge_all(
        &self,
        out: &mut String,
        statement: &Statement,
        qualifiers: &[Field],
        batch_size: usize,
    ) -> Result<()> {
        ensure_insertable(statement, "MergeAll")?;
        let qualifiers = qualifiers_or_primary(qualifiers, statement, "MergeAll")?;
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        out.reserve(batch_size * (192 + statement.fields.len() * 64));
        for row in 0..batch_size {
            self.write_merge_row(
                &mut Context::with_row(Fragment::None, row),
                out,
                statement,
                &qualifiers,
            );
        }
        Ok(())
    }

    /// Single row update, filtered on `qualifiers` when there is no predicate.
    fn write_update_row(
        &self,
        context: &mut Context,
        out: &mut String,
        statement: &Statement,
        set: &[Field],
        predicate: Option<&Predicate>,
        qualifiers: &[Field],
    ) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("UPDATE ");
        self.write_table_name(context, out, statement.table);
        self.write_hints(context, out, statement.hints);
        out.push_str("\nSET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            separated_by(
                out,
                set,
                |out, v| {
                    self.write_column(&mut context.current, out, v.name());
                    out.push_str(" = ");
                    self.write_parameter(&mut context.current, out, v.name());
                },
                ", ",
            );
        }
        if let Some(predicate) = predicate.filter(|v| !v.is_empty()) {
            self.write_where(
                &mut context.switch_fragment(Fragment::SqlUpdateWhere).current,
                out,
                Some(predicate),
            );
        } else if !qualifiers.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            out.push_str("\nWHERE (");
            separated_by(
                out,
                qualifiers,
                |out, v| {
                    self.write_column(&mut context.current, out, v.name());
                    out.push_str(" = ");
                    self.write_parameter(&mut context.current, out, v.name());
                },
                " AND ",
            );
            out.push(')');
        }
        out.push(';');
    }

    /// Update of the non key columns, predicate parameters are prefixed by an underscore.
    fn write_update(
        &self,
        out: &mut String,
        statement: &Statement,
        predicate: Option<&Predicate>,
    ) -> Result<()> {
        let qualifiers = match predicate.filter(|v| !v.is_empty()) {
            Some(..) => Cow::Borrowed(&[][..]),
            None => qualifiers_or_primary(&[], statement, "Update")?,
        };
        let set = statement
            .fields
            .iter()
            .filter(|v| {
                !statement.is_primary(v) && !statement.is_identity(v) && !is_listed(&qualifiers, v)
            })
            .cloned()
            .collect::<Vec<_>>();
        ensure_columns(&set, "Update", statement.table)?;
        out.reserve(96 + set.len() * 32);
        self.write_update_row(
            &mut Context::new(Fragment::None),
            out,
            statement,
            &set,
            predicate,
            &qualifiers,
        );
        Ok(())
    }

    fn write_update_all(
        &self,
        out: &mut String,
        statement: &Statement,
        qualifiers: &[Field],
        batch_size: usize,
    ) -> Result<()> {
        let qualifiers = qualifiers_or_primary(qualifiers, statement, "UpdateAll")?;
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        let set = statement
            .fields
            .iter()
            .filter(|v| {
                !statement.is_primary(v) && !statement.is_identity(v) && !is_listed(&qualifiers, v)
            })
            .cloned()
            .collect::<Vec<_>>();
        ensure_columns(&set, "UpdateAll", statement.table)?;
        out.reserve(batch_size * (96 + set.len() * 32));
        for row in 0..batch_size {
            self.write_update_row(
                &mut Context::with_row(Fragment::None, row),
                out,
                statement,
                &set,
                None,
                &qualifiers,
            );
        }
        Ok(())
    }

    /// Query returning the column metadata of `table`.
    ///
    /// Bound parameters: `@TableName`, plus `@Schema` when the table name is qualified.
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
            "SELECT C.COLUMN_NAME, C.IS_NULLABLE, C.DATA_TYPE, C.CHARACTER_MAXIMUM_LENGTH,",
            " C.NUMERIC_PRECISION, C.NUMERIC_SCALE, C.COLUMN_DEFAULT\n",
            "FROM INFORMATION_SCHEMA.COLUMNS C\n",
            "WHERE C.TABLE_NAME = ",
        ));
        self.write_parameter(&mut context, out, "TableName");
        if table.contains('.') {
            out.push_str(" AND C.TABLE_SCHEMA = ");
            self.write_parameter(&mut context, out, "Schema");
        }
        out.push_str("\nORDER BY C.ORDINAL_POSITION;");
        Ok(())
    }
}

/// Fallback generic SQL writer (closest to ANSI conventions).
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
