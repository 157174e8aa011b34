#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlCount,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlFieldsQuery,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlInsertIntoReturning,
    SqlMergeInsert,
    SqlMergeOn,
    SqlMergeUpdate,
    SqlMergeUsing,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectOrderBy,
    SqlSelectRanked,
    SqlSelectWhere,
    SqlTruncate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// State threaded through the fragment writers of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Row of a batched statement, suffixes the parameter names when above zero.
    pub row: usize,
    pub fragment: Fragment,
    /// Alias prefixed to the column names.
    pub alias: Option<&'static str>,
}

impl Context {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            row: 0,
            fragment,
            alias: None,
        }
    }

    pub fn with_row(fragment: Fragment, row: usize) -> Self {
        Self {
            row,
            ..Self::new(fragment)
        }
    }

    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        ContextUpdater {
            current: Context {
                fragment,
                alias: None,
                ..*self
            },
            previous: self,
        }
    }

    pub fn switch_alias<'s>(&'s mut self, alias: &'static str) -> ContextUpdater<'s> {
        ContextUpdater {
            current: Context {
                alias: Some(alias),
                ..*self
            },
            previous: self,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Fragment::None)
    }
}

pub struct ContextUpdater<'a> {
    pub current: Context,
    pub previous: &'a mut Context,
}

impl<'a> Drop for ContextUpdater<'a> {
    fn drop(&mut self) {
        self.previous.row = self.current.row;
    }
}
