use crate::{Field, Result, Value, same_identifier, unquote};

/// Column metadata as reported by the database.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Unquoted column name.
    pub name: String,
    pub primary: bool,
    pub identity: bool,
    pub nullable: bool,
    /// Storage type prototype.
    pub value: Value,
    /// Database type name, as reported by the provider.
    pub column_type: String,
    pub size: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub default: Option<String>,
}

impl SchemaField {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: unquote(name).into_owned(),
            value: value.as_null(),
            nullable: true,
            ..Default::default()
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self.nullable = false;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether `name` refers to this column, ignoring quotes and case.
    pub fn matches(&self, name: &str) -> bool {
        same_identifier(&self.name, name)
    }

    pub fn as_field(&self) -> Result<Field> {
        Field::typed(self.name.clone(), self.value.clone())
    }
}
