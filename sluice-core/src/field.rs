use crate::{Result, ValidationError, Value, unquote};
use std::{
    borrow::Cow,
    fmt::{self, Display},
    hash::{DefaultHasher, Hash, Hasher},
};

/// Logical reference to a column, as requested by the caller.
///
/// The hash is derived from the name and the declared type once, at construction,
/// and two fields are equal when their hashes are equal.
#[derive(Debug, Clone)]
pub struct Field {
    name: Cow<'static, str>,
    value: Option<Value>,
    hash: u64,
}

impl Field {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Result<Self> {
        Self::build(name.into(), None)
    }

    /// Field with a declared type.
    pub fn typed(name: impl Into<Cow<'static, str>>, value: Value) -> Result<Self> {
        Self::build(name.into(), Some(value.as_null()))
    }

    fn build(name: Cow<'static, str>, value: Option<Value>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyFieldName.into());
        }
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        if let Some(value) = &value {
            value.hash_type(&mut hasher);
        }
        Ok(Self {
            name,
            value,
            hash: hasher.finish(),
        })
    }

    /// Fields from a list of names, fails if any of them is empty.
    pub fn from_names<I, S>(names: I) -> Result<Vec<Field>>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        names.into_iter().map(Field::new).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unquoted_name(&self) -> Cow<'_, str> {
        unquote(&self.name)
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// Field used in an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderField {
    pub field: Field,
    pub order: Order,
}

impl OrderField {
    pub fn asc(name: impl Into<Cow<'static, str>>) -> Result<Self> {
        Ok(Self {
            field: Field::new(name)?,
            order: Order::Asc,
        })
    }

    pub fn desc(name: impl Into<Cow<'static, str>>) -> Result<Self> {
        Ok(Self {
            field: Field::new(name)?,
            order: Order::Desc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_rejects_empty_names() {
        assert!(Field::new("").is_err());
        assert!(Field::new("   ").is_err());
        assert!(Field::from_names(["Id", "", "Name"]).is_err());
        assert_eq!(Field::from_names(["Id", "Name"]).unwrap().len(), 2);
    }

    #[test]
    fn field_equality_follows_hash() {
        let a = Field::new("Name").unwrap();
        let b = Field::new(String::from("Name")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
        assert_ne!(a, Field::new("name").unwrap());
        let typed = Field::typed("Name", Value::Varchar(Some("x".into()))).unwrap();
        assert_ne!(a, typed);
        assert_eq!(typed, Field::typed("Name", Value::Varchar(None)).unwrap());
    }

    #[test]
    fn field_unquoted_name() {
        assert_eq!(Field::new("[Name]").unwrap().unquoted_name(), "Name");
        assert_eq!(Field::new("\"Name\"").unwrap().unquoted_name(), "Name");
    }
}
