use crate::{Result, Value};
use std::fmt;

/// In-memory record mapped onto a table.
///
/// Properties are declared once, statically, the execution contexts compile
/// against their getters and setters instead of inspecting the type at runtime.
///
/// ```rust
/// use sluice_core::{AsValue, Entity, Property, Value};
///
/// #[derive(Default)]
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn properties() -> &'static [Property<Self>] {
///         static PROPERTIES: &[Property<Tag>] = &[
///             Property::new("Id", Value::Int64(None), |v: &Tag| v.id.as_value())
///                 .primary()
///                 .identity()
///                 .setter(|v, value| {
///                     v.id = AsValue::try_from_value(value)?;
///                     Ok(())
///                 }),
///             Property::new("Label", Value::Varchar(None), |v: &Tag| v.label.clone().as_value()),
///         ];
///         PROPERTIES
///     }
/// }
///
/// assert_eq!(Tag::primary_property().map(|v| v.name), Some("Id"));
/// ```
pub trait Entity: Send + Sync + 'static {
    fn properties() -> &'static [Property<Self>]
    where
        Self: Sized;

    fn primary_property() -> Option<&'static Property<Self>>
    where
        Self: Sized,
    {
        Self::properties().iter().find(|v| v.primary)
    }

    fn identity_property() -> Option<&'static Property<Self>>
    where
        Self: Sized,
    {
        Self::properties().iter().find(|v| v.identity)
    }
}

/// Column of an entity.
pub struct Property<E> {
    /// Column name the property maps to.
    pub name: &'static str,
    /// Type prototype.
    pub value: Value,
    pub primary: bool,
    pub identity: bool,
    pub get: fn(&E) -> Value,
    pub set: Option<fn(&mut E, Value) -> Result<()>>,
}

impl<E> Property<E> {
    pub const fn new(name: &'static str, value: Value, get: fn(&E) -> Value) -> Self {
        Self {
            name,
            value,
            primary: false,
            identity: false,
            get,
            set: None,
        }
    }

    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub const fn setter(mut self, set: fn(&mut E, Value) -> Result<()>) -> Self {
        self.set = Some(set);
        self
    }
}

impl<E> fmt::Debug for Property<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("primary", &self.primary)
            .field("identity", &self.identity)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

/// Named value bound to a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
