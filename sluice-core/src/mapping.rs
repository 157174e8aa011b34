use crate::{Entity, Value};
use std::{any::TypeId, borrow::Cow, collections::HashMap};

/// Property declared as primary or identity for an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedProperty {
    pub name: Cow<'static, str>,
    pub value: Value,
}

/// Declarative primary and identity mappings, consulted before the live schema.
pub trait MappingSource: Send + Sync {
    fn primary(&self, entity: TypeId) -> Option<&MappedProperty>;
    fn identity(&self, entity: TypeId) -> Option<&MappedProperty>;
}

#[derive(Default, Debug, Clone)]
struct EntityMapping {
    primary: Option<MappedProperty>,
    identity: Option<MappedProperty>,
}

/// Mappings indexed by entity type, filled at startup.
#[derive(Default, Debug, Clone)]
pub struct EntityMappings {
    entities: HashMap<TypeId, EntityMapping>,
}

impl EntityMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the primary and identity flags declared on the properties of `E`.
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        let mapping = self.entry::<E>();
        mapping.primary = E::primary_property().map(|v| MappedProperty {
            name: v.name.into(),
            value: v.value.clone(),
        });
        mapping.identity = E::identity_property().map(|v| MappedProperty {
            name: v.name.into(),
            value: v.value.clone(),
        });
        self
    }

    pub fn primary_override<E: 'static>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: Value,
    ) -> &mut Self {
        self.entry::<E>().primary = Some(MappedProperty {
            name: name.into(),
            value: value.as_null(),
        });
        self
    }

    pub fn identity_override<E: 'static>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: Value,
    ) -> &mut Self {
        self.entry::<E>().identity = Some(MappedProperty {
            name: name.into(),
            value: value.as_null(),
        });
        self
    }

    fn entry<E: 'static>(&mut self) -> &mut EntityMapping {
        self.entities.entry(TypeId::of::<E>()).or_default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl MappingSource for EntityMappings {
    fn primary(&self, entity: TypeId) -> Option<&MappedProperty> {
        self.entities.get(&entity)?.primary.as_ref()
    }

    fn identity(&self, entity: TypeId) -> Option<&MappedProperty> {
        self.entities.get(&entity)?.identity.as_ref()
    }
}
