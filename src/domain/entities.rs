//! Domain Entities
//!
//! Entities are objects with a distinct identity that runs through time and different
//! representations. They have a lifecycle and are mutable.
//!
//! ## Characteristics
//!
//! - **Identity**: Each entity has a unique identifier
//! - **Lifecycle**: Entities are created, modified, and potentially deleted
//! - **Equality**: Two entities are equal if they have the same identity
//!
//! An entity type may name one of its attributes as its identity with
//! [`EntityBuilder::id_attr`]; that attribute must be non-null at
//! construction and can never be reassigned. Entities without an identity
//! attribute receive a random surrogate identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

use super::condition::{Conditioner, IntoVerdict};
use super::definition::{Definition, DefinitionBuilder, DomainTypeId};
use super::fields::Fields;
use super::value::AttrValue;
use super::value_objects::Attr;
use crate::config::ModelConfig;
use crate::error::{DomainError, Result};

/// Identity of an entity instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Value of the declared identity attribute.
    Attr(AttrValue),
    /// Generated identity for types without an identity attribute.
    Surrogate(Uuid),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Attr(value) => write!(f, "{value}"),
            EntityId::Surrogate(uuid) => write!(f, "{uuid}"),
        }
    }
}

/// Starts the declaration of an entity type.
pub fn entity(name: impl Into<String>) -> EntityBuilder {
    EntityBuilder {
        inner: DefinitionBuilder::new(name.into()),
        id_attr: None,
    }
}

/// Builder returned by [`entity`].
pub struct EntityBuilder {
    inner: DefinitionBuilder,
    id_attr: Option<String>,
}

impl EntityBuilder {
    /// Names the attribute that carries the entity's identity.
    pub fn id_attr(mut self, attr: impl Into<String>) -> Self {
        self.id_attr = Some(attr.into());
        self
    }

    pub fn field(mut self, conditioner: Conditioner) -> Self {
        self.inner.push_field(conditioner);
        self
    }

    pub fn fields(mut self, conditioners: impl IntoIterator<Item = Conditioner>) -> Self {
        for conditioner in conditioners {
            self.inner.push_field(conditioner);
        }
        self
    }

    pub fn invariant<F, V>(mut self, func: F) -> Self
    where
        F: Fn(&Fields) -> V + Send + Sync + 'static,
        V: IntoVerdict,
    {
        self.inner.push_invariant(func);
        self
    }

    pub fn kw_only(mut self, kw_only: bool) -> Self {
        self.inner.kw_only(kw_only);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.inner.strict(strict);
        self
    }

    /// Supplies defaults for every choice not made explicitly on this builder.
    pub fn with_config(mut self, config: &ModelConfig) -> Self {
        self.inner.apply_config(config);
        self
    }

    pub fn build(self) -> Result<EntityType> {
        if let Some(attr) = &self.id_attr {
            if !self.inner.has_field(attr) {
                return Err(DomainError::UnknownIdAttribute {
                    type_name: self.inner.name().to_string(),
                    attr: attr.clone(),
                });
            }
        }
        let definition = self.inner.build()?;
        tracing::debug!(
            type_name = %definition.name,
            type_id = %definition.id,
            id_attr = ?self.id_attr,
            "built entity type"
        );
        Ok(EntityType {
            inner: Arc::new(EntityDef {
                def: definition,
                id_attr: self.id_attr,
            }),
        })
    }
}

struct EntityDef {
    def: Definition,
    id_attr: Option<String>,
}

/// A built entity type; cheap to clone.
#[derive(Clone)]
pub struct EntityType {
    inner: Arc<EntityDef>,
}

impl EntityType {
    pub fn name(&self) -> &str {
        &self.inner.def.name
    }

    pub fn id(&self) -> DomainTypeId {
        self.inner.def.id
    }

    pub fn id_attr(&self) -> Option<&str> {
        self.inner.id_attr.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Conditioner> {
        self.inner.def.attrs.values()
    }

    pub fn conditioner(&self, attr: &str) -> Result<&Conditioner> {
        self.inner.def.conditioner(attr)
    }

    pub fn getattr(&self, attr: &str) -> Result<Attr<'_>> {
        self.inner.def.conditioner(attr).map(Attr::Conditioner)
    }

    pub fn signature(&self) -> String {
        self.inner.def.signature()
    }

    pub fn construct<I, K, V>(&self, args: I) -> Result<Entity>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let fields = self.inner.def.assemble(args)?;
        self.identify(fields)
    }

    pub fn construct_positional<I, V>(&self, args: I) -> Result<Entity>
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        let fields = self.inner.def.assemble_positional(args)?;
        self.identify(fields)
    }

    fn identify(&self, fields: Fields) -> Result<Entity> {
        let identity = match &self.inner.id_attr {
            Some(attr) => match fields.get(attr) {
                Some(value) if !value.is_null() => EntityId::Attr(value.clone()),
                _ => {
                    return Err(DomainError::NoEntityId {
                        type_name: self.name().to_string(),
                    });
                }
            },
            None => EntityId::Surrogate(Uuid::new_v4()),
        };
        tracing::trace!(type_name = self.name(), identity = %identity, "constructed entity");
        Ok(Entity {
            ty: self.clone(),
            identity,
            fields,
        })
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.inner.def.name)
            .field("id", &self.inner.def.id)
            .field("id_attr", &self.inner.id_attr)
            .finish()
    }
}

/// A mutable instance of an [`EntityType`].
#[derive(Clone)]
pub struct Entity {
    ty: EntityType,
    identity: EntityId,
    fields: Fields,
}

impl Entity {
    pub fn entity_type(&self) -> &EntityType {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    pub fn identity(&self) -> &EntityId {
        &self.identity
    }

    pub fn get(&self, attr: &str) -> Option<&AttrValue> {
        self.fields.get(attr)
    }

    pub fn getattr(&self, attr: &str) -> Result<Attr<'_>> {
        self.fields
            .get(attr)
            .map(Attr::Value)
            .ok_or_else(|| self.ty.inner.def.unknown_attribute(attr))
    }

    /// Assigns one attribute; on any failure the entity is left unchanged.
    pub fn set(&mut self, attr: &str, value: impl Into<AttrValue>) -> Result<()> {
        let def = &self.ty.inner.def;
        if self.ty.id_attr() == Some(attr) {
            return Err(DomainError::IdentityImmutable {
                type_name: def.name.clone(),
                attr: attr.to_string(),
            });
        }
        let admitted = def.conditioner(attr)?.admit(value.into())?;

        let mut candidate = self.fields.clone();
        if let Some(slot) = candidate.get_mut(attr) {
            *slot = admitted;
        }
        def.verify(&candidate)?;
        self.fields = candidate;
        Ok(())
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.fields.to_json()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.ty.id() == other.ty.id() && self.identity == other.identity
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.id().hash(state);
        self.identity.hash(state);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>(", self.type_name(), self.identity)?;
        for (idx, (attr, value)) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{attr}={value}")?;
        }
        write!(f, ")")
    }
}
