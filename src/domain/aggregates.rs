//! Domain Aggregates
//!
//! Aggregates are clusters of domain objects that can be treated as a single unit.
//! An aggregate has a root entity (Aggregate Root) that controls access to the aggregate.
//!
//! [`Aggregate`] is applied to built entity or value object types. It checks
//! that only entities and value objects take part in an aggregate and that a
//! root is always an entity, then records the type in an
//! [`AggregateCollection`].
//!
//! ```rust
//! use domain_objects::{Aggregate, AttrKind, DomainError, entity, field, value_object};
//!
//! let order = entity("Order").id_attr("id").field(field("id", AttrKind::Integer)).build()?;
//! let line = value_object("OrderLine").field(field("sku", AttrKind::Text)).build()?;
//!
//! Aggregate::new(true).apply(order)?;
//! Aggregate::default().apply(line.clone())?;
//! assert!(matches!(
//!     Aggregate::new(true).apply(line),
//!     Err(DomainError::AggregateRootNotEntity { .. })
//! ));
//! # Ok::<(), DomainError>(())
//! ```

use indexmap::IndexMap;

use super::entities::EntityType;
use super::registry;
use super::value_objects::ValueObjectType;
use crate::error::{DomainError, Result};

/// A type that may take part in an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainType {
    Entity(EntityType),
    ValueObject(ValueObjectType),
}

impl DomainType {
    pub fn name(&self) -> &str {
        match self {
            DomainType::Entity(ty) => ty.name(),
            DomainType::ValueObject(ty) => ty.name(),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, DomainType::Entity(_))
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            DomainType::Entity(ty) => Some(ty),
            DomainType::ValueObject(_) => None,
        }
    }

    pub fn as_value_object(&self) -> Option<&ValueObjectType> {
        match self {
            DomainType::ValueObject(ty) => Some(ty),
            DomainType::Entity(_) => None,
        }
    }
}

impl From<EntityType> for DomainType {
    fn from(ty: EntityType) -> Self {
        DomainType::Entity(ty)
    }
}

impl From<ValueObjectType> for DomainType {
    fn from(ty: ValueObjectType) -> Self {
        DomainType::ValueObject(ty)
    }
}

/// A type admitted into an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateMember {
    pub ty: DomainType,
    pub root: bool,
}

/// Admitted types keyed by type name; re-admitting a name replaces the entry.
#[derive(Debug, Clone, Default)]
pub struct AggregateCollection {
    members: IndexMap<String, AggregateMember>,
}

impl AggregateCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, member: AggregateMember) {
        self.members.insert(member.ty.name().to_string(), member);
    }

    pub fn get(&self, name: &str) -> Option<&AggregateMember> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateMember> {
        self.members.values()
    }

    pub fn roots(&self) -> impl Iterator<Item = &AggregateMember> {
        self.members.values().filter(|member| member.root)
    }
}

/// Marks entity and value object types as members (or roots) of an aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    root: bool,
}

/// Lower-case alias of [`Aggregate::new`].
pub fn aggregate(root: bool) -> Aggregate {
    Aggregate::new(root)
}

impl Aggregate {
    pub fn new(root: bool) -> Self {
        Self { root }
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Validates `ty`, records it in the global collection and returns it unchanged.
    pub fn apply<T>(&self, ty: T) -> Result<T>
    where
        T: Into<DomainType> + Clone,
    {
        let member = self.admit(ty.clone().into())?;
        registry::with_aggregates(|collection| collection.add(member));
        Ok(ty)
    }

    /// Like [`apply`](Self::apply) but records into `collection`.
    pub fn apply_to<T>(&self, collection: &mut AggregateCollection, ty: T) -> Result<T>
    where
        T: Into<DomainType> + Clone,
    {
        let member = self.admit(ty.clone().into())?;
        collection.add(member);
        Ok(ty)
    }

    pub fn validate_root_is_entity(&self, ty: &DomainType) -> Result<()> {
        if ty.is_entity() {
            Ok(())
        } else {
            Err(DomainError::AggregateRootNotEntity {
                type_name: ty.name().to_string(),
            })
        }
    }

    fn admit(&self, ty: DomainType) -> Result<AggregateMember> {
        if self.root {
            self.validate_root_is_entity(&ty)?;
        }
        tracing::debug!(type_name = ty.name(), root = self.root, "admitted aggregate member");
        Ok(AggregateMember {
            ty,
            root: self.root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::field;
    use crate::domain::entities::entity;
    use crate::domain::value::AttrKind;
    use crate::domain::value_objects::value_object;
    use assert_matches::assert_matches;

    fn mock_entity() -> EntityType {
        entity("MockEntity").build().unwrap()
    }

    fn mock_value_object() -> ValueObjectType {
        value_object("MockValueObject")
            .field(field("x", AttrKind::Any))
            .unregistered()
            .build()
            .unwrap()
    }

    #[test]
    fn test_snake_case_alias() {
        assert_eq!(aggregate(true), Aggregate::new(true));
        assert!(!Aggregate::default().is_root());
    }

    #[test]
    fn test_apply_returns_type_unchanged() {
        let mut collection = AggregateCollection::new();
        let ty = mock_entity();
        let result = Aggregate::new(true).apply_to(&mut collection, ty.clone()).unwrap();
        assert_eq!(result, ty);

        let vo = mock_value_object();
        let result = Aggregate::new(false).apply_to(&mut collection, vo.clone()).unwrap();
        assert_eq!(result, vo);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.roots().count(), 1);
        assert!(collection.get("MockValueObject").is_some_and(|m| !m.root));
    }

    #[test]
    fn test_value_object_cannot_be_root() {
        let mut collection = AggregateCollection::new();
        assert_matches!(
            Aggregate::new(true).apply_to(&mut collection, mock_value_object()),
            Err(DomainError::AggregateRootNotEntity { type_name }) if type_name == "MockValueObject"
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn test_validate_root_is_entity() {
        let agg = Aggregate::new(true);
        assert!(agg.validate_root_is_entity(&mock_entity().into()).is_ok());
        assert!(agg.validate_root_is_entity(&mock_value_object().into()).is_err());
    }
}
