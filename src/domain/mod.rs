//! Domain Model Module
//!
//! Building blocks for Domain-Driven Design models.
//!
//! ## Module Structure
//!
//! - **value** - Bounded attribute values (`AttrValue`) and type hints (`AttrKind`)
//! - **condition** - Attribute descriptors (`Conditioner`) with pre/postconditions
//! - **value_objects** - Immutable objects defined by attributes
//! - **entities** - Objects with identity and lifecycle
//! - **aggregates** - Consistency boundaries grouping entities and value objects
//! - **registry** - Process-wide lists of built types
//!
//! ## Usage
//!
//! ```rust
//! use domain_objects::domain::{
//!     aggregates::Aggregate,
//!     condition::field,
//!     entities::entity,
//!     value::AttrKind,
//!     value_objects::value_object,
//! };
//! ```

pub mod aggregates;
pub mod condition;
mod definition;
pub mod entities;
pub mod fields;
pub mod registry;
pub mod value;
pub mod value_objects;

pub use aggregates::{Aggregate, AggregateCollection, AggregateMember, DomainType, aggregate};
pub use condition::{
    Coercer, Condition, Conditioner, IntoVerdict, Invariant, Verdict, field,
};
pub use definition::DomainTypeId;
pub use entities::{Entity, EntityBuilder, EntityId, EntityType, entity};
pub use fields::Fields;
pub use registry::{find_value_object, get_aggregates, get_value_objects};
pub use value::{AttrKind, AttrValue};
pub use value_objects::{Attr, ValueObject, ValueObjectBuilder, ValueObjectType, value_object};
