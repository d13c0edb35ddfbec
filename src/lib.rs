//! Building blocks for Domain-Driven Design models.
//!
//! Types are declared at runtime through builders that act like class
//! decorators: [`value_object`] produces immutable, self-validating value
//! object types, [`entity`] produces identity-bearing mutable types, and
//! [`Aggregate`] groups them under a consistency boundary.
//!
//! ```rust
//! use domain_objects::{Attr, AttrKind, AttrValue, DomainError, field, value_object};
//!
//! let email = value_object("Email")
//!     .field(
//!         field("address", AttrKind::Text)
//!             .coerce(|v| Ok(v.as_str().map(|s| s.trim().to_lowercase().into()).unwrap_or(v)))
//!             .precondition(|v: &AttrValue| (v.as_str().is_some_and(|s| s.contains('@')), "must contain '@'")),
//!     )
//!     .build()?;
//!
//! let primary = email.construct([("address", "  Ada@Example.org ")])?;
//! assert_eq!(primary.to_string(), r#"Email(address="ada@example.org")"#);
//!
//! // Type-level lookup yields the attribute's precondition capability.
//! let Attr::Conditioner(address) = email.getattr("address")? else { unreachable!() };
//! let domain_of = address.guard(|v: AttrValue| {
//!     v.as_str().and_then(|s| s.split('@').nth(1)).unwrap_or_default().to_string()
//! });
//! assert_eq!(domain_of("grace@navy.mil".into())?, "navy.mil");
//! assert!(domain_of("nobody".into()).is_err());
//!
//! assert!(matches!(primary.set("address", "x@y.z"), Err(DomainError::Immutable { .. })));
//! # Ok::<(), DomainError>(())
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::ModelConfig;
pub use domain::{
    Aggregate, AggregateCollection, AggregateMember, Attr, AttrKind, AttrValue, Conditioner,
    DomainType, DomainTypeId, Entity, EntityBuilder, EntityId, EntityType, Fields, IntoVerdict,
    ValueObject, ValueObjectBuilder, ValueObjectType, Verdict, aggregate, entity, field,
    find_value_object, get_aggregates, get_value_objects, value_object,
};
pub use error::{DomainError, Result};
pub use logging::{LogFormat, LogOutput, LoggingConfig, init_logging};
