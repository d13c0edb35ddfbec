//! Domain Value Objects
//!
//! Value Objects are immutable objects that describe characteristics of a thing.
//! They have no conceptual identity and are defined entirely by their attributes.
//!
//! ## Characteristics
//!
//! - **Immutability**: Once created, a value object cannot be changed
//! - **Equality**: Two value objects are equal if all their attributes are equal
//! - **Self-Validation**: Value objects validate their state on construction
//! - **Side-Effect Free**: Methods return new value objects rather than modifying state
//!
//! A value object type is declared with [`value_object`], which plays the role
//! of a class decorator: it takes a type description and returns the augmented
//! [`ValueObjectType`], registering it so it can later be listed with
//! [`get_value_objects`](super::registry::get_value_objects).
//!
//! ```rust
//! use domain_objects::{AttrKind, AttrValue, DomainError, field, value_object};
//!
//! let money = value_object("Money")
//!     .field(field("amount", AttrKind::Integer)
//!         .precondition(|v: &AttrValue| (v.as_i64().is_some_and(|n| n >= 0), "must not be negative")))
//!     .field(field("currency", AttrKind::Text).default("EUR"))
//!     .build()?;
//!
//! let price = money.construct([("amount", 5)])?;
//! assert_eq!(price.get("currency"), Some(&AttrValue::from("EUR")));
//! assert_eq!(price, money.construct_positional([AttrValue::from(5), AttrValue::from("EUR")])?);
//! assert!(matches!(price.set("amount", 6), Err(DomainError::Immutable { .. })));
//! # Ok::<(), DomainError>(())
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::condition::{Conditioner, IntoVerdict};
use super::definition::{Definition, DefinitionBuilder, DomainTypeId};
use super::fields::Fields;
use super::registry;
use super::value::AttrValue;
use crate::config::ModelConfig;
use crate::error::{DomainError, Result};

/// Result of a dynamic attribute lookup.
///
/// Instances resolve attribute names to their values; types resolve them to
/// the attribute's [`Conditioner`], which exposes the precondition capability.
#[derive(Debug, Clone, Copy)]
pub enum Attr<'a> {
    Value(&'a AttrValue),
    Conditioner(&'a Conditioner),
}

impl<'a> Attr<'a> {
    pub fn as_value(&self) -> Option<&'a AttrValue> {
        match *self {
            Attr::Value(value) => Some(value),
            Attr::Conditioner(_) => None,
        }
    }

    pub fn as_conditioner(&self) -> Option<&'a Conditioner> {
        match *self {
            Attr::Conditioner(conditioner) => Some(conditioner),
            Attr::Value(_) => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Attr::Value(_))
    }
}

/// Starts the declaration of a value object type.
pub fn value_object(name: impl Into<String>) -> ValueObjectBuilder {
    ValueObjectBuilder {
        inner: DefinitionBuilder::new(name.into()),
    }
}

/// Builder returned by [`value_object`].
pub struct ValueObjectBuilder {
    inner: DefinitionBuilder,
}

impl ValueObjectBuilder {
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

    /// Registers a condition over the whole instance, checked after every attribute.
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

    /// Keeps the built type out of the global registry.
    pub fn unregistered(mut self) -> Self {
        self.inner.register(false);
        self
    }

    pub fn build(self) -> Result<ValueObjectType> {
        let register = self.inner.registers();
        let definition = self.inner.build()?;
        tracing::debug!(
            type_name = %definition.name,
            type_id = %definition.id,
            attributes = definition.attrs.len(),
            "built value object type"
        );
        let ty = ValueObjectType {
            def: Arc::new(definition),
        };
        if register {
            registry::register_value_object(ty.clone());
        }
        Ok(ty)
    }
}

/// A built value object type; cheap to clone.
#[derive(Clone)]
pub struct ValueObjectType {
    def: Arc<Definition>,
}

impl ValueObjectType {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn id(&self) -> DomainTypeId {
        self.def.id
    }

    pub fn is_kw_only(&self) -> bool {
        self.def.kw_only
    }

    pub fn is_strict(&self) -> bool {
        self.def.strict
    }

    /// Declared attributes in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Conditioner> {
        self.def.attrs.values()
    }

    pub fn conditioner(&self, attr: &str) -> Result<&Conditioner> {
        self.def.conditioner(attr)
    }

    /// Type-level lookup: declared attributes resolve to their conditioner.
    pub fn getattr(&self, attr: &str) -> Result<Attr<'_>> {
        self.def.conditioner(attr).map(Attr::Conditioner)
    }

    /// Generated one-line documentation of the constructor.
    pub fn signature(&self) -> String {
        self.def.signature()
    }

    /// Constructs an instance from keyword arguments.
    pub fn construct<I, K, V>(&self, args: I) -> Result<ValueObject>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let fields = self.def.assemble(args)?;
        Ok(ValueObject {
            ty: self.clone(),
            fields,
        })
    }

    /// Constructs an instance from positional arguments in declaration order.
    pub fn construct_positional<I, V>(&self, args: I) -> Result<ValueObject>
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        let fields = self.def.assemble_positional(args)?;
        Ok(ValueObject {
            ty: self.clone(),
            fields,
        })
    }
}

impl PartialEq for ValueObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.def.id == other.def.id
    }
}

impl Eq for ValueObjectType {}

impl Hash for ValueObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.def.id.hash(state);
    }
}

impl fmt::Debug for ValueObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObjectType")
            .field("name", &self.def.name)
            .field("id", &self.def.id)
            .field("fields", &self.def.attrs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An immutable instance of a [`ValueObjectType`].
#[derive(Clone)]
pub struct ValueObject {
    ty: ValueObjectType,
    fields: Fields,
}

impl ValueObject {
    pub fn value_type(&self) -> &ValueObjectType {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    pub fn get(&self, attr: &str) -> Option<&AttrValue> {
        self.fields.get(attr)
    }

    /// Instance-level lookup: declared attributes resolve to their value.
    pub fn getattr(&self, attr: &str) -> Result<Attr<'_>> {
        self.fields
            .get(attr)
            .map(Attr::Value)
            .ok_or_else(|| self.ty.def.unknown_attribute(attr))
    }

    /// Assignment is never permitted on a value object.
    pub fn set(&self, attr: &str, _value: impl Into<AttrValue>) -> Result<()> {
        Err(DomainError::Immutable {
            type_name: self.ty.name().to_string(),
            attr: attr.to_string(),
        })
    }

    /// Returns a copy with one attribute replaced, validated like construction.
    pub fn with(&self, attr: &str, value: impl Into<AttrValue>) -> Result<Self> {
        let admitted = self.ty.def.conditioner(attr)?.admit(value.into())?;
        let mut fields = self.fields.clone();
        if let Some(slot) = fields.get_mut(attr) {
            *slot = admitted;
        }
        self.ty.def.verify(&fields)?;
        Ok(Self {
            ty: self.ty.clone(),
            fields,
        })
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.fields.to_json()
    }
}

impl PartialEq for ValueObject {
    fn eq(&self, other: &Self) -> bool {
        self.ty.id() == other.ty.id() && self.fields == other.fields
    }
}

impl Eq for ValueObject {}

impl Hash for ValueObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.id().hash(state);
        self.fields.hash(state);
    }
}

impl PartialOrd for ValueObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ty
            .id()
            .cmp(&other.ty.id())
            .then_with(|| self.fields.cmp(&other.fields))
    }
}

impl fmt::Display for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        for (idx, (attr, value)) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{attr}={value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for ValueObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValueObject", 2)?;
        state.serialize_field("type", self.type_name())?;
        state.serialize_field("fields", &self.fields)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::field;
    use crate::domain::value::AttrKind;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn point() -> ValueObjectType {
        value_object("Point")
            .field(field("x", AttrKind::Integer))
            .field(field("y", AttrKind::Integer))
            .unregistered()
            .build()
            .unwrap()
    }

    #[test]
    fn test_display() {
        let p = point().construct_positional([1, 2]).unwrap();
        assert_eq!(p.to_string(), "Point(x=1, y=2)");
        assert_eq!(format!("{p:?}"), "Point(x=1, y=2)");
    }

    #[test]
    fn test_equal_values_hash_equally() {
        let ty = point();
        let a = ty.construct([("x", 5), ("y", 10)]).unwrap();
        let b = ty.construct_positional([5, 10]).unwrap();
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_same_shape_different_types_not_equal() {
        let a = point().construct_positional([1, 1]).unwrap();
        let b = point().construct_positional([1, 1]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_getattr_on_type_and_instance() {
        let ty = point();
        let p = ty.construct_positional([3, 4]).unwrap();

        assert_eq!(p.getattr("x").unwrap().as_value(), Some(&AttrValue::Integer(3)));
        let conditioner = ty.getattr("y").unwrap().as_conditioner().unwrap();
        assert_eq!(conditioner.owner(), "Point");
        assert_matches!(
            p.getattr("z"),
            Err(DomainError::UnknownAttribute { type_name, attr }) if type_name == "Point" && attr == "z"
        );
    }

    #[test]
    fn test_with_derives_new_instance() {
        let p = point().construct_positional([1, 2]).unwrap();
        let q = p.with("y", 7).unwrap();
        assert_eq!(p.get("y"), Some(&AttrValue::Integer(2)));
        assert_eq!(q.get("y"), Some(&AttrValue::Integer(7)));
        assert_matches!(p.with("y", "seven"), Err(DomainError::TypeMismatch { .. }));
        assert_matches!(p.with("w", 1), Err(DomainError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_serialize() {
        let p = point().construct_positional([1, 2]).unwrap();
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            serde_json::json!({"type": "Point", "fields": {"x": 1, "y": 2}})
        );
        assert_eq!(p.to_json(), serde_json::json!({"x": 1, "y": 2}));
    }
}
