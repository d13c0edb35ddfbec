//! Process-wide registries of built value object types and aggregate members.
//!
//! Both registries live for the whole process. The value object registry is
//! append-only: every registered `build()` adds an entry, rebuilding a name
//! keeps the earlier entry, and nothing is ever removed. Types built in a loop
//! or per request should use `unregistered()`. The aggregate collection is
//! keyed by type name and stays bounded by the number of distinct names.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::aggregates::AggregateCollection;
use super::value_objects::ValueObjectType;

static VALUE_OBJECTS: Lazy<RwLock<Vec<ValueObjectType>>> = Lazy::new(|| RwLock::new(Vec::new()));

static AGGREGATES: Lazy<RwLock<AggregateCollection>> =
    Lazy::new(|| RwLock::new(AggregateCollection::new()));

pub(crate) fn register_value_object(ty: ValueObjectType) {
    tracing::debug!(type_name = ty.name(), type_id = %ty.id(), "registered value object type");
    VALUE_OBJECTS.write().push(ty);
}

/// Every registered value object type, in registration order.
///
/// Returns a snapshot; the registry only grows.
pub fn get_value_objects() -> Vec<ValueObjectType> {
    VALUE_OBJECTS.read().clone()
}

/// Most recently registered value object type with the given name.
pub fn find_value_object(name: &str) -> Option<ValueObjectType> {
    VALUE_OBJECTS
        .read()
        .iter()
        .rev()
        .find(|ty| ty.name() == name)
        .cloned()
}

pub(crate) fn with_aggregates<R>(func: impl FnOnce(&mut AggregateCollection) -> R) -> R {
    func(&mut AGGREGATES.write())
}

/// Snapshot of every type admitted by an [`Aggregate`](super::aggregates::Aggregate).
pub fn get_aggregates() -> AggregateCollection {
    AGGREGATES.read().clone()
}
