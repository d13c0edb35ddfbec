//! Property-Based Invariant Testing
//!
//! Invariants that must hold for any attribute values:
//! - Equal attribute values produce equal, equally-hashed value objects
//! - Ordering agrees with equality
//! - Assignment on a value object always fails and never changes it
//! - Preconditions decide construction exactly as the predicate says

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use domain_objects::{AttrKind, AttrValue, DomainError, ValueObjectType, field, value_object};
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn pair_type() -> ValueObjectType {
    value_object("Pair")
        .field(field("left", AttrKind::Integer))
        .field(field("right", AttrKind::Text))
        .unregistered()
        .build()
        .expect("pair type")
}

fn attr_value() -> impl Strategy<Value = AttrValue> {
    let leaf = prop_oneof![
        Just(AttrValue::Null),
        any::<bool>().prop_map(AttrValue::Bool),
        any::<i64>().prop_map(AttrValue::Integer),
        "[a-z]{0,8}".prop_map(AttrValue::Text),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(AttrValue::List)
    })
}

proptest! {
    #[test]
    fn prop_equal_values_equal_hashes(left in any::<i64>(), right in "[a-z]{0,12}") {
        let ty = pair_type();
        let a = ty.construct([("left", AttrValue::from(left)), ("right", AttrValue::from(right.clone()))]).unwrap();
        let b = ty.construct_positional([AttrValue::from(left), AttrValue::from(right)]).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn prop_ordering_consistent_with_equality(
        a in (any::<i64>(), "[a-z]{0,4}"),
        b in (any::<i64>(), "[a-z]{0,4}"),
    ) {
        let ty = pair_type();
        let x = ty.construct_positional([AttrValue::from(a.0), AttrValue::from(a.1)]).unwrap();
        let y = ty.construct_positional([AttrValue::from(b.0), AttrValue::from(b.1)]).unwrap();
        prop_assert_eq!(x == y, x.cmp(&y) == std::cmp::Ordering::Equal);
        prop_assert_eq!(x.cmp(&y), y.cmp(&x).reverse());
    }

    #[test]
    fn prop_assignment_always_fails(value in attr_value(), attr in "[a-z_]{1,10}") {
        let ty = value_object("Anything")
            .field(field("x", AttrKind::Any).optional())
            .unregistered()
            .build()
            .unwrap();
        let instance = ty.construct([("x", value.clone())]).unwrap();
        let err = instance.set(&attr, value.clone()).unwrap_err();
        let is_immutable = matches!(err, DomainError::Immutable { .. });
        prop_assert!(is_immutable);
        prop_assert_eq!(instance.get("x"), Some(&value));
    }

    #[test]
    fn prop_precondition_decides_construction(n in -1_000i64..1_000) {
        let ty = value_object("Positive")
            .field(field("n", AttrKind::Integer).precondition(|v: &AttrValue| v.as_i64().is_some_and(|n| n > 0)))
            .unregistered()
            .build()
            .unwrap();
        prop_assert_eq!(ty.construct([("n", n)]).is_ok(), n > 0);
    }

    #[test]
    fn prop_attr_value_json_roundtrip(value in attr_value()) {
        let json = value.to_json();
        prop_assert_eq!(AttrValue::try_from(json).unwrap(), value);
    }
}
