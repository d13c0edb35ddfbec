//! Error taxonomy for domain object definition and construction.
//!
//! Every failure the library can signal is a [`DomainError`] variant. Errors
//! are grouped into coarse categories (see [`DomainError::category`]) so that
//! log lines and callers can branch on the kind of failure without matching
//! every variant.

use thiserror::Error;

use crate::domain::value::AttrKind;
use crate::validation::ValidationError;

/// Convenience result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised while defining, constructing or mutating domain objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Attempted to assign an attribute of a value object.
    #[error("Cannot modify '{type_name}.{attr}'; value objects are immutable")]
    Immutable { type_name: String, attr: String },

    /// Attribute lookup on a name the type does not declare.
    #[error("'{type_name}' object has no attribute '{attr}'")]
    UnknownAttribute { type_name: String, attr: String },

    /// Keyword argument that matches no declared attribute.
    #[error("{type_name}() got an unexpected keyword argument '{attr}'")]
    UnexpectedArgument { type_name: String, attr: String },

    /// Required attribute was not supplied and has no default.
    #[error("{type_name}() missing required argument '{attr}'")]
    MissingArgument { type_name: String, attr: String },

    /// More positional arguments than declared attributes.
    #[error("{type_name}() takes {expected} positional arguments but {actual} were given")]
    TooManyArguments {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// Positional construction of a keyword-only type.
    #[error("{type_name}() accepts keyword arguments only")]
    KeywordOnly { type_name: String },

    /// Supplied value does not match the declared attribute kind.
    #[error("'{type_name}.{attr}' expects {expected}, got {actual}")]
    TypeMismatch {
        type_name: String,
        attr: String,
        expected: AttrKind,
        actual: &'static str,
    },

    /// Attribute coercer rejected the supplied value.
    #[error("cannot coerce '{type_name}.{attr}': {reason}")]
    CoercionFailed {
        type_name: String,
        attr: String,
        reason: String,
    },

    /// A precondition rejected a supplied argument.
    #[error("precondition failed for '{type_name}.{attr}': {reason}")]
    PreconditionFailed {
        type_name: String,
        attr: String,
        reason: String,
    },

    /// A postcondition rejected a stored attribute value.
    #[error("postcondition failed for '{type_name}.{attr}': {reason}")]
    PostconditionFailed {
        type_name: String,
        attr: String,
        reason: String,
    },

    /// A type-level invariant rejected the assembled instance.
    #[error("invariant failed for '{type_name}': {reason}")]
    InvariantFailed { type_name: String, reason: String },

    /// Entity constructed without a value for its identity attribute.
    #[error("Entity '{type_name}' must have a unique ID")]
    NoEntityId { type_name: String },

    /// Attempted to reassign the identity attribute of an entity.
    #[error("cannot change identity attribute '{type_name}.{attr}'")]
    IdentityImmutable { type_name: String, attr: String },

    /// Entity definition names an identity attribute it does not declare.
    #[error("entity '{type_name}' declares no attribute '{attr}' to use as its ID")]
    UnknownIdAttribute { type_name: String, attr: String },

    /// The same attribute name was declared twice.
    #[error("attribute '{attr}' declared more than once on '{type_name}'")]
    DuplicateAttribute { type_name: String, attr: String },

    /// Type declares more attributes than the configured limit.
    #[error("'{type_name}' declares {actual} attributes (limit {max})")]
    TooManyFields {
        type_name: String,
        max: usize,
        actual: usize,
    },

    /// Declared default does not satisfy the attribute kind.
    #[error("default for '{type_name}.{attr}' must be {expected}, got {actual}")]
    InvalidDefault {
        type_name: String,
        attr: String,
        expected: AttrKind,
        actual: &'static str,
    },

    /// Config passed to a builder failed validation.
    #[error("invalid config for '{type_name}': {reason}")]
    InvalidConfig { type_name: String, reason: String },

    /// Aggregate root declared on something other than an entity.
    #[error("Aggregate roots must be entities ('{type_name}' is a value object)")]
    AggregateRootNotEntity { type_name: String },

    /// Type or attribute name failed identifier validation.
    #[error(transparent)]
    InvalidName(#[from] ValidationError),
}

impl DomainError {
    /// Coarse grouping used for structured log fields.
    pub fn category(&self) -> &'static str {
        match self {
            DomainError::Immutable { .. } | DomainError::IdentityImmutable { .. } => {
                "immutability"
            }
            DomainError::UnknownAttribute { .. } => "lookup",
            DomainError::UnexpectedArgument { .. }
            | DomainError::MissingArgument { .. }
            | DomainError::TooManyArguments { .. }
            | DomainError::KeywordOnly { .. } => "arguments",
            DomainError::TypeMismatch { .. }
            | DomainError::CoercionFailed { .. }
            | DomainError::PreconditionFailed { .. }
            | DomainError::PostconditionFailed { .. }
            | DomainError::InvariantFailed { .. }
            | DomainError::NoEntityId { .. } => "validation",
            DomainError::UnknownIdAttribute { .. }
            | DomainError::DuplicateAttribute { .. }
            | DomainError::TooManyFields { .. }
            | DomainError::InvalidDefault { .. }
            | DomainError::InvalidConfig { .. }
            | DomainError::InvalidName(_) => "definition",
            DomainError::AggregateRootNotEntity { .. } => "aggregate",
        }
    }

    /// True when the error stems from a rejected value rather than a bad definition.
    pub fn is_validation(&self) -> bool {
        self.category() == "validation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immutable_message_matches_value_object_wording() {
        let err = DomainError::Immutable {
            type_name: "Money".to_string(),
            attr: "amount".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot modify 'Money.amount'; value objects are immutable"
        );
        assert_eq!(err.category(), "immutability");
    }

    #[test]
    fn test_type_mismatch_names_expected_kind() {
        let err = DomainError::TypeMismatch {
            type_name: "Point".to_string(),
            attr: "x".to_string(),
            expected: AttrKind::Integer,
            actual: "text",
        };
        assert_eq!(err.to_string(), "'Point.x' expects integer, got text");
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_error_converts_into_definition_error() {
        let err: DomainError = ValidationError::EmptyString {
            parameter: "type name".to_string(),
        }
        .into();
        assert_eq!(err.category(), "definition");
        assert!(!err.is_validation());
    }
}
