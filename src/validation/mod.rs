//! Input validation for domain type definitions.
//!
//! This module provides the guards applied when a value object or entity
//! type is built:
//! - Non-empty checks for type and attribute names
//! - Identifier syntax and length checks
//!
//! # Usage
//!
//! ```rust
//! use domain_objects::validation::{validate_identifier, ValidationError};
//!
//! assert!(validate_identifier("type name", "Money").is_ok());
//! assert!(matches!(
//!     validate_identifier("type name", "not valid"),
//!     Err(ValidationError::InvalidIdentifier { .. })
//! ));
//! ```

pub mod input_guards;

pub use input_guards::{
    MAX_IDENTIFIER_LENGTH, ValidationError, ValidationResult, validate_identifier,
    validate_non_empty_string,
};
