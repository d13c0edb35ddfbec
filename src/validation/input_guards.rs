//! Input validation guards for domain type definitions
//!
//! Type and attribute names are checked once, when a type is built.

use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted type or attribute name.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validation error types
///
/// Raised when a definition uses a name that cannot serve as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// String parameter is empty or contains only whitespace
    #[error("parameter '{parameter}' cannot be empty or whitespace-only")]
    EmptyString { parameter: String },

    /// Name is not a valid identifier
    #[error("invalid {parameter} '{name}': {reason}")]
    InvalidIdentifier {
        parameter: String,
        name: String,
        reason: String,
    },

    /// Name exceeds the maximum identifier length
    #[error("{parameter} '{name}' is too long (max: {max}, actual: {actual})")]
    TooLong {
        parameter: String,
        name: String,
        max: usize,
        actual: usize,
    },
}

/// Validates that a string parameter is not empty or whitespace-only
///
/// # Examples
///
/// ```
/// use domain_objects::validation::validate_non_empty_string;
///
/// assert!(validate_non_empty_string("type name", "Money").is_ok());
/// assert!(validate_non_empty_string("type name", "").is_err());
/// assert!(validate_non_empty_string("type name", "   ").is_err());
/// ```
pub fn validate_non_empty_string<'a>(
    parameter_name: &str,
    value: &'a str,
) -> ValidationResult<&'a str> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyString {
            parameter: parameter_name.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Validates that a name can be used as a type or attribute identifier
///
/// Identifiers start with an ASCII letter or underscore, continue with ASCII
/// alphanumerics or underscores, and are at most [`MAX_IDENTIFIER_LENGTH`]
/// bytes long.
///
/// # Examples
///
/// ```
/// use domain_objects::validation::validate_identifier;
///
/// assert!(validate_identifier("attribute name", "amount").is_ok());
/// assert!(validate_identifier("attribute name", "_private").is_ok());
/// assert!(validate_identifier("attribute name", "1st").is_err());
/// assert!(validate_identifier("attribute name", "with space").is_err());
/// ```
pub fn validate_identifier<'a>(parameter_name: &str, name: &'a str) -> ValidationResult<&'a str> {
    validate_non_empty_string(parameter_name, name)?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            parameter: parameter_name.to_string(),
            name: name.to_string(),
            max: MAX_IDENTIFIER_LENGTH,
            actual: name.len(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidIdentifier {
        parameter: parameter_name.to_string(),
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid("must start with a letter or underscore"));
        }
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(invalid(&format!("contains invalid character '{bad}'")));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("test", "valid").is_ok());
        assert!(validate_non_empty_string("test", "").is_err());
        assert!(validate_non_empty_string("test", "   ").is_err());
        assert!(validate_non_empty_string("test", "\t\n").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("name", "Money").is_ok());
        assert!(validate_identifier("name", "snake_case_2").is_ok());
        assert!(validate_identifier("name", "_").is_ok());

        assert!(matches!(
            validate_identifier("name", ""),
            Err(ValidationError::EmptyString { .. })
        ));
        assert!(matches!(
            validate_identifier("name", "9lives"),
            Err(ValidationError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            validate_identifier("name", "dash-ed"),
            Err(ValidationError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            validate_identifier("name", "ünïcode"),
            Err(ValidationError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_identifier_length_limit() {
        let longest = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier("name", &longest).is_ok());

        let too_long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_eq!(
            validate_identifier("name", &too_long),
            Err(ValidationError::TooLong {
                parameter: "name".to_string(),
                name: too_long.clone(),
                max: MAX_IDENTIFIER_LENGTH,
                actual: MAX_IDENTIFIER_LENGTH + 1,
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = validate_identifier("attribute name", "a b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid attribute name 'a b': contains invalid character ' '"
        );
    }
}
