//! Attribute descriptors and the conditions attached to them.
//!
//! A [`Conditioner`] describes one declared attribute: its kind, whether it
//! may be null, its default, and the preconditions, postconditions and
//! coercion registered for it. Looking up a declared attribute on a type
//! yields its conditioner, whose [`Conditioner::guard`] wraps any function
//! with the attribute's argument validation.
//!
//! Conditions return anything implementing [`IntoVerdict`]:
//!
//! ```rust
//! use domain_objects::{AttrKind, AttrValue, field};
//!
//! let amount = field("amount", AttrKind::Integer)
//!     .precondition(|v: &AttrValue| v.as_i64().is_some_and(|n| n >= 0))
//!     .postcondition(|v: &AttrValue| (v.as_i64() != Some(13), "unlucky amount"));
//! assert_eq!(amount.name(), "amount");
//! ```

use std::fmt;
use std::sync::Arc;

use super::fields::Fields;
use super::value::{AttrKind, AttrValue};
use crate::error::{DomainError, Result};

const DEFAULT_FAILURE_REASON: &str = "condition not satisfied";

/// Outcome of evaluating a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    passed: bool,
    reason: Option<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Failure reason, falling back to a generic message.
    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or(DEFAULT_FAILURE_REASON)
    }
}

/// Conversion from a condition's return value into a [`Verdict`].
pub trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Verdict {
        self
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Verdict {
        Verdict {
            passed: self,
            reason: None,
        }
    }
}

impl IntoVerdict for (bool, &str) {
    fn into_verdict(self) -> Verdict {
        Verdict {
            passed: self.0,
            reason: Some(self.1.to_string()),
        }
    }
}

impl IntoVerdict for (bool, String) {
    fn into_verdict(self) -> Verdict {
        Verdict {
            passed: self.0,
            reason: Some(self.1),
        }
    }
}

impl IntoVerdict for std::result::Result<(), String> {
    fn into_verdict(self) -> Verdict {
        match self {
            Ok(()) => Verdict::pass(),
            Err(reason) => Verdict::fail(reason),
        }
    }
}

/// Condition over a single attribute value.
pub type Condition = Arc<dyn Fn(&AttrValue) -> Verdict + Send + Sync>;

/// Condition over every attribute of an instance.
pub type Invariant = Arc<dyn Fn(&Fields) -> Verdict + Send + Sync>;

/// Conversion applied to supplied arguments before validation.
pub type Coercer = Arc<dyn Fn(AttrValue) -> std::result::Result<AttrValue, String> + Send + Sync>;

pub(crate) fn invariant<F, V>(func: F) -> Invariant
where
    F: Fn(&Fields) -> V + Send + Sync + 'static,
    V: IntoVerdict,
{
    Arc::new(move |fields: &Fields| func(fields).into_verdict())
}

/// Starts the declaration of an attribute.
pub fn field(name: impl Into<String>, kind: AttrKind) -> Conditioner {
    Conditioner::new(name, kind)
}

/// Descriptor of one declared attribute.
#[derive(Clone)]
pub struct Conditioner {
    name: String,
    kind: AttrKind,
    optional: bool,
    default: Option<AttrValue>,
    preconditions: Vec<Condition>,
    postconditions: Vec<Condition>,
    coercer: Option<Coercer>,
    owner: String,
    strict: bool,
}

impl Conditioner {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            coercer: None,
            owner: String::new(),
            strict: true,
        }
    }

    /// Allows the attribute to hold `Null`; it then defaults to `Null`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Registers a check run on every supplied argument before it is stored.
    pub fn precondition<F, V>(mut self, func: F) -> Self
    where
        F: Fn(&AttrValue) -> V + Send + Sync + 'static,
        V: IntoVerdict,
    {
        self.preconditions.push(wrap(func));
        self
    }

    /// Registers a check run on the stored value once the instance is assembled.
    pub fn postcondition<F, V>(mut self, func: F) -> Self
    where
        F: Fn(&AttrValue) -> V + Send + Sync + 'static,
        V: IntoVerdict,
    {
        self.postconditions.push(wrap(func));
        self
    }

    /// Registers a check as both precondition and postcondition.
    pub fn condition<F, V>(mut self, func: F) -> Self
    where
        F: Fn(&AttrValue) -> V + Send + Sync + 'static,
        V: IntoVerdict,
    {
        let condition = wrap(func);
        self.preconditions.push(condition.clone());
        self.postconditions.push(condition);
        self
    }

    pub fn coerce<F>(mut self, func: F) -> Self
    where
        F: Fn(AttrValue) -> std::result::Result<AttrValue, String> + Send + Sync + 'static,
    {
        self.coercer = Some(Arc::new(func));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&AttrValue> {
        self.default.as_ref()
    }

    /// Name of the type this attribute belongs to; empty until the type is built.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn precondition_count(&self) -> usize {
        self.preconditions.len()
    }

    pub fn postcondition_count(&self) -> usize {
        self.postconditions.len()
    }

    /// Validates a would-be argument and returns the value that would be stored.
    pub fn check(&self, value: impl Into<AttrValue>) -> Result<AttrValue> {
        self.admit(value.into())
    }

    /// Wraps `func` so its argument passes this attribute's preconditions first.
    ///
    /// The returned function coerces and validates its argument exactly as
    /// construction would, and only calls `func` with the admitted value.
    ///
    /// ```rust
    /// use domain_objects::{AttrKind, AttrValue, field};
    ///
    /// let percent = field("percent", AttrKind::Integer)
    ///     .precondition(|v: &AttrValue| (v.as_i64().is_some_and(|n| (0..=100).contains(&n)), "0..=100"));
    /// let halve = percent.guard(|v: AttrValue| v.as_i64().unwrap_or_default() / 2);
    ///
    /// assert_eq!(halve(AttrValue::from(50)).unwrap(), 25);
    /// assert!(halve(AttrValue::from(250)).is_err());
    /// ```
    pub fn guard<F, R>(&self, func: F) -> impl Fn(AttrValue) -> Result<R> + Send + Sync + 'static
    where
        F: Fn(AttrValue) -> R + Send + Sync + 'static,
    {
        let conditioner = self.clone();
        move |value| conditioner.admit(value).map(&func)
    }

    pub(crate) fn bind(&mut self, owner: &str, strict: bool) {
        self.owner = owner.to_string();
        self.strict = strict;
    }

    /// Value used when the argument is not supplied.
    pub(crate) fn fallback(&self) -> Option<AttrValue> {
        match (&self.default, self.optional) {
            (Some(value), _) => Some(value.clone()),
            (None, true) => Some(AttrValue::Null),
            (None, false) => None,
        }
    }

    /// Coerce, kind-check and run preconditions on a supplied argument.
    pub(crate) fn admit(&self, value: AttrValue) -> Result<AttrValue> {
        let value = match &self.coercer {
            Some(coerce) if !value.is_null() => {
                coerce(value).map_err(|reason| DomainError::CoercionFailed {
                    type_name: self.owner.clone(),
                    attr: self.name.clone(),
                    reason,
                })?
            }
            _ => value,
        };

        self.check_kind(&value)?;

        if self.skips_conditions(&value) {
            return Ok(value);
        }
        for condition in &self.preconditions {
            let verdict = condition(&value);
            if !verdict.passed() {
                tracing::debug!(
                    owner = %self.owner,
                    attr = %self.name,
                    reason = verdict.reason(),
                    "precondition rejected argument"
                );
                return Err(DomainError::PreconditionFailed {
                    type_name: self.owner.clone(),
                    attr: self.name.clone(),
                    reason: verdict.reason().to_string(),
                });
            }
        }
        Ok(value)
    }

    /// Run postconditions on a stored value.
    pub(crate) fn verify(&self, value: &AttrValue) -> Result<()> {
        if self.skips_conditions(value) {
            return Ok(());
        }
        for condition in &self.postconditions {
            let verdict = condition(value);
            if !verdict.passed() {
                tracing::debug!(
                    owner = %self.owner,
                    attr = %self.name,
                    reason = verdict.reason(),
                    "postcondition rejected stored value"
                );
                return Err(DomainError::PostconditionFailed {
                    type_name: self.owner.clone(),
                    attr: self.name.clone(),
                    reason: verdict.reason().to_string(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn check_default(&self) -> Result<()> {
        match &self.default {
            Some(value) if !(self.kind.accepts(value) || (value.is_null() && self.optional)) => {
                Err(DomainError::InvalidDefault {
                    type_name: self.owner.clone(),
                    attr: self.name.clone(),
                    expected: self.kind,
                    actual: value.kind_name(),
                })
            }
            _ => Ok(()),
        }
    }

    // Null in an optional attribute means "absent"; conditions only see real values.
    fn skips_conditions(&self, value: &AttrValue) -> bool {
        value.is_null() && self.optional
    }

    fn check_kind(&self, value: &AttrValue) -> Result<()> {
        if self.kind.accepts(value) || self.skips_conditions(value) {
            return Ok(());
        }
        if !self.strict {
            tracing::warn!(
                owner = %self.owner,
                attr = %self.name,
                expected = %self.kind,
                actual = value.kind_name(),
                "accepting value of unexpected kind on non-strict type"
            );
            return Ok(());
        }
        Err(DomainError::TypeMismatch {
            type_name: self.owner.clone(),
            attr: self.name.clone(),
            expected: self.kind,
            actual: value.kind_name(),
        })
    }
}

impl fmt::Debug for Conditioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditioner")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("preconditions", &self.preconditions.len())
            .field("postconditions", &self.postconditions.len())
            .field("coerce", &self.coercer.is_some())
            .finish()
    }
}

fn wrap<F, V>(func: F) -> Condition
where
    F: Fn(&AttrValue) -> V + Send + Sync + 'static,
    V: IntoVerdict,
{
    Arc::new(move |value: &AttrValue| func(value).into_verdict())
}
