//! Shared type definition used by value objects and entities.
//!
//! A definition is produced once, when a builder is built, and is immutable
//! afterwards. It owns the declared attributes in declaration order and knows
//! how to turn constructor arguments into validated [`Fields`].

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::condition::{Conditioner, IntoVerdict, Invariant, invariant};
use super::fields::Fields;
use super::value::AttrValue;
use crate::config::ModelConfig;
use crate::error::{DomainError, Result};
use crate::validation::validate_identifier;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a built domain type.
///
/// Two builds of the same name are distinct types; instances of one never
/// equal instances of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DomainTypeId(u64);

impl DomainTypeId {
    fn next() -> Self {
        Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DomainTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct Definition {
    pub(crate) id: DomainTypeId,
    pub(crate) name: String,
    pub(crate) attrs: IndexMap<String, Conditioner>,
    pub(crate) invariants: Vec<Invariant>,
    pub(crate) kw_only: bool,
    pub(crate) strict: bool,
}

impl Definition {
    pub(crate) fn conditioner(&self, attr: &str) -> Result<&Conditioner> {
        self.attrs
            .get(attr)
            .ok_or_else(|| self.unknown_attribute(attr))
    }

    pub(crate) fn unknown_attribute(&self, attr: &str) -> DomainError {
        DomainError::UnknownAttribute {
            type_name: self.name.clone(),
            attr: attr.to_string(),
        }
    }

    /// Builds fields from keyword arguments; a repeated keyword keeps its last value.
    pub(crate) fn assemble<I, K, V>(&self, args: I) -> Result<Fields>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let mut supplied = IndexMap::new();
        for (attr, value) in args {
            let attr = attr.into();
            if !self.attrs.contains_key(&attr) {
                return Err(DomainError::UnexpectedArgument {
                    type_name: self.name.clone(),
                    attr,
                });
            }
            supplied.insert(attr, value.into());
        }
        self.fill(supplied)
    }

    /// Builds fields from positional arguments bound in declaration order.
    pub(crate) fn assemble_positional<I, V>(&self, args: I) -> Result<Fields>
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        if self.kw_only {
            return Err(DomainError::KeywordOnly {
                type_name: self.name.clone(),
            });
        }
        let values: Vec<AttrValue> = args.into_iter().map(Into::into).collect();
        if values.len() > self.attrs.len() {
            return Err(DomainError::TooManyArguments {
                type_name: self.name.clone(),
                expected: self.attrs.len(),
                actual: values.len(),
            });
        }
        let supplied = self.attrs.keys().cloned().zip(values).collect();
        self.fill(supplied)
    }

    fn fill(&self, mut supplied: IndexMap<String, AttrValue>) -> Result<Fields> {
        let mut fields = Fields::with_capacity(self.attrs.len());
        for (attr, conditioner) in &self.attrs {
            let value = match supplied.swap_remove(attr) {
                Some(value) => conditioner.admit(value)?,
                None => conditioner
                    .fallback()
                    .ok_or_else(|| DomainError::MissingArgument {
                        type_name: self.name.clone(),
                        attr: attr.clone(),
                    })?,
            };
            fields.insert(attr.clone(), value);
        }
        self.verify(&fields)?;
        tracing::trace!(type_name = %self.name, fields = fields.len(), "assembled instance");
        Ok(fields)
    }

    /// Postconditions for every attribute, then type invariants.
    pub(crate) fn verify(&self, fields: &Fields) -> Result<()> {
        for (attr, conditioner) in &self.attrs {
            if let Some(value) = fields.get(attr) {
                conditioner.verify(value)?;
            }
        }
        for invariant in &self.invariants {
            let verdict = invariant(fields);
            if !verdict.passed() {
                tracing::debug!(
                    type_name = %self.name,
                    reason = verdict.reason(),
                    "invariant rejected instance"
                );
                return Err(DomainError::InvariantFailed {
                    type_name: self.name.clone(),
                    reason: verdict.reason().to_string(),
                });
            }
        }
        Ok(())
    }

    /// One-line constructor signature, e.g. `Money(amount: integer, currency: text = "EUR")`.
    pub(crate) fn signature(&self) -> String {
        let params = self
            .attrs
            .values()
            .map(|conditioner| {
                let mut param = format!("{}: {}", conditioner.name(), conditioner.kind());
                if conditioner.is_optional() {
                    param.push_str(" | null");
                }
                if let Some(default) = conditioner.fallback() {
                    param.push_str(&format!(" = {default}"));
                }
                param
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({params})", self.name)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("attrs", &self.attrs.values().collect::<Vec<_>>())
            .field("invariants", &self.invariants.len())
            .field("kw_only", &self.kw_only)
            .field("strict", &self.strict)
            .finish()
    }
}

/// Builder state shared by the value object and entity builders.
///
/// Explicit `kw_only`, `strict` and registration choices win over the
/// config regardless of call order; the config fills the rest at `build()`.
pub(crate) struct DefinitionBuilder {
    name: String,
    attrs: Vec<Conditioner>,
    invariants: Vec<Invariant>,
    config: ModelConfig,
    kw_only: Option<bool>,
    strict: Option<bool>,
    register: Option<bool>,
}

impl DefinitionBuilder {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            invariants: Vec::new(),
            config: ModelConfig::default(),
            kw_only: None,
            strict: None,
            register: None,
        }
    }

    pub(crate) fn apply_config(&mut self, config: &ModelConfig) {
        self.config = config.clone();
    }

    pub(crate) fn push_field(&mut self, conditioner: Conditioner) {
        self.attrs.push(conditioner);
    }

    pub(crate) fn push_invariant<F, V>(&mut self, func: F)
    where
        F: Fn(&Fields) -> V + Send + Sync + 'static,
        V: IntoVerdict,
    {
        self.invariants.push(invariant(func));
    }

    pub(crate) fn kw_only(&mut self, kw_only: bool) {
        self.kw_only = Some(kw_only);
    }

    pub(crate) fn strict(&mut self, strict: bool) {
        self.strict = Some(strict);
    }

    pub(crate) fn register(&mut self, register: bool) {
        self.register = Some(register);
    }

    /// Whether the built type goes into the global registry.
    pub(crate) fn registers(&self) -> bool {
        self.register.unwrap_or(self.config.register_types)
    }

    pub(crate) fn has_field(&self, attr: &str) -> bool {
        self.attrs.iter().any(|conditioner| conditioner.name() == attr)
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(self) -> Result<Definition> {
        validate_identifier("type name", &self.name)?;
        self.config
            .validate()
            .map_err(|err| DomainError::InvalidConfig {
                type_name: self.name.clone(),
                reason: err.to_string(),
            })?;

        let kw_only = self.kw_only.unwrap_or(self.config.kw_only);
        let strict = self.strict.unwrap_or(self.config.strict_types);
        let max_fields = self.config.max_fields;

        if self.attrs.len() > max_fields {
            return Err(DomainError::TooManyFields {
                type_name: self.name,
                max: max_fields,
                actual: self.attrs.len(),
            });
        }

        let mut attrs = IndexMap::with_capacity(self.attrs.len());
        for mut conditioner in self.attrs {
            validate_identifier("attribute name", conditioner.name())?;
            if attrs.contains_key(conditioner.name()) {
                return Err(DomainError::DuplicateAttribute {
                    type_name: self.name,
                    attr: conditioner.name().to_string(),
                });
            }
            conditioner.bind(&self.name, strict);
            conditioner.check_default()?;
            attrs.insert(conditioner.name().to_string(), conditioner);
        }

        Ok(Definition {
            id: DomainTypeId::next(),
            name: self.name,
            attrs,
            invariants: self.invariants,
            kw_only,
            strict,
        })
    }
}
