//! Programmatic argument supply
//!
//! [`TaskArguments`] lets code call a task with values that did not come from
//! a command line. Typed values are checked against the declared type; raw
//! strings go through the same coercion as command-line tokens.

use crate::coercion::TypeCoercer;
use crate::error::{BindingError, BindingResult};
use crate::parser::ParsedArguments;
use crate::spec::ArgumentSpec;
use crate::types::ArgValue;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ProvidedValue {
    Typed(ArgValue),
    /// Coerced like a command-line token
    Raw(String),
}

/// Values keyed by parameter name
#[derive(Debug, Clone, Default)]
pub struct TaskArguments {
    values: BTreeMap<String, ProvidedValue>,
}

impl TaskArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.values
            .insert(name.into(), ProvidedValue::Typed(value.into()));
        self
    }

    pub fn with_raw(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.insert(name.into(), ProvidedValue::Raw(raw.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve against `spec` into call-ready arguments
    pub fn resolve(&self, spec: &ArgumentSpec, coercer: &TypeCoercer) -> BindingResult<ParsedArguments> {
        if let Some(unknown) = self
            .values
            .keys()
            .find(|name| spec.find_by_name(name).is_none())
        {
            return Err(BindingError::UnknownArgument {
                token: unknown.clone(),
            });
        }

        let mut resolved = ParsedArguments::new();
        let mut missing = Vec::new();

        for entry in spec.entries() {
            let declared = &entry.descriptor.declared_type;
            match self.values.get(entry.name()) {
                Some(ProvidedValue::Typed(value)) => {
                    if !declared.accepts(value) {
                        return Err(BindingError::TypeMismatch {
                            parameter: entry.name().to_string(),
                            expected: declared.name().to_string(),
                            actual: value.kind().to_string(),
                        });
                    }
                    resolved.insert(entry.name(), value.clone());
                }
                Some(ProvidedValue::Raw(raw)) => {
                    resolved.insert(entry.name(), coercer.coerce(&entry.flag, raw, declared)?);
                }
                None => match &entry.descriptor.default {
                    Some(default) => resolved.insert(entry.name(), default.clone()),
                    None => missing.push(entry.flag.clone()),
                },
            }
        }

        if !missing.is_empty() {
            return Err(BindingError::MissingRequiredArgument { flags: missing });
        }
        Ok(resolved)
    }
}
