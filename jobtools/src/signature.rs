//! Task signatures and their inspection
//!
//! A task describes its parameters with a [`Signature`] built at registration
//! time. [`SignatureInspector`] validates it into [`ParameterDescriptor`]s,
//! the only form the rest of the binder works with.

use crate::error::{BindingError, BindingResult};
use crate::naming;
use crate::parser::ParsedArguments;
use crate::types::{ArgValue, DeclaredType};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// How a parameter receives its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// One named value
    Positional,
    /// Catch-all for extra positional values
    Variadic,
    /// Catch-all for extra named values
    KeywordVariadic,
}

/// A parameter as declared, before validation
#[derive(Debug, Clone)]
pub struct RawParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<DeclaredType>,
    pub default: Option<ArgValue>,
}

/// Ordered parameter list of a task
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    parameters: Vec<RawParameter>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// A required parameter
    pub fn param(self, name: impl Into<String>, ty: DeclaredType) -> Self {
        self.push(name, ParameterKind::Positional, Some(ty), None)
    }

    /// An optional parameter with its default
    pub fn optional(
        self,
        name: impl Into<String>,
        ty: DeclaredType,
        default: impl Into<ArgValue>,
    ) -> Self {
        self.push(
            name,
            ParameterKind::Positional,
            Some(ty),
            Some(default.into()),
        )
    }

    /// A parameter with no declared type
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.push(name, ParameterKind::Positional, None, None)
    }

    pub fn variadic(self, name: impl Into<String>) -> Self {
        self.push(name, ParameterKind::Variadic, None, None)
    }

    pub fn keyword_variadic(self, name: impl Into<String>) -> Self {
        self.push(name, ParameterKind::KeywordVariadic, None, None)
    }

    /// Append an arbitrary raw parameter
    pub fn with_parameter(mut self, parameter: RawParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    fn push(
        self,
        name: impl Into<String>,
        kind: ParameterKind,
        annotation: Option<DeclaredType>,
        default: Option<ArgValue>,
    ) -> Self {
        self.with_parameter(RawParameter {
            name: name.into(),
            kind,
            annotation,
            default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[RawParameter] {
        &self.parameters
    }
}

/// Anything that can be bound to a command line and invoked
pub trait Callable {
    type Output;

    fn signature(&self) -> Signature;

    /// Invoke with fully coerced arguments
    fn call(&self, args: ParsedArguments) -> anyhow::Result<Self::Output>;
}

type TaskFn<O> = Arc<dyn Fn(ParsedArguments) -> anyhow::Result<O> + Send + Sync>;

/// A closure paired with its signature
pub struct Task<O> {
    signature: Signature,
    body: TaskFn<O>,
}

impl<O> Task<O> {
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(ParsedArguments) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }
}

impl<O> Clone for Task<O> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<O> fmt::Debug for Task<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<O> Callable for Task<O> {
    type Output = O;

    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn call(&self, args: ParsedArguments) -> anyhow::Result<O> {
        (self.body)(args)
    }
}

/// Validated parameter: name, type and optional default
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared_type: DeclaredType,
    pub default: Option<ArgValue>,
}

impl ParameterDescriptor {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Turns signatures into descriptor lists
pub struct SignatureInspector;

impl SignatureInspector {
    pub fn inspect<C: Callable + ?Sized>(callable: &C) -> BindingResult<Vec<ParameterDescriptor>> {
        Self::inspect_signature(&callable.signature())
    }

    /// Descriptors in declaration order
    pub fn inspect_signature(signature: &Signature) -> BindingResult<Vec<ParameterDescriptor>> {
        let task = signature.name();
        let mut descriptors = Vec::with_capacity(signature.parameters().len());

        for parameter in signature.parameters() {
            let unsupported = |reason: &str| BindingError::UnsupportedParameterKind {
                task: task.to_string(),
                parameter: parameter.name.clone(),
                reason: reason.to_string(),
            };

            match parameter.kind {
                ParameterKind::Variadic => {
                    return Err(unsupported("variadic parameters are not supported"))
                }
                ParameterKind::KeywordVariadic => {
                    return Err(unsupported("keyword catch-all parameters are not supported"))
                }
                ParameterKind::Positional => {}
            }

            if !naming::is_supported_identifier(&parameter.name) {
                return Err(unsupported(
                    "names must be lower-case ASCII letters, digits and underscores, starting with a letter",
                ));
            }

            let declared_type =
                parameter
                    .annotation
                    .clone()
                    .ok_or_else(|| BindingError::MissingTypeAnnotation {
                        task: task.to_string(),
                        parameter: parameter.name.clone(),
                    })?;

            if let Some(default) = &parameter.default {
                if !declared_type.accepts(default) {
                    return Err(BindingError::TypeMismatch {
                        parameter: parameter.name.clone(),
                        expected: declared_type.name().to_string(),
                        actual: default.kind().to_string(),
                    });
                }
            }

            trace!(
                "Parameter {} of {}: type={}, default={:?}",
                parameter.name,
                task,
                declared_type,
                parameter.default
            );
            descriptors.push(ParameterDescriptor {
                name: parameter.name.clone(),
                declared_type,
                default: parameter.default.clone(),
            });
        }

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_optionality_follows_defaults() {
        let signature = Signature::new("f")
            .param("name", DeclaredType::String)
            .param("max_buffer", DeclaredType::Integer)
            .optional("optional_arg", DeclaredType::Integer, 10);

        let descriptors = SignatureInspector::inspect_signature(&signature).unwrap();
        let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["name", "max_buffer", "optional_arg"]);
        assert!(descriptors[0].is_required());
        assert!(descriptors[2].has_default());
        assert_eq!(descriptors[2].default, Some(ArgValue::Int(10)));
    }

    #[test]
    fn test_missing_annotation_is_rejected() {
        let signature = Signature::new("f").param("a", DeclaredType::Integer).untyped("b");
        let error = SignatureInspector::inspect_signature(&signature).unwrap_err();
        assert!(matches!(
            error,
            BindingError::MissingTypeAnnotation { ref parameter, .. } if parameter == "b"
        ));
    }

    #[rstest]
    #[case(Signature::new("f").variadic("args"))]
    #[case(Signature::new("f").keyword_variadic("kwargs"))]
    #[case(Signature::new("f").param("MaxBuffer", DeclaredType::Integer))]
    #[case(Signature::new("f").param("_hidden", DeclaredType::Integer))]
    fn test_unsupported_kinds(#[case] signature: Signature) {
        let error = SignatureInspector::inspect_signature(&signature).unwrap_err();
        assert!(matches!(error, BindingError::UnsupportedParameterKind { .. }));
    }

    #[test]
    fn test_default_must_match_declared_type() {
        let signature = Signature::new("f").optional("ratio", DeclaredType::Float, "half");
        let error = SignatureInspector::inspect_signature(&signature).unwrap_err();
        assert!(matches!(error, BindingError::TypeMismatch { .. }));
    }

    #[test]
    fn test_task_calls_body() {
        let task = Task::new(Signature::new("noop"), |_| Ok(7));
        assert_eq!(task.name(), "noop");
        assert_eq!(task.call(ParsedArguments::default()).unwrap(), 7);
    }
}
