//! Token parsing against an [`ArgumentSpec`]

use crate::coercion::TypeCoercer;
use crate::error::{BindingError, BindingResult};
use crate::naming::FLAG_PREFIX;
use crate::spec::ArgumentSpec;
use crate::types::{ArgValue, FromArgValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::any::Any;
use std::collections::btree_map;
use std::collections::BTreeMap;
use tracing::trace;

/// Result of a parse: arguments to call with, or help to print
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(ParsedArguments),
    Help(String),
}

/// Fully coerced arguments, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArguments {
    values: BTreeMap<String, ArgValue>,
}

impl ParsedArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Typed view of a value, `None` when absent or of another type
    pub fn get_as<T: FromArgValue>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_arg_value)
    }

    /// Typed value that must be present
    ///
    /// Required flags are checked during parsing, so an absent name here
    /// means the task asked for a parameter it never declared.
    pub fn fetch<T: FromArgValue>(&self, name: &str) -> BindingResult<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| BindingError::UnboundParameter {
                parameter: name.to_string(),
            })?;
        T::from_arg_value(value).ok_or_else(|| BindingError::TypeMismatch {
            parameter: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            actual: value.kind().to_string(),
        })
    }

    /// Value produced by a user converter
    pub fn get_custom<T: Any>(&self, name: &str) -> Option<&T> {
        match self.values.get(name) {
            Some(ArgValue::Custom(custom)) => custom.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ArgValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, ArgValue> {
        self.values
    }
}

impl FromIterator<(String, ArgValue)> for ParsedArguments {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ParsedArguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Walks command-line tokens and coerces each recognized flag
#[derive(Debug, Clone, Default)]
pub struct CliParser {
    coercer: TypeCoercer,
}

impl CliParser {
    pub fn new(coercer: TypeCoercer) -> Self {
        Self { coercer }
    }

    /// Parse `tokens` against `spec`
    ///
    /// `-h`/`--help` anywhere wins over everything else. Coercion errors stop
    /// the parse at the first bad value; missing required flags are reported
    /// together once every token has been consumed.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S], spec: &ArgumentSpec) -> BindingResult<ParseOutcome> {
        if tokens
            .iter()
            .any(|token| matches!(token.as_ref(), "-h" | "--help"))
        {
            return Ok(ParseOutcome::Help(spec.render_help()));
        }

        let mut values = BTreeMap::new();
        let mut remaining = tokens.iter().map(|token| -> &str { token.as_ref() });

        while let Some(token) = remaining.next() {
            if !token.starts_with(FLAG_PREFIX) {
                return Err(BindingError::UnknownArgument {
                    token: token.to_string(),
                });
            }

            let (flag, inline) = match token.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (token, None),
            };

            let entry = spec
                .find_by_flag(flag)
                .ok_or_else(|| BindingError::UnknownArgument {
                    token: token.to_string(),
                })?;

            let raw = match inline {
                Some(value) => value,
                None => match remaining.next() {
                    Some(next) if !next.starts_with(FLAG_PREFIX) => next,
                    _ => {
                        return Err(BindingError::MissingArgumentValue {
                            flag: flag.to_string(),
                        })
                    }
                },
            };

            if values.contains_key(entry.name()) {
                return Err(BindingError::invalid_value(
                    flag,
                    raw,
                    entry.descriptor.declared_type.name(),
                    "specified more than once",
                ));
            }

            let value = self
                .coercer
                .coerce(flag, raw, &entry.descriptor.declared_type)?;
            trace!("{} -> {}", flag, entry.name());
            values.insert(entry.name().to_string(), value);
        }

        let missing: Vec<String> = spec
            .required()
            .filter(|entry| !values.contains_key(entry.name()))
            .map(|entry| entry.flag.clone())
            .collect();
        if !missing.is_empty() {
            return Err(BindingError::MissingRequiredArgument { flags: missing });
        }

        for entry in spec.optional() {
            if let Some(default) = &entry.descriptor.default {
                values
                    .entry(entry.name().to_string())
                    .or_insert_with(|| default.clone());
            }
        }

        Ok(ParseOutcome::Parsed(ParsedArguments { values }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use crate::spec::ArgumentSpecBuilder;
    use crate::types::DeclaredType;
    use rstest::rstest;

    fn spec() -> ArgumentSpec {
        ArgumentSpecBuilder::from_signature(
            &Signature::new("f")
                .param("name", DeclaredType::String)
                .param("max_buffer", DeclaredType::Integer)
                .optional("optional_arg", DeclaredType::Integer, 10),
        )
        .unwrap()
    }

    fn parsed(tokens: &[&str]) -> ParsedArguments {
        match CliParser::default().parse(tokens, &spec()).unwrap() {
            ParseOutcome::Parsed(args) => args,
            ParseOutcome::Help(_) => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_inline_and_separate_values() {
        let args = parsed(&["--name=a b", "--max-buffer", "1024"]);
        assert_eq!(args.get_as::<String>("name").as_deref(), Some("a b"));
        assert_eq!(args.get_as::<i64>("max_buffer"), Some(1024));
        assert_eq!(args.get_as::<i64>("optional_arg"), Some(10));
    }

    #[test]
    fn test_inline_value_may_contain_equals() {
        let args = parsed(&["--name=k=v", "--max-buffer=1"]);
        assert_eq!(args.get_as::<String>("name").as_deref(), Some("k=v"));
    }

    #[rstest]
    #[case(&["--name", "x", "--max-buffer", "1", "--bogus", "2"], "--bogus")]
    #[case(&["--name", "x", "--max-buffer", "1", "stray"], "stray")]
    #[case(&["--NAME", "x"], "--NAME")]
    fn test_unknown_arguments(#[case] tokens: &[&str], #[case] offending: &str) {
        let error = CliParser::default().parse(tokens, &spec()).unwrap_err();
        match error {
            BindingError::UnknownArgument { token } => assert_eq!(token, offending),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case(&["--name"])]
    #[case(&["--name", "--max-buffer", "1"])]
    fn test_flag_without_value(#[case] tokens: &[&str]) {
        let error = CliParser::default().parse(tokens, &spec()).unwrap_err();
        assert!(matches!(error, BindingError::MissingArgumentValue { ref flag } if flag == "--name"));
    }

    #[test]
    fn test_repeated_flag_is_rejected() {
        let error = CliParser::default()
            .parse(&["--name", "a", "--name", "b", "--max-buffer", "1"], &spec())
            .unwrap_err();
        assert!(error.to_string().contains("specified more than once"));
    }

    #[test]
    fn test_missing_required_are_batched() {
        let error = CliParser::default()
            .parse(&["--optional-arg", "3"], &spec())
            .unwrap_err();
        match error {
            BindingError::MissingRequiredArgument { flags } => {
                assert_eq!(flags, vec!["--name", "--max-buffer"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_help_short_circuits_coercion() {
        let outcome = CliParser::default()
            .parse(&["--max-buffer", "not-a-number", "-h"], &spec())
            .unwrap();
        let ParseOutcome::Help(text) = outcome else {
            panic!("expected help");
        };
        assert!(text.contains("--max-buffer MAX_BUFFER"));
    }

    #[test]
    fn test_fetch_reports_type_mismatch() {
        let args = parsed(&["--name", "x", "--max-buffer", "5"]);
        assert_eq!(args.fetch::<i64>("max_buffer").unwrap(), 5);
        assert!(matches!(
            args.fetch::<bool>("max_buffer"),
            Err(BindingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_fetch_of_undeclared_name_is_unbound() {
        let args = parsed(&["--name", "x", "--max-buffer", "5"]);
        match args.fetch::<i64>("absent").unwrap_err() {
            BindingError::UnboundParameter { parameter } => assert_eq!(parameter, "absent"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let args = parsed(&["--name", "x", "--max-buffer", "5"]);
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "x", "max_buffer": 5, "optional_arg": 10})
        );
    }
}
