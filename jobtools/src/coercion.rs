//! Raw token → typed value
//!
//! Dispatch follows the declared type: booleans, then enumerations, then
//! namespaces (loaded from a file), then native parses, then lists, then user
//! converters. Only the namespace branch touches the filesystem.

use crate::error::{BindingError, BindingResult};
use crate::types::{ArgValue, ChoiceTable, DeclaredType, UserType};
use jobtools_config::{ConfigError, NestedConfigLoader, RunnerSettings};
use std::path::PathBuf;
use tracing::trace;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no"];

/// Converts command-line tokens into [`ArgValue`]s
#[derive(Debug, Clone)]
pub struct TypeCoercer {
    loader: NestedConfigLoader,
    list_delimiter: String,
}

impl Default for TypeCoercer {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCoercer {
    pub fn new() -> Self {
        Self::with_settings(&RunnerSettings::default())
    }

    pub fn with_settings(settings: &RunnerSettings) -> Self {
        Self {
            loader: NestedConfigLoader::new()
                .with_default_extension(settings.default_extension.clone()),
            list_delimiter: settings.list_delimiter.clone(),
        }
    }

    /// Coerce `raw`, given for `flag`, into `declared`
    pub fn coerce(&self, flag: &str, raw: &str, declared: &DeclaredType) -> BindingResult<ArgValue> {
        trace!("Coercing {}='{}' into {}", flag, raw, declared);
        match declared {
            DeclaredType::Boolean => coerce_bool(flag, raw),
            DeclaredType::Enum(table) => coerce_choice(flag, raw, table),
            DeclaredType::Namespace => self.load_namespace(flag, raw),
            DeclaredType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|e| BindingError::invalid_value(flag, raw, "int", e.to_string())),
            DeclaredType::Float => raw
                .trim()
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|e| BindingError::invalid_value(flag, raw, "float", e.to_string())),
            DeclaredType::String => Ok(ArgValue::Str(raw.to_string())),
            DeclaredType::List => Ok(ArgValue::List(self.split_list(raw))),
            DeclaredType::User(user) => coerce_user(flag, raw, user),
        }
    }

    /// Split a delimited string into trimmed items
    ///
    /// An empty token yields an empty list rather than one empty item.
    pub fn split_list(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }
        raw.split(self.list_delimiter.as_str())
            .map(|item| item.trim().to_string())
            .collect()
    }

    fn load_namespace(&self, flag: &str, raw: &str) -> BindingResult<ArgValue> {
        let path = PathBuf::from(raw);
        self.loader
            .load(&path)
            .map(ArgValue::Namespace)
            .map_err(|source| match source {
                ConfigError::UnsupportedFormat { path } => BindingError::UnsupportedConfigFormat {
                    flag: flag.to_string(),
                    path,
                },
                source => BindingError::ConfigLoadError {
                    flag: flag.to_string(),
                    path,
                    source,
                },
            })
    }
}

fn coerce_bool(flag: &str, raw: &str) -> BindingResult<ArgValue> {
    let token = raw.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Ok(ArgValue::Bool(true))
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Ok(ArgValue::Bool(false))
    } else {
        Err(BindingError::invalid_value(
            flag,
            raw,
            "bool",
            "expected one of true/false, 1/0, yes/no",
        ))
    }
}

fn coerce_choice(flag: &str, raw: &str, table: &ChoiceTable) -> BindingResult<ArgValue> {
    table
        .lookup(raw)
        .map(ArgValue::Choice)
        .ok_or_else(|| BindingError::InvalidArgumentValue {
            flag: flag.to_string(),
            token: raw.to_string(),
            expected: table.type_name().to_string(),
            reason: "not one of the declared values".to_string(),
            choices: table.values(),
        })
}

fn coerce_user(flag: &str, raw: &str, user: &UserType) -> BindingResult<ArgValue> {
    user.convert(raw)
        .map(ArgValue::Custom)
        .map_err(|reason| BindingError::invalid_value(flag, raw, user.name(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    crate::string_enum! {
        enum Color {
            Red => "red",
            DarkBlue => "Dark Blue",
        }
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("Yes", true)]
    #[case("1", true)]
    #[case("false", false)]
    #[case("No", false)]
    #[case("0", false)]
    fn test_bool_tokens(#[case] raw: &str, #[case] expected: bool) {
        let value = TypeCoercer::new()
            .coerce("--flag", raw, &DeclaredType::Boolean)
            .unwrap();
        assert_eq!(value, ArgValue::Bool(expected));
    }

    #[rstest]
    #[case("t")]
    #[case("y")]
    #[case("-1")]
    #[case("")]
    fn test_bool_rejects_other_tokens(#[case] raw: &str) {
        let error = TypeCoercer::new()
            .coerce("--flag", raw, &DeclaredType::Boolean)
            .unwrap_err();
        assert!(matches!(error, BindingError::InvalidArgumentValue { .. }));
    }

    #[test]
    fn test_enum_matches_external_value_only() {
        let coercer = TypeCoercer::new();
        let declared = DeclaredType::enumeration::<Color>();

        let value = coercer.coerce("--color", "Dark Blue", &declared).unwrap();
        assert_eq!(value, ArgValue::from(Color::DarkBlue));

        let error = coercer.coerce("--color", "DarkBlue", &declared).unwrap_err();
        match error {
            BindingError::InvalidArgumentValue { choices, token, .. } => {
                assert_eq!(token, "DarkBlue");
                assert_eq!(choices, vec!["red", "Dark Blue"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case(DeclaredType::Integer, "1024", ArgValue::Int(1024))]
    #[case(DeclaredType::Integer, "-3", ArgValue::Int(-3))]
    #[case(DeclaredType::Float, "0.25", ArgValue::Float(0.25))]
    #[case(DeclaredType::Float, "3", ArgValue::Float(3.0))]
    #[case(DeclaredType::String, "a b", ArgValue::Str("a b".into()))]
    fn test_native_parses(
        #[case] declared: DeclaredType,
        #[case] raw: &str,
        #[case] expected: ArgValue,
    ) {
        assert_eq!(
            TypeCoercer::new().coerce("--x", raw, &declared).unwrap(),
            expected
        );
    }

    #[test]
    fn test_native_parse_failure_names_flag_token_and_type() {
        let error = TypeCoercer::new()
            .coerce("--max-buffer", "lots", &DeclaredType::Integer)
            .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("--max-buffer"));
        assert!(message.contains("'lots'"));
        assert!(message.contains("int"));
    }

    #[test]
    fn test_list_uses_configured_delimiter() {
        let settings = RunnerSettings {
            list_delimiter: ";".into(),
            ..RunnerSettings::default()
        };
        let coercer = TypeCoercer::with_settings(&settings);
        assert_eq!(
            coercer.coerce("--l", " a; b ;c", &DeclaredType::List).unwrap(),
            ArgValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(coercer.split_list("  "), Vec::<String>::new());
    }

    #[test]
    fn test_user_converter() {
        let declared = DeclaredType::user_named::<std::net::Ipv4Addr>("ipv4");
        let coercer = TypeCoercer::new();

        let value = coercer.coerce("--host", "10.0.0.1", &declared).unwrap();
        let ArgValue::Custom(custom) = value else {
            panic!("expected a custom value");
        };
        assert_eq!(
            custom.downcast_ref::<std::net::Ipv4Addr>(),
            Some(&std::net::Ipv4Addr::new(10, 0, 0, 1))
        );

        let error = coercer.coerce("--host", "nowhere", &declared).unwrap_err();
        assert!(matches!(
            error,
            BindingError::InvalidArgumentValue { ref expected, .. } if expected == "ipv4"
        ));
    }

    #[test]
    fn test_namespace_errors_are_classified() {
        let dir = TempDir::new().unwrap();
        let coercer = TypeCoercer::new();

        let missing = dir.path().join("missing.yml");
        let error = coercer
            .coerce("--params", missing.to_str().unwrap(), &DeclaredType::Namespace)
            .unwrap_err();
        assert!(matches!(error, BindingError::ConfigLoadError { .. }));

        let text = dir.path().join("params.txt");
        fs::write(&text, "budget: 1").unwrap();
        let error = coercer
            .coerce("--params", text.to_str().unwrap(), &DeclaredType::Namespace)
            .unwrap_err();
        assert!(matches!(error, BindingError::UnsupportedConfigFormat { .. }));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let error = coercer
            .coerce("--params", broken.to_str().unwrap(), &DeclaredType::Namespace)
            .unwrap_err();
        assert!(matches!(error, BindingError::ConfigLoadError { .. }));
    }

    #[test]
    fn test_namespace_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.yml"), "budget: 2").unwrap();
        fs::write(dir.path().join("a.yml"), "budget: 1").unwrap();

        let value = TypeCoercer::new()
            .coerce("--params", dir.path().to_str().unwrap(), &DeclaredType::Namespace)
            .unwrap();
        let ArgValue::Namespace(namespace) = value else {
            panic!("expected a namespace");
        };
        assert_eq!(namespace.get_i64("budget"), Some(1));
    }
}
