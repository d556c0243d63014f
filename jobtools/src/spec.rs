//! Argument specifications derived from task signatures

use crate::error::{BindingError, BindingResult};
use crate::naming;
use crate::signature::{Callable, ParameterDescriptor, Signature, SignatureInspector};
use crate::types::DeclaredType;
use std::collections::HashSet;
use std::fmt::Write as _;

/// One parameter with its flag
#[derive(Debug, Clone)]
pub struct ArgumentEntry {
    pub descriptor: ParameterDescriptor,
    pub flag: String,
}

impl ArgumentEntry {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_required(&self) -> bool {
        self.descriptor.is_required()
    }

    fn metavar(&self) -> String {
        match &self.descriptor.declared_type {
            DeclaredType::Enum(table) => format!("{{{}}}", table.values().join(",")),
            _ => self.descriptor.name.to_uppercase(),
        }
    }

    fn help_text(&self) -> String {
        let declared = &self.descriptor.declared_type;
        let mut text = match declared {
            DeclaredType::Namespace => {
                format!("of type {}, indicated as a YAML or JSON file", declared.name())
            }
            DeclaredType::List => format!("of type {}, indicated as a delimited string", declared.name()),
            DeclaredType::Enum(table) => format!(
                "of type {}, one of: {}",
                table.type_name(),
                table
                    .values()
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            other => format!("of type {}", other.name()),
        };
        if let Some(default) = &self.descriptor.default {
            let _ = write!(text, " (default: {default})");
        }
        text
    }
}

/// The flags a task accepts, in declaration order
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    task_name: String,
    entries: Vec<ArgumentEntry>,
}

impl ArgumentSpec {
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn entries(&self) -> &[ArgumentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-sensitive lookup by flag spelling
    pub fn find_by_flag(&self, flag: &str) -> Option<&ArgumentEntry> {
        self.entries.iter().find(|entry| entry.flag == flag)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ArgumentEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &ArgumentEntry> {
        self.entries.iter().filter(|entry| entry.is_required())
    }

    pub fn optional(&self) -> impl Iterator<Item = &ArgumentEntry> {
        self.entries.iter().filter(|entry| !entry.is_required())
    }

    /// Usage line plus one line per flag, grouped by requiredness
    pub fn render_help(&self) -> String {
        let mut usage = format!("usage: {} [-h]", self.task_name);
        for entry in &self.entries {
            let part = format!("{} {}", entry.flag, entry.metavar());
            if entry.is_required() {
                let _ = write!(usage, " {part}");
            } else {
                let _ = write!(usage, " [{part}]");
            }
        }

        let mut help = usage;
        help.push('\n');

        let required: Vec<_> = self.required().collect();
        if !required.is_empty() {
            help.push_str("\nrequired arguments:\n");
            for entry in required {
                let _ = writeln!(help, "  {} {}", entry.flag, entry.metavar());
                let _ = writeln!(help, "        {}", entry.help_text());
            }
        }

        help.push_str("\noptional arguments:\n");
        help.push_str("  -h, --help\n        show this help message and exit\n");
        for entry in self.optional() {
            let _ = writeln!(help, "  {} {}", entry.flag, entry.metavar());
            let _ = writeln!(help, "        {}", entry.help_text());
        }

        help
    }
}

/// Builds an [`ArgumentSpec`] from a callable's signature
pub struct ArgumentSpecBuilder;

impl ArgumentSpecBuilder {
    pub fn build<C: Callable + ?Sized>(callable: &C) -> BindingResult<ArgumentSpec> {
        Self::from_signature(&callable.signature())
    }

    pub fn from_signature(signature: &Signature) -> BindingResult<ArgumentSpec> {
        let descriptors = SignatureInspector::inspect_signature(signature)?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if !seen.insert(descriptor.name.clone()) {
                return Err(BindingError::DuplicateParameter {
                    task: signature.name().to_string(),
                    parameter: descriptor.name,
                });
            }
            let flag = naming::to_flag(&descriptor.name);
            entries.push(ArgumentEntry { descriptor, flag });
        }

        Ok(ArgumentSpec {
            task_name: signature.name().to_string(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::string_enum! {
        enum CompareStrategy {
            BiggerBetter => "Bigger is better",
            SmallerBetter => "Smaller is better",
        }
    }

    fn sample() -> Signature {
        Signature::new("compare")
            .param("params", DeclaredType::Namespace)
            .param("max_buffer", DeclaredType::Integer)
            .optional(
                "logic",
                DeclaredType::enumeration::<CompareStrategy>(),
                CompareStrategy::BiggerBetter,
            )
            .optional("tags", DeclaredType::List, vec!["a".to_string()])
    }

    #[test]
    fn test_flags_follow_names() {
        let spec = ArgumentSpecBuilder::from_signature(&sample()).unwrap();
        let flags: Vec<_> = spec.entries().iter().map(|e| e.flag.as_str()).collect();
        assert_eq!(flags, vec!["--params", "--max-buffer", "--logic", "--tags"]);
        assert_eq!(spec.find_by_flag("--max-buffer").unwrap().name(), "max_buffer");
        assert!(spec.find_by_flag("--Max-Buffer").is_none());
        assert_eq!(spec.required().count(), 2);
    }

    #[test]
    fn test_duplicate_parameter_names() {
        let signature = Signature::new("f")
            .param("a", DeclaredType::Integer)
            .param("a", DeclaredType::String);
        let error = ArgumentSpecBuilder::from_signature(&signature).unwrap_err();
        assert!(matches!(error, BindingError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_help_lists_types_choices_and_defaults() {
        let help = ArgumentSpecBuilder::from_signature(&sample())
            .unwrap()
            .render_help();

        assert!(help.starts_with("usage: compare [-h] --params PARAMS --max-buffer MAX_BUFFER"));
        assert!(help.contains("[--logic {Bigger is better,Smaller is better}]"));
        assert!(help.contains("required arguments:"));
        assert!(help.contains("of type namespace, indicated as a YAML or JSON file"));
        assert!(help.contains("of type int"));
        assert!(help.contains("of type CompareStrategy, one of: 'Bigger is better', 'Smaller is better'"));
        assert!(help.contains("(default: Bigger is better)"));
        assert!(help.contains("of type list, indicated as a delimited string (default: a)"));
        assert!(help.contains("-h, --help"));
    }
}
