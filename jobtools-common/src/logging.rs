//! Logging utilities for jobtools

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// ```ignore
/// use jobtools_common::Pretty;
/// use tracing::debug;
///
/// debug!("Parsed arguments: {}", Pretty(&parsed));
/// ```
///
/// Outputs YAML with a leading newline. Debug is the fallback when the value
/// cannot be serialized.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_pretty_renders_yaml_with_leading_newline() {
        let mut values = BTreeMap::new();
        values.insert("budget", 700);

        let rendered = Pretty(&values).to_string();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("budget: 700"));
    }
}
