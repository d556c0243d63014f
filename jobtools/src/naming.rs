//! Flag spelling ↔ identifier spelling
//!
//! `max_buffer` is requested on the command line as `--max-buffer`. The two
//! directions are exact inverses for identifiers accepted by
//! [`is_supported_identifier`]; anything else is rejected when the signature
//! is inspected.

/// Prefix of every long flag
pub const FLAG_PREFIX: &str = "--";

/// `max_buffer` → `--max-buffer`
pub fn to_flag(identifier: &str) -> String {
    format!("{FLAG_PREFIX}{}", identifier.replace('_', "-"))
}

/// `--max-buffer` → `max_buffer`
pub fn to_identifier(flag: &str) -> String {
    flag.trim_start_matches('-').replace('-', "_")
}

/// Lower-case ASCII letter first, then lower-case letters, digits or underscores
pub fn is_supported_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
