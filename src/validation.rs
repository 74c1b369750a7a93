//! Descriptor field validation utilities.

use crate::types::{Error, Result};

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Validate a fully qualified tool name: dot-separated segments of ASCII
/// alphanumerics and underscores, e.g. `im.v1.chatMembers.get`.
pub fn validate_tool_name(name: &str) -> Result<()> {
    validate_non_empty(name, "tool name")?;
    let well_formed = name.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !well_formed {
        return Err(Error::validation(format!("malformed tool name: '{}'", name)));
    }
    Ok(())
}
