//! Workflow status rules.
//!
//! Statuses are a global lookup (`wtg`, `ip`, `rev`, `apr`, ...). Each one
//! may be restricted to a set of entity types through `applies_to`; an
//! empty list means the status can be used anywhere.

use crate::codes::EntityType;
use crate::error::CoreError;

/// Validate that a status color is in hex format `#RRGGBB`.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let hex_part = color.strip_prefix('#').ok_or_else(|| {
        CoreError::Validation(format!("Invalid color '{color}'. Must start with '#'"))
    })?;

    if hex_part.len() != 6 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must be in #RRGGBB hex format"
        )));
    }
    Ok(())
}

/// Validate every entry of an `applies_to` list.
pub fn validate_applies_to(applies_to: &[String]) -> Result<(), CoreError> {
    for value in applies_to {
        EntityType::parse(value)?;
    }
    Ok(())
}

/// Check that a status may be assigned to an entity of `entity_type`.
pub fn check_status_applies(
    status_code: &str,
    is_active: bool,
    applies_to: &[String],
    entity_type: EntityType,
) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::Validation(format!(
            "Status '{status_code}' is inactive"
        )));
    }
    if applies_to.is_empty() || applies_to.iter().any(|t| t == entity_type.as_str()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Status '{status_code}' cannot be used on a {entity_type}"
        )))
    }
}
