//! Well-known system types that are never declared in DSL source.

use deftype_language::{Primitive, TypeName, types::is_string_name};

/// System reference types resolved without a warning.
pub const SYSTEM_REFERENCE_TYPES: &[&str] = &[
    "Object",
    "Uri",
    "Version",
    "Exception",
    "Type",
    "Array",
    "Delegate",
    "Text.StringBuilder",
    "Text.Encoding",
    "Globalization.CultureInfo",
];

/// System value types that are not primitives in the type grammar.
pub const SYSTEM_VALUE_TYPES: &[&str] = &["IntPtr", "UIntPtr", "Half", "DateOnly", "TimeOnly"];

/// Classifies a named type against the system tables.
///
/// Returns `Some(true)` for value types, `Some(false)` for reference types,
/// and `None` if the name is not a system type. Names match with or without
/// the `System.` prefix.
#[must_use]
pub fn lookup_system_type(name: &TypeName) -> Option<bool> {
    let full = name.full_name();
    if Primitive::from_name(&full).is_some() {
        return Some(true);
    }
    if is_string_name(&full) {
        return Some(false);
    }
    let bare = full.strip_prefix("System.").unwrap_or(&full);
    if SYSTEM_VALUE_TYPES.contains(&bare) {
        Some(true)
    } else if SYSTEM_REFERENCE_TYPES.contains(&bare) {
        Some(false)
    } else {
        None
    }
}
