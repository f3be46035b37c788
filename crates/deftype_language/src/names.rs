//! Qualified names for namespaces and types.
//!
//! Both kinds of name are dot-separated paths like `Billing.Invoices`.
//! Equality is name equality: two names are equal when their segments are.

use std::fmt;

// =============================================================================
// NamespaceName
// =============================================================================

/// A qualified namespace name like `Billing.Invoices`.
///
/// Stored as path segments for easy manipulation and comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceName {
    /// Path segments (e.g., `["Billing", "Invoices"]` for `Billing.Invoices`).
    pub segments: Vec<String>,
}

impl NamespaceName {
    /// Creates a new namespace name from segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Creates a namespace name from a dotted string like `Billing.Invoices`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self {
            segments: split_segments(s),
        }
    }

    /// Returns the full qualified name as a dotted string.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.segments.join(".")
    }

    /// Returns the first segment, the root of the namespace hierarchy.
    #[must_use]
    pub fn root(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    /// Qualifies a declared name with this namespace.
    ///
    /// A name that already contains a dot is taken as fully qualified and
    /// returned verbatim.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('.') || self.segments.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.full_name())
        }
    }

    /// Returns true if this namespace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

// =============================================================================
// TypeName
// =============================================================================

/// A possibly qualified type name like `Money` or `App.ICommand`.
///
/// Used both for base types to inherit and for named property types.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeName {
    /// Path segments; the last one is the simple name.
    pub segments: Vec<String>,
}

impl TypeName {
    /// Creates a type name from a dotted string like `App.ICommand`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self {
            segments: split_segments(s),
        }
    }

    /// Returns the full name as a dotted string.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.segments.join(".")
    }

    /// Returns the simple name (last segment).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns true if the name carries a namespace prefix.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

fn split_segments(s: &str) -> Vec<String> {
    s.split('.')
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}
