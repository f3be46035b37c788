//! Configuration for a compilation.

/// Configuration for the deftype compiler.
///
/// Controls how lenient semantic analysis is and the names the generator
/// picks for implicit members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Fail on named types that are neither declared nor well-known system types.
    ///
    /// When false, such names are assumed to be reference types.
    pub strict_type_resolution: bool,

    /// Keep the last declaration when two share a qualified name.
    ///
    /// When false, duplicate qualified names are a compilation error.
    pub allow_duplicate_types: bool,

    /// Name given to the implicit property of a shorthand value type.
    pub default_property_name: String,

    /// Prefix applied to application-service interface names.
    pub service_interface_prefix: String,

    /// Name of the operation exposed once per application-service command.
    pub service_operation_name: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            strict_type_resolution: false,
            allow_duplicate_types: false,
            default_property_name: "Value".to_string(),
            service_interface_prefix: "I".to_string(),
            service_operation_name: "Execute".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Creates a configuration that rejects every questionable input.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_type_resolution: true,
            allow_duplicate_types: false,
            ..Self::default()
        }
    }

    /// Creates a configuration matching the historical lenient behavior:
    /// unresolved names are reference types and duplicates overwrite.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_type_resolution: false,
            allow_duplicate_types: true,
            ..Self::default()
        }
    }

    /// Builder method to set strict type resolution.
    #[must_use]
    pub fn with_strict_type_resolution(mut self, strict: bool) -> Self {
        self.strict_type_resolution = strict;
        self
    }

    /// Builder method to allow duplicate qualified names.
    #[must_use]
    pub fn with_allow_duplicate_types(mut self, allow: bool) -> Self {
        self.allow_duplicate_types = allow;
        self
    }

    /// Builder method to set the implicit property name.
    #[must_use]
    pub fn with_default_property_name(mut self, name: impl Into<String>) -> Self {
        self.default_property_name = name.into();
        self
    }

    /// Builder method to set the service interface prefix.
    #[must_use]
    pub fn with_service_interface_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.service_interface_prefix = prefix.into();
        self
    }

    /// Builder method to set the service operation name.
    #[must_use]
    pub fn with_service_operation_name(mut self, name: impl Into<String>) -> Self {
        self.service_operation_name = name.into();
        self
    }
}
