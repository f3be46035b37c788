//! Type references used in property positions.
//!
//! The set of variants is closed: primitive value types, the string type,
//! nullable primitives, arrays, and named references to other types.

use std::fmt;

use crate::names::TypeName;

// =============================================================================
// Primitive
// =============================================================================

/// A primitive or well-known system value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    /// `bool` / `Boolean`
    Bool,
    /// `byte` / `Byte`
    Byte,
    /// `sbyte` / `SByte`
    SByte,
    /// `char` / `Char`
    Char,
    /// `short` / `Int16`
    Short,
    /// `ushort` / `UInt16`
    UShort,
    /// `int` / `Int32`
    Int,
    /// `uint` / `UInt32`
    UInt,
    /// `long` / `Int64`
    Long,
    /// `ulong` / `UInt64`
    ULong,
    /// `float` / `Single`
    Float,
    /// `double` / `Double`
    Double,
    /// `decimal` / `Decimal`
    Decimal,
    /// `Guid`
    Guid,
    /// `DateTime`
    DateTime,
    /// `DateTimeOffset`
    DateTimeOffset,
    /// `TimeSpan`
    TimeSpan,
}

impl Primitive {
    /// Every primitive, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Bool,
        Self::Byte,
        Self::SByte,
        Self::Char,
        Self::Short,
        Self::UShort,
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Guid,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::TimeSpan,
    ];

    /// Type of the implicit property of a shorthand value type.
    pub const DEFAULT: Self = Self::Int;

    /// Returns the lowercase keyword alias, if the type has one.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Bool => Some("bool"),
            Self::Byte => Some("byte"),
            Self::SByte => Some("sbyte"),
            Self::Char => Some("char"),
            Self::Short => Some("short"),
            Self::UShort => Some("ushort"),
            Self::Int => Some("int"),
            Self::UInt => Some("uint"),
            Self::Long => Some("long"),
            Self::ULong => Some("ulong"),
            Self::Float => Some("float"),
            Self::Double => Some("double"),
            Self::Decimal => Some("decimal"),
            Self::Guid | Self::DateTime | Self::DateTimeOffset | Self::TimeSpan => None,
        }
    }

    /// Returns the system type name, without the `System.` prefix.
    #[must_use]
    pub const fn system_name(self) -> &'static str {
        match self {
            Self::Bool => "Boolean",
            Self::Byte => "Byte",
            Self::SByte => "SByte",
            Self::Char => "Char",
            Self::Short => "Int16",
            Self::UShort => "UInt16",
            Self::Int => "Int32",
            Self::UInt => "UInt32",
            Self::Long => "Int64",
            Self::ULong => "UInt64",
            Self::Float => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Guid => "Guid",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::TimeSpan => "TimeSpan",
        }
    }

    /// Returns the canonical name: the keyword when there is one.
    #[must_use]
    pub const fn canonical_name(self) -> &'static str {
        match self.keyword() {
            Some(keyword) => keyword,
            None => self.system_name(),
        }
    }

    /// Looks up a primitive by keyword, system name, or `System.`-qualified name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("System.").unwrap_or(name);
        Self::ALL.into_iter().find(|p| {
            p.system_name() == bare || (p.keyword() == Some(name))
        })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Returns true if `name` spells the string type.
#[must_use]
pub fn is_string_name(name: &str) -> bool {
    matches!(name, "string" | "String" | "System.String")
}

// =============================================================================
// RankSpecifier
// =============================================================================

/// An array dimensionality marker: `[]` has one dimension, `[,]` two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankSpecifier {
    dimensions: u32,
}

impl RankSpecifier {
    /// The one-dimensional `[]` specifier.
    pub const SINGLE: Self = Self { dimensions: 1 };

    /// Creates a rank specifier; dimension counts start at one.
    #[must_use]
    pub const fn new(dimensions: u32) -> Option<Self> {
        if dimensions == 0 {
            None
        } else {
            Some(Self { dimensions })
        }
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub const fn dimensions(self) -> u32 {
        self.dimensions
    }
}

impl fmt::Display for RankSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for _ in 1..self.dimensions {
            f.write_str(",")?;
        }
        f.write_str("]")
    }
}

// =============================================================================
// TypeRef
// =============================================================================

/// A reference to a type in property position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeRef {
    /// A primitive value type like `int` or `decimal`.
    Simple(Primitive),
    /// The string reference type.
    String,
    /// An optional primitive like `int?`. Nullability never nests.
    Nullable(Primitive),
    /// An array with one or more rank specifiers, outermost first.
    Array {
        /// Element type.
        element: Box<TypeRef>,
        /// Rank specifiers; never empty.
        ranks: Vec<RankSpecifier>,
    },
    /// A reference to a declared or external type, resolved later by name.
    Named(TypeName),
}

impl TypeRef {
    /// Type of the implicit property of a shorthand value type.
    #[must_use]
    pub const fn default_property_type() -> Self {
        Self::Simple(Primitive::DEFAULT)
    }

    /// Creates a single-rank, one-dimensional array of `element`.
    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        Self::Array {
            element: Box::new(element),
            ranks: vec![RankSpecifier::SINGLE],
        }
    }

    /// Creates an array with arbitrary rank specifiers.
    ///
    /// Only reachable by direct construction; the grammar never produces
    /// more than one `[]`.
    #[must_use]
    pub fn array_with_ranks(element: TypeRef, ranks: Vec<RankSpecifier>) -> Self {
        Self::Array {
            element: Box::new(element),
            ranks,
        }
    }

    /// Creates a named type reference.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named(TypeName::parse(name))
    }

    /// Returns true if this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Returns whether the type is a value type without consulting any
    /// symbol table, or `None` for named types.
    #[must_use]
    pub const fn intrinsic_value_type(&self) -> Option<bool> {
        match self {
            Self::Simple(_) | Self::Nullable(_) => Some(true),
            Self::String | Self::Array { .. } => Some(false),
            Self::Named(_) => None,
        }
    }

    /// Returns the element type of an array whose shape supports element-wise
    /// equality: exactly one rank specifier with exactly one dimension.
    ///
    /// Returns `None` for non-arrays and for every other array shape.
    #[must_use]
    pub fn single_dimension_element(&self) -> Option<&TypeRef> {
        match self {
            Self::Array { element, ranks }
                if ranks.len() == 1 && ranks[0].dimensions() == 1 =>
            {
                Some(element.as_ref())
            }
            _ => None,
        }
    }

    /// Renders the rank specifiers of an array, e.g. `[][,]`.
    #[must_use]
    pub fn rank_signature(&self) -> String {
        match self {
            Self::Array { ranks, .. } => ranks.iter().map(ToString::to_string).collect(),
            _ => String::new(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(p) => write!(f, "{p}"),
            Self::String => f.write_str("string"),
            Self::Nullable(p) => write!(f, "{p}?"),
            Self::Array { element, ranks } => {
                write!(f, "{element}")?;
                for rank in ranks {
                    write!(f, "{rank}")?;
                }
                Ok(())
            }
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
