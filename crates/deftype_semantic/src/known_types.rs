//! Known-type harvesting and the per-compilation symbol table.
//!
//! The harvester walks every declaration once and records its fully
//! qualified name together with its value/reference classification. It is
//! a pure fold: the accumulator and the namespace are threaded through the
//! traversal and no state outlives the call.

use std::fmt;

use deftype_foundation::{Error, Result};
use deftype_language::{AbstractSyntaxTree, NamespaceName, TypeDecl};
use tracing::{trace, warn};

// =============================================================================
// KnownType
// =============================================================================

/// A declared type, as recorded by the harvester.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KnownType {
    /// Fully qualified name, e.g. `Billing.Money`.
    pub full_name: String,
    /// True for value types and enums.
    pub is_value_type: bool,
}

impl KnownType {
    /// Creates a known type.
    #[must_use]
    pub fn new(full_name: impl Into<String>, is_value_type: bool) -> Self {
        Self {
            full_name: full_name.into(),
            is_value_type,
        }
    }
}

impl fmt::Display for KnownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_value_type { "value" } else { "reference" };
        write!(f, "{} ({kind})", self.full_name)
    }
}

// =============================================================================
// Harvester
// =============================================================================

/// Collects every declared type in traversal order.
///
/// Namespaces are visited in source order, then declarations within each
/// namespace. An application service is recorded followed by each of its
/// commands. No validation happens here: duplicate names appear twice.
#[must_use]
pub fn harvest_known_types(ast: &AbstractSyntaxTree) -> Vec<KnownType> {
    let known = ast.namespaces.iter().fold(Vec::new(), |acc, ns| {
        ns.declarations
            .iter()
            .fold(acc, |acc, decl| harvest_declaration(acc, &ns.name, decl))
    });
    trace!(count = known.len(), "harvested known types");
    known
}

fn harvest_declaration(
    mut acc: Vec<KnownType>,
    namespace: &NamespaceName,
    decl: &TypeDecl,
) -> Vec<KnownType> {
    acc.push(KnownType::new(
        namespace.qualify(decl.name()),
        decl.kind().is_value_type(),
    ));
    if let TypeDecl::ApplicationService(service) = decl {
        acc.extend(
            service
                .commands
                .iter()
                .map(|command| KnownType::new(namespace.qualify(&command.name), false)),
        );
    }
    acc
}

// =============================================================================
// KnownTypeTable
// =============================================================================

/// Lookup table from fully qualified name to known type.
///
/// Backed by a persistent ordered map, so cloning is cheap and iteration
/// order is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnownTypeTable {
    entries: im::OrdMap<String, KnownType>,
}

impl KnownTypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from harvested types.
    ///
    /// With `allow_duplicates` the last entry for a name wins.
    ///
    /// # Errors
    /// Returns `DuplicateType` if a name occurs twice and duplicates are
    /// not allowed.
    pub fn from_known_types(known: &[KnownType], allow_duplicates: bool) -> Result<Self> {
        let mut entries = im::OrdMap::new();
        for ty in known {
            if let Some(previous) = entries.insert(ty.full_name.clone(), ty.clone()) {
                if !allow_duplicates {
                    return Err(Error::duplicate_type(&ty.full_name));
                }
                warn!(name = %ty.full_name, previous = %previous, "duplicate type declaration replaced");
            }
        }
        Ok(Self { entries })
    }

    /// Returns a new table with `ty` added, replacing any entry of the same name.
    #[must_use]
    pub fn insert(&self, ty: KnownType) -> Self {
        Self {
            entries: self.entries.update(ty.full_name.clone(), ty),
        }
    }

    /// Looks up a type by fully qualified name.
    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&KnownType> {
        self.entries.get(full_name)
    }

    /// Returns true if the name is declared.
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.entries.contains_key(full_name)
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the known types ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &KnownType> {
        self.entries.values()
    }
}
