//! The semantic model of one compilation.
//!
//! A `SemanticModel` ties a normalized syntax tree to its effective
//! conventions and its known-type table. The table is built on first use
//! and memoized; the tree is borrowed immutably for the model's lifetime.
//!
//! Named types resolve against, in order:
//! 1. Declared types, trying the enclosing namespace and then each parent
//!    namespace as a prefix, and finally the name as written.
//! 2. The system type tables.
//! 3. Otherwise the name is unresolved: an error in strict mode, an assumed
//!    reference type (with a warning) in lenient mode.

use deftype_foundation::{CompilerConfig, Error, Result};
use deftype_language::{
    AbstractSyntaxTree, CommandDecl, ConventionsDecl, NamespaceName, TypeDecl, TypeName, TypeRef,
};
use once_cell::unsync::OnceCell;
use tracing::{debug, warn};

use crate::conventions::resolve_conventions;
use crate::known_types::{KnownTypeTable, harvest_known_types};
use crate::system_types::lookup_system_type;

// =============================================================================
// Resolution results
// =============================================================================

/// Where a named type's classification came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Primitive, string, nullable, or array; no lookup needed.
    Intrinsic,
    /// Declared in the compilation.
    Declared,
    /// A well-known system type.
    System,
    /// Not found anywhere; assumed to be a reference type.
    Assumed,
}

/// A type reference after name resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    /// The type, with named types rewritten to their qualified names when
    /// they were found among the declarations.
    pub ty: TypeRef,
    /// True if instances cannot be null.
    pub is_value_type: bool,
    /// How the classification was determined.
    pub resolution: Resolution,
}

impl ResolvedType {
    const fn intrinsic(ty: TypeRef, is_value_type: bool) -> Self {
        Self {
            ty,
            is_value_type,
            resolution: Resolution::Intrinsic,
        }
    }
}

// =============================================================================
// SemanticModel
// =============================================================================

/// Semantic information for one compilation.
pub struct SemanticModel<'ast> {
    ast: &'ast AbstractSyntaxTree,
    config: CompilerConfig,
    conventions: ConventionsDecl,
    known_types: OnceCell<KnownTypeTable>,
}

impl<'ast> SemanticModel<'ast> {
    /// Creates a model, resolving conventions against `base_conventions`.
    #[must_use]
    pub fn new(
        ast: &'ast AbstractSyntaxTree,
        base_conventions: &ConventionsDecl,
        config: CompilerConfig,
    ) -> Self {
        Self {
            ast,
            conventions: resolve_conventions(base_conventions, ast).into_owned(),
            config,
            known_types: OnceCell::new(),
        }
    }

    /// The syntax tree this model describes.
    #[must_use]
    pub const fn ast(&self) -> &'ast AbstractSyntaxTree {
        self.ast
    }

    /// The compiler configuration.
    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The effective conventions.
    #[must_use]
    pub const fn conventions(&self) -> &ConventionsDecl {
        &self.conventions
    }

    /// Returns the known-type table, building it on first call.
    ///
    /// # Errors
    /// Returns `DuplicateType` if two declarations share a qualified name
    /// and duplicates are not allowed.
    pub fn known_types(&self) -> Result<&KnownTypeTable> {
        self.known_types.get_or_try_init(|| {
            let harvested = harvest_known_types(self.ast);
            let table =
                KnownTypeTable::from_known_types(&harvested, self.config.allow_duplicate_types)?;
            debug!(count = table.len(), "built known-type table");
            Ok(table)
        })
    }

    /// Resolves a type reference appearing in `namespace`.
    ///
    /// # Errors
    /// Returns `UnresolvedType` in strict mode when a named type is unknown,
    /// and propagates table-building errors.
    pub fn resolve(&self, ty: &TypeRef, namespace: &NamespaceName) -> Result<ResolvedType> {
        match ty {
            TypeRef::Simple(_) | TypeRef::Nullable(_) => Ok(ResolvedType::intrinsic(ty.clone(), true)),
            TypeRef::String => Ok(ResolvedType::intrinsic(ty.clone(), false)),
            TypeRef::Array { element, ranks } => {
                let element = self.resolve(element, namespace)?;
                Ok(ResolvedType::intrinsic(
                    TypeRef::array_with_ranks(element.ty, ranks.clone()),
                    false,
                ))
            }
            TypeRef::Named(name) => self.resolve_named(name, namespace),
        }
    }

    /// Returns true if `ty` resolves to a value type.
    ///
    /// # Errors
    /// Same as [`SemanticModel::resolve`].
    pub fn is_value_type(&self, ty: &TypeRef, namespace: &NamespaceName) -> Result<bool> {
        Ok(self.resolve(ty, namespace)?.is_value_type)
    }

    /// Builds the table and resolves every property type in the tree.
    ///
    /// # Errors
    /// Returns the first duplicate or (in strict mode) unresolved type.
    pub fn validate(&self) -> Result<()> {
        self.known_types()?;
        for (ns, decl) in self.ast.declarations() {
            let commands: &[CommandDecl] = match decl {
                TypeDecl::ApplicationService(service) => &service.commands,
                _ => &[],
            };
            let properties = decl
                .properties()
                .iter()
                .chain(commands.iter().flat_map(|command| command.properties.iter()));
            for property in properties {
                if let Some(ty) = &property.ty {
                    self.resolve(ty, &ns.name).map_err(|err| {
                        err.in_declaration(
                            format!("{} {}", decl.kind().keyword(), ns.name.qualify(decl.name())),
                            property.span.line as usize,
                            property.span.column as usize,
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    fn resolve_named(&self, name: &TypeName, namespace: &NamespaceName) -> Result<ResolvedType> {
        let table = self.known_types()?;
        let written = name.full_name();

        let declared = candidate_names(&written, namespace).find_map(|candidate| table.get(&candidate));
        if let Some(known) = declared {
            return Ok(ResolvedType {
                ty: TypeRef::named(&known.full_name),
                is_value_type: known.is_value_type,
                resolution: Resolution::Declared,
            });
        }

        if let Some(is_value_type) = lookup_system_type(name) {
            return Ok(ResolvedType {
                ty: TypeRef::Named(name.clone()),
                is_value_type,
                resolution: Resolution::System,
            });
        }

        if self.config.strict_type_resolution {
            return Err(Error::unresolved_type(written, namespace.full_name()));
        }
        warn!(
            name = %written,
            namespace = %namespace,
            "unresolved type assumed to be a reference type"
        );
        Ok(ResolvedType {
            ty: TypeRef::Named(name.clone()),
            is_value_type: false,
            resolution: Resolution::Assumed,
        })
    }
}

/// Qualified names to try for `written` inside `namespace`, innermost first.
fn candidate_names<'a>(
    written: &'a str,
    namespace: &'a NamespaceName,
) -> impl Iterator<Item = String> + 'a {
    (0..=namespace.segments.len())
        .rev()
        .map(move |depth| match depth {
            0 => written.to_string(),
            _ => format!("{}.{written}", namespace.segments[..depth].join(".")),
        })
}
