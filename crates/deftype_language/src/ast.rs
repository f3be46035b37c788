//! Abstract Syntax Tree for the deftype DSL.
//!
//! A compilation unit is an optional conventions declaration followed by
//! namespaces, each holding type declarations in source order. The tree is
//! immutable once parsed; passes that change it return a new tree.

use std::borrow::Cow;

use crate::names::{NamespaceName, TypeName};
use crate::span::Span;
use crate::types::TypeRef;

// =============================================================================
// Properties
// =============================================================================

/// A property in a declaration's property list.
///
/// Name and type are only absent for the implicit property of a shorthand
/// value type such as `(defvaluetype Id)`; see [`crate::defaults`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyDecl {
    /// Property name, e.g. `Number`.
    pub name: Option<String>,
    /// Property type.
    pub ty: Option<TypeRef>,
    /// Source span.
    pub span: Span,
}

impl PropertyDecl {
    /// Creates a named, typed property.
    pub fn new(name: impl Into<String>, ty: TypeRef, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            ty: Some(ty),
            span,
        }
    }

    /// Creates the implicit property of a shorthand value type.
    #[must_use]
    pub const fn implicit(ty: Option<TypeRef>, span: Span) -> Self {
        Self {
            name: None,
            ty,
            span,
        }
    }
}

// =============================================================================
// Type Declarations
// =============================================================================

/// A value type declaration.
///
/// Corresponds to either form:
/// ```text
/// (defvaluetype EmployeeNumber int)
/// (defvaluetype Money (decimal Amount, string Currency))
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueTypeDecl {
    /// Type name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Source span.
    pub span: Span,
}

/// A command declaration: `(defcommand PlaceOrder (Guid OrderId))`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandDecl {
    /// Type name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Source span.
    pub span: Span,
}

/// A domain event declaration: `(defdomainevent OrderPlaced (Guid OrderId))`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainEventDecl {
    /// Type name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Source span.
    pub span: Span,
}

/// A data-transfer object declaration: `(defdto Info (string Name))`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtoDecl {
    /// Type name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Source span.
    pub span: Span,
}

/// An enum declaration: `(defenum Color [Red Green Blue])`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDecl {
    /// Type name.
    pub name: String,
    /// Symbolic values in declaration order.
    pub values: Vec<String>,
    /// Source span.
    pub span: Span,
}

/// An application service declaration holding at least one command.
///
/// ```text
/// (defapplicationservice Orders
///   (defcommand PlaceOrder (Guid Id))
///   (defcommand CancelOrder (Guid Id)))
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationServiceDecl {
    /// Service name, without the interface prefix.
    pub name: String,
    /// Nested commands; never empty when produced by the grammar.
    pub commands: Vec<CommandDecl>,
    /// Source span.
    pub span: Span,
}

/// The kind of a type declaration, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    /// `defvaluetype`
    ValueType,
    /// `defcommand`
    Command,
    /// `defdomainevent`
    DomainEvent,
    /// `defdto`
    Dto,
    /// `defenum`
    Enum,
    /// `defapplicationservice`
    ApplicationService,
}

impl DeclKind {
    /// Returns the DSL symbol introducing this kind of declaration.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::ValueType => "defvaluetype",
            Self::Command => "defcommand",
            Self::DomainEvent => "defdomainevent",
            Self::Dto => "defdto",
            Self::Enum => "defenum",
            Self::ApplicationService => "defapplicationservice",
        }
    }

    /// Looks up a declaration kind by its DSL symbol, case-sensitively.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "defvaluetype" => Some(Self::ValueType),
            "defcommand" => Some(Self::Command),
            "defdomainevent" => Some(Self::DomainEvent),
            "defdto" => Some(Self::Dto),
            "defenum" => Some(Self::Enum),
            "defapplicationservice" => Some(Self::ApplicationService),
            _ => None,
        }
    }

    /// Returns true if declarations of this kind are value types.
    #[must_use]
    pub const fn is_value_type(self) -> bool {
        matches!(self, Self::ValueType | Self::Enum)
    }
}

/// Any type declaration inside a namespace.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeDecl {
    /// A value type.
    ValueType(ValueTypeDecl),
    /// A command.
    Command(CommandDecl),
    /// A domain event.
    DomainEvent(DomainEventDecl),
    /// A data-transfer object.
    Dto(DtoDecl),
    /// An enum.
    Enum(EnumDecl),
    /// An application service.
    ApplicationService(ApplicationServiceDecl),
}

impl TypeDecl {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ValueType(d) => &d.name,
            Self::Command(d) => &d.name,
            Self::DomainEvent(d) => &d.name,
            Self::Dto(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::ApplicationService(d) => &d.name,
        }
    }

    /// Returns the source span of the declaration.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::ValueType(d) => d.span,
            Self::Command(d) => d.span,
            Self::DomainEvent(d) => d.span,
            Self::Dto(d) => d.span,
            Self::Enum(d) => d.span,
            Self::ApplicationService(d) => d.span,
        }
    }

    /// Returns the declaration kind.
    #[must_use]
    pub const fn kind(&self) -> DeclKind {
        match self {
            Self::ValueType(_) => DeclKind::ValueType,
            Self::Command(_) => DeclKind::Command,
            Self::DomainEvent(_) => DeclKind::DomainEvent,
            Self::Dto(_) => DeclKind::Dto,
            Self::Enum(_) => DeclKind::Enum,
            Self::ApplicationService(_) => DeclKind::ApplicationService,
        }
    }

    /// Returns the property list, empty for enums and services.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDecl] {
        match self {
            Self::ValueType(d) => &d.properties,
            Self::Command(d) => &d.properties,
            Self::DomainEvent(d) => &d.properties,
            Self::Dto(d) => &d.properties,
            Self::Enum(_) | Self::ApplicationService(_) => &[],
        }
    }
}

// =============================================================================
// Namespaces
// =============================================================================

/// A namespace: `(namespace Billing (defdto ...) ...)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Namespace {
    /// Namespace name.
    pub name: NamespaceName,
    /// Declarations in source order.
    pub declarations: Vec<TypeDecl>,
    /// Source span.
    pub span: Span,
}

// =============================================================================
// Conventions
// =============================================================================

/// An ordered list of base types to inherit.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseTypes {
    /// Base type names in declaration order.
    pub types: Vec<TypeName>,
}

impl BaseTypes {
    /// Creates a base-type list.
    #[must_use]
    pub fn new(types: Vec<TypeName>) -> Self {
        Self { types }
    }

    /// Returns the override when present, replacing this list wholesale.
    #[must_use]
    pub fn apply_overrides_from(&self, other: Option<&BaseTypes>) -> BaseTypes {
        other.unwrap_or(self).clone()
    }

    /// Returns true if there are no base types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Compilation-wide policy for the base types of commands and domain events.
///
/// Corresponds to:
/// ```text
/// (defconventions
///   :domainevents { inherit [App.IDomainEvent] }
///   :commands     { inherit [App.ICommand] })
/// ```
///
/// A group left out of the declaration is `None`, which keeps the base
/// convention's list when this declaration is applied as an override.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConventionsDecl {
    /// Base types for domain events.
    pub domain_events: Option<BaseTypes>,
    /// Base types for commands.
    pub commands: Option<BaseTypes>,
    /// Source span.
    pub span: Span,
}

impl ConventionsDecl {
    /// Creates conventions with both groups present.
    #[must_use]
    pub fn new(domain_events: BaseTypes, commands: BaseTypes) -> Self {
        Self {
            domain_events: Some(domain_events),
            commands: Some(commands),
            span: Span::default(),
        }
    }

    /// Applies `other` on top of these conventions.
    ///
    /// With no override the result borrows `self`. Otherwise each group the
    /// override specifies replaces this group's list wholesale, and each
    /// group it omits is kept.
    #[must_use]
    pub fn apply_overrides_from(&self, other: Option<&ConventionsDecl>) -> Cow<'_, ConventionsDecl> {
        let Some(other) = other else {
            return Cow::Borrowed(self);
        };
        Cow::Owned(Self {
            domain_events: replace_group(self.domain_events.as_ref(), other.domain_events.as_ref()),
            commands: replace_group(self.commands.as_ref(), other.commands.as_ref()),
            span: other.span,
        })
    }

    /// Base types every domain event inherits.
    #[must_use]
    pub fn domain_event_base_types(&self) -> &[TypeName] {
        self.domain_events.as_ref().map_or(&[][..], |b| b.types.as_slice())
    }

    /// Base types every command inherits.
    #[must_use]
    pub fn command_base_types(&self) -> &[TypeName] {
        self.commands.as_ref().map_or(&[][..], |b| b.types.as_slice())
    }
}

fn replace_group(base: Option<&BaseTypes>, other: Option<&BaseTypes>) -> Option<BaseTypes> {
    match base {
        Some(base) => Some(base.apply_overrides_from(other)),
        None => other.cloned(),
    }
}

// =============================================================================
// Root
// =============================================================================

/// A whole compilation unit.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbstractSyntaxTree {
    /// The leading `defconventions`, if any.
    pub conventions: Option<ConventionsDecl>,
    /// Namespaces in source order.
    pub namespaces: Vec<Namespace>,
}

impl AbstractSyntaxTree {
    /// Iterates over every declaration with its namespace, in source order.
    pub fn declarations(&self) -> impl Iterator<Item = (&Namespace, &TypeDecl)> {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.declarations.iter().map(move |decl| (ns, decl)))
    }

    /// Finds a namespace by its dotted name.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name.full_name() == name)
    }
}
