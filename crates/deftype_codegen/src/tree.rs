//! The generated declaration tree.
//!
//! A target-agnostic description of the types a compilation produces:
//! kinds, names, modifiers, base types, ordered members, and annotations.
//! Method bodies are small statement/expression trees, so an emitter can
//! render them in any C-family syntax without knowing DSL semantics.

use std::fmt;

use deftype_language::{TypeName, TypeRef};

// =============================================================================
// Types
// =============================================================================

/// The kind of a generated type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// A reference type.
    Class,
    /// A value type.
    Struct,
    /// An enumeration.
    Enum,
    /// An abstract capability declaration.
    Interface,
}

impl TypeKind {
    /// Returns the conventional keyword for this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Member or type visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    /// Visible everywhere.
    Public,
    /// Visible inside the declaring type only.
    Private,
}

/// Opaque key-value metadata attached to a type or member.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    /// Annotation name, e.g. `DataMember`.
    pub name: String,
    /// Named arguments in order.
    pub args: Vec<(String, String)>,
}

impl Annotation {
    /// Type-level serialization contract.
    pub const DATA_CONTRACT: &'static str = "DataContract";
    /// Field-level serialization tag.
    pub const DATA_MEMBER: &'static str = "DataMember";
    /// Enum-value serialization tag.
    pub const ENUM_MEMBER: &'static str = "EnumMember";

    /// Creates an annotation without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Adds a named argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Returns the value of a named argument.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A base type or implemented interface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseType {
    /// Qualified name, e.g. `App.ICommand`.
    pub name: String,
    /// Generic arguments, e.g. the type itself for `IEquatable<T>`.
    pub type_args: Vec<String>,
}

impl BaseType {
    /// Name of the structural-equality capability every value-semantics
    /// type implements.
    pub const EQUATABLE: &'static str = "IEquatable";

    /// Creates a non-generic base type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// Creates `IEquatable<type_name>`.
    #[must_use]
    pub fn equatable(type_name: impl Into<String>) -> Self {
        Self {
            name: Self::EQUATABLE.to_string(),
            type_args: vec![type_name.into()],
        }
    }
}

impl From<&TypeName> for BaseType {
    fn from(name: &TypeName) -> Self {
        Self::new(name.full_name())
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<{}>", self.type_args.join(", "))?;
        }
        Ok(())
    }
}

/// A generated type declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedType {
    /// Type kind.
    pub kind: TypeKind,
    /// Simple name.
    pub name: String,
    /// Enclosing namespace.
    pub namespace: String,
    /// Visibility.
    pub visibility: Visibility,
    /// True if the type cannot be derived from.
    pub is_sealed: bool,
    /// True if the type may be extended by hand-written partial declarations.
    pub is_partial: bool,
    /// Base types and interfaces in order.
    pub base_types: Vec<BaseType>,
    /// Members in order.
    pub members: Vec<Member>,
    /// Type-level annotations.
    pub annotations: Vec<Annotation>,
}

impl GeneratedType {
    /// Returns the namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns the type as a named type reference.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::named(&self.full_name())
    }

    /// Iterates over the fields.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    /// Iterates over the properties.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Returns the constructor, if there is one.
    #[must_use]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.members.iter().find_map(|m| match m {
            Member::Constructor(c) => Some(c),
            _ => None,
        })
    }

    /// Iterates over the methods called `name`.
    pub fn methods<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Method> {
        self.members.iter().filter_map(move |m| match m {
            Member::Method(method) if method.name == name => Some(method),
            _ => None,
        })
    }

    /// Finds the overload of `name` taking exactly one parameter of type `param`.
    #[must_use]
    pub fn method_with_param(&self, name: &str, param: &TypeRef) -> Option<&Method> {
        self.members.iter().find_map(|m| match m {
            Member::Method(method)
                if method.name == name
                    && method.params.len() == 1
                    && &method.params[0].ty == param =>
            {
                Some(method)
            }
            _ => None,
        })
    }

    /// Returns the operator of the given kind.
    #[must_use]
    pub fn operator(&self, kind: OperatorKind) -> Option<&Operator> {
        self.members.iter().find_map(|m| match m {
            Member::Operator(op) if op.kind == kind => Some(op),
            _ => None,
        })
    }

    /// Iterates over enum values.
    pub fn enum_values(&self) -> impl Iterator<Item = &EnumValue> {
        self.members.iter().filter_map(|m| match m {
            Member::EnumValue(v) => Some(v),
            _ => None,
        })
    }

    /// Returns the annotation called `name`.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

// =============================================================================
// Members
// =============================================================================

/// A member of a generated type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Member {
    /// Backing storage.
    Field(Field),
    /// Constructor.
    Constructor(Constructor),
    /// Read-only accessor.
    Property(Property),
    /// Operator overload.
    Operator(Operator),
    /// Method.
    Method(Method),
    /// Enumeration value.
    EnumValue(EnumValue),
}

/// A backing field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Field name, e.g. `_amount`.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Visibility.
    pub visibility: Visibility,
    /// True if only the constructor assigns it.
    pub is_readonly: bool,
    /// Serialization tags.
    pub annotations: Vec<Annotation>,
}

/// A method or constructor parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A constructor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constructor {
    /// Visibility.
    pub visibility: Visibility,
    /// Parameters in declaration order.
    pub params: Vec<Parameter>,
    /// Body.
    pub body: Vec<Stmt>,
}

/// A read-only accessor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Property type.
    pub ty: TypeRef,
    /// Visibility.
    pub visibility: Visibility,
    /// Expression the getter returns.
    pub getter: Expr,
}

/// An overloadable operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatorKind {
    /// `==`
    Equality,
    /// `!=`
    Inequality,
}

impl OperatorKind {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equality => "==",
            Self::Inequality => "!=",
        }
    }
}

/// A static operator overload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    /// Which operator.
    pub kind: OperatorKind,
    /// Operand parameters.
    pub params: Vec<Parameter>,
    /// Result type.
    pub return_type: TypeRef,
    /// Body.
    pub body: Vec<Stmt>,
}

/// How a method relates to inherited declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MethodModifier {
    /// A plain method.
    None,
    /// Overrides an inherited method.
    Override,
    /// Declared without a body.
    Abstract,
}

/// A method.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Visibility.
    pub visibility: Visibility,
    /// Modifier.
    pub modifier: MethodModifier,
    /// Parameters.
    pub params: Vec<Parameter>,
    /// Result type, `None` for no result.
    pub return_type: Option<TypeRef>,
    /// Body, `None` for abstract methods.
    pub body: Option<Vec<Stmt>>,
}

/// A symbolic enumeration value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Serialization tags.
    pub annotations: Vec<Annotation>,
}

// =============================================================================
// Bodies
// =============================================================================

/// A statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    /// `return value;`
    Return(Expr),
    /// `target = value;`
    Assign {
        /// Assigned place.
        target: Expr,
        /// Assigned value.
        value: Expr,
    },
    /// `if (condition) { then } else { otherwise }`
    If {
        /// Condition.
        condition: Expr,
        /// Taken branch.
        then: Vec<Stmt>,
        /// Other branch, possibly empty.
        otherwise: Vec<Stmt>,
    },
}

/// A binary operator inside a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// Value equality.
    Eq,
    /// Value inequality.
    Ne,
    /// Short-circuit conjunction.
    And,
    /// Short-circuit disjunction.
    Or,
    /// Wrapping integer addition.
    Add,
}

/// How array elements are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementComparison {
    /// Direct value equality.
    Value,
    /// Null-safe structural equality.
    NullSafe,
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// The null reference.
    Null,
    /// The current instance.
    This,
    /// A parameter.
    Ident(String),
    /// Member access: `target.name`.
    Member(Box<Expr>, String),
    /// Logical negation.
    Not(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Reference-identity null check, bypassing overloaded operators.
    IsNull(Box<Expr>),
    /// Static null-safe structural equality: both null, or both non-null
    /// and `left.Equals(right)`.
    NullSafeEquals(Box<Expr>, Box<Expr>),
    /// Instance `Equals` call; `param_type` selects the overload.
    InvokeEquals {
        /// Receiver.
        target: Box<Expr>,
        /// Argument.
        arg: Box<Expr>,
        /// Declared parameter type of the overload.
        param_type: TypeRef,
    },
    /// `target.GetHashCode()`
    HashCode(Box<Expr>),
    /// Array length.
    Length(Box<Expr>),
    /// Pairwise equality of two same-length arrays.
    ElementwiseEquals {
        /// Left array.
        left: Box<Expr>,
        /// Right array.
        right: Box<Expr>,
        /// Element comparison.
        element: ElementComparison,
    },
    /// Dynamic type test: `value is ty`.
    IsType(Box<Expr>, TypeRef),
    /// Cast to a type.
    Cast(Box<Expr>, TypeRef),
}

impl Expr {
    /// `this.name`
    #[must_use]
    pub fn this_member(name: &str) -> Self {
        Self::Member(Box::new(Self::This), name.to_string())
    }

    /// A parameter reference.
    #[must_use]
    pub fn ident(name: &str) -> Self {
        Self::Ident(name.to_string())
    }

    /// `self.name`
    #[must_use]
    pub fn member(self, name: &str) -> Self {
        Self::Member(Box::new(self), name.to_string())
    }

    /// Builds a binary expression.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `self && other`
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(BinaryOp::And, self, other)
    }

    /// `self || other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(BinaryOp::Or, self, other)
    }

    /// `!self`
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Reference-identity null check of `self`.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull(Box::new(self))
    }
}

// =============================================================================
// Output
// =============================================================================

/// The types generated for one namespace.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedNamespace {
    /// Namespace name.
    pub name: String,
    /// Types in generation order.
    pub types: Vec<GeneratedType>,
}

/// The result of compiling one source.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompilationOutput {
    /// Namespaces in source order.
    pub namespaces: Vec<GeneratedNamespace>,
}

impl CompilationOutput {
    /// Returns the distinct first segments of all namespace names, in order.
    #[must_use]
    pub fn root_namespaces(&self) -> Vec<String> {
        let mut roots: Vec<String> = Vec::new();
        for ns in &self.namespaces {
            let root = ns.name.split('.').next().unwrap_or_default();
            if !root.is_empty() && !roots.iter().any(|r| r == root) {
                roots.push(root.to_string());
            }
        }
        roots
    }

    /// Iterates over every generated type.
    pub fn types(&self) -> impl Iterator<Item = &GeneratedType> {
        self.namespaces.iter().flat_map(|ns| ns.types.iter())
    }

    /// Finds a type by qualified name.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<&GeneratedType> {
        self.types().find(|t| t.full_name() == full_name)
    }

    /// Finds a namespace by name.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&GeneratedNamespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }
}
