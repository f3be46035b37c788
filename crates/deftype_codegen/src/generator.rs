//! Declaration tree generation.
//!
//! Dispatches over the declaration kind. Value types, commands, domain
//! events and DTOs share one value-semantics construction, parameterized
//! by value/reference classification, sealing, serialization tags and
//! convention base types. Enums and application services take their own,
//! simpler paths.

use std::collections::HashSet;

use deftype_foundation::{Error, Result};
use deftype_language::{
    ApplicationServiceDecl, CommandDecl, DeclKind, EnumDecl, NamespaceName, Primitive,
    PropertyDecl, TypeDecl, TypeName, TypeRef,
};
use deftype_semantic::SemanticModel;
use tracing::{debug, trace};

use crate::equality::{
    self, EqualityMember, LEFT, OBJ, OTHER, RIGHT, hash_code_body, object_equals_body,
    operator_body, typed_equals_body,
};
use crate::tree::{
    Annotation, BaseType, CompilationOutput, Constructor, EnumValue, Expr, Field,
    GeneratedNamespace, GeneratedType, Member, Method, MethodModifier, Operator, OperatorKind,
    Parameter, Property, Stmt, TypeKind, Visibility,
};

/// Qualified name of the root object type, the parameter of object equality.
pub const OBJECT_TYPE: &str = "System.Object";

// =============================================================================
// Shape parameters
// =============================================================================

/// The knobs of the shared value-semantics construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Shape {
    is_value_type: bool,
    is_sealed: bool,
    is_serializable: bool,
}

impl Shape {
    const fn for_kind(kind: DeclKind) -> Self {
        match kind {
            DeclKind::ValueType => Self {
                is_value_type: true,
                is_sealed: false,
                is_serializable: false,
            },
            DeclKind::Command => Self {
                is_value_type: false,
                is_sealed: false,
                is_serializable: true,
            },
            DeclKind::DomainEvent | DeclKind::Dto | DeclKind::Enum | DeclKind::ApplicationService => {
                Self {
                    is_value_type: false,
                    is_sealed: true,
                    is_serializable: true,
                }
            }
        }
    }
}

/// A property after defaulting and type resolution.
#[derive(Clone, Debug)]
struct ResolvedProperty {
    name: String,
    field: String,
    parameter: String,
    ty: TypeRef,
    is_value_type: bool,
}

impl ResolvedProperty {
    fn as_member(&self) -> EqualityMember<'_> {
        EqualityMember {
            property: &self.name,
            field: &self.field,
            ty: &self.ty,
            is_value_type: self.is_value_type,
        }
    }
}

/// The first property whose backing field repeats an earlier one.
fn colliding_property(properties: &[ResolvedProperty]) -> Option<&str> {
    let mut seen = HashSet::new();
    properties
        .iter()
        .find(|p| !seen.insert(p.field.as_str()))
        .map(|p| p.name.as_str())
}

/// `Amount` becomes `amount`.
fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Amount` becomes `_amount`.
#[must_use]
pub fn field_name(property: &str) -> String {
    format!("_{}", lower_camel(property))
}

/// Splits a qualified declaration name into namespace and simple name.
fn split_qualified(full_name: &str) -> (String, String) {
    let name = TypeName::parse(full_name);
    let simple = name.simple_name().to_string();
    let namespace = name.segments[..name.segments.len().saturating_sub(1)].join(".");
    (namespace, simple)
}

// =============================================================================
// CodeGenerator
// =============================================================================

/// Generates declaration trees from a semantic model.
pub struct CodeGenerator<'m, 'ast> {
    model: &'m SemanticModel<'ast>,
}

impl<'m, 'ast> CodeGenerator<'m, 'ast> {
    /// Creates a generator over `model`.
    #[must_use]
    pub const fn new(model: &'m SemanticModel<'ast>) -> Self {
        Self { model }
    }

    /// Generates every declaration in the model's tree.
    ///
    /// One namespace group is produced per source namespace, in order, even
    /// when it declares nothing. Declarations with qualified names land in
    /// the group of their own namespace, which is appended if the source
    /// never opened it.
    ///
    /// # Errors
    /// Returns the first resolution or generation failure.
    pub fn generate_all(&self) -> Result<CompilationOutput> {
        let mut output = CompilationOutput::default();
        for ns in &self.model.ast().namespaces {
            let name = ns.name.full_name();
            if output.namespace(&name).is_none() {
                output.namespaces.push(GeneratedNamespace {
                    name,
                    types: Vec::new(),
                });
            }
        }
        for (ns, decl) in self.model.ast().declarations() {
            let types = self.generate_declaration(&ns.name, decl).map_err(|err| {
                let span = decl.span();
                err.in_declaration(
                    format!("{} {}", decl.kind().keyword(), ns.name.qualify(decl.name())),
                    span.line as usize,
                    span.column as usize,
                )
            })?;
            for generated in types {
                let group = match output
                    .namespaces
                    .iter()
                    .position(|g| g.name == generated.namespace)
                {
                    Some(index) => index,
                    None => {
                        output.namespaces.push(GeneratedNamespace {
                            name: generated.namespace.clone(),
                            types: Vec::new(),
                        });
                        output.namespaces.len() - 1
                    }
                };
                output.namespaces[group].types.push(generated);
            }
        }
        Ok(output)
    }

    /// Generates the types for one declaration.
    ///
    /// Most declarations yield one type; an application service yields its
    /// interface followed by one type per command.
    ///
    /// # Errors
    /// Returns resolution failures and unsupported array shapes.
    pub fn generate_declaration(
        &self,
        namespace: &NamespaceName,
        decl: &TypeDecl,
    ) -> Result<Vec<GeneratedType>> {
        debug!(namespace = %namespace, name = decl.name(), kind = decl.kind().keyword(), "generating declaration");
        match decl {
            TypeDecl::ValueType(d) => self
                .value_semantics_type(namespace, &d.name, DeclKind::ValueType, &d.properties)
                .map(|t| vec![t]),
            TypeDecl::Command(d) => self.command(namespace, d).map(|t| vec![t]),
            TypeDecl::DomainEvent(d) => self
                .value_semantics_type(namespace, &d.name, DeclKind::DomainEvent, &d.properties)
                .map(|t| vec![t]),
            TypeDecl::Dto(d) => self
                .value_semantics_type(namespace, &d.name, DeclKind::Dto, &d.properties)
                .map(|t| vec![t]),
            TypeDecl::Enum(d) => Self::enumeration(namespace, d).map(|ty| vec![ty]),
            TypeDecl::ApplicationService(d) => self.application_service(namespace, d),
        }
    }

    fn command(&self, namespace: &NamespaceName, decl: &CommandDecl) -> Result<GeneratedType> {
        self.value_semantics_type(namespace, &decl.name, DeclKind::Command, &decl.properties)
    }

    fn convention_bases(&self, kind: DeclKind) -> Vec<BaseType> {
        let conventions = self.model.conventions();
        let names: &[TypeName] = match kind {
            DeclKind::Command => conventions.command_base_types(),
            DeclKind::DomainEvent => conventions.domain_event_base_types(),
            _ => &[],
        };
        names.iter().map(BaseType::from).collect()
    }

    fn resolve_properties(
        &self,
        namespace: &NamespaceName,
        properties: &[PropertyDecl],
    ) -> Result<Vec<ResolvedProperty>> {
        let config = self.model.config();
        properties
            .iter()
            .map(|property| {
                let name = property
                    .name
                    .clone()
                    .unwrap_or_else(|| config.default_property_name.clone());
                let written = property
                    .ty
                    .clone()
                    .unwrap_or_else(TypeRef::default_property_type);
                let resolved = self.model.resolve(&written, namespace)?;
                trace!(property = %name, ty = %resolved.ty, value = resolved.is_value_type, "resolved property");
                Ok(ResolvedProperty {
                    field: field_name(&name),
                    parameter: lower_camel(&name),
                    ty: resolved.ty,
                    is_value_type: resolved.is_value_type,
                    name,
                })
            })
            .collect()
    }

    fn value_semantics_type(
        &self,
        namespace: &NamespaceName,
        name: &str,
        kind: DeclKind,
        properties: &[PropertyDecl],
    ) -> Result<GeneratedType> {
        let full_name = namespace.qualify(name);
        let (type_namespace, simple_name) = split_qualified(&full_name);
        let shape = Shape::for_kind(kind);
        let properties = self.resolve_properties(namespace, properties)?;
        if let Some(property) = colliding_property(&properties) {
            return Err(Error::duplicate_member(&full_name, property));
        }
        let self_type = TypeRef::named(&full_name);

        let mut base_types = self.convention_bases(kind);
        base_types.push(BaseType::equatable(full_name.clone()));

        let mut annotations = Vec::new();
        if shape.is_serializable {
            annotations.push(Annotation::new(Annotation::DATA_CONTRACT));
        }

        let members = Self::value_semantics_members(&full_name, &self_type, shape, &properties)?;

        Ok(GeneratedType {
            kind: if shape.is_value_type {
                TypeKind::Struct
            } else {
                TypeKind::Class
            },
            name: simple_name,
            namespace: type_namespace,
            visibility: Visibility::Public,
            is_sealed: shape.is_sealed,
            is_partial: true,
            base_types,
            members,
            annotations,
        })
    }

    fn value_semantics_members(
        owner: &str,
        self_type: &TypeRef,
        shape: Shape,
        properties: &[ResolvedProperty],
    ) -> Result<Vec<Member>> {
        let equality_members: Vec<EqualityMember<'_>> =
            properties.iter().map(ResolvedProperty::as_member).collect();
        let bool_type = TypeRef::Simple(Primitive::Bool);
        let mut members = Vec::with_capacity(properties.len() * 2 + 6);

        // Backing storage
        members.extend(properties.iter().enumerate().map(|(index, p)| {
            let annotations = if shape.is_serializable {
                vec![Annotation::new(Annotation::DATA_MEMBER).with_arg("Order", (index + 1).to_string())]
            } else {
                Vec::new()
            };
            Member::Field(Field {
                name: p.field.clone(),
                ty: p.ty.clone(),
                visibility: Visibility::Private,
                is_readonly: true,
                annotations,
            })
        }));

        members.push(Member::Constructor(Constructor {
            visibility: Visibility::Public,
            params: properties
                .iter()
                .map(|p| Parameter::new(p.parameter.clone(), p.ty.clone()))
                .collect(),
            body: properties
                .iter()
                .map(|p| Stmt::Assign {
                    target: Expr::this_member(&p.field),
                    value: Expr::ident(&p.parameter),
                })
                .collect(),
        }));

        members.extend(properties.iter().map(|p| {
            Member::Property(Property {
                name: p.name.clone(),
                ty: p.ty.clone(),
                visibility: Visibility::Public,
                getter: Expr::this_member(&p.field),
            })
        }));

        for kind in [OperatorKind::Equality, OperatorKind::Inequality] {
            members.push(Member::Operator(Operator {
                kind,
                params: vec![
                    Parameter::new(LEFT, self_type.clone()),
                    Parameter::new(RIGHT, self_type.clone()),
                ],
                return_type: bool_type.clone(),
                body: operator_body(kind, shape.is_value_type, self_type),
            }));
        }

        members.push(Member::Method(Method {
            name: "Equals".to_string(),
            visibility: Visibility::Public,
            modifier: MethodModifier::None,
            params: vec![Parameter::new(OTHER, self_type.clone())],
            return_type: Some(bool_type.clone()),
            body: Some(typed_equals_body(owner, shape.is_value_type, &equality_members)?),
        }));

        members.push(Member::Method(Method {
            name: "Equals".to_string(),
            visibility: Visibility::Public,
            modifier: MethodModifier::Override,
            params: vec![Parameter::new(OBJ, TypeRef::named(OBJECT_TYPE))],
            return_type: Some(bool_type),
            body: Some(object_equals_body(self_type)),
        }));

        members.push(Member::Method(Method {
            name: "GetHashCode".to_string(),
            visibility: Visibility::Public,
            modifier: MethodModifier::Override,
            params: Vec::new(),
            return_type: Some(TypeRef::Simple(Primitive::Int)),
            body: Some(hash_code_body(&equality_members)),
        }));

        Ok(members)
    }

    fn enumeration(namespace: &NamespaceName, decl: &EnumDecl) -> Result<GeneratedType> {
        let full_name = namespace.qualify(&decl.name);
        let mut seen = HashSet::new();
        if let Some(value) = decl.values.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(Error::duplicate_member(&full_name, value));
        }
        let (type_namespace, simple_name) = split_qualified(&full_name);
        let members = decl
            .values
            .iter()
            .map(|value| {
                Member::EnumValue(EnumValue {
                    name: value.clone(),
                    annotations: vec![
                        Annotation::new(Annotation::ENUM_MEMBER).with_arg("Value", value.clone()),
                    ],
                })
            })
            .collect();
        Ok(GeneratedType {
            kind: TypeKind::Enum,
            annotations: vec![
                Annotation::new(Annotation::DATA_CONTRACT).with_arg("Name", simple_name.clone()),
            ],
            name: simple_name,
            namespace: type_namespace,
            visibility: Visibility::Public,
            is_sealed: false,
            is_partial: false,
            base_types: Vec::new(),
            members,
        })
    }

    fn application_service(
        &self,
        namespace: &NamespaceName,
        decl: &ApplicationServiceDecl,
    ) -> Result<Vec<GeneratedType>> {
        let config = self.model.config();
        let full_name = namespace.qualify(&decl.name);
        let (type_namespace, simple_name) = split_qualified(&full_name);

        let operations = decl
            .commands
            .iter()
            .map(|command| {
                Member::Method(Method {
                    name: config.service_operation_name.clone(),
                    visibility: Visibility::Public,
                    modifier: MethodModifier::Abstract,
                    params: vec![Parameter::new(
                        "command",
                        TypeRef::named(&namespace.qualify(&command.name)),
                    )],
                    return_type: None,
                    body: None,
                })
            })
            .collect();

        let interface = GeneratedType {
            kind: TypeKind::Interface,
            name: format!("{}{simple_name}", config.service_interface_prefix),
            namespace: type_namespace,
            visibility: Visibility::Public,
            is_sealed: false,
            is_partial: true,
            base_types: Vec::new(),
            members: operations,
            annotations: Vec::new(),
        };

        let mut generated = Vec::with_capacity(decl.commands.len() + 1);
        generated.push(interface);
        for command in &decl.commands {
            generated.push(self.command(namespace, command)?);
        }
        Ok(generated)
    }
}

/// Returns the comparison `Equals` uses for one property of `owner`.
///
/// Exposed for emitters that inline comparisons.
///
/// # Errors
/// Returns `UnsupportedArrayShape` for arrays other than one rank of one dimension.
pub fn comparison_for(owner: &str, property: &str, ty: &TypeRef, is_value_type: bool) -> Result<Expr> {
    let field = field_name(property);
    equality::property_comparison(
        owner,
        &EqualityMember {
            property,
            field: &field,
            ty,
            is_value_type,
        },
    )
}
