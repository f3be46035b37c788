//! Normalization of implicit properties.
//!
//! The shorthand value-type form `(defvaluetype Id)` leaves the property
//! name and type open. Before generation every absent name becomes the
//! configured default name and every absent type becomes `int`.

use tracing::trace;

use crate::ast::{AbstractSyntaxTree, PropertyDecl, TypeDecl};
use crate::types::TypeRef;

/// Fills in absent property names and types, returning a new tree.
///
/// Idempotent: applying it to its own output changes nothing.
#[must_use]
pub fn apply_defaults(ast: &AbstractSyntaxTree, property_name: &str) -> AbstractSyntaxTree {
    let mut result = ast.clone();
    let mut filled = 0usize;

    for ns in &mut result.namespaces {
        for decl in &mut ns.declarations {
            filled += fill_declaration(decl, property_name);
        }
    }

    if filled > 0 {
        trace!(filled, property_name, "applied property defaults");
    }
    result
}

fn fill_declaration(decl: &mut TypeDecl, property_name: &str) -> usize {
    match decl {
        TypeDecl::ValueType(d) => fill_properties(&mut d.properties, property_name),
        TypeDecl::Command(d) => fill_properties(&mut d.properties, property_name),
        TypeDecl::DomainEvent(d) => fill_properties(&mut d.properties, property_name),
        TypeDecl::Dto(d) => fill_properties(&mut d.properties, property_name),
        TypeDecl::ApplicationService(d) => d
            .commands
            .iter_mut()
            .map(|c| fill_properties(&mut c.properties, property_name))
            .sum(),
        TypeDecl::Enum(_) => 0,
    }
}

fn fill_properties(properties: &mut [PropertyDecl], property_name: &str) -> usize {
    let mut filled = 0;
    for property in properties {
        if property.name.is_none() {
            property.name = Some(property_name.to_string());
            filled += 1;
        }
        if property.ty.is_none() {
            property.ty = Some(TypeRef::default_property_type());
            filled += 1;
        }
    }
    filled
}
