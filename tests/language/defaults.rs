//! Integration tests for shorthand defaulting

use deftype_language::{Primitive, TypeDecl, TypeRef, apply_defaults, parse};

fn only_property(source: &str) -> (Option<String>, Option<TypeRef>) {
    let ast = apply_defaults(&parse(source).unwrap(), "Value");
    let (_, decl) = ast.declarations().next().unwrap();
    let TypeDecl::ValueType(vt) = decl else {
        panic!("expected value type");
    };
    assert_eq!(vt.properties.len(), 1);
    (vt.properties[0].name.clone(), vt.properties[0].ty.clone())
}

#[test]
fn bare_shorthand_gets_name_and_type() {
    let (name, ty) = only_property("(namespace T (defvaluetype X))");
    assert_eq!(name.as_deref(), Some("Value"));
    assert_eq!(ty, Some(TypeRef::Simple(Primitive::Int)));
}

#[test]
fn typed_shorthand_keeps_type() {
    let (name, ty) = only_property("(namespace T (defvaluetype X Decimal))");
    assert_eq!(name.as_deref(), Some("Value"));
    assert_eq!(ty, Some(TypeRef::Simple(Primitive::Decimal)));
}

#[test]
fn defaults_are_idempotent() {
    let once = apply_defaults(&parse("(namespace T (defvaluetype X Decimal) (defvaluetype Y))").unwrap(), "Value");
    let twice = apply_defaults(&once, "Value");
    assert_eq!(once, twice);
}

#[test]
fn explicit_properties_untouched() {
    let ast = parse("(namespace T (defdto D (int A)))").unwrap();
    assert_eq!(apply_defaults(&ast, "Value"), ast);
}
