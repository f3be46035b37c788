//! Integration tests for conventions resolution

use std::borrow::Cow;

use deftype_language::{BaseTypes, ConventionsDecl, TypeName, parse};
use deftype_semantic::resolve_conventions;

#[test]
fn override_replaces_wholesale() {
    let base = ConventionsDecl::new(BaseTypes::default(), BaseTypes::default());
    let ast = parse("(defconventions :commands { inherit [App.ICommand] })").unwrap();
    let resolved = resolve_conventions(&base, &ast);
    assert_eq!(resolved.command_base_types(), &[TypeName::parse("App.ICommand")]);
}

#[test]
fn absent_override_is_identity() {
    let base = ConventionsDecl::new(
        BaseTypes::new(vec![TypeName::parse("Base.IEvent")]),
        BaseTypes::default(),
    );
    let ast = parse("(namespace A)").unwrap();
    let resolved = resolve_conventions(&base, &ast);
    let Cow::Borrowed(same) = resolved else {
        panic!("expected the base to be returned");
    };
    assert!(std::ptr::eq(same, &base));
}

#[test]
fn apply_overrides_from_none_is_identity() {
    let base = ConventionsDecl::default();
    assert!(matches!(base.apply_overrides_from(None), Cow::Borrowed(b) if std::ptr::eq(b, &base)));
}

#[test]
fn omitted_group_is_kept() {
    let base = ConventionsDecl::new(
        BaseTypes::new(vec![TypeName::parse("Base.IEvent")]),
        BaseTypes::new(vec![TypeName::parse("Base.ICommand")]),
    );
    let ast = parse("(defconventions :commands { inherit [App.ICommand App.IAudited] })").unwrap();
    let resolved = resolve_conventions(&base, &ast);
    assert_eq!(resolved.domain_event_base_types(), &[TypeName::parse("Base.IEvent")]);
    assert_eq!(
        resolved.command_base_types(),
        &[TypeName::parse("App.ICommand"), TypeName::parse("App.IAudited")]
    );
}
