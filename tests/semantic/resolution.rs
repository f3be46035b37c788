//! Integration tests for type resolution

use deftype_foundation::{CompilerConfig, ErrorKind};
use deftype_language::{ConventionsDecl, NamespaceName, TypeRef, parse};
use deftype_semantic::{Resolution, SemanticModel};

const SOURCE: &str = "(namespace App (defvaluetype Money decimal))
                      (namespace App.Billing (defdto Invoice (Money Total, Uri Link, Mystery M)))";

#[test]
fn lenient_resolution() {
    let ast = parse(SOURCE).unwrap();
    let model = SemanticModel::new(&ast, &ConventionsDecl::default(), CompilerConfig::default());
    let billing = NamespaceName::parse("App.Billing");

    let money = model.resolve(&TypeRef::named("Money"), &billing).unwrap();
    assert_eq!(money.resolution, Resolution::Declared);
    assert_eq!(money.ty, TypeRef::named("App.Money"));
    assert!(money.is_value_type);

    let uri = model.resolve(&TypeRef::named("Uri"), &billing).unwrap();
    assert_eq!(uri.resolution, Resolution::System);

    let mystery = model.resolve(&TypeRef::named("Mystery"), &billing).unwrap();
    assert_eq!(mystery.resolution, Resolution::Assumed);
    assert!(!mystery.is_value_type);

    assert!(model.validate().is_ok());
}

#[test]
fn strict_resolution() {
    let ast = parse(SOURCE).unwrap();
    let model = SemanticModel::new(&ast, &ConventionsDecl::default(), CompilerConfig::strict());
    let err = model.validate().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnresolvedType { ref name, ref namespace } if name == "Mystery" && namespace == "App.Billing"
    ));
}
