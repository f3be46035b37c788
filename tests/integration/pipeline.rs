//! End-to-end compilation from source text to declaration tree

use deftype::codegen::{Evaluator, TypeKind, Value};
use deftype::language::{BaseTypes, ConventionsDecl, TypeName};
use deftype::{Compiler, CompilerConfig, ErrorKind, compile};

#[test]
fn single_value_type_source() {
    let out = compile("(namespace Test (defvaluetype EmployeeNumber int))").unwrap();
    assert_eq!(out.namespaces.len(), 1);
    assert_eq!(out.namespaces[0].name, "Test");
    assert_eq!(out.namespaces[0].types.len(), 1);
    let ty = &out.namespaces[0].types[0];
    assert_eq!(ty.kind, TypeKind::Struct);
    assert_eq!(ty.name, "EmployeeNumber");
    assert_eq!(ty.properties().count(), 1);
}

#[test]
fn unbalanced_source_aborts() {
    let err = compile("(namespace Test (defvaluetype EmployeeNumber int)").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
}

#[test]
fn root_namespaces() {
    let out = compile("(namespace Billing.Core) (namespace Shipping) (namespace Billing.Api)").unwrap();
    assert_eq!(out.root_namespaces(), vec!["Billing", "Shipping"]);
}

#[test]
fn known_type_propagates_across_namespaces() {
    let out = compile(
        "(namespace Hr (defvaluetype EmployeeNumber int))
         (namespace Hr.Payroll (defdto Payslip (EmployeeNumber Employee, decimal Gross)))",
    )
    .unwrap();
    let payslip = out.find_type("Hr.Payroll.Payslip").unwrap();
    assert_eq!(
        payslip.fields().next().unwrap().ty.to_string(),
        "Hr.EmployeeNumber"
    );

    let ev = Evaluator::new(&out);
    let employee = ev.construct("Hr.EmployeeNumber", vec![Value::Int(5)]).unwrap();
    let slip = ev
        .construct("Hr.Payroll.Payslip", vec![employee, Value::Float(10.0)])
        .unwrap();
    // Gross is decimal, a value type, and hashes by bit pattern.
    let expected = 5i64.wrapping_add(i64::from_ne_bytes(10.0f64.to_bits().to_ne_bytes()));
    assert_eq!(ev.hash_code(&slip).unwrap(), expected);
}

#[test]
fn base_conventions_and_overrides() {
    let base = ConventionsDecl::new(
        BaseTypes::new(vec![TypeName::parse("Base.IEvent")]),
        BaseTypes::new(vec![TypeName::parse("Base.ICommand")]),
    );
    let compiler = Compiler::new().with_base_conventions(base);
    let out = compiler
        .compile(
            "(defconventions :commands { inherit [App.ICommand] })
             (namespace App (defcommand Go) (defdomainevent Went ()))",
        )
        .unwrap();
    let go = out.find_type("App.Go").unwrap();
    assert_eq!(go.base_types[0].name, "App.ICommand");
    assert_eq!(go.base_types.len(), 2);
    let went = out.find_type("App.Went").unwrap();
    assert_eq!(went.base_types[0].name, "Base.IEvent");
}

#[test]
fn strict_mode_and_duplicates() {
    let strict = Compiler::new().with_config(CompilerConfig::strict());
    let err = strict.compile("(namespace A (defdto D (Elsewhere E)))").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedType { .. }));

    let err = compile("(namespace A (defdto D ()) (defdto D ()))").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateType { .. }));

    let lenient = Compiler::new().with_config(CompilerConfig::lenient());
    let out = lenient.compile("(namespace A (defdto D ()) (defdto D ()))").unwrap();
    assert_eq!(out.namespaces[0].types.len(), 2);
}
