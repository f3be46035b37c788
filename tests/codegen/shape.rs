//! Integration tests for generated declaration shapes

use deftype_codegen::{
    Annotation, BaseType, Expr, Member, MethodModifier, OperatorKind, Stmt, TypeKind, compile,
};
use deftype_language::TypeRef;

const SOURCE: &str = "(defconventions :domainevents { inherit [App.IDomainEvent] } :commands { inherit [App.ICommand] })
(namespace App
  (defvaluetype EmployeeNumber int)
  (defdomainevent Hired ((EmployeeNumber) Number, string Name))
  (defenum Role [Engineer Manager])
  (defapplicationservice Staff (defcommand Hire (string Name, Role Role))))";

#[test]
fn full_compilation_shape() {
    let out = compile(SOURCE).unwrap();
    let ns = out.namespace("App").unwrap();
    let summary: Vec<(TypeKind, &str)> = ns.types.iter().map(|t| (t.kind, t.name.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (TypeKind::Struct, "EmployeeNumber"),
            (TypeKind::Class, "Hired"),
            (TypeKind::Enum, "Role"),
            (TypeKind::Interface, "IStaff"),
            (TypeKind::Class, "Hire"),
        ]
    );
}

#[test]
fn event_members() {
    let out = compile(SOURCE).unwrap();
    let hired = out.find_type("App.Hired").unwrap();
    assert!(hired.is_sealed);
    assert_eq!(
        hired.base_types,
        vec![BaseType::new("App.IDomainEvent"), BaseType::equatable("App.Hired")]
    );

    let fields: Vec<_> = hired.fields().map(|f| (f.name.as_str(), f.ty.clone())).collect();
    assert_eq!(
        fields,
        vec![
            ("_number", TypeRef::named("App.EmployeeNumber")),
            ("_name", TypeRef::String),
        ]
    );

    let ctor = hired.constructor().unwrap();
    assert_eq!(ctor.body.len(), 2);
    assert!(matches!(&ctor.body[0], Stmt::Assign { target, .. } if *target == Expr::this_member("_number")));

    let getter = hired.properties().find(|p| p.name == "Name").unwrap();
    assert_eq!(getter.getter, Expr::this_member("_name"));

    assert!(hired.operator(OperatorKind::Equality).is_some());
    assert!(hired.operator(OperatorKind::Inequality).is_some());
    let object_equals = hired
        .method_with_param("Equals", &TypeRef::named("System.Object"))
        .unwrap();
    assert_eq!(object_equals.modifier, MethodModifier::Override);
}

#[test]
fn serialization_tags() {
    let out = compile(SOURCE).unwrap();
    let hire = out.find_type("App.Hire").unwrap();
    assert!(hire.annotation(Annotation::DATA_CONTRACT).is_some());
    for (index, field) in hire.fields().enumerate() {
        let tag = &field.annotations[0];
        assert_eq!(tag.name, Annotation::DATA_MEMBER);
        assert_eq!(tag.arg("Order"), Some((index + 1).to_string().as_str()));
    }

    let number = out.find_type("App.EmployeeNumber").unwrap();
    assert!(number.annotations.is_empty());
    assert!(number.fields().all(|f| f.annotations.is_empty()));

    let role = out.find_type("App.Role").unwrap();
    let values: Vec<_> = role
        .members
        .iter()
        .filter_map(|m| match m {
            Member::EnumValue(v) => v.annotations[0].arg("Value"),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec!["Engineer", "Manager"]);
}

#[test]
fn service_interface_is_abstract() {
    let out = compile(SOURCE).unwrap();
    let staff = out.find_type("App.IStaff").unwrap();
    let execute: Vec<_> = staff.methods("Execute").collect();
    assert_eq!(execute.len(), 1);
    assert_eq!(execute[0].modifier, MethodModifier::Abstract);
    assert_eq!(execute[0].params[0].ty, TypeRef::named("App.Hire"));
    let hire = out.find_type("App.Hire").unwrap();
    assert!(!hire.is_sealed);
    assert_eq!(hire.base_types[0], BaseType::new("App.ICommand"));
}

#[test]
fn two_dimensional_array_fails_fast() {
    use deftype_codegen::comparison_for;
    use deftype_foundation::ErrorKind;
    use deftype_language::{Primitive, RankSpecifier};

    let ty = TypeRef::array_with_ranks(
        TypeRef::Simple(Primitive::Int),
        vec![RankSpecifier::new(2).unwrap()],
    );
    let err = comparison_for("App.Grid", "Cells", &ty, false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedArrayShape { .. }));
    assert!(err.to_string().contains("int[,]"));
}

#[test]
fn properties_sharing_a_backing_field_are_rejected() {
    use deftype_foundation::ErrorKind;

    let err = compile("(namespace App (defdto Badge (int Number, string number)))").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateMember { ref owner, ref member }
            if owner == "App.Badge" && member == "number"
    ));
    assert!(compile("(namespace App (defdto Badge (int Number, string Name)))").is_ok());
}
