//! Integration tests for the parser
//!
//! Tests parsing of deftype DSL to AST.

use deftype_language::{
    DeclKind, Primitive, TypeDecl, TypeName, TypeRef, parse, parse_declaration, parse_type_ref,
};

// =============================================================================
// Type References
// =============================================================================

#[test]
fn parse_simple_types() {
    assert_eq!(parse_type_ref("int").unwrap(), TypeRef::Simple(Primitive::Int));
    assert_eq!(parse_type_ref("System.Int32").unwrap(), TypeRef::Simple(Primitive::Int));
    assert_eq!(parse_type_ref("Guid").unwrap(), TypeRef::Simple(Primitive::Guid));
    assert_eq!(parse_type_ref("string").unwrap(), TypeRef::String);
}

#[test]
fn nullable_binds_before_simple() {
    assert_eq!(parse_type_ref("int?").unwrap(), TypeRef::Nullable(Primitive::Int));
    assert!(parse_type_ref("int??").is_err());
    assert!(parse_type_ref("Money?").is_err());
}

#[test]
fn parse_arrays() {
    assert_eq!(
        parse_type_ref("Billing.Money[]").unwrap(),
        TypeRef::array(TypeRef::named("Billing.Money"))
    );
    assert!(parse_type_ref("int[,]").is_err());
    assert!(parse_type_ref("int[][]").is_err());
}

#[test]
fn parenthesized_type() {
    assert_eq!(
        parse_type_ref("(EmployeeNumber)").unwrap(),
        TypeRef::named("EmployeeNumber")
    );
}

#[test]
fn reserved_words_are_not_types() {
    for word in ["namespace", "class", "defdto", "null"] {
        assert!(parse_type_ref(word).is_err(), "{word} accepted as a type");
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn value_type_forms() {
    let TypeDecl::ValueType(short) = parse_declaration("(defvaluetype Id)").unwrap() else {
        panic!("expected value type");
    };
    assert_eq!(short.properties.len(), 1);
    assert!(short.properties[0].name.is_none());
    assert!(short.properties[0].ty.is_none());

    let TypeDecl::ValueType(list) =
        parse_declaration("(defvaluetype Money (decimal Amount, string Currency))").unwrap()
    else {
        panic!("expected value type");
    };
    let names: Vec<_> = list.properties.iter().filter_map(|p| p.name.as_deref()).collect();
    assert_eq!(names, vec!["Amount", "Currency"]);
}

#[test]
fn parenthesized_property_type() {
    let TypeDecl::Dto(dto) = parse_declaration("(defdto Info ((EmployeeNumber) Number))").unwrap()
    else {
        panic!("expected dto");
    };
    assert_eq!(dto.properties[0].name.as_deref(), Some("Number"));
    assert_eq!(dto.properties[0].ty, Some(TypeRef::named("EmployeeNumber")));
}

#[test]
fn command_property_list_is_optional() {
    let TypeDecl::Command(bare) = parse_declaration("(defcommand Ping)").unwrap() else {
        panic!("expected command");
    };
    assert!(bare.properties.is_empty());
}

#[test]
fn service_requires_a_command() {
    let err = parse_declaration("(defapplicationservice Orders)").unwrap_err();
    assert!(err.is_parse_error());
    let TypeDecl::ApplicationService(service) =
        parse_declaration("(defapplicationservice Orders (defcommand Place))").unwrap()
    else {
        panic!("expected service");
    };
    assert_eq!(service.commands[0].name, "Place");
}

#[test]
fn enums() {
    let TypeDecl::Enum(e) = parse_declaration("(defenum Color [Red Green Blue])").unwrap() else {
        panic!("expected enum");
    };
    assert_eq!(e.values, vec!["Red", "Green", "Blue"]);
}

// =============================================================================
// Compilation Units
// =============================================================================

#[test]
fn mixed_namespace() {
    let ast = parse(
        "; billing types
         (namespace Billing
           (defvaluetype Money decimal)
           (defenum Currency [EUR USD])
           (defcommand Charge (Money Amount))
           (defdomainevent Charged (Money Amount))
           (defdto Receipt (Guid Id))
           (defapplicationservice Payments (defcommand Refund)))",
    )
    .unwrap();
    let kinds: Vec<_> = ast.declarations().map(|(_, d)| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            DeclKind::ValueType,
            DeclKind::Enum,
            DeclKind::Command,
            DeclKind::DomainEvent,
            DeclKind::Dto,
            DeclKind::ApplicationService,
        ]
    );
}

#[test]
fn conventions_groups() {
    let ast = parse(
        "(defconventions :commands { inherit [App.ICommand] } :domainevents { inherit [] })",
    )
    .unwrap();
    let conventions = ast.conventions.unwrap();
    assert_eq!(conventions.command_base_types(), &[TypeName::parse("App.ICommand")]);
    assert!(conventions.domain_event_base_types().is_empty());
    assert!(conventions.domain_events.is_some());
}

#[test]
fn conventions_only_at_root() {
    assert!(parse("(namespace A) (defconventions)").is_err());
    assert!(parse("(defconventions) (defconventions)").is_err());
}

#[test]
fn unbalanced_parenthesis_is_fatal() {
    let source = "(namespace Test (defvaluetype EmployeeNumber int)";
    let err = parse(source).unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.production(), Some("namespace"));
    assert_eq!(err.offset(), Some(source.len()));
}

#[test]
fn trailing_garbage_is_fatal() {
    let err = parse("(namespace A) extra").unwrap_err();
    assert_eq!(err.production(), Some("compilation unit"));
}

#[test]
fn errors_report_line_and_column() {
    let err = parse("(namespace Test\n  (defdto Info (string Name int)))").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("2:29"), "{message}");
}
