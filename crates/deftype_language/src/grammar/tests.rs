use super::*;
use crate::ast::{DeclKind, Namespace};
use crate::names::TypeName;
use crate::types::{Primitive, RankSpecifier};

fn parse_test(source: &str) -> AbstractSyntaxTree {
    parse(source).expect("parse failed")
}

fn parse_decl_test(source: &str) -> TypeDecl {
    parse_declaration(source).expect("parse failed")
}

fn ty(source: &str) -> TypeRef {
    parse_type_ref(source).expect("parse failed")
}

fn only_namespace(ast: &AbstractSyntaxTree) -> &Namespace {
    assert_eq!(ast.namespaces.len(), 1);
    &ast.namespaces[0]
}

fn property_types(decl: &TypeDecl) -> Vec<Option<TypeRef>> {
    decl.properties().iter().map(|p| p.ty.clone()).collect()
}

fn property_names(decl: &TypeDecl) -> Vec<Option<String>> {
    decl.properties().iter().map(|p| p.name.clone()).collect()
}

fn production_of(source: &str) -> String {
    let err = parse(source).expect_err("parse should fail");
    assert!(err.is_parse_error());
    err.production().expect("parse error has a production").to_string()
}

// =========================================================================
// Type references
// =========================================================================

#[test]
fn parse_primitives() {
    assert_eq!(ty("int"), TypeRef::Simple(Primitive::Int));
    assert_eq!(ty("Int32"), TypeRef::Simple(Primitive::Int));
    assert_eq!(ty("System.Decimal"), TypeRef::Simple(Primitive::Decimal));
    assert_eq!(ty("Guid"), TypeRef::Simple(Primitive::Guid));
}

#[test]
fn parse_nullable_before_simple() {
    assert_eq!(ty("int?"), TypeRef::Nullable(Primitive::Int));
    assert_eq!(ty("DateTime?"), TypeRef::Nullable(Primitive::DateTime));
}

#[test]
fn parse_string_type() {
    assert_eq!(ty("string"), TypeRef::String);
    assert_eq!(ty("System.String"), TypeRef::String);
}

#[test]
fn parse_named_fallback() {
    assert_eq!(ty("Money"), TypeRef::named("Money"));
    assert_eq!(
        ty("Billing.Money"),
        TypeRef::Named(TypeName::parse("Billing.Money"))
    );
}

#[test]
fn parse_arrays() {
    assert_eq!(ty("int[]"), TypeRef::array(TypeRef::Simple(Primitive::Int)));
    assert_eq!(ty("string []"), TypeRef::array(TypeRef::String));
    assert_eq!(ty("Money[]"), TypeRef::array(TypeRef::named("Money")));
    assert_eq!(
        ty("int?[]"),
        TypeRef::array(TypeRef::Nullable(Primitive::Int))
    );
    match ty("int[]") {
        TypeRef::Array { ranks, .. } => assert_eq!(ranks, vec![RankSpecifier::SINGLE]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn parse_parenthesized_type() {
    assert_eq!(ty("(EmployeeNumber)"), TypeRef::named("EmployeeNumber"));
    assert_eq!(ty("((int?))"), TypeRef::Nullable(Primitive::Int));
    assert_eq!(ty("(int)[]"), TypeRef::array(TypeRef::Simple(Primitive::Int)));
}

fn wrapped(inner: &str, depth: usize) -> String {
    format!("{}{inner}{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn deeply_parenthesized_property_type() {
    let source = format!("(namespace T (defdto D ({} X)))", wrapped("int", 100_000));
    let ast = parse_test(&source);
    let (_, decl) = ast.declarations().next().expect("declaration");
    assert_eq!(
        property_types(decl),
        vec![Some(TypeRef::Simple(Primitive::Int))]
    );
}

#[test]
fn deeply_parenthesized_shorthand_type() {
    let source = format!("(namespace T (defvaluetype Id {}))", wrapped("Guid", 100_000));
    let ast = parse_test(&source);
    let (_, decl) = ast.declarations().next().expect("declaration");
    assert_eq!(
        property_types(decl),
        vec![Some(TypeRef::Simple(Primitive::Guid))]
    );
}

#[test]
fn deeply_parenthesized_type_must_balance() {
    let unclosed = format!("{}int{}", "(".repeat(100_000), ")".repeat(99_999));
    let source = format!("(namespace T (defdto D ({unclosed} X)))");
    assert!(parse(&source).is_err());
    assert_eq!(
        parse_type_ref(&unclosed).expect_err("unbalanced").production(),
        Some("type reference")
    );
}

#[test]
fn reject_unsupported_array_shapes() {
    for source in ["int[,]", "int[][]", "(int[])[]", "int[", "int[x]"] {
        let err = parse_type_ref(source).expect_err(source);
        assert_eq!(err.production(), Some("array rank specifier"), "{source}");
    }
}

#[test]
fn reject_misplaced_nullable_markers() {
    for source in ["string?", "Money?", "int??", "int[]?"] {
        assert!(parse_type_ref(source).is_err(), "{source} should fail");
    }
}

#[test]
fn reject_reserved_words_as_types() {
    for word in ["class", "namespace", "defdto", "null", "object"] {
        let err = parse_type_ref(word).expect_err(word);
        assert_eq!(err.production(), Some("type reference"));
    }
}

// =========================================================================
// Declarations
// =========================================================================

#[test]
fn parse_shorthand_value_type() {
    let decl = parse_decl_test("(defvaluetype EmployeeNumber int)");
    assert_eq!(decl.kind(), DeclKind::ValueType);
    assert_eq!(decl.name(), "EmployeeNumber");
    assert_eq!(property_names(&decl), vec![None]);
    assert_eq!(
        property_types(&decl),
        vec![Some(TypeRef::Simple(Primitive::Int))]
    );
}

#[test]
fn parse_shorthand_value_type_without_type() {
    let decl = parse_decl_test("(defvaluetype Id)");
    assert_eq!(property_names(&decl), vec![None]);
    assert_eq!(property_types(&decl), vec![None]);
}

#[test]
fn parse_shorthand_value_type_wrapped_type() {
    let decl = parse_decl_test("(defvaluetype Amount (Billing.Money))");
    assert_eq!(property_names(&decl), vec![None]);
    assert_eq!(
        property_types(&decl),
        vec![Some(TypeRef::named("Billing.Money"))]
    );
}

#[test]
fn parse_value_type_property_list() {
    let decl = parse_decl_test("(defvaluetype Money (decimal Amount, string Currency))");
    assert_eq!(
        property_names(&decl),
        vec![Some("Amount".to_string()), Some("Currency".to_string())]
    );
    assert_eq!(
        property_types(&decl),
        vec![
            Some(TypeRef::Simple(Primitive::Decimal)),
            Some(TypeRef::String)
        ]
    );
}

#[test]
fn parse_value_type_parenthesized_property_type() {
    let decl = parse_decl_test("(defvaluetype Badge ((EmployeeNumber) Number))");
    assert_eq!(property_names(&decl), vec![Some("Number".to_string())]);
    assert_eq!(
        property_types(&decl),
        vec![Some(TypeRef::named("EmployeeNumber"))]
    );
}

#[test]
fn parse_empty_property_list() {
    let decl = parse_decl_test("(defvaluetype Unit ())");
    assert!(decl.properties().is_empty());

    let decl = parse_decl_test("(defdto Nothing ())");
    assert!(decl.properties().is_empty());
}

#[test]
fn parse_command_with_and_without_properties() {
    let decl = parse_decl_test("(defcommand Ping)");
    assert_eq!(decl.kind(), DeclKind::Command);
    assert!(decl.properties().is_empty());

    let decl = parse_decl_test("(defcommand PlaceOrder (Guid OrderId, int[] Lines))");
    assert_eq!(decl.properties().len(), 2);
    assert_eq!(
        decl.properties()[1].ty,
        Some(TypeRef::array(TypeRef::Simple(Primitive::Int)))
    );
}

#[test]
fn parse_domain_event_and_dto() {
    let decl = parse_decl_test("(defdomainevent OrderPlaced (Guid OrderId, DateTime? At))");
    assert_eq!(decl.kind(), DeclKind::DomainEvent);
    assert_eq!(
        decl.properties()[1].ty,
        Some(TypeRef::Nullable(Primitive::DateTime))
    );

    let decl = parse_decl_test("(defdto CustomerInfo (string Name, Address Home))");
    assert_eq!(decl.kind(), DeclKind::Dto);
    assert_eq!(decl.properties()[1].ty, Some(TypeRef::named("Address")));
}

#[test]
fn parse_enum_values() {
    let decl = parse_decl_test("(defenum Color [Red Green\n Blue])");
    let TypeDecl::Enum(e) = decl else {
        panic!("expected enum");
    };
    assert_eq!(e.values, vec!["Red", "Green", "Blue"]);

    let TypeDecl::Enum(empty) = parse_decl_test("(defenum Nothing [])") else {
        panic!("expected enum");
    };
    assert!(empty.values.is_empty());
}

#[test]
fn parse_application_service() {
    let decl = parse_decl_test(
        "(defapplicationservice Orders
           (defcommand PlaceOrder (Guid Id))
           (defcommand CancelOrder))",
    );
    let TypeDecl::ApplicationService(service) = decl else {
        panic!("expected service");
    };
    assert_eq!(service.name, "Orders");
    let names: Vec<_> = service.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["PlaceOrder", "CancelOrder"]);
    assert!(service.commands[1].properties.is_empty());
}

#[test]
fn reject_empty_application_service() {
    let err = parse_declaration("(defapplicationservice Orders)").expect_err("empty service");
    assert_eq!(err.production(), Some("application service declaration"));
}

#[test]
fn reject_non_command_in_service() {
    let err = parse_declaration("(defapplicationservice Orders (defdto X ()))")
        .expect_err("dto in service");
    assert_eq!(err.production(), Some("command declaration"));
}

#[test]
fn declaration_symbols_are_case_sensitive() {
    let err = parse_declaration("(DefDto Info ())").expect_err("wrong case");
    assert_eq!(err.production(), Some("type declaration"));
}

#[test]
fn reject_property_without_name() {
    let err = parse_declaration("(defdto Info (string))").expect_err("missing name");
    assert_eq!(err.production(), Some("property list"));
}

#[test]
fn reject_qualified_property_name() {
    assert!(parse_declaration("(defdto Info (string A.B))").is_err());
}

#[test]
fn reject_missing_comma() {
    let err = parse_declaration("(defdto Info (string A int B))").expect_err("no comma");
    assert_eq!(err.production(), Some("property list"));
}

#[test]
fn declaration_span_covers_form() {
    let source = "(defdto Info (string Name))";
    let decl = parse_decl_test(source);
    assert_eq!(decl.span().start, 0);
    assert_eq!(decl.span().end, source.len());
}

// =========================================================================
// Compilation units
// =========================================================================

#[test]
fn parse_empty_source() {
    let ast = parse_test("");
    assert!(ast.conventions.is_none());
    assert!(ast.namespaces.is_empty());

    let ast = parse_test("  ; nothing here\n");
    assert!(ast.namespaces.is_empty());
}

#[test]
fn parse_namespace_with_mixed_declarations() {
    let ast = parse_test(
        "(namespace Test
           (defvaluetype EmployeeNumber int)
           (defdto Info (string Name))
           (defenum Color [Red])
           (defcommand Ping))",
    );
    let ns = only_namespace(&ast);
    assert_eq!(ns.name.full_name(), "Test");
    let kinds: Vec<_> = ns.declarations.iter().map(TypeDecl::kind).collect();
    assert_eq!(
        kinds,
        vec![
            DeclKind::ValueType,
            DeclKind::Dto,
            DeclKind::Enum,
            DeclKind::Command
        ]
    );
}

#[test]
fn parse_multiple_namespaces() {
    let ast = parse_test("(namespace A.B) (namespace C (defdto X ()))");
    assert_eq!(ast.namespaces.len(), 2);
    assert_eq!(ast.namespaces[0].name.full_name(), "A.B");
    assert!(ast.namespaces[0].declarations.is_empty());
    assert_eq!(ast.namespace("C").map(|ns| ns.declarations.len()), Some(1));
}

#[test]
fn parse_conventions() {
    let ast = parse_test(
        "(defconventions
           :domainevents { inherit [App.IDomainEvent] }
           :commands { inherit [App.ICommand Other.IAudited] })
         (namespace Test)",
    );
    let conventions = ast.conventions.expect("conventions");
    assert_eq!(
        conventions.domain_event_base_types(),
        &[TypeName::parse("App.IDomainEvent")]
    );
    assert_eq!(
        conventions.command_base_types(),
        &[
            TypeName::parse("App.ICommand"),
            TypeName::parse("Other.IAudited")
        ]
    );
}

#[test]
fn parse_conventions_single_group() {
    let ast = parse_test("(defconventions :domainevents { inherit [] })");
    let conventions = ast.conventions.expect("conventions");
    assert_eq!(conventions.domain_events.map(|b| b.types.len()), Some(0));
    assert!(conventions.commands.is_none());
}

#[test]
fn reject_duplicate_convention_group() {
    let source = "(defconventions :commands { inherit [] } :commands { inherit [] })";
    assert_eq!(production_of(source), "convention group");
}

#[test]
fn reject_unknown_convention_group() {
    assert_eq!(
        production_of("(defconventions :queries { inherit [] })"),
        "convention group"
    );
}

#[test]
fn reject_conventions_after_namespace() {
    let source = "(namespace A) (defconventions :commands { inherit [] })";
    assert_eq!(production_of(source), "compilation unit");
}

#[test]
fn comments_are_ignored() {
    let ast = parse_test(
        "; leading comment
         (namespace Test ; trailing comment
           ; between declarations
           (defdto Info (string Name ; inside a list
           )))",
    );
    assert_eq!(only_namespace(&ast).declarations.len(), 1);
}

#[test]
fn reject_trailing_garbage() {
    assert_eq!(production_of("(namespace A) extra"), "compilation unit");
    assert_eq!(production_of("(namespace A) )"), "compilation unit");
}

#[test]
fn unbalanced_parenthesis_reports_position() {
    let source = "(namespace Test (defvaluetype EmployeeNumber int)";
    let err = parse(source).expect_err("unbalanced");
    assert_eq!(err.production(), Some("namespace"));
    assert_eq!(err.offset(), Some(source.len()));
}

#[test]
fn error_reports_line_and_column() {
    let source = "(namespace Test\n  (defdto Info (string Name int)))";
    let err = parse(source).expect_err("missing comma");
    match err.kind {
        ErrorKind::ParseError {
            line,
            column,
            ref context,
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(column, 29);
            assert_eq!(context, "  (defdto Info (string Name int)))");
        }
        ref other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn lexer_errors_surface_as_parse_errors() {
    let err = parse("(namespace Foo..Bar)").expect_err("malformed name");
    assert!(err.to_string().contains("malformed qualified name"));
}

#[test]
fn reject_reserved_declaration_names() {
    assert_eq!(production_of("(namespace A (defdto class ()))"), "dto declaration");
    assert_eq!(production_of("(namespace struct)"), "namespace");
}
