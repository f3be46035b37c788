//! Integration tests for the known-type harvester

use deftype_foundation::{CompilerConfig, ErrorKind};
use deftype_language::{ConventionsDecl, parse};
use deftype_semantic::{KnownType, KnownTypeTable, SemanticModel, harvest_known_types};

#[test]
fn employee_number_is_a_value_type() {
    let ast = parse(
        "(namespace Test (defvaluetype EmployeeNumber int) (defdto Info ((EmployeeNumber) Number)))",
    )
    .unwrap();
    let known = harvest_known_types(&ast);
    assert_eq!(
        known,
        vec![
            KnownType::new("Test.EmployeeNumber", true),
            KnownType::new("Test.Info", false),
        ]
    );
}

#[test]
fn services_and_their_commands_are_references() {
    let ast = parse("(namespace A (defapplicationservice S (defcommand C)) (defenum E [X]))").unwrap();
    let table = KnownTypeTable::from_known_types(&harvest_known_types(&ast), false).unwrap();
    assert!(!table.get("A.S").unwrap().is_value_type);
    assert!(!table.get("A.C").unwrap().is_value_type);
    assert!(table.get("A.E").unwrap().is_value_type);
}

#[test]
fn duplicates_across_namespaces_blocks() {
    let ast = parse("(namespace A (defdto X ())) (namespace A (defcommand X))").unwrap();
    let strict = SemanticModel::new(&ast, &ConventionsDecl::default(), CompilerConfig::default());
    let err = strict.known_types().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateType { ref name } if name == "A.X"));

    let lenient = SemanticModel::new(
        &ast,
        &ConventionsDecl::default(),
        CompilerConfig::default().with_allow_duplicate_types(true),
    );
    assert_eq!(lenient.known_types().unwrap().len(), 1);
}
