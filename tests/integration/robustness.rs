//! Property tests over the whole pipeline

use proptest::prelude::*;

proptest! {
    #[test]
    fn compile_never_panics(source in "[()\\[\\]{},?a-zA-Z. :;\n]{0,200}") {
        let _ = deftype::compile(&source);
    }

    #[test]
    fn every_declared_dto_is_generated(
        names in prop::collection::btree_set("[A-Z][a-z]{1,6}", 0..8)
    ) {
        let body: Vec<String> = names.iter().map(|n| format!("(defdto {n} (int Id))")).collect();
        let source = format!("(namespace P {})", body.join(" "));
        let out = deftype::compile(&source).unwrap();
        let generated: Vec<&str> = out.types().map(|t| t.name.as_str()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(generated, expected);
    }
}
