//! Integration tests for the pretty-printer

use deftype_language::{parse, pretty::pretty_print};

const SOURCE: &str = "(defconventions :commands { inherit [App.ICommand] })
(namespace Billing
  (defvaluetype Money (decimal Amount, string Currency))
  (defenum Currency [EUR USD])
  (defdto Receipt (Guid Id, Money[] Lines, int? Count))
  (defapplicationservice Payments (defcommand Refund (Guid Id))))";

#[test]
fn printed_source_reparses() {
    let ast = parse(SOURCE).unwrap();
    let printed = pretty_print(&ast);
    let reparsed = parse(&printed).unwrap();
    assert_eq!(pretty_print(&reparsed), printed);
    assert_eq!(reparsed.namespaces.len(), ast.namespaces.len());
    assert_eq!(
        reparsed.declarations().count(),
        ast.declarations().count()
    );
}

#[test]
fn printing_is_a_fixed_point() {
    let once = pretty_print(&parse(SOURCE).unwrap());
    let twice = pretty_print(&parse(&once).unwrap());
    assert_eq!(once, twice);
}
