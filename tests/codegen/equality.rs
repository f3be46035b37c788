//! Integration tests for generated equality behavior

use deftype_codegen::{CompilationOutput, Evaluator, Value, compile};

fn output() -> CompilationOutput {
    compile(
        "(namespace Test
           (defvaluetype EmployeeNumber int)
           (defdto Info ((EmployeeNumber) Number, string Name))
           (defdto Roster (int[] Ids)))",
    )
    .unwrap()
}

fn info(ev: &Evaluator<'_>, number: i64, name: &str) -> Value {
    let number = ev.construct("Test.EmployeeNumber", vec![Value::Int(number)]).unwrap();
    ev.construct("Test.Info", vec![number, Value::from(name)]).unwrap()
}

fn roster(ev: &Evaluator<'_>, ids: Option<&[i64]>) -> Value {
    let ids = ids.map_or(Value::Null, |ids| Value::array(ids.iter().copied().map(Value::Int)));
    ev.construct("Test.Roster", vec![ids]).unwrap()
}

#[test]
fn reflexive_symmetric_transitive() {
    let out = output();
    let ev = Evaluator::new(&out);
    let (a, b, c) = (info(&ev, 1, "Ada"), info(&ev, 1, "Ada"), info(&ev, 1, "Ada"));
    assert!(ev.equals_typed(&a, &a).unwrap());
    assert!(ev.equals_typed(&a, &b).unwrap() && ev.equals_typed(&b, &a).unwrap());
    assert!(ev.equals_typed(&b, &c).unwrap() && ev.equals_typed(&a, &c).unwrap());
    assert_eq!(ev.hash_code(&a).unwrap(), ev.hash_code(&b).unwrap());
}

#[test]
fn one_property_difference() {
    let out = output();
    let ev = Evaluator::new(&out);
    let a = info(&ev, 1, "Ada");
    assert!(!ev.equals_typed(&a, &info(&ev, 2, "Ada")).unwrap());
    assert!(!ev.equals_typed(&a, &info(&ev, 1, "Bob")).unwrap());
}

#[test]
fn reference_null_guard() {
    let out = output();
    let ev = Evaluator::new(&out);
    let a = info(&ev, 1, "Ada");
    assert!(ev.op_equality("Test.Info", &Value::Null, &Value::Null).unwrap());
    assert!(!ev.op_equality("Test.Info", &Value::Null, &a).unwrap());
    assert!(!ev.op_equality("Test.Info", &a, &Value::Null).unwrap());
    assert!(ev.op_inequality("Test.Info", &a, &Value::Null).unwrap());
}

#[test]
fn value_operators_never_check_null() {
    let out = output();
    let ev = Evaluator::new(&out);
    let a = ev.construct("Test.EmployeeNumber", vec![Value::Int(3)]).unwrap();
    let b = ev.construct("Test.EmployeeNumber", vec![Value::Int(3)]).unwrap();
    assert!(ev.op_equality("Test.EmployeeNumber", &a, &b).unwrap());
    // Value-type operators delegate straight to Equals, which fails on a null receiver.
    assert!(ev.op_equality("Test.EmployeeNumber", &Value::Null, &b).is_err());
}

#[test]
fn array_boundary() {
    let out = output();
    let ev = Evaluator::new(&out);
    let base = roster(&ev, Some(&[1, 2, 3]));
    assert!(ev.equals_typed(&base, &roster(&ev, Some(&[1, 2, 3]))).unwrap());
    assert!(!ev.equals_typed(&base, &roster(&ev, Some(&[1, 2]))).unwrap());
    assert!(!ev.equals_typed(&base, &roster(&ev, Some(&[1, 2, 4]))).unwrap());
    assert!(!ev.equals_typed(&base, &roster(&ev, None)).unwrap());
    assert!(!ev.equals_typed(&roster(&ev, None), &base).unwrap());
    assert!(ev.equals_typed(&roster(&ev, None), &roster(&ev, None)).unwrap());
}

#[test]
fn arrays_do_not_affect_hash() {
    let out = output();
    let ev = Evaluator::new(&out);
    let a = roster(&ev, Some(&[1]));
    let b = roster(&ev, Some(&[9, 9]));
    assert_eq!(ev.hash_code(&a).unwrap(), 0);
    assert_eq!(ev.hash_code(&a).unwrap(), ev.hash_code(&b).unwrap());
}
