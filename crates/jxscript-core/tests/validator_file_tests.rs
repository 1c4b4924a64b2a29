//! Validator cases from `tests/validator/cases.test`.

use jxscript_testutil::validator::{parse_validator_tests, run_validator_tests};

const CASES: &str = include_str!("../../../tests/validator/cases.test");

#[test]
fn run_validator_case_file() {
    let cases = parse_validator_tests(CASES);
    assert!(cases.len() >= 30, "case file parsed to only {} cases", cases.len());

    let summary = run_validator_tests(&cases);
    println!("{}", summary);

    assert!(
        summary.all_passed(),
        "{} of {} validator cases failed",
        summary.failed + summary.errors,
        summary.total()
    );
}
