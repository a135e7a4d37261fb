//! Delayed assertions through the public macros and report options.

use std::thread;
use vigilance::expect::{
    clear_failures, pending_failures, report_failures, ExpectationLog, ReportOptions,
};
use vigilance::statistics::{within_n_absolute_deviations, within_n_standard_deviations};
use vigilance::{expect, expect_in};

fn check_list(items: &[i64]) -> u32 {
    let line = line!() + 1;
    expect!(
        (items.len() <= 10, "List should not be bigger than length 10"),
        (!items.contains(&0), "List should not contain zero"),
    );
    line
}

#[test]
fn test_pairs_report_exact_text() {
    check_list(&[1, 2, 3]);
    assert_eq!(
        report_failures(ReportOptions::quiet().with_clear(true)).unwrap(),
        ""
    );

    let line = check_list(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let report = report_failures(ReportOptions::quiet().with_clear(true)).unwrap();
    assert_eq!(
        report,
        format!(
            "\nFailed Expectations: 2\n\n\
             1: File expect_integration.rs, line {line}, in check_list()\n\
             \x20   \"items.len() <= 10\" is not True\n\
             \x20       -- List should not be bigger than length 10\n\n\
             2: File expect_integration.rs, line {line}, in check_list()\n\
             \x20   \"!items.contains(&0)\" is not True\n\
             \x20       -- List should not contain zero\n\n"
        )
    );
    assert!(pending_failures().is_empty());
}

#[test]
fn test_plain_expressions_have_no_message_line() {
    let n = 11;
    let line = line!() + 1;
    expect!(n <= 10);
    let report = report_failures(ReportOptions::quiet().with_clear(true)).unwrap();
    assert_eq!(
        report,
        format!(
            "\nFailed Expectations: 1\n\n1: File expect_integration.rs, line {line}, in test_plain_expressions_have_no_message_line()\n    \"n <= 10\" is not True\n\n"
        )
    );
}

#[test]
fn test_non_clearing_reports_are_identical_and_accumulate() {
    expect!((1 == 2, "must be equal"));
    let first = report_failures(ReportOptions::quiet()).unwrap();
    let second = report_failures(ReportOptions::quiet()).unwrap();
    assert_eq!(first, second);

    expect!(2 > 3);
    let third = report_failures(ReportOptions::quiet()).unwrap();
    assert!(third.starts_with("\nFailed Expectations: 2\n\n"));
    assert!(third.contains("2: File expect_integration.rs"));
    clear_failures();
}

#[test]
fn test_strict_mode_returns_error_with_report() {
    let mpg = [21.0, 22.8, 21.4, 18.7, 999.0];
    expect!(
        (within_n_standard_deviations(4.0, &mpg), "mpg within 4 SDs"),
        (within_n_absolute_deviations(1.0, &mpg), "mpg within 1 MAD"),
    );

    let err = report_failures(ReportOptions::strict()).unwrap_err();
    assert_eq!(err.count(), 1);
    let expected = "\"within_n_absolute_deviations(1.0, &mpg)\" is not True\n        -- mpg within 1 MAD\n";
    assert!(err.to_string().contains(expected));
    assert!(pending_failures().is_empty());
}

#[test]
fn test_strict_mode_converts_into_crate_error() {
    fn run() -> vigilance::error::Result<()> {
        expect!(false);
        report_failures(ReportOptions::strict())?;
        Ok(())
    }
    let err = run().unwrap_err();
    assert!(err.to_string().starts_with("\nFailed Expectations: 1\n\n1: File"));
}

#[test]
fn test_threads_do_not_share_default_log() {
    expect!(false);
    let other = thread::spawn(|| {
        expect!(false, false);
        pending_failures().len()
    })
    .join()
    .unwrap();

    assert_eq!(other, 2);
    assert_eq!(pending_failures().len(), 1);
    clear_failures();
}

#[test]
fn test_explicit_logs_are_independent() {
    let mut first = ExpectationLog::new();
    let mut second = ExpectationLog::new();

    expect_in!(first; 1 > 2, 2 > 1);
    expect_in!(second; (3 > 4, "three is not above four"));

    assert_eq!(first.len(), 1);
    assert_eq!(first.failures()[0].expression, "1 > 2");
    assert_eq!(second.failures()[0].position, 1);
    assert!(pending_failures().is_empty());

    let report = second.report(ReportOptions::quiet().with_clear(true)).unwrap();
    assert!(report.contains("in test_explicit_logs_are_independent()"));
    assert!(second.is_empty());
    assert_eq!(first.len(), 1);
}
