//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_commission::{SalesDocument, SalesLine};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts the document's stored commission total
pub fn assert_total_commission(document: &SalesDocument, expected: Decimal) {
    match document.total_commission() {
        Some(total) => assert_eq!(
            total.amount(),
            expected,
            "Document {} commission: actual={}, expected={}",
            document.code,
            total.amount(),
            expected
        ),
        None => panic!("Document {} is not commission-capable", document.code),
    }
}

/// Asserts the percentages stored on each line, in order
pub fn assert_line_percentages(lines: &[SalesLine], expected: &[Decimal]) {
    let actual: Vec<Option<Decimal>> = lines.iter().map(|l| l.commission_percentage()).collect();
    let expected: Vec<Option<Decimal>> = expected.iter().copied().map(Some).collect();
    assert_eq!(actual, expected, "Line commission percentages differ");
}

/// Asserts that a document is locked by an invoiced settlement
pub fn assert_locked(document: &SalesDocument) {
    assert!(
        document.is_locked(),
        "Expected document {} to be locked, settlement link: {:?}",
        document.code,
        document.settlement()
    );
}
