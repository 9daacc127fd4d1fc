//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::{AgentCode, PortError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    assert!(matches!(error, CoreError::Validation(ref msg) if msg == "Invalid input"));
    assert_eq!(error.to_string(), "Validation error: Invalid input");
}

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::CurrencyMismatch("EUR".to_string(), "USD".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
}

#[test]
fn test_blank_code_is_validation_error() {
    let error = AgentCode::new("").unwrap_err();
    assert!(matches!(error, CoreError::Validation(_)));
}

#[test]
fn test_port_error_display() {
    let error = PortError::connection("rule store unreachable");
    assert_eq!(error.to_string(), "Connection error: rule store unreachable");
}
