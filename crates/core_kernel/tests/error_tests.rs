//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("expected length 0 outside 1..=20");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
    assert!(display.contains("1..=20"));
}

#[test]
fn test_port_error_missing_reference() {
    let error = PortError::missing_reference("document type 999");

    assert!(!error.is_conflict());
    assert!(!error.is_not_found());
    assert!(error.to_string().contains("999"));
}

#[test]
fn test_port_error_validation_message() {
    let error = PortError::validation("expected_length out of range");

    assert!(matches!(error, PortError::Validation { ref message } if message == "expected_length out of range"));
}
