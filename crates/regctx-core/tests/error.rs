//! Tests for error handling

use regctx_core::error::{RegctxError, RegctxResult};
use regctx_core::types::ThreadId;

#[test]
fn test_register_not_found_display()
{
    let error = RegctxError::RegisterNotFound(42);
    let message = format!("{}", error);
    assert_eq!(message, "register 42 not found");
}

#[test]
fn test_null_reference_display()
{
    let error = RegctxError::NullReference("NativeProcess");
    assert_eq!(error.to_string(), "NativeProcess is NULL");
}

#[test]
fn test_invalid_register_names_register()
{
    let error = RegctxError::InvalidRegister("shadow".to_string());
    let message = format!("{}", error);
    assert!(message.contains("\"shadow\""));
    assert!(message.contains("internal-only"));
}

#[test]
fn test_unsupported_display()
{
    let error = RegctxError::Unsupported {
        operation: "ReadAllRegisterValues",
        variant: "mips64el",
    };
    assert_eq!(error.to_string(), "ReadAllRegisterValues is not supported on mips64el");
    assert!(error.is_unsupported());
}

#[test]
fn test_watchpoint_not_found_display()
{
    let error = RegctxError::WatchpointNotFound { index: 5, capacity: 4 };
    let message = format!("{}", error);
    assert!(message.contains('5'));
    assert!(message.contains("capacity 4"));
    assert!(!error.is_unsupported());
}

#[test]
fn test_invalid_argument_display()
{
    let error = RegctxError::InvalidArgument("test arg".to_string());
    let message = format!("{}", error);
    assert!(message.contains("Invalid argument"));
    assert!(message.contains("test arg"));
}

#[test]
fn test_read_registers_failed_keeps_details()
{
    let error = RegctxError::ReadRegistersFailed {
        operation: "read register pc".to_string(),
        thread_id: Some(ThreadId::from(7)),
        details: "ESRCH".to_string(),
    };
    assert_eq!(error.to_string(), "Failed to read registers: read register pc");
    match error {
        RegctxError::ReadRegistersFailed { thread_id, details, .. } => {
            assert_eq!(thread_id, Some(ThreadId::from(7)));
            assert_eq!(details, "ESRCH");
        }
        _ => panic!("Expected ReadRegistersFailed variant"),
    }
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: RegctxResult<()> = Ok(());
    let _error_result: RegctxResult<()> = Err(RegctxError::RegisterNotFound(0));
}
