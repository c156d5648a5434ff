use sfn_offline::core::error::AppError;
use sfn_offline::core::types::{ErrorCategory, ErrorSeverity};

#[test]
fn test_error_creation_all_categories() {
    let categories = vec![
        ErrorCategory::ConfigError,
        ErrorCategory::LookupError,
        ErrorCategory::ValidationError,
        ErrorCategory::SerializationError,
        ErrorCategory::RegistrationConflict,
        ErrorCategory::RegistrationError,
        ErrorCategory::IoError,
        ErrorCategory::InternalError,
        ErrorCategory::Unknown,
    ];

    for category in categories {
        let error = AppError::new(category, "test message");
        assert_eq!(error.category, category);
        assert_eq!(error.message, "test message");
        assert!(error.context.is_empty());
        assert!(error.recovery_suggestions.is_empty());
        assert!(error.occurred_at <= chrono::Utc::now());
        assert!(error.source.is_none());
    }
}

#[test]
fn test_error_severity_mapping() {
    let test_cases = vec![
        (ErrorCategory::ConfigError, ErrorSeverity::Error),
        (ErrorCategory::LookupError, ErrorSeverity::Error),
        (ErrorCategory::ValidationError, ErrorSeverity::Error),
        (ErrorCategory::SerializationError, ErrorSeverity::Error),
        (ErrorCategory::RegistrationConflict, ErrorSeverity::Warning),
        (ErrorCategory::RegistrationError, ErrorSeverity::Error),
        (ErrorCategory::IoError, ErrorSeverity::Error),
        (ErrorCategory::InternalError, ErrorSeverity::Error),
        (ErrorCategory::Unknown, ErrorSeverity::Info),
    ];

    for (category, expected_severity) in test_cases {
        let error = AppError::new(category, "test");
        assert_eq!(error.severity(), expected_severity);
    }
}

#[test]
fn test_error_add_context() {
    let mut error = AppError::new(ErrorCategory::LookupError, "no predecessor");

    error.add_context("state_machine", "Orders");
    error.add_context("state", "FanOut");

    assert_eq!(error.context.len(), 2);
    assert_eq!(error.context.get("state"), Some(&"FanOut".to_string()));
}

#[test]
fn test_error_builders_chain() {
    let error = AppError::new(ErrorCategory::ConfigError, "missing accountId")
        .with_code("SFO-CONFIG-001")
        .with_context("serverless.yml")
        .with_suggestion("Set accountId");

    assert_eq!(error.code, "SFO-CONFIG-001");
    assert_eq!(
        error.context.get("context"),
        Some(&"serverless.yml".to_string())
    );
    assert_eq!(error.recovery_suggestions, vec!["Set accountId".to_string()]);
}

#[test]
fn test_error_display_includes_code_and_category() {
    let error = AppError::new(ErrorCategory::ValidationError, "PrepareM already exists")
        .with_code("SFO-FLATTEN-001");
    let rendered = error.to_string();

    assert!(rendered.starts_with("[SFO-FLATTEN-001] ValidationError: PrepareM already exists"));
}

#[test]
fn test_error_with_source_is_displayed() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = AppError::with_source(
        ErrorCategory::RegistrationError,
        "failed to create state machine 'Orders'",
        Box::new(io),
    );

    assert!(error.source.is_some());
    assert!(error.to_string().contains("Caused by: refused"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "serverless.yml");
    let error: AppError = io.into();

    assert_eq!(error.category, ErrorCategory::IoError);
    assert_eq!(error.code, "IO_ERROR");
    assert!(!error.recovery_suggestions.is_empty());
}

#[test]
fn test_anyhow_error_conversion() {
    let error: AppError = anyhow::anyhow!("unexpected").into();

    assert_eq!(error.category, ErrorCategory::InternalError);
    assert_eq!(error.message, "unexpected");
}

#[test]
fn test_app_error_converts_into_anyhow() {
    let error = AppError::new(ErrorCategory::LookupError, "no predecessor")
        .with_code("SFO-LOOKUP-001");
    let wrapped: anyhow::Error = error.into();

    let recovered = wrapped.downcast_ref::<AppError>().unwrap();
    assert_eq!(recovered.code, "SFO-LOOKUP-001");
}
