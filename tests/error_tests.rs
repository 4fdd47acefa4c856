//! 错误处理单元测试
//!
//! 测试应用错误类型的各种行为

use workspace_access::error::AppError;

// ==================== 用户消息测试 ====================

#[test]
fn test_user_messages_no_sensitive_info() {
    let error = AppError::Evaluation("rbac backend timeout for user 42".to_string());
    let message = error.user_message();
    assert_eq!(message, "Unable to check permissions");
    assert!(!message.contains("42"));

    let error = AppError::Config("ACCESS_NAVIGATION__RETURN_PARAM=&".to_string());
    assert_eq!(error.user_message(), "Configuration error");
}

#[test]
fn test_session_errors_share_user_message() {
    for error in [
        AppError::SessionAlreadyInitialized,
        AppError::SessionNotInitialized,
        AppError::SessionClosed,
    ] {
        assert_eq!(error.user_message(), "Session unavailable");
    }
}

// ==================== 错误码测试 ====================

#[test]
fn test_error_codes_are_distinct() {
    let errors = [
        AppError::Evaluation(String::new()),
        AppError::Config(String::new()),
        AppError::Forbidden,
        AppError::SessionAlreadyInitialized,
        AppError::SessionNotInitialized,
        AppError::SessionClosed,
    ];
    let mut codes: Vec<_> = errors.iter().map(AppError::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

// ==================== 错误转换测试 ====================

#[test]
fn test_from_config_error() {
    let error: AppError = config::ConfigError::Message("bad value".to_string()).into();
    assert!(matches!(error, AppError::Config(ref msg) if msg.contains("bad value")));
}

#[test]
fn test_display_includes_detail() {
    let error = AppError::evaluation("cache miss");
    assert_eq!(error.to_string(), "Permission evaluation failed: cache miss");
    assert_eq!(AppError::Forbidden.to_string(), "Access denied");
}
