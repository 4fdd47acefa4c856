//! 统一错误模型
//! 定义所有错误类型

use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Permission evaluation failed: {0}")]
    Evaluation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Session already initialized")]
    SessionAlreadyInitialized,

    #[error("Session not initialized")]
    SessionNotInitialized,

    #[error("Session channel closed")]
    SessionClosed,
}

impl AppError {
    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Evaluation(_) => "Unable to check permissions".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::SessionAlreadyInitialized
            | AppError::SessionNotInitialized
            | AppError::SessionClosed => "Session unavailable".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Evaluation(_) => "evaluation_failed",
            AppError::Config(_) => "config_error",
            AppError::Forbidden => "forbidden",
            AppError::SessionAlreadyInitialized => "session_already_initialized",
            AppError::SessionNotInitialized => "session_not_initialized",
            AppError::SessionClosed => "session_closed",
        }
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        AppError::Evaluation(msg.into())
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
