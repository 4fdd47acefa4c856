//! 工作区访问控制库
//! 意图到权限查询的解析，以及基于认证状态的导航状态机

pub mod config;
pub mod error;
pub mod models;
pub mod realtime;
pub mod services;
pub mod telemetry;

pub use error::{AppError, Result};
