//! 配置系统
//! 从环境变量加载所有配置（前缀 ACCESS_，层级分隔符 __）

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// 登录跳转时携带原始路径的查询参数名
    pub return_param: String,
    /// 主动登出后访问该路径时不携带返回参数
    pub account_settings_path: String,
    /// 跟随重定向的最大跳数
    pub max_redirect_hops: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            return_param: "from".to_string(),
            account_settings_path: "/settings/account".to_string(),
            max_redirect_hops: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub navigation: NavigationConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = NavigationConfig::default();

        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("navigation.return_param", defaults.return_param)?
            .set_default("navigation.account_settings_path", defaults.account_settings_path)?
            .set_default("navigation.max_redirect_hops", defaults.max_redirect_hops as u64)?
            .add_source(
                Environment::with_prefix("ACCESS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: AppConfig = settings.build()?.try_deserialize()?;
        config.navigation.return_param = config.navigation.return_param.trim().to_string();

        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        let return_param = self.navigation.return_param.as_str();
        if return_param.is_empty()
            || return_param.trim() != return_param
            || return_param.contains(['&', '=', '?'])
        {
            return Err(ConfigError::Message(format!(
                "Invalid return_param: {:?}",
                self.navigation.return_param
            )));
        }

        if !self.navigation.account_settings_path.starts_with('/') {
            return Err(ConfigError::Message(
                "account_settings_path must start with '/'".to_string(),
            ));
        }

        if !(1..=32).contains(&self.navigation.max_redirect_hops) {
            return Err(ConfigError::Message(
                "max_redirect_hops must be between 1 and 32".to_string(),
            ));
        }

        Ok(())
    }
}
