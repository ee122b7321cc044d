// ==========================================
// 车辆积载计划系统 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("规划配置不存在: {0}")]
    ProfileNotFound(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
