// ==========================================
// 车辆积载计划系统 - 配置层
// ==========================================
// 职责: 规划参数、客户配置、配置文件加载
// 存储: JSON 配置文件（可选）
// ==========================================

pub mod config_manager;
pub mod error;
pub mod planner_config;
pub mod strategy_profile;

// 重导出核心配置类型
pub use config_manager::{ConfigManager, ConfigSource, CONFIG_ENV_VAR};
pub use error::{ConfigError, ConfigResult};
pub use planner_config::{PlannerConfig, TruckSubstitutionRule};
pub use strategy_profile::PlanningProfile;
