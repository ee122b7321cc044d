// ==========================================
// 车辆积载计划系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、客户配置查询
// 来源优先级: 显式路径 > LOADING_PLAN_CONFIG 环境变量
//            > <用户配置目录>/loading-plan/config.json > 内置默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planner_config::PlannerConfig;
use crate::config::strategy_profile::PlanningProfile;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "LOADING_PLAN_CONFIG";
const CONFIG_DIR_NAME: &str = "loading-plan";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigSource - 配置来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PlannerConfig,
    source: ConfigSource,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn with_defaults() -> Self {
        Self {
            config: PlannerConfig::default(),
            source: ConfigSource::Defaults,
        }
    }

    /// 使用已构建的配置（会校验）
    pub fn from_config(config: PlannerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: ConfigSource::Defaults,
        })
    }

    /// 按优先级加载配置
    ///
    /// # 参数
    /// - explicit: 命令行等显式指定的路径（文件必须存在）
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let env_value = std::env::var(CONFIG_ENV_VAR).ok();
        let user_default = dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));

        match Self::resolve_path(explicit, env_value.as_deref(), user_default) {
            Some(path) => Self::load_file(&path),
            None => {
                info!("未找到配置文件，使用内置默认配置");
                Ok(Self::with_defaults())
            }
        }
    }

    /// 解析配置文件路径
    ///
    /// 显式路径与环境变量即使文件不存在也返回（由读取时报错）；
    /// 用户目录下的默认文件仅在存在时返回
    pub fn resolve_path(
        explicit: Option<&Path>,
        env_value: Option<&str>,
        user_default: Option<PathBuf>,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(value));
        }
        user_default.filter(|path| path.is_file())
    }

    /// 从 JSON 文件加载并校验
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let config: PlannerConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: shown.clone(),
                source,
            })?;
        config.validate()?;

        info!(
            path = %shown,
            profiles = config.profiles.len(),
            substitutions = config.truck_substitutions.len(),
            "配置文件加载完成"
        );
        Ok(Self {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        })
    }

    // ==========================================
    // 查询方法
    // ==========================================

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn into_config(self) -> PlannerConfig {
        self.config
    }

    /// 查找客户配置
    pub fn profile(&self, profile_id: &str) -> ConfigResult<&PlanningProfile> {
        let profile = self.config.profile(profile_id)?;
        debug!(profile_id = %profile.profile_id, strategy = %profile.strategy, "使用客户配置");
        Ok(profile)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ArrivalPreference, StrategyKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolve_path_precedence() {
        let explicit = PathBuf::from("/tmp/explicit.json");
        let resolved = ConfigManager::resolve_path(Some(&explicit), Some("/tmp/env.json"), None);
        assert_eq!(resolved, Some(explicit));

        let resolved = ConfigManager::resolve_path(None, Some(" /tmp/env.json "), None);
        assert_eq!(resolved, Some(PathBuf::from("/tmp/env.json")));

        // 用户目录下的文件不存在时使用默认值
        let missing = PathBuf::from("/nonexistent/loading-plan/config.json");
        assert_eq!(ConfigManager::resolve_path(None, Some("  "), Some(missing)), None);
    }

    #[test]
    fn test_load_file() {
        let file = write_config(
            r#"{
                "low_utilization_threshold": 0.6,
                "arrival_preference": "evening",
                "profiles": [
                    {"profile_id": "tiera", "title": "T", "strategy": "simple",
                     "arrival_preference": "evening", "target_product_groups": ["FK"]}
                ]
            }"#,
        );
        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.config().low_utilization_threshold, 0.6);
        assert_eq!(manager.config().arrival_preference, ArrivalPreference::Evening);
        assert_eq!(manager.source(), &ConfigSource::File(file.path().to_path_buf()));
        let profile = manager.profile("tiera").unwrap();
        assert_eq!(profile.strategy, StrategyKind::Simple);
    }

    #[test]
    fn test_load_file_errors() {
        let missing = ConfigManager::load_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let broken = write_config("{ not json");
        assert!(matches!(
            ConfigManager::load_file(broken.path()),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = write_config(r#"{"max_working_day_search": 0}"#);
        assert!(matches!(
            ConfigManager::load_file(invalid.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
