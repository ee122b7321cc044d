// ==========================================
// 车辆积载计划系统 - 规划参数
// ==========================================
// 职责: 引擎可调参数 + 车辆替换规则 + 客户配置
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::strategy_profile::PlanningProfile;
use crate::domain::types::ArrivalPreference;
use serde::{Deserialize, Serialize};

// ==========================================
// TruckSubstitutionRule - 车辆替换规则
// ==========================================
// 某产品组当日数量达到阈值时，以 with_truck_id 替换 replace_truck_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckSubstitutionRule {
    pub product_group_code: String,
    pub min_daily_quantity: i64,
    pub replace_truck_id: i64,
    pub with_truck_id: i64,
}

// ==========================================
// PlannerConfig - 规划参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 低利用率阈值（回退装载候选）
    pub low_utilization_threshold: f64,
    /// 前一营业日最大回溯天数
    pub max_working_day_search: u32,
    /// 提前期营业日回溯上限（天）
    pub lead_time_search_limit: u32,
    /// 默认规划天数（营业日）
    pub default_planning_days: usize,
    /// 全局到达时段偏好
    pub arrival_preference: ArrivalPreference,
    pub truck_substitutions: Vec<TruckSubstitutionRule>,
    pub profiles: Vec<PlanningProfile>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            low_utilization_threshold: 0.7,
            max_working_day_search: 7,
            lead_time_search_limit: 30,
            default_planning_days: 7,
            arrival_preference: ArrivalPreference::Morning,
            truck_substitutions: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

impl PlannerConfig {
    /// 参数校验
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.low_utilization_threshold > 0.0 && self.low_utilization_threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "low_utilization_threshold".to_string(),
                message: format!("须在 (0, 1] 之间，实际 {}", self.low_utilization_threshold),
            });
        }
        if self.max_working_day_search == 0 {
            return Err(invalid("max_working_day_search", "须 >= 1"));
        }
        if self.lead_time_search_limit == 0 {
            return Err(invalid("lead_time_search_limit", "须 >= 1"));
        }
        if self.default_planning_days == 0 {
            return Err(invalid("default_planning_days", "须 >= 1"));
        }
        for rule in &self.truck_substitutions {
            if rule.replace_truck_id == rule.with_truck_id {
                return Err(invalid(
                    "truck_substitutions",
                    &format!("替换车辆与被替换车辆相同: {}", rule.with_truck_id),
                ));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for profile in &self.profiles {
            if profile.profile_id.trim().is_empty() {
                return Err(invalid("profiles", "profile_id 不能为空"));
            }
            if !seen.insert(profile.profile_id.as_str()) {
                return Err(invalid(
                    "profiles",
                    &format!("profile_id 重复: {}", profile.profile_id),
                ));
            }
        }
        Ok(())
    }

    /// 按 ID 查找客户配置
    pub fn profile(&self, profile_id: &str) -> ConfigResult<&PlanningProfile> {
        let id = profile_id.trim();
        self.profiles
            .iter()
            .find(|p| p.profile_id == id)
            .ok_or_else(|| ConfigError::ProfileNotFound(id.to_string()))
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.low_utilization_threshold, 0.7);
        assert_eq!(config.max_working_day_search, 7);
        assert_eq!(config.default_planning_days, 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"arrival_preference": "evening"}"#).unwrap();
        assert_eq!(config.arrival_preference, ArrivalPreference::Evening);
        assert_eq!(config.lead_time_search_limit, 30);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = PlannerConfig {
            low_utilization_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_self_substitution() {
        let config = PlannerConfig {
            truck_substitutions: vec![TruckSubstitutionRule {
                product_group_code: "FK".to_string(),
                min_daily_quantity: 120,
                replace_truck_id: 12,
                with_truck_id: 12,
            }],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_profile_lookup() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{"profiles": [{"profile_id": "tiera", "strategy": "simple"}]}"#,
        )
        .unwrap();
        assert!(config.profile(" tiera ").is_ok());
        assert!(matches!(
            config.profile("other"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }
}
