use crate::domain::types::{ArrivalPreference, StrategyKind};
use serde::{Deserialize, Serialize};

/// 客户规划配置（按客户选择策略与偏好）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningProfile {
    /// 配置 ID（用于选择/引用）
    pub profile_id: String,

    /// 显示名称（中文）
    #[serde(default)]
    pub title: String,

    /// 分配策略（simple/full）
    #[serde(default)]
    pub strategy: StrategyKind,

    /// 到达时段偏好；未指定时沿用全局设置
    #[serde(default)]
    pub arrival_preference: Option<ArrivalPreference>,

    /// 仅规划这些产品组（为空表示全部）
    #[serde(default)]
    pub target_product_groups: Vec<String>,
}

impl PlanningProfile {
    /// 产品组是否在规划范围内
    pub fn includes_group(&self, group_code: Option<&str>) -> bool {
        if self.target_product_groups.is_empty() {
            return true;
        }
        match group_code {
            Some(code) => self
                .target_product_groups
                .iter()
                .any(|target| target.trim() == code.trim()),
            None => false,
        }
    }
}
