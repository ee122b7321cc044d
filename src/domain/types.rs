// ==========================================
// 车辆积载计划系统 - 领域类型定义
// ==========================================
// 职责: 积载计划各层共用的枚举类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 到达时段偏好 (Arrival Preference)
// ==========================================
// 早班: arrival_day_offset=0 (当日到达) 优先
// 晚班: arrival_day_offset=1 (次日到达) 优先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalPreference {
    Morning, // 早班优先
    Evening, // 晚班优先
}

impl ArrivalPreference {
    /// 偏好对应的 arrival_day_offset
    pub fn preferred_offset(&self) -> u32 {
        match self {
            ArrivalPreference::Morning => 0,
            ArrivalPreference::Evening => 1,
        }
    }

    /// 时段排名（0=符合偏好，1=不符合）
    pub fn rank(&self, arrival_day_offset: u32) -> u8 {
        if arrival_day_offset == self.preferred_offset() {
            0
        } else {
            1
        }
    }
}

impl Default for ArrivalPreference {
    fn default() -> Self {
        ArrivalPreference::Morning
    }
}

impl fmt::Display for ArrivalPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrivalPreference::Morning => write!(f, "morning"),
            ArrivalPreference::Evening => write!(f, "evening"),
        }
    }
}

impl std::str::FromStr for ArrivalPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(ArrivalPreference::Morning),
            "evening" => Ok(ArrivalPreference::Evening),
            other => Err(format!("未知到达时段偏好: {}", other)),
        }
    }
}

// ==========================================
// 警告级别 (Warning Severity)
// ==========================================
// 顺序: Advanceable < NotAdvanceable < FinalDayOverflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningSeverity {
    Advanceable,      // 可提前（后续阶段仍可能消化）
    NotAdvanceable,   // 不可提前（业务事实）
    FinalDayOverflow, // 最终日溢出（无后续补救手段）
}

impl WarningSeverity {
    /// 根据需求的提前许可判定警告级别
    pub fn for_remainder(can_advance: bool) -> Self {
        if can_advance {
            WarningSeverity::Advanceable
        } else {
            WarningSeverity::NotAdvanceable
        }
    }

    /// 是否为高等级警告
    pub fn is_elevated(&self) -> bool {
        *self == WarningSeverity::FinalDayOverflow
    }
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningSeverity::Advanceable => write!(f, "ADVANCEABLE"),
            WarningSeverity::NotAdvanceable => write!(f, "NOT_ADVANCEABLE"),
            WarningSeverity::FinalDayOverflow => write!(f, "FINAL_DAY_OVERFLOW"),
        }
    }
}

// ==========================================
// 计划状态 (Plan Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Normal,  // 正常
    Warning, // 有警告
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Normal => write!(f, "normal"),
            PlanStatus::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 分配策略类型 (Strategy Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Simple, // 单趟装载（无提前、无特派车）
    Full,   // 完整阶段流水线
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Simple => "simple",
            StrategyKind::Full => "full",
        }
    }

    /// 中文标题
    pub fn title_cn(&self) -> &'static str {
        match self {
            StrategyKind::Simple => "简易策略",
            StrategyKind::Full => "完整策略",
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Full
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(StrategyKind::Simple),
            "full" => Ok(StrategyKind::Full),
            other => Err(format!("未知分配策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_preference_rank() {
        assert_eq!(ArrivalPreference::Morning.rank(0), 0);
        assert_eq!(ArrivalPreference::Morning.rank(1), 1);
        assert_eq!(ArrivalPreference::Evening.rank(1), 0);
        assert_eq!(ArrivalPreference::Evening.rank(0), 1);
    }

    #[test]
    fn test_arrival_preference_from_str() {
        assert_eq!(
            " Evening ".parse::<ArrivalPreference>().unwrap(),
            ArrivalPreference::Evening
        );
        assert!("noon".parse::<ArrivalPreference>().is_err());
    }

    #[test]
    fn test_warning_severity_classification() {
        assert_eq!(WarningSeverity::for_remainder(true), WarningSeverity::Advanceable);
        assert_eq!(WarningSeverity::for_remainder(false), WarningSeverity::NotAdvanceable);
        assert!(WarningSeverity::FinalDayOverflow.is_elevated());
        assert!(!WarningSeverity::Advanceable.is_elevated());
    }

    #[test]
    fn test_strategy_kind_parse_and_default() {
        assert_eq!(StrategyKind::default(), StrategyKind::Full);
        assert_eq!("SIMPLE".parse::<StrategyKind>().unwrap(), StrategyKind::Simple);
        assert_eq!(StrategyKind::Full.to_string(), "full");
        assert!("greedy".parse::<StrategyKind>().is_err());
    }
}
