// ==========================================
// 车辆积载计划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、容量约束接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod demand;
pub mod plan;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use capacity::{CapacityConstraint, Container, Truck};
pub use demand::{Demand, DemandKey, FieldValue, OrderRow, ProductRef};
pub use plan::{DayPlan, LoadedItem, Plan, PlanPeriod, PlanSummary, PlanWarning, TruckLoad};
pub use snapshot::PlanningInput;
pub use types::{ArrivalPreference, PlanStatus, StrategyKind, WarningSeverity};
