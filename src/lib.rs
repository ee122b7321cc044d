// ==========================================
// 车辆积载计划系统 - 核心库
// ==========================================
// 技术栈: Rust + serde + tracing
// 系统定位: 积载计划引擎 (按日、按车辆分配交货需求)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 日历层 - 营业日判定
pub mod calendar;

// 引擎层 - 分配规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 规划参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ArrivalPreference, PlanStatus, StrategyKind, WarningSeverity};

// 领域实体
pub use domain::{
    Container, DayPlan, Demand, DemandKey, LoadedItem, OrderRow, Plan, PlanSummary, PlanWarning,
    PlanningInput, ProductRef, Truck, TruckLoad,
};

// 日历
pub use calendar::{CalendarPort, CalendarTable, PlanningCalendar, WeekdayCalendar};

// 配置
pub use config::{ConfigManager, PlannerConfig, PlanningProfile};

// 引擎
pub use engine::{LoadingPlanner, PlanRequest, PlanningEvent, PlanningObserver};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车辆积载计划系统";
