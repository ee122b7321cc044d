// ==========================================
// 车辆积载计划系统 - 引擎层
// ==========================================
// 职责: 需求汇总、车辆分配策略、计划汇总
// 红线: 引擎不做 I/O，所有输入来自只读快照
// ==========================================

pub mod aggregator;
pub mod context;
pub mod events;
pub mod full;
pub mod normalize;
pub mod orchestrator;
pub mod packing;
pub mod simple;
pub mod strategy;

// 重导出核心引擎
pub use aggregator::{Aggregation, AggregationReport, DemandAggregator};
pub use context::AllocationContext;
pub use events::{NoOpObserver, PlanningEvent, PlanningObserver, PlanningPhase, TracingObserver};
pub use full::FullStrategy;
pub use normalize::normalize_next_day_arrivals;
pub use orchestrator::{LoadingPlanner, PlanRequest};
pub use packing::Placement;
pub use simple::SimpleStrategy;
pub use strategy::{strategy_for, AllocationStrategy};
