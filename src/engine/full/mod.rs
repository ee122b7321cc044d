// ==========================================
// 车辆积载计划系统 - 完整分配策略
// ==========================================
// 职责: 多阶段分配流水线
// 阶段: 1 车辆规模 -> 2 前移调度 -> 3 单日分配 -> 4 同日改装
//       -> 5 剩余前移 -> 6 特派车辆 -> 7 最终日溢出 -> 次日到达调整
// 红线: 阶段严格顺序执行，后续阶段依赖前序阶段的修改
// ==========================================

pub mod assign;
pub mod fleet;
pub mod forward;
pub mod overflow;
pub mod relocate;
pub mod surge;

pub use assign::{assign_day, day_pool, demand_tier};
pub use fleet::decide_fleet;
pub use forward::forward_schedule;
pub use overflow::flag_final_day_overflow;
pub use relocate::{forward_remaining, relocate_same_day};
pub use surge::dispatch_surge;

use crate::domain::types::StrategyKind;
use crate::engine::context::AllocationContext;
use crate::engine::events::PlanningPhase;
use crate::engine::normalize::normalize_next_day_arrivals;
use crate::engine::strategy::AllocationStrategy;
use chrono::NaiveDate;
use tracing::info;

pub struct FullStrategy {
    // 无状态策略
}

impl FullStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for FullStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for FullStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Full
    }

    fn prepare(&self, ctx: &mut AllocationContext<'_>) {
        decide_fleet(ctx);
        forward_schedule(ctx);
        ctx.phase_started(PlanningPhase::DailyAssignment);
    }

    fn assign_day(&self, ctx: &mut AllocationContext<'_>, date: NaiveDate) {
        assign::assign_day(ctx, date);
    }

    fn finalize(&self, ctx: &mut AllocationContext<'_>) {
        let remainders: usize = ctx
            .day_plans
            .values()
            .map(|d| d.remaining_demands.len())
            .sum();
        ctx.phase_completed(PlanningPhase::DailyAssignment, remainders);

        relocate_same_day(ctx);
        forward_remaining(ctx);
        dispatch_surge(ctx);
        let overflow = flag_final_day_overflow(ctx);
        normalize_next_day_arrivals(ctx);
        info!(overflow, "完整策略执行完成");
    }
}
