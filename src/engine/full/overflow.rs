// ==========================================
// 阶段7: 最终日溢出标记
// ==========================================

use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningPhase};
use tracing::warn;

/// 最终日剩余需求标记 final_day_overflow 并提升警告级别
pub fn flag_final_day_overflow(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::FinalDayOverflow);
    let Some(last) = ctx.last_day() else {
        ctx.phase_completed(PlanningPhase::FinalDayOverflow, 0);
        return 0;
    };

    let day = ctx.day_plan_mut(last);
    for demand in &mut day.remaining_demands {
        demand.final_day_overflow = true;
    }
    day.rebuild_warnings();
    let overflowed: Vec<_> = day
        .remaining_demands
        .iter()
        .map(|d| (d.key, d.num_containers))
        .collect();

    for (key, containers) in &overflowed {
        warn!(demand = %key, containers, date = %last, "最终日容量不足");
        ctx.emit(PlanningEvent::FinalDayOverflow {
            key: *key,
            date: last,
            containers: *containers,
        });
    }
    ctx.phase_completed(PlanningPhase::FinalDayOverflow, overflowed.len());
    overflowed.len()
}
