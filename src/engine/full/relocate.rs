// ==========================================
// 阶段4/5: 剩余需求再分配
// ==========================================
// 阶段4: 当日剩余需求改装同日其他可用车辆
// 阶段5: 可提前的剩余需求改装前一营业日车辆
// 剩余需求整单装入或不动（不在此阶段拆分）
// ==========================================

use crate::domain::demand::Demand;
use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningPhase};
use crate::engine::packing::place_whole;
use chrono::NaiveDate;
use tracing::{debug, info};

/// 在 target 日的可用车辆上整单装入需求
fn place_on_day(
    ctx: &mut AllocationContext<'_>,
    demand: &mut Demand,
    pool: &[i64],
    target: NaiveDate,
) -> Option<i64> {
    for truck_id in ctx.eligible_in_pool(demand, pool) {
        if !ctx.can_meet_deadline(truck_id, target, demand) {
            continue;
        }
        let Some(truck) = ctx.trucks.get(&truck_id) else {
            continue;
        };
        let day = ctx.day_plans.entry(target).or_default();
        if place_whole(day.load_for(truck), demand, target).is_some() {
            return Some(truck_id);
        }
    }
    None
}

/// 阶段4: 同日改装；返回改装成功的需求数
pub fn relocate_same_day(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::Relocation);
    let pool = ctx.active_pool();
    let mut relocated = 0;

    for date in ctx.days_before_final() {
        let day = ctx.day_plan_mut(date);
        let remainders = std::mem::take(&mut day.remaining_demands);
        if remainders.is_empty() {
            continue;
        }
        day.warnings.clear();

        let mut unplaced = Vec::new();
        for mut demand in remainders {
            match place_on_day(ctx, &mut demand, &pool, date) {
                Some(truck_id) => {
                    debug!(demand = %demand.key, truck_id, %date, "剩余需求同日改装");
                    relocated += 1;
                }
                None => unplaced.push(demand),
            }
        }

        let day = ctx.day_plan_mut(date);
        for demand in unplaced {
            day.add_remainder(demand);
        }
        day.drop_empty_loads();
    }

    info!(relocated, "同日改装完成");
    ctx.phase_completed(PlanningPhase::Relocation, relocated);
    relocated
}

/// 阶段5: 剩余需求前移；返回前移成功的需求数
///
/// 仅处理可提前且未提前过的需求，每条最多提前一次
pub fn forward_remaining(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::ForwardRemaining);
    let pool = ctx.active_pool();
    let n = ctx.window.len();
    let mut advanced = 0;

    for i in (1..n.saturating_sub(1)).rev() {
        let date = ctx.window[i];
        let prev = ctx.window[i - 1];
        let candidates: Vec<_> = ctx
            .day_plan_mut(date)
            .remaining_demands
            .iter()
            .filter(|d| d.can_advance && !d.is_advanced)
            .map(|d| d.key)
            .collect();

        for key in candidates {
            let Some(mut demand) = ctx.day_plan_mut(date).remove_remainder(&key) else {
                continue;
            };
            let containers = demand.num_containers;
            let before = demand.clone();
            demand.advance_to(prev);
            match place_on_day(ctx, &mut demand, &pool, prev) {
                Some(truck_id) => {
                    debug!(demand = %key, truck_id, from = %date, to = %prev, "剩余需求前移");
                    ctx.emit(PlanningEvent::DemandAdvanced {
                        key,
                        from: date,
                        to: prev,
                        containers,
                    });
                    advanced += 1;
                }
                None => ctx.day_plan_mut(date).add_remainder(before),
            }
        }
        ctx.day_plan_mut(prev).drop_empty_loads();
    }

    info!(advanced, "剩余需求前移完成");
    ctx.phase_completed(PlanningPhase::ForwardRemaining, advanced);
    advanced
}
