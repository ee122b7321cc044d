// ==========================================
// 阶段6: 特派车辆
// ==========================================
// 同日剩余需求改装非默认车辆（不受需求可用车辆列表限制）
// 装入的明细标记 is_special_delivery
// ==========================================

use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningPhase};
use crate::engine::packing::place_whole;
use tracing::{info, warn};

/// 特派车辆分配；返回特派装入的需求数
pub fn dispatch_surge(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::SurgeDispatch);
    let surge_trucks = ctx.non_default_trucks();
    if surge_trucks.is_empty() {
        ctx.phase_completed(PlanningPhase::SurgeDispatch, 0);
        return 0;
    }
    let mut dispatched = 0;

    for date in ctx.days_before_final() {
        let remainders = std::mem::take(&mut ctx.day_plan_mut(date).remaining_demands);
        if remainders.is_empty() {
            continue;
        }

        let mut unplaced = Vec::new();
        for mut demand in remainders {
            let mut placed_on = None;
            for truck_id in &surge_trucks {
                if !ctx.can_meet_deadline(*truck_id, date, &demand) {
                    continue;
                }
                let Some(truck) = ctx.trucks.get(truck_id) else {
                    continue;
                };
                let load = ctx.day_plans.entry(date).or_default().load_for(truck);
                if place_whole(load, &mut demand, date).is_some() {
                    if let Some(item) = load.loaded_items.last_mut() {
                        item.is_special_delivery = true;
                    }
                    placed_on = Some(*truck_id);
                    break;
                }
            }
            match placed_on {
                Some(truck_id) => {
                    warn!(demand = %demand.key, truck_id, %date, "特派车辆装载");
                    ctx.emit(PlanningEvent::SurgeDispatched {
                        key: demand.key,
                        date,
                        truck_id,
                    });
                    dispatched += 1;
                }
                None => unplaced.push(demand),
            }
        }

        let day = ctx.day_plan_mut(date);
        day.remaining_demands = unplaced;
        day.rebuild_warnings();
        day.drop_empty_loads();
    }

    info!(dispatched, "特派车辆分配完成");
    ctx.phase_completed(PlanningPhase::SurgeDispatch, dispatched);
    dispatched
}
