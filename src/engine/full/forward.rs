// ==========================================
// 阶段2: 前移调度（超载平滑）
// ==========================================
// 自倒数第二日向首日逆序处理（最终日不向前转移）：
// 以需求自身可用车辆试装当日需求（赶不上交货日的车辆排在最后），装不下的部分
// 若可提前且未提前过，则移至前一营业日并标记 is_advanced
// ==========================================

use crate::domain::plan::TruckLoad;
use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningPhase};
use crate::engine::packing::place_greedy;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 前移调度；返回提前的需求数
///
/// 每条需求最多提前一次（is_advanced 标志），重复执行不会再次移动
pub fn forward_schedule(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::ForwardScheduling);
    let pool = ctx.active_pool();
    let n = ctx.window.len();
    let mut advanced_count = 0;

    // i = n-2 .. 1
    for i in (1..n.saturating_sub(1)).rev() {
        let date = ctx.window[i];
        let prev = ctx.window[i - 1];
        let demands = ctx.demands_by_day.remove(&date).unwrap_or_default();
        if demands.is_empty() {
            continue;
        }

        // 试装用的车辆状态
        let mut sim: BTreeMap<i64, TruckLoad> = pool
            .iter()
            .filter_map(|id| ctx.trucks.get(id).map(|t| (*id, TruckLoad::new(t))))
            .collect();

        // 已提前的需求先占用容量
        let (advanced, fresh): (Vec<_>, Vec<_>) =
            demands.into_iter().partition(|d| d.is_advanced);
        let mut kept = Vec::with_capacity(advanced.len() + fresh.len());
        for demand in advanced {
            let mut trial = demand.clone();
            for truck_id in ctx.eligible_on_time_first(&demand, &pool, date) {
                if trial.is_consumed() {
                    break;
                }
                if let Some(load) = sim.get_mut(&truck_id) {
                    place_greedy(load, &mut trial, date);
                }
            }
            kept.push(demand);
        }

        let mut moved = Vec::new();
        for mut demand in fresh {
            let mut trial = demand.clone();
            for truck_id in ctx.eligible_on_time_first(&demand, &pool, date) {
                if trial.is_consumed() {
                    break;
                }
                if let Some(load) = sim.get_mut(&truck_id) {
                    place_greedy(load, &mut trial, date);
                }
            }

            if trial.is_consumed() || !demand.can_advance {
                kept.push(demand);
                continue;
            }

            let fitted = demand.num_containers - trial.num_containers;
            if fitted > 0 {
                kept.push(demand.split_off_head(fitted));
            }
            demand.advance_to(prev);
            debug!(demand = %demand.key, from = %date, to = %prev, containers = demand.num_containers, "需求提前一日");
            ctx.emit(PlanningEvent::DemandAdvanced {
                key: demand.key,
                from: date,
                to: prev,
                containers: demand.num_containers,
            });
            moved.push(demand);
        }

        advanced_count += moved.len();
        ctx.demands_by_day.insert(date, kept);
        if !moved.is_empty() {
            ctx.demands_by_day.entry(prev).or_default().extend(moved);
        }
    }

    info!(advanced = advanced_count, "前移调度完成");
    ctx.phase_completed(PlanningPhase::ForwardScheduling, advanced_count);
    advanced_count
}
