// ==========================================
// 阶段3: 单日分配
// ==========================================
// 需求按优先级排序，候选车辆按偏好排序后逐车装载（合并堆叠 > 整单 > 拆分）
// 候选车辆装不下时，回退到低利用率车辆；仍未装入的成为当日剩余
// ==========================================

use crate::domain::capacity::CapacityConstraint;
use crate::domain::demand::Demand;
use crate::domain::plan::TruckLoad;
use crate::engine::context::AllocationContext;
use crate::engine::packing::place_greedy;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

// ==========================================
// 车辆池（含替换规则）
// ==========================================

/// 当日车辆池: 活动车辆池叠加车辆替换规则
///
/// 规则命中时同步改写需求的可用车辆列表
pub fn day_pool(ctx: &AllocationContext<'_>, demands: &mut [Demand]) -> Vec<i64> {
    let mut pool = ctx.active_pool();

    for rule in &ctx.config.truck_substitutions {
        let group_quantity: i64 = demands
            .iter()
            .filter(|d| d.group_code.as_deref() == Some(rule.product_group_code.as_str()))
            .fold(0i64, |acc, d| acc.saturating_add(d.remaining_quantity));
        if group_quantity < rule.min_daily_quantity {
            continue;
        }
        if !ctx.trucks.contains_key(&rule.with_truck_id) {
            warn!(truck_id = rule.with_truck_id, "替换车辆不存在，规则跳过");
            continue;
        }

        pool.retain(|id| *id != rule.replace_truck_id);
        if !pool.contains(&rule.with_truck_id) {
            pool.push(rule.with_truck_id);
            pool.sort_unstable();
        }
        for demand in demands.iter_mut() {
            if !demand.eligible_truck_ids.contains(&rule.replace_truck_id) {
                continue;
            }
            let mut rewritten = Vec::with_capacity(demand.eligible_truck_ids.len());
            for id in &demand.eligible_truck_ids {
                let id = if *id == rule.replace_truck_id {
                    rule.with_truck_id
                } else {
                    *id
                };
                if !rewritten.contains(&id) {
                    rewritten.push(id);
                }
            }
            demand.eligible_truck_ids = rewritten;
        }
        info!(
            group = %rule.product_group_code,
            group_quantity,
            replaced = rule.replace_truck_id,
            with = rule.with_truck_id,
            "车辆替换规则生效"
        );
    }

    pool
}

// ==========================================
// 排序
// ==========================================

/// 需求优先级（小者优先）
///
/// 0=已提前 1=唯一可用车辆 2=车辆优先品番 3=有可用车辆限制 4=无限制
pub fn demand_tier(ctx: &AllocationContext<'_>, demand: &Demand, pool: &[i64]) -> u8 {
    if demand.is_advanced {
        0
    } else if demand.eligible_truck_ids.len() == 1 {
        1
    } else if pool
        .iter()
        .filter_map(|id| ctx.trucks.get(id))
        .any(|t| t.prioritizes(&demand.product_code))
    {
        2
    } else if !demand.eligible_truck_ids.is_empty() {
        3
    } else {
        4
    }
}

/// 候选车辆排序（赶不上交货日的车辆排在最后）
fn ranked_candidates(
    ctx: &AllocationContext<'_>,
    demand: &Demand,
    pool: &[i64],
    loads: &BTreeMap<i64, TruckLoad>,
    date: NaiveDate,
) -> Vec<i64> {
    let mut candidates: Vec<i64> = ctx
        .eligible_in_pool(demand, pool)
        .into_iter()
        .filter(|id| loads.contains_key(id))
        .collect();

    let key = |id: &i64| {
        let truck = &ctx.trucks[id];
        let load = &loads[id];
        let position = demand
            .eligible_truck_ids
            .iter()
            .position(|e| e == id)
            .unwrap_or(usize::MAX);
        (
            !ctx.can_meet_deadline(*id, date, demand),
            position,
            ctx.arrival_preference.rank(truck.arrival_day_offset),
            !truck.prioritizes(&demand.product_code),
            !load.carries_container(demand.container_id),
            load.remaining_floor_area(),
            load.utilization(),
        )
    };
    candidates.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        (ka.0, ka.1, ka.2, ka.3, ka.4)
            .cmp(&(kb.0, kb.1, kb.2, kb.3, kb.4))
            // 剩余底面积大者优先
            .then_with(|| kb.5.total_cmp(&ka.5))
            .then_with(|| ka.6.total_cmp(&kb.6))
            .then_with(|| a.cmp(b))
    });
    candidates
}

/// 回退候选: 利用率低于阈值的车辆，按剩余底面积降序
fn fallback_candidates(
    ctx: &AllocationContext<'_>,
    demand: &Demand,
    loads: &BTreeMap<i64, TruckLoad>,
    date: NaiveDate,
) -> Vec<i64> {
    let threshold = ctx.config.low_utilization_threshold;
    let mut candidates: Vec<(i64, f64)> = loads
        .values()
        .filter(|load| load.utilization() < threshold)
        .filter(|load| ctx.can_meet_deadline(load.truck_id, date, demand))
        .map(|load| (load.truck_id, load.remaining_floor_area()))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    candidates.into_iter().map(|(id, _)| id).collect()
}

fn fill(loads: &mut BTreeMap<i64, TruckLoad>, demand: &mut Demand, trucks: &[i64], date: NaiveDate) {
    for truck_id in trucks {
        if demand.is_consumed() {
            break;
        }
        if let Some(load) = loads.get_mut(truck_id) {
            if let Some(placement) = place_greedy(load, demand, date) {
                debug!(demand = %demand.key, truck_id, ?placement, "装载");
            }
        }
    }
}

// ==========================================
// 单日分配
// ==========================================

/// 分配指定日期的需求；返回当日剩余需求数
#[instrument(skip_all, fields(%date))]
pub fn assign_day(ctx: &mut AllocationContext<'_>, date: NaiveDate) -> usize {
    let mut demands = ctx.demands_by_day.remove(&date).unwrap_or_default();
    if demands.is_empty() {
        return 0;
    }
    let pool = day_pool(ctx, &mut demands);

    demands.sort_by(|a, b| {
        demand_tier(ctx, a, &pool)
            .cmp(&demand_tier(ctx, b, &pool))
            .then_with(|| a.product_code.cmp(&b.product_code))
            .then_with(|| a.key.cmp(&b.key))
    });

    // 当日已有装载与车辆池合并
    let existing = std::mem::take(&mut ctx.day_plan_mut(date).truck_loads);
    let mut loads: BTreeMap<i64, TruckLoad> = BTreeMap::new();
    let mut others = Vec::new();
    for load in existing {
        if pool.contains(&load.truck_id) && !loads.contains_key(&load.truck_id) {
            loads.insert(load.truck_id, load);
        } else {
            others.push(load);
        }
    }
    for id in &pool {
        if let Some(truck) = ctx.trucks.get(id) {
            loads.entry(*id).or_insert_with(|| TruckLoad::new(truck));
        }
    }

    let mut remainders = Vec::new();
    for mut demand in demands {
        let candidates = ranked_candidates(ctx, &demand, &pool, &loads, date);
        fill(&mut loads, &mut demand, &candidates, date);

        if !demand.is_consumed() {
            let fallback = fallback_candidates(ctx, &demand, &loads, date);
            fill(&mut loads, &mut demand, &fallback, date);
        }
        if !demand.is_consumed() {
            remainders.push(demand);
        }
    }

    let day = ctx.day_plan_mut(date);
    day.truck_loads = others;
    day.truck_loads
        .extend(loads.into_values().filter(|load| !load.is_empty()));
    for demand in remainders {
        day.add_remainder(demand);
    }
    info!(
        trips = day.total_trips(),
        remainders = day.remaining_demands.len(),
        "单日分配完成"
    );
    day.remaining_demands.len()
}
