// ==========================================
// 车辆积载计划系统 - 简易分配策略
// ==========================================
// 职责: 每日单趟装载，按到达时段偏好排序车辆，能装多少装多少
// 说明: 不提前、不拆分、不启用特派车；未装入的需求当日即成为剩余
// ==========================================

use crate::domain::plan::TruckLoad;
use crate::domain::types::StrategyKind;
use crate::engine::context::AllocationContext;
use crate::engine::events::PlanningPhase;
use crate::engine::normalize::normalize_next_day_arrivals;
use crate::engine::packing::place_whole;
use crate::engine::strategy::AllocationStrategy;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

pub struct SimpleStrategy {
    // 无状态策略
}

impl SimpleStrategy {
    pub fn new() -> Self {
        Self {}
    }

    /// 车辆排序: 符合到达偏好的排在前，其余保持 ID 顺序
    fn ranked_loads(ctx: &AllocationContext<'_>) -> Vec<TruckLoad> {
        let mut trucks: Vec<_> = ctx.trucks.values().collect();
        trucks.sort_by_key(|t| ctx.arrival_preference.rank(t.arrival_day_offset));
        trucks.into_iter().map(TruckLoad::new).collect()
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for SimpleStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Simple
    }

    #[instrument(skip_all, fields(%date))]
    fn assign_day(&self, ctx: &mut AllocationContext<'_>, date: NaiveDate) {
        let demands = ctx.demands_by_day.remove(&date).unwrap_or_default();
        if demands.is_empty() {
            return;
        }
        let mut loads = Self::ranked_loads(ctx);
        let mut remainders = Vec::new();

        for mut demand in demands {
            let placed = loads
                .iter_mut()
                .find_map(|load| place_whole(load, &mut demand, date).map(|p| (load.truck_id, p)));
            match placed {
                Some((truck_id, placement)) => {
                    debug!(demand = %demand.key, truck_id, ?placement, "装载");
                }
                None => remainders.push(demand),
            }
        }

        let day = ctx.day_plan_mut(date);
        day.truck_loads.extend(loads.into_iter().filter(|l| !l.is_empty()));
        for demand in remainders {
            day.add_remainder(demand);
        }
        info!(
            trips = day.total_trips(),
            remainders = day.remaining_demands.len(),
            "单日装载完成"
        );
    }

    fn finalize(&self, ctx: &mut AllocationContext<'_>) {
        let remainders: usize = ctx.day_plans.values().map(|d| d.remaining_demands.len()).sum();
        ctx.phase_completed(PlanningPhase::DailyAssignment, remainders);
        normalize_next_day_arrivals(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::PlanningCalendar;
    use crate::config::PlannerConfig;
    use crate::domain::capacity::Truck;
    use crate::domain::demand::{Demand, DemandKey, ProductRef};
    use crate::domain::types::{ArrivalPreference, WarningSeverity};
    use crate::engine::events::NoOpObserver;
    use std::collections::BTreeMap;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn truck(id: i64, offset: u32, default_use: bool) -> Truck {
        Truck {
            id,
            name: format!("T{}", id),
            width: 2400,
            depth: 10000,
            height: 0,
            arrival_day_offset: offset,
            default_use,
            priority_product_codes: vec![],
        }
    }

    fn demand(product_id: i64, containers: i64, can_advance: bool) -> Demand {
        let product = ProductRef {
            id: product_id,
            product_code: format!("P-{:02}", product_id),
            can_advance,
            ..Default::default()
        };
        let key = DemandKey {
            product_id,
            delivery_date: d(12),
        };
        // 每容器 1 个，6m²
        Demand::new(key, &product, 1, containers, 1, 6.0, false, 1, d(10), vec![1], false)
    }

    fn run(trucks: Vec<Truck>, demands: Vec<Demand>, preference: ArrivalPreference) -> BTreeMap<NaiveDate, crate::domain::plan::DayPlan> {
        let config = PlannerConfig::default();
        let calendar = PlanningCalendar::weekday_fallback();
        let mut ctx = AllocationContext::new(
            &config,
            &calendar,
            &NoOpObserver,
            preference,
            vec![d(10), d(11)],
            trucks.into_iter().map(|t| (t.id, t)).collect(),
            [(d(10), demands)].into_iter().collect(),
        );
        SimpleStrategy::new().run(&mut ctx);
        ctx.day_plans
    }

    // ==========================================
    // 测试用例
    // ==========================================

    #[test]
    fn test_no_split_whole_demand_becomes_remainder() {
        // 5 容器 30m² > 24m²，简易策略不拆分
        let days = run(
            vec![truck(1, 0, true)],
            vec![demand(1, 5, false), demand(2, 4, true)],
            ArrivalPreference::Morning,
        );
        let day = &days[&d(10)];
        assert_eq!(day.truck_loads.len(), 1);
        assert_eq!(day.truck_loads[0].loaded_items[0].demand_key.product_id, 2);
        assert_eq!(day.remaining_demands.len(), 1);
        assert_eq!(day.remaining_demands[0].num_containers, 5);
        assert_eq!(day.warnings[0].severity, WarningSeverity::NotAdvanceable);
    }

    #[test]
    fn test_evening_preference_ranks_next_day_trucks_first() {
        // 偏好晚班: 车辆2 (offset=1) 先装，收尾时前移到前一营业日
        let days = run(
            vec![truck(1, 0, true), truck(2, 1, false)],
            vec![demand(1, 2, true)],
            ArrivalPreference::Evening,
        );
        assert!(days[&d(10)].truck_loads.is_empty());
        let prev = &days[&d(9)];
        assert_eq!(prev.truck_loads[0].truck_id, 2);
        assert!(prev.truck_loads[0].loaded_items[0].adjusted_for_next_day_arrival);
    }

    #[test]
    fn test_morning_preference_uses_same_day_truck() {
        let days = run(
            vec![truck(1, 0, true), truck(2, 1, false)],
            vec![demand(1, 2, true)],
            ArrivalPreference::Morning,
        );
        assert_eq!(days[&d(10)].truck_loads[0].truck_id, 1);
    }
}
