// ==========================================
// 车辆积载计划系统 - 次日到达调整
// ==========================================
// 职责: arrival_day_offset=1 的车辆装载记录整体前移到前一营业日
// 说明: 客户收货日不变，不属于提前配送，不受 can_advance 约束
// ==========================================

use crate::calendar::previous_working_day;
use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningPhase};
use tracing::{debug, info};

/// 次日到达调整（两种策略共用的收尾步骤）
///
/// 返回前移的装载数
pub fn normalize_next_day_arrivals(ctx: &mut AllocationContext<'_>) -> usize {
    ctx.phase_started(PlanningPhase::NextDayArrival);
    let max_search = ctx.config.max_working_day_search;
    let dates: Vec<_> = ctx.day_plans.keys().copied().collect();
    let mut shifted = 0;

    for date in dates {
        let Some(day) = ctx.day_plans.get_mut(&date) else {
            continue;
        };

        let (to_move, stay): (Vec<_>, Vec<_>) =
            std::mem::take(&mut day.truck_loads).into_iter().partition(|load| {
                let next_day = ctx
                    .trucks
                    .get(&load.truck_id)
                    .is_some_and(|truck| truck.arrives_next_day());
                let already_adjusted = !load.loaded_items.is_empty()
                    && load
                        .loaded_items
                        .iter()
                        .all(|item| item.adjusted_for_next_day_arrival);
                next_day && !already_adjusted
            });
        day.truck_loads = stay;

        if to_move.is_empty() {
            continue;
        }
        let prev = previous_working_day(ctx.calendar, date, max_search);
        for mut load in to_move {
            for item in &mut load.loaded_items {
                item.loading_date = prev;
                item.adjusted_for_next_day_arrival = true;
            }
            debug!(truck_id = load.truck_id, from = %date, to = %prev, "装载记录前移");
            ctx.emit(PlanningEvent::LoadShifted {
                truck_id: load.truck_id,
                from: date,
                to: prev,
            });
            ctx.day_plan_mut(prev).truck_loads.push(load);
            shifted += 1;
        }
    }

    info!(shifted, "次日到达调整完成");
    ctx.phase_completed(PlanningPhase::NextDayArrival, shifted);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::PlanningCalendar;
    use crate::config::PlannerConfig;
    use crate::domain::capacity::Truck;
    use crate::domain::demand::{Demand, DemandKey, ProductRef};
    use crate::domain::plan::TruckLoad;
    use crate::domain::types::ArrivalPreference;
    use crate::engine::events::NoOpObserver;
    use crate::engine::packing::place_whole;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn truck(id: i64, offset: u32) -> Truck {
        Truck {
            id,
            name: format!("T{}", id),
            width: 2400,
            depth: 10000,
            height: 0,
            arrival_day_offset: offset,
            default_use: true,
            priority_product_codes: vec![],
        }
    }

    fn loaded(truck: &Truck, date: NaiveDate) -> TruckLoad {
        let product = ProductRef {
            id: 1,
            product_code: "P-01".to_string(),
            ..Default::default()
        };
        let key = DemandKey {
            product_id: 1,
            delivery_date: d(11),
        };
        let mut demand = Demand::new(key, &product, 1, 10, 10, 6.0, false, 1, date, vec![], false);
        let mut load = TruckLoad::new(truck);
        place_whole(&mut load, &mut demand, date);
        load
    }

    #[test]
    fn test_next_day_loads_move_to_previous_working_day() {
        let config = PlannerConfig::default();
        let calendar = PlanningCalendar::weekday_fallback();
        let trucks: BTreeMap<i64, Truck> =
            [(1, truck(1, 0)), (2, truck(2, 1))].into_iter().collect();
        // 03-09 周一 -> 前一营业日 03-06 周五
        let mut ctx = AllocationContext::new(
            &config,
            &calendar,
            &NoOpObserver,
            ArrivalPreference::Morning,
            vec![d(9), d(10)],
            trucks.clone(),
            BTreeMap::new(),
        );
        ctx.day_plan_mut(d(9)).truck_loads = vec![loaded(&trucks[&1], d(9)), loaded(&trucks[&2], d(9))];
        ctx.day_plan_mut(d(10)).truck_loads = vec![loaded(&trucks[&2], d(10))];

        assert_eq!(normalize_next_day_arrivals(&mut ctx), 2);

        let monday = &ctx.day_plans[&d(9)];
        assert_eq!(monday.truck_loads.len(), 2);
        assert_eq!(monday.truck_loads[0].truck_id, 1);
        assert_eq!(monday.truck_loads[1].truck_id, 2);
        assert!(monday.truck_loads[1].loaded_items[0].adjusted_for_next_day_arrival);
        assert_eq!(monday.truck_loads[1].loaded_items[0].loading_date, d(9));

        let friday = &ctx.day_plans[&d(6)];
        assert_eq!(friday.truck_loads.len(), 1);
        let item = &friday.truck_loads[0].loaded_items[0];
        assert_eq!(item.loading_date, d(6));
        assert_eq!(item.delivery_date, d(11));
        assert!(ctx.day_plans[&d(10)].truck_loads.is_empty());

        // 再次执行不重复前移
        assert_eq!(normalize_next_day_arrivals(&mut ctx), 0);
    }
}
