// ==========================================
// 车辆积载计划系统 - 分配上下文
// ==========================================
// 职责: 单次规划调用的全部可变簿记，贯穿各阶段
// 红线: 仅属于一次规划调用，不跨调用共享
// ==========================================

use crate::calendar::PlanningCalendar;
use crate::config::PlannerConfig;
use crate::domain::capacity::Truck;
use crate::domain::demand::Demand;
use crate::domain::plan::DayPlan;
use crate::domain::types::ArrivalPreference;
use crate::engine::events::{PlanningEvent, PlanningObserver, PlanningPhase};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

pub struct AllocationContext<'a> {
    pub config: &'a PlannerConfig,
    pub calendar: &'a PlanningCalendar,
    pub observer: &'a dyn PlanningObserver,
    pub arrival_preference: ArrivalPreference,

    /// 规划窗口（营业日，升序）
    pub window: Vec<NaiveDate>,
    /// 车辆主数据
    pub trucks: BTreeMap<i64, Truck>,
    /// 是否启用非默认车辆（阶段1决定）
    pub use_non_default: bool,

    /// 待分配需求（按装车日）
    pub demands_by_day: BTreeMap<NaiveDate, Vec<Demand>>,
    /// 计划结果（按日期）
    pub day_plans: BTreeMap<NaiveDate, DayPlan>,
}

impl<'a> AllocationContext<'a> {
    pub fn new(
        config: &'a PlannerConfig,
        calendar: &'a PlanningCalendar,
        observer: &'a dyn PlanningObserver,
        arrival_preference: ArrivalPreference,
        window: Vec<NaiveDate>,
        trucks: BTreeMap<i64, Truck>,
        demands_by_day: BTreeMap<NaiveDate, Vec<Demand>>,
    ) -> Self {
        let day_plans = window.iter().map(|d| (*d, DayPlan::default())).collect();
        Self {
            config,
            calendar,
            observer,
            arrival_preference,
            window,
            trucks,
            use_non_default: false,
            demands_by_day,
            day_plans,
        }
    }

    // ==========================================
    // 车辆池
    // ==========================================

    /// 本次运行可用车辆（ID 升序）
    pub fn active_pool(&self) -> Vec<i64> {
        self.trucks
            .values()
            .filter(|t| self.use_non_default || t.default_use)
            .map(|t| t.id)
            .collect()
    }

    /// 非默认车辆（ID 升序）
    pub fn non_default_trucks(&self) -> Vec<i64> {
        self.trucks
            .values()
            .filter(|t| !t.default_use)
            .map(|t| t.id)
            .collect()
    }

    /// 需求可用车辆与车辆池的交集（保持需求列表顺序）
    pub fn eligible_in_pool(&self, demand: &Demand, pool: &[i64]) -> Vec<i64> {
        if demand.eligible_truck_ids.is_empty() {
            return pool.to_vec();
        }
        demand
            .eligible_truck_ids
            .iter()
            .copied()
            .filter(|id| pool.contains(id))
            .collect()
    }

    /// 装车日 + 到达偏移 <= 交货日
    pub fn can_meet_deadline(&self, truck_id: i64, loading_date: NaiveDate, demand: &Demand) -> bool {
        let Some(truck) = self.trucks.get(&truck_id) else {
            return false;
        };
        loading_date
            .checked_add_days(Days::new(u64::from(truck.arrival_day_offset)))
            .is_some_and(|arrival| arrival <= demand.delivery_date)
    }

    /// 可用车辆，赶不上交货日的排在最后（其余保持原顺序）
    pub fn eligible_on_time_first(&self, demand: &Demand, pool: &[i64], loading_date: NaiveDate) -> Vec<i64> {
        let mut trucks = self.eligible_in_pool(demand, pool);
        trucks.sort_by_key(|id| !self.can_meet_deadline(*id, loading_date, demand));
        trucks
    }

    // ==========================================
    // 规划窗口
    // ==========================================

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.window.last().copied()
    }

    pub fn is_final_day(&self, date: NaiveDate) -> bool {
        self.last_day() == Some(date)
    }

    /// 窗口内除最终日外的日期
    pub fn days_before_final(&self) -> Vec<NaiveDate> {
        let n = self.window.len().saturating_sub(1);
        self.window[..n].to_vec()
    }

    pub fn day_plan_mut(&mut self, date: NaiveDate) -> &mut DayPlan {
        self.day_plans.entry(date).or_default()
    }

    // ==========================================
    // 事件
    // ==========================================

    pub fn emit(&self, event: PlanningEvent) {
        self.observer.notify(&event);
    }

    pub fn phase_started(&self, phase: PlanningPhase) {
        self.emit(PlanningEvent::PhaseStarted { phase });
    }

    pub fn phase_completed(&self, phase: PlanningPhase, affected: usize) {
        self.emit(PlanningEvent::PhaseCompleted { phase, affected });
    }
}
