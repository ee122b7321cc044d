// ==========================================
// 车辆积载计划系统 - 积载计划领域模型
// ==========================================
// 职责: 输出聚合 Plan -> DayPlan -> TruckLoad -> LoadedItem
// 红线: TruckLoad 已占底面积（考虑堆叠）不得超过车厢底面积
// ==========================================

use crate::domain::capacity::{
    incremental_floor_area, stacked_floor_area, CapacityConstraint, Truck,
};
use crate::domain::demand::{Demand, DemandKey};
use crate::domain::types::{PlanStatus, StrategyKind, WarningSeverity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// LoadedItem - 装载明细 (需求切片的值快照)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedItem {
    pub demand_key: DemandKey,
    pub product_code: String,
    pub product_name: String,
    pub container_id: i64,
    pub num_containers: u32,
    pub quantity: i64,
    pub capacity_per_container: i64,
    pub floor_area: f64,              // 本切片单独所需底面积
    pub floor_area_per_container: f64,
    pub volume_per_container: f64,
    pub stackable: bool,
    pub max_stack: u32,
    pub delivery_date: NaiveDate,
    pub loading_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_loading_date: Option<NaiveDate>,

    // ===== 标志 =====
    pub is_advanced: bool,
    pub is_special_delivery: bool,
    pub adjusted_for_next_day_arrival: bool,
}

impl LoadedItem {
    /// 从需求剩余部分切出 k 个容器（不修改需求）
    pub fn slice_of(demand: &Demand, containers: u32, loading_date: NaiveDate) -> Self {
        let k = containers.min(demand.num_containers);
        Self {
            demand_key: demand.key,
            product_code: demand.product_code.clone(),
            product_name: demand.product_name.clone(),
            container_id: demand.container_id,
            num_containers: k,
            quantity: demand.slice_quantity(k),
            capacity_per_container: demand.capacity_per_container,
            floor_area: demand.area_for(k),
            floor_area_per_container: demand.floor_area_per_container,
            volume_per_container: demand.volume_per_container,
            stackable: demand.stackable,
            max_stack: demand.max_stack,
            delivery_date: demand.delivery_date,
            loading_date,
            original_loading_date: demand.original_loading_date,
            is_advanced: demand.is_advanced,
            is_special_delivery: false,
            adjusted_for_next_day_arrival: false,
        }
    }

    fn group_key(&self) -> (i64, bool) {
        (self.container_id, self.stackable)
    }
}

// ==========================================
// TruckLoad - 单车装载累加器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckLoad {
    pub truck_id: i64,
    pub truck_name: String,
    pub total_floor_area: f64,
    pub total_volume: f64,
    pub loaded_items: Vec<LoadedItem>,
    pub loaded_container_ids: BTreeSet<i64>,

    // ===== 利用率 (%, 保留1位小数) =====
    pub floor_area_utilization_pct: f64,
    pub volume_utilization_pct: f64,
}

impl TruckLoad {
    pub fn new(truck: &Truck) -> Self {
        Self {
            truck_id: truck.id,
            truck_name: truck.name.clone(),
            total_floor_area: truck.floor_area(),
            total_volume: truck.volume(),
            loaded_items: Vec::new(),
            loaded_container_ids: BTreeSet::new(),
            floor_area_utilization_pct: 0.0,
            volume_utilization_pct: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.loaded_items.is_empty()
    }

    /// 同一堆叠组中已装载容器数
    pub fn containers_in_group(&self, container_id: i64, stackable: bool) -> u32 {
        self.loaded_items
            .iter()
            .filter(|item| item.group_key() == (container_id, stackable))
            .map(|item| item.num_containers)
            .sum()
    }

    /// 是否已装有同种容器
    pub fn carries_container(&self, container_id: i64) -> bool {
        self.loaded_container_ids.contains(&container_id)
    }

    /// 追加 k 个需求容器所需的新增底面积（与已有同组容器合并堆叠）
    pub fn incremental_area(&self, demand: &Demand, containers: u32) -> f64 {
        let existing = self.containers_in_group(demand.container_id, demand.stackable);
        incremental_floor_area(
            demand.floor_area_per_container,
            existing,
            containers,
            demand.stackable,
            demand.max_stack,
        )
    }

    /// 追加装载明细并刷新利用率
    pub fn push(&mut self, item: LoadedItem) {
        self.loaded_container_ids.insert(item.container_id);
        self.loaded_items.push(item);
        self.refresh_utilization();
    }

    /// 已装载容器体积
    pub fn loaded_volume(&self) -> f64 {
        self.loaded_items
            .iter()
            .map(|item| item.volume_per_container * f64::from(item.num_containers))
            .sum()
    }

    pub fn refresh_utilization(&mut self) {
        self.floor_area_utilization_pct = round_pct(self.utilization());
        self.volume_utilization_pct = if self.total_volume > 0.0 {
            round_pct(self.loaded_volume() / self.total_volume)
        } else {
            0.0
        };
    }
}

impl CapacityConstraint for TruckLoad {
    fn total_floor_area(&self) -> f64 {
        self.total_floor_area
    }

    /// 按 (容器, 可堆叠) 分组求堆叠后底面积
    fn loaded_floor_area(&self) -> f64 {
        let mut groups: BTreeMap<(i64, bool), (u32, f64, u32)> = BTreeMap::new();
        for item in &self.loaded_items {
            let entry = groups
                .entry(item.group_key())
                .or_insert((0, item.floor_area_per_container, item.max_stack));
            entry.0 += item.num_containers;
        }
        groups
            .iter()
            .map(|(&(_, stackable), &(count, per, max_stack))| {
                stacked_floor_area(per, count, stackable, max_stack)
            })
            .sum()
    }
}

fn round_pct(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 10.0
}

// ==========================================
// PlanWarning - 积载警告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    pub severity: WarningSeverity,
    pub demand_key: DemandKey,
    pub product_code: String,
    pub num_containers: u32,
    pub quantity: i64,
    pub message: String,
}

impl PlanWarning {
    /// 根据需求剩余状态生成警告
    pub fn for_remainder(demand: &Demand) -> Self {
        let severity = if demand.final_day_overflow {
            WarningSeverity::FinalDayOverflow
        } else {
            WarningSeverity::for_remainder(demand.can_advance)
        };
        let detail = format!(
            "{} ({}容器={}个)",
            demand.product_code, demand.num_containers, demand.remaining_quantity
        );
        let message = match severity {
            WarningSeverity::FinalDayOverflow => {
                format!("最终日容量不足: {} 需追加非默认车辆", detail)
            }
            WarningSeverity::Advanceable => format!("积载剩余: {} 可提前配送", detail),
            WarningSeverity::NotAdvanceable => format!("积载剩余: {} 不可提前", detail),
        };
        Self {
            severity,
            demand_key: demand.key,
            product_code: demand.product_code.clone(),
            num_containers: demand.num_containers,
            quantity: demand.remaining_quantity,
            message,
        }
    }
}

// ==========================================
// DayPlan - 单日计划
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub truck_loads: Vec<TruckLoad>,
    pub warnings: Vec<PlanWarning>,
    pub remaining_demands: Vec<Demand>,
}

impl DayPlan {
    pub fn total_trips(&self) -> usize {
        self.truck_loads.iter().filter(|load| !load.is_empty()).count()
    }

    /// 登记剩余需求及其警告
    pub fn add_remainder(&mut self, demand: Demand) {
        self.warnings.push(PlanWarning::for_remainder(&demand));
        self.remaining_demands.push(demand);
    }

    /// 按需求标识移除剩余需求及对应警告
    pub fn remove_remainder(&mut self, key: &DemandKey) -> Option<Demand> {
        let pos = self.remaining_demands.iter().position(|d| d.key == *key)?;
        self.warnings.retain(|w| w.demand_key != *key);
        Some(self.remaining_demands.remove(pos))
    }

    /// 以最新需求状态重建警告
    pub fn rebuild_warnings(&mut self) {
        self.warnings = self
            .remaining_demands
            .iter()
            .map(PlanWarning::for_remainder)
            .collect();
    }

    pub fn load_index(&self, truck_id: i64) -> Option<usize> {
        self.truck_loads.iter().position(|load| load.truck_id == truck_id)
    }

    /// 取得指定车辆的装载；不存在时新建
    pub fn load_for(&mut self, truck: &Truck) -> &mut TruckLoad {
        let idx = match self.load_index(truck.id) {
            Some(idx) => idx,
            None => {
                self.truck_loads.push(TruckLoad::new(truck));
                self.truck_loads.len() - 1
            }
        };
        &mut self.truck_loads[idx]
    }

    /// 未使用车辆不计入计划
    pub fn drop_empty_loads(&mut self) {
        self.truck_loads.retain(|load| !load.is_empty());
    }
}

// ==========================================
// PlanSummary / PlanPeriod
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_days: usize,
    pub total_trips: usize,
    pub total_warnings: usize,
    pub unallocated_count: usize,
    pub status: PlanStatus,
}

impl PlanSummary {
    pub fn from_days(days: &BTreeMap<NaiveDate, DayPlan>, total_days: usize) -> Self {
        let total_trips = days.values().map(DayPlan::total_trips).sum();
        let total_warnings = days.values().map(|d| d.warnings.len()).sum();
        let unallocated_count = days.values().map(|d| d.remaining_demands.len()).sum();
        Self {
            total_days,
            total_trips,
            total_warnings,
            unallocated_count,
            status: if total_warnings == 0 {
                PlanStatus::Normal
            } else {
                PlanStatus::Warning
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ==========================================
// Plan - 积载计划 (输出聚合)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub strategy: StrategyKind,
    pub working_dates: Vec<NaiveDate>,
    pub period: Option<PlanPeriod>,
    pub use_non_default_trucks: bool,
    pub days: BTreeMap<NaiveDate, DayPlan>,
    pub summary: PlanSummary,
}

impl Plan {
    /// 全部剩余需求（按日期顺序）
    pub fn remainders(&self) -> impl Iterator<Item = (&NaiveDate, &Demand)> {
        self.days
            .iter()
            .flat_map(|(date, day)| day.remaining_demands.iter().map(move |d| (date, d)))
    }

    /// 全部装载明细（按日期顺序）
    pub fn loaded_items(&self) -> impl Iterator<Item = (&NaiveDate, &TruckLoad, &LoadedItem)> {
        self.days.iter().flat_map(|(date, day)| {
            day.truck_loads
                .iter()
                .flat_map(move |load| load.loaded_items.iter().map(move |item| (date, load, item)))
        })
    }

    /// 指定需求已分配容器总数
    pub fn allocated_containers(&self, key: &DemandKey) -> u32 {
        self.loaded_items()
            .filter(|(_, _, item)| item.demand_key == *key)
            .map(|(_, _, item)| item.num_containers)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::demand::ProductRef;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn truck_24m2() -> Truck {
        Truck {
            id: 1,
            name: "4t-A".to_string(),
            width: 2400,
            depth: 10000,
            height: 2000,
            arrival_day_offset: 0,
            default_use: true,
            priority_product_codes: vec![],
        }
    }

    fn demand(product_id: i64, quantity: i64, stackable: bool, max_stack: u32) -> Demand {
        let product = ProductRef {
            id: product_id,
            product_code: format!("P-{:02}", product_id),
            capacity: Some(10),
            can_advance: true,
            ..Default::default()
        };
        let key = DemandKey {
            product_id,
            delivery_date: date(10),
        };
        Demand::new(key, &product, 7, quantity, 10, 6.0, stackable, max_stack, date(10), vec![1], false)
            .with_container_volume(6.0)
    }

    // ==========================================
    // 测试用例
    // ==========================================

    #[test]
    fn test_loaded_area_groups_stackable_items() {
        let mut load = TruckLoad::new(&truck_24m2());
        let a = demand(1, 10, true, 2);
        let b = demand(2, 10, true, 2);
        load.push(LoadedItem::slice_of(&a, 1, date(10)));
        // 同组第二个容器叠放，不增加底面积
        assert_eq!(load.incremental_area(&b, 1), 0.0);
        load.push(LoadedItem::slice_of(&b, 1, date(10)));
        assert!((load.loaded_floor_area() - 6.0).abs() < 1e-9);
        assert!((load.floor_area_utilization_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_utilization() {
        let mut load = TruckLoad::new(&truck_24m2());
        let a = demand(1, 20, false, 1);
        load.push(LoadedItem::slice_of(&a, 2, date(10)));
        // 2 * 6m³ / 48m³
        assert!((load.volume_utilization_pct - 25.0).abs() < 1e-9);
        assert!((load.remaining_floor_area() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_remainder_clears_warning() {
        let mut day = DayPlan::default();
        let a = demand(1, 10, false, 1);
        let key = a.key;
        day.add_remainder(a);
        assert_eq!(day.warnings.len(), 1);
        assert_eq!(day.warnings[0].severity, WarningSeverity::Advanceable);

        assert!(day.remove_remainder(&key).is_some());
        assert!(day.warnings.is_empty());
        assert!(day.remaining_demands.is_empty());
        assert!(day.remove_remainder(&key).is_none());
    }

    #[test]
    fn test_summary_status() {
        let mut days = BTreeMap::new();
        days.insert(date(9), DayPlan::default());
        let summary = PlanSummary::from_days(&days, 1);
        assert_eq!(summary.status, PlanStatus::Normal);

        let mut day = DayPlan::default();
        day.add_remainder(demand(1, 10, false, 1));
        days.insert(date(10), day);
        let summary = PlanSummary::from_days(&days, 2);
        assert_eq!(summary.status, PlanStatus::Warning);
        assert_eq!(summary.unallocated_count, 1);
        assert_eq!(summary.total_warnings, 1);
    }
}
