// ==========================================
// 车辆积载计划系统 - 装载原语
// ==========================================
// 职责: 两种策略共用的装载判定与切片装载
// 红线: 每次装载前校验新增底面积 <= 剩余底面积
// ==========================================

use crate::domain::capacity::{CapacityConstraint, AREA_EPSILON};
use crate::domain::demand::Demand;
use crate::domain::plan::{LoadedItem, TruckLoad};
use chrono::NaiveDate;

/// 装载方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// 与车上同种容器合并堆叠
    StackMerged(u32),
    /// 整单装入
    FullFit(u32),
    /// 拆分装入部分容器
    Split(u32),
}

impl Placement {
    pub fn containers(&self) -> u32 {
        match self {
            Placement::StackMerged(n) | Placement::FullFit(n) | Placement::Split(n) => *n,
        }
    }
}

/// 同种容器合并堆叠是否可容纳需求剩余全部容器
pub fn can_stack_merge(load: &TruckLoad, demand: &Demand) -> bool {
    demand.stackable
        && demand.num_containers > 0
        && load.containers_in_group(demand.container_id, true) > 0
        && load.can_occupy(load.incremental_area(demand, demand.num_containers))
}

/// 整单（不拆分）是否可装入
pub fn can_full_fit(load: &TruckLoad, demand: &Demand) -> bool {
    demand.num_containers > 0 && load.can_occupy(demand.floor_area_total)
}

/// 剩余底面积下最多可装容器数
///
/// 可堆叠: floor(剩余/单位面积) * max_stack，否则 floor(剩余/单位面积)；
/// 截断到需求剩余容器数后逐一递减直至新增底面积可容纳
pub fn max_loadable(load: &TruckLoad, demand: &Demand) -> u32 {
    if demand.num_containers == 0 {
        return 0;
    }
    let per = demand.floor_area_per_container;
    if per <= 0.0 {
        return demand.num_containers;
    }
    let remaining = load.remaining_floor_area();
    let slots = ((remaining + AREA_EPSILON) / per).floor();
    let slots = if slots >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        slots as u32
    };
    let base = if demand.stackable && demand.max_stack > 1 {
        slots.saturating_mul(demand.max_stack)
    } else {
        slots
    };

    let mut k = base.min(demand.num_containers);
    while k > 0 && !load.can_occupy(load.incremental_area(demand, k)) {
        k -= 1;
    }
    k
}

/// 装入 k 个容器：生成明细快照并扣减需求
pub fn load_slice<'a>(
    load: &'a mut TruckLoad,
    demand: &mut Demand,
    containers: u32,
    loading_date: NaiveDate,
) -> &'a mut LoadedItem {
    let item = LoadedItem::slice_of(demand, containers, loading_date);
    demand.consume(item.num_containers);
    load.push(item);
    let idx = load.loaded_items.len() - 1;
    &mut load.loaded_items[idx]
}

/// 整单装载：先尝试合并堆叠，再尝试整单装入
pub fn place_whole(
    load: &mut TruckLoad,
    demand: &mut Demand,
    loading_date: NaiveDate,
) -> Option<Placement> {
    let n = demand.num_containers;
    let placement = if can_stack_merge(load, demand) {
        Placement::StackMerged(n)
    } else if can_full_fit(load, demand) {
        Placement::FullFit(n)
    } else {
        return None;
    };
    load_slice(load, demand, n, loading_date);
    Some(placement)
}

/// 尽量装载：整单不行时拆分装入可容纳部分
pub fn place_greedy(
    load: &mut TruckLoad,
    demand: &mut Demand,
    loading_date: NaiveDate,
) -> Option<Placement> {
    if let Some(placement) = place_whole(load, demand, loading_date) {
        return Some(placement);
    }
    let k = max_loadable(load, demand);
    if k == 0 {
        return None;
    }
    load_slice(load, demand, k, loading_date);
    Some(Placement::Split(k))
}
