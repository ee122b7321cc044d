// ==========================================
// 车辆积载计划系统 - 需求领域模型
// ==========================================
// 职责: 订单行/产品参考数据 (输入) + Demand (规划单元)
// 红线: num_containers = ceil(requested / capacity)
// ==========================================

use crate::domain::capacity::stacked_floor_area;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// FieldValue - 宽松数值字段
// ==========================================
// 上传数据中的数值列可能是整数、小数或文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// 转为整数；无法解析时返回 None
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            }
        }
    }
}

// ==========================================
// OrderRow - 订单行 (输入快照)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub product_id: Option<FieldValue>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub instruction_date: Option<String>,
    #[serde(default)]
    pub manual_planning_quantity: Option<FieldValue>,
    #[serde(default)]
    pub remaining_quantity: Option<FieldValue>,
    #[serde(default)]
    pub order_quantity: Option<FieldValue>,
    #[serde(default)]
    pub shipped_quantity: Option<FieldValue>,
}

// ==========================================
// ProductRef - 产品参考数据
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: i64,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub product_name: String,
    /// 每容器装载数（缺省/非法按1处理）
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub lead_time_days: i64,
    #[serde(default)]
    pub used_container_id: Option<i64>,
    /// 可用车辆（顺序即优先级；为空时使用默认车辆）
    #[serde(default)]
    pub used_truck_ids: Vec<i64>,
    #[serde(default)]
    pub can_advance: bool,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub group_code: Option<String>,
}

// ==========================================
// DemandKey - 需求标识 (产品, 交货日)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DemandKey {
    pub product_id: i64,
    pub delivery_date: NaiveDate,
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.product_id, self.delivery_date)
    }
}

// ==========================================
// Demand - 规划需求
// ==========================================
// 生命周期: 每次规划调用从快照新建，各阶段就地扣减，
// num_containers 归零即视为消耗完毕
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub key: DemandKey,
    pub product_code: String,
    pub product_name: String,
    pub group_code: Option<String>,
    pub container_id: i64,

    // ===== 数量 =====
    pub requested_quantity: i64,     // 原始需求数量
    pub remaining_quantity: i64,     // 尚未分配数量
    pub num_containers: u32,         // 尚未分配容器数
    pub original_num_containers: u32,
    pub remainder: i64,              // requested mod capacity
    pub surplus: i64,                // capacity - remainder (remainder>0)
    pub capacity_per_container: i64,

    // ===== 底面积 =====
    pub floor_area_per_container: f64,
    pub floor_area_total: f64,       // 剩余容器所需底面积（考虑堆叠）
    pub volume_per_container: f64,   // 单容器体积 (m³)

    // ===== 日期 =====
    pub delivery_date: NaiveDate,
    pub loading_date: NaiveDate,
    /// 提前前的装车日（仅提前过的需求）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_loading_date: Option<NaiveDate>,

    // ===== 约束 =====
    pub eligible_truck_ids: Vec<i64>,
    pub stackable: bool,
    pub max_stack: u32,
    pub can_advance: bool,

    // ===== 状态标志 =====
    pub is_advanced: bool,
    pub is_manually_fixed: bool,
    pub final_day_overflow: bool,
}

impl Demand {
    /// 由需求数量构建（数量 > 0, capacity >= 1）
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: DemandKey,
        product: &ProductRef,
        container_id: i64,
        requested_quantity: i64,
        capacity_per_container: i64,
        floor_area_per_container: f64,
        stackable: bool,
        max_stack: u32,
        loading_date: NaiveDate,
        eligible_truck_ids: Vec<i64>,
        is_manually_fixed: bool,
    ) -> Self {
        let capacity = capacity_per_container.max(1);
        let quantity = requested_quantity.max(0);
        let containers = quantity / capacity + i64::from(quantity % capacity != 0);
        let num_containers = u32::try_from(containers).unwrap_or(u32::MAX);
        let remainder = quantity % capacity;
        let surplus = if remainder > 0 { capacity - remainder } else { 0 };

        let mut demand = Self {
            key,
            product_code: product.product_code.clone(),
            product_name: product.product_name.clone(),
            group_code: product.group_code.clone(),
            container_id,
            requested_quantity: quantity,
            remaining_quantity: quantity,
            num_containers,
            original_num_containers: num_containers,
            remainder,
            surplus,
            capacity_per_container: capacity,
            floor_area_per_container,
            floor_area_total: 0.0,
            volume_per_container: 0.0,
            delivery_date: key.delivery_date,
            loading_date,
            original_loading_date: None,
            eligible_truck_ids,
            stackable,
            max_stack: max_stack.max(1),
            can_advance: product.can_advance && !is_manually_fixed,
            is_advanced: false,
            is_manually_fixed,
            final_day_overflow: false,
        };
        demand.refresh_floor_area();
        demand
    }

    /// 设置单容器体积
    pub fn with_container_volume(mut self, volume: f64) -> Self {
        self.volume_per_container = volume;
        self
    }

    // ==========================================
    // 数量簿记
    // ==========================================

    /// 提前到前一营业日: 改写装车日并记录原装车日
    pub fn advance_to(&mut self, prev: NaiveDate) {
        if self.original_loading_date.is_none() {
            self.original_loading_date = Some(self.loading_date);
        }
        self.loading_date = prev;
        self.is_advanced = true;
    }

    /// 是否已全部分配
    pub fn is_consumed(&self) -> bool {
        self.num_containers == 0
    }

    /// 剩余容器中 k 个对应的数量
    ///
    /// min(k*capacity - slice_surplus, remaining_quantity)，
    /// slice_surplus 仅在本次取走最后一个容器时等于 surplus
    pub fn slice_quantity(&self, containers: u32) -> i64 {
        let k = containers.min(self.num_containers);
        let slice_surplus = if k == self.num_containers { self.surplus } else { 0 };
        i64::from(k)
            .saturating_mul(self.capacity_per_container)
            .saturating_sub(slice_surplus)
            .min(self.remaining_quantity)
            .max(0)
    }

    /// 指定容器数所需底面积（考虑堆叠）
    pub fn area_for(&self, containers: u32) -> f64 {
        stacked_floor_area(
            self.floor_area_per_container,
            containers,
            self.stackable,
            self.max_stack,
        )
    }

    /// 扣减 k 个容器，返回对应数量
    pub fn consume(&mut self, containers: u32) -> i64 {
        let k = containers.min(self.num_containers);
        let quantity = self.slice_quantity(k);
        self.num_containers -= k;
        self.remaining_quantity -= quantity;
        self.refresh_floor_area();
        quantity
    }

    /// 拆出前 k 个容器作为独立需求（不含尾数余量）
    ///
    /// 自身保留剩余部分与 surplus
    pub fn split_off_head(&mut self, containers: u32) -> Demand {
        let k = containers.min(self.num_containers);
        let taking_all = k == self.num_containers;
        let mut head = self.clone();
        let quantity = self.consume(k);

        head.num_containers = k;
        head.remaining_quantity = quantity;
        if !taking_all {
            head.surplus = 0;
        }
        head.refresh_floor_area();
        head
    }

    fn refresh_floor_area(&mut self) {
        self.floor_area_total = self.area_for(self.num_containers);
    }
}
