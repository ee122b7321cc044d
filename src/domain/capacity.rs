// ==========================================
// 车辆积载计划系统 - 容量模型
// ==========================================
// 职责: 容器/车辆参考数据 + 底面积与堆叠计算
// 红线: 容量以底面积 (m²) 计算，不以体积计算
// ==========================================

use serde::{Deserialize, Serialize};

/// mm² -> m²
pub const MM2_TO_M2: f64 = 1_000_000.0;
/// mm³ -> m³
pub const MM3_TO_M3: f64 = 1_000_000_000.0;
/// 底面积比较容差
pub const AREA_EPSILON: f64 = 1e-9;

// ==========================================
// Container - 容器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub width: u32,  // 宽 (mm)
    pub depth: u32,  // 深 (mm)
    #[serde(default)]
    pub height: u32, // 高 (mm)
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

fn default_max_stack() -> u32 {
    1
}

impl Container {
    /// 单个容器底面积 (m²)
    pub fn floor_area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.depth) / MM2_TO_M2
    }

    /// 单个容器体积 (m³)
    pub fn volume(&self) -> f64 {
        f64::from(self.width) * f64::from(self.depth) * f64::from(self.height) / MM3_TO_M3
    }

    /// 堆叠上限（至少为1）
    pub fn effective_max_stack(&self) -> u32 {
        self.max_stack.max(1)
    }
}

// ==========================================
// Truck - 车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub depth: u32,
    #[serde(default)]
    pub height: u32,
    /// 0=当日到达, 1=次日到达
    #[serde(default)]
    pub arrival_day_offset: u32,
    #[serde(default)]
    pub default_use: bool,
    #[serde(default)]
    pub priority_product_codes: Vec<String>,
}

impl Truck {
    /// 车厢底面积 (m²)
    pub fn floor_area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.depth) / MM2_TO_M2
    }

    /// 车厢容积 (m³)
    pub fn volume(&self) -> f64 {
        f64::from(self.width) * f64::from(self.depth) * f64::from(self.height) / MM3_TO_M3
    }

    /// 是否为该产品的优先装载车辆
    pub fn prioritizes(&self, product_code: &str) -> bool {
        self.priority_product_codes
            .iter()
            .any(|code| code.trim() == product_code)
    }

    /// 次日到达车辆
    pub fn arrives_next_day(&self) -> bool {
        self.arrival_day_offset == 1
    }
}

// ==========================================
// 堆叠计算
// ==========================================

/// 占用的底面位置数
///
/// 可堆叠且 max_stack>1 时为 ceil(n / max_stack)，否则为 n
pub fn stacked_slots(num_containers: u32, stackable: bool, max_stack: u32) -> u32 {
    if stackable && max_stack > 1 {
        num_containers.div_ceil(max_stack)
    } else {
        num_containers
    }
}

/// 指定数量容器所需底面积 (m²)
pub fn stacked_floor_area(
    floor_area_per_container: f64,
    num_containers: u32,
    stackable: bool,
    max_stack: u32,
) -> f64 {
    floor_area_per_container * f64::from(stacked_slots(num_containers, stackable, max_stack))
}

/// 向已有同容器组追加时新增的底面积
pub fn incremental_floor_area(
    floor_area_per_container: f64,
    existing: u32,
    additional: u32,
    stackable: bool,
    max_stack: u32,
) -> f64 {
    let before = stacked_slots(existing, stackable, max_stack);
    let after = stacked_slots(existing.saturating_add(additional), stackable, max_stack);
    floor_area_per_container * f64::from(after - before)
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: 装载判定的底面积约束接口
pub trait CapacityConstraint {
    /// 车厢总底面积
    fn total_floor_area(&self) -> f64;

    /// 已占用底面积（考虑堆叠）
    fn loaded_floor_area(&self) -> f64;

    /// 剩余底面积
    fn remaining_floor_area(&self) -> f64 {
        (self.total_floor_area() - self.loaded_floor_area()).max(0.0)
    }

    /// 是否可再占用指定底面积
    fn can_occupy(&self, area: f64) -> bool {
        area <= self.remaining_floor_area() + AREA_EPSILON
    }

    /// 底面积利用率 (0.0 ~ 1.0)
    fn utilization(&self) -> f64 {
        let total = self.total_floor_area();
        if total > 0.0 {
            self.loaded_floor_area() / total
        } else {
            0.0
        }
    }
}
