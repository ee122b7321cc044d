// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use loading_plan::domain::{Container, FieldValue, OrderRow, PlanningInput, ProductRef, Truck};

/// 2026-03 的日期（03-09 为周一）
pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

// ==========================================
// ProductRef 构建器
// ==========================================

pub struct ProductBuilder {
    product: ProductRef,
}

impl ProductBuilder {
    /// 默认: 每容器 10 个，使用容器 1，提前期 0
    pub fn new(id: i64) -> Self {
        Self {
            product: ProductRef {
                id,
                product_code: format!("P-{:03}", id),
                product_name: format!("产品{}", id),
                capacity: Some(10),
                used_container_id: Some(1),
                ..Default::default()
            },
        }
    }

    pub fn capacity(mut self, capacity: i64) -> Self {
        self.product.capacity = Some(capacity);
        self
    }

    pub fn container(mut self, container_id: i64) -> Self {
        self.product.used_container_id = Some(container_id);
        self
    }

    pub fn trucks(mut self, truck_ids: &[i64]) -> Self {
        self.product.used_truck_ids = truck_ids.to_vec();
        self
    }

    pub fn lead_time(mut self, days: i64) -> Self {
        self.product.lead_time_days = days;
        self
    }

    pub fn can_advance(mut self) -> Self {
        self.product.can_advance = true;
        self
    }

    pub fn stackable(mut self) -> Self {
        self.product.stackable = true;
        self
    }

    pub fn group(mut self, group_code: &str) -> Self {
        self.product.group_code = Some(group_code.to_string());
        self
    }

    pub fn build(self) -> ProductRef {
        self.product
    }
}

// ==========================================
// Truck 构建器
// ==========================================

pub struct TruckBuilder {
    truck: Truck,
}

impl TruckBuilder {
    /// 默认: 2400mm x 10000mm (24m²)，当日到达，默认车辆
    pub fn new(id: i64) -> Self {
        Self {
            truck: Truck {
                id,
                name: format!("车辆{}", id),
                width: 2400,
                depth: 10000,
                height: 2500,
                arrival_day_offset: 0,
                default_use: true,
                priority_product_codes: vec![],
            },
        }
    }

    pub fn size(mut self, width: u32, depth: u32) -> Self {
        self.truck.width = width;
        self.truck.depth = depth;
        self
    }

    pub fn next_day(mut self) -> Self {
        self.truck.arrival_day_offset = 1;
        self
    }

    pub fn non_default(mut self) -> Self {
        self.truck.default_use = false;
        self
    }

    pub fn priority(mut self, codes: &[&str]) -> Self {
        self.truck.priority_product_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn build(self) -> Truck {
        self.truck
    }
}

/// 2000mm x 3000mm (6m²) 容器
pub fn container_6m2(id: i64) -> Container {
    Container {
        id,
        name: format!("容器{}", id),
        width: 2000,
        depth: 3000,
        height: 1000,
        stackable: false,
        max_stack: 1,
    }
}

/// 可堆叠 6m² 容器
pub fn stackable_container(id: i64, max_stack: u32) -> Container {
    Container {
        stackable: true,
        max_stack,
        ..container_6m2(id)
    }
}

// ==========================================
// PlanningInput 构建器
// ==========================================

#[derive(Default)]
pub struct SnapshotBuilder {
    input: PlanningInput,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product: ProductRef) -> Self {
        self.input.products.push(product);
        self
    }

    pub fn container(mut self, container: Container) -> Self {
        self.input.containers.push(container);
        self
    }

    pub fn truck(mut self, truck: Truck) -> Self {
        self.input.trucks.push(truck);
        self
    }

    pub fn order(mut self, product_id: i64, delivery: NaiveDate, quantity: i64) -> Self {
        self.input.orders.push(OrderRow {
            product_id: Some(FieldValue::Integer(product_id)),
            delivery_date: Some(delivery.format("%Y-%m-%d").to_string()),
            order_quantity: Some(FieldValue::Integer(quantity)),
            ..Default::default()
        });
        self
    }

    pub fn manual_order(mut self, product_id: i64, delivery: NaiveDate, quantity: i64) -> Self {
        self.input.orders.push(OrderRow {
            product_id: Some(FieldValue::Integer(product_id)),
            delivery_date: Some(delivery.format("%Y/%m/%d").to_string()),
            manual_planning_quantity: Some(FieldValue::Integer(quantity)),
            ..Default::default()
        });
        self
    }

    pub fn raw_order(mut self, row: OrderRow) -> Self {
        self.input.orders.push(row);
        self
    }

    pub fn build(self) -> PlanningInput {
        self.input
    }
}
