// ==========================================
// 车辆积载计划系统 - 规划输入快照
// ==========================================
// 职责: 一次规划调用的全部输入（值快照，非实时连接）
// ==========================================

use crate::domain::capacity::{Container, Truck};
use crate::domain::demand::{OrderRow, ProductRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningInput {
    #[serde(default)]
    pub orders: Vec<OrderRow>,
    #[serde(default)]
    pub products: Vec<ProductRef>,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub trucks: Vec<Truck>,
}

impl PlanningInput {
    /// 车辆主数据（按 ID 排序，重复 ID 以后者为准）
    pub fn truck_map(&self) -> BTreeMap<i64, Truck> {
        self.trucks.iter().map(|t| (t.id, t.clone())).collect()
    }

    pub fn container_map(&self) -> BTreeMap<i64, Container> {
        self.containers.iter().map(|c| (c.id, c.clone())).collect()
    }

    pub fn product_map(&self) -> BTreeMap<i64, ProductRef> {
        self.products.iter().map(|p| (p.id, p.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_sparse_json() {
        let input: PlanningInput = serde_json::from_str(
            r#"{
                "orders": [{"product_id": "3", "delivery_date": "2026-03-10", "order_quantity": 12.0}],
                "trucks": [{"id": 1, "width": 2400, "depth": 9700}]
            }"#,
        )
        .unwrap();
        assert_eq!(input.orders.len(), 1);
        assert!(input.products.is_empty());
        let trucks = input.truck_map();
        assert_eq!(trucks[&1].arrival_day_offset, 0);
        assert!(!trucks[&1].default_use);
    }
}
