// ==========================================
// 车辆积载计划系统 - 需求汇总引擎
// ==========================================
// 职责: 订单行 + 产品/容器参考数据 -> 按装车日分组的 Demand
// 输入: PlanningInput 快照 + 日历 + 规划窗口
// 输出: demands_by_day + AggregationReport
// 红线: 业务数据异常只跳过该行，不报错
// ==========================================

use crate::calendar::{loading_date_for, PlanningCalendar};
use crate::config::{PlannerConfig, PlanningProfile};
use crate::domain::capacity::{Container, Truck};
use crate::domain::demand::{Demand, DemandKey, FieldValue, OrderRow, ProductRef};
use crate::domain::snapshot::PlanningInput;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// 跳过原因统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub rows_total: usize,
    pub skipped_unknown_product: usize,
    pub skipped_bad_date: usize,
    pub skipped_unmapped_container: usize,
    pub skipped_non_positive_quantity: usize,
    pub skipped_group_filter: usize,
    /// 合并后数量超出 i64 范围
    pub skipped_quantity_overflow: usize,
    /// 合并后装车日落在窗口外的需求数
    pub demands_outside_window: usize,
    pub demands_created: usize,
}

impl AggregationReport {
    pub fn rows_skipped(&self) -> usize {
        self.skipped_unknown_product
            + self.skipped_bad_date
            + self.skipped_unmapped_container
            + self.skipped_non_positive_quantity
            + self.skipped_group_filter
            + self.skipped_quantity_overflow
    }
}

/// 汇总结果
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub demands_by_day: BTreeMap<NaiveDate, Vec<Demand>>,
    pub report: AggregationReport,
}

impl Aggregation {
    /// 全部需求底面积合计
    pub fn total_floor_area(&self) -> f64 {
        self.demands_by_day
            .values()
            .flatten()
            .map(|d| d.floor_area_total)
            .sum()
    }
}

/// 合并中的需求累计
struct PendingDemand {
    quantity: i64,
    manual: bool,
}

// ==========================================
// DemandAggregator - 需求汇总引擎
// ==========================================
pub struct DemandAggregator {
    // 无状态引擎
}

impl DemandAggregator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 汇总订单行
    ///
    /// 1) 解析产品/交货日/数量，异常行跳过
    /// 2) 同一 (产品, 交货日) 合并为一条需求
    /// 3) 按营业日推算装车日，窗口外丢弃
    #[instrument(skip_all, fields(rows = input.orders.len(), days = window.len()))]
    pub fn aggregate(
        &self,
        input: &PlanningInput,
        calendar: &PlanningCalendar,
        window: &[NaiveDate],
        config: &PlannerConfig,
        profile: Option<&PlanningProfile>,
    ) -> Aggregation {
        let products = input.product_map();
        let containers = input.container_map();
        let trucks = input.truck_map();
        let window_set: BTreeSet<NaiveDate> = window.iter().copied().collect();

        let mut report = AggregationReport {
            rows_total: input.orders.len(),
            ..Default::default()
        };

        // 1. 行级解析 + 合并（保持首次出现顺序）
        let mut order: Vec<DemandKey> = Vec::new();
        let mut pending: HashMap<DemandKey, PendingDemand> = HashMap::new();

        for (row_idx, row) in input.orders.iter().enumerate() {
            let Some(product) = row
                .product_id
                .as_ref()
                .and_then(FieldValue::as_i64)
                .and_then(|id| products.get(&id))
            else {
                report.skipped_unknown_product += 1;
                debug!(row = row_idx, "跳过: 产品未登记");
                continue;
            };

            if let Some(profile) = profile {
                if !profile.includes_group(product.group_code.as_deref()) {
                    report.skipped_group_filter += 1;
                    continue;
                }
            }

            let Some(delivery_date) = Self::delivery_date(row) else {
                report.skipped_bad_date += 1;
                debug!(row = row_idx, product_id = product.id, "跳过: 交货日无法解析");
                continue;
            };

            if Self::container_of(product, &containers).is_none() {
                report.skipped_unmapped_container += 1;
                debug!(row = row_idx, product_id = product.id, "跳过: 容器未映射");
                continue;
            }

            let (quantity, manual) = Self::resolve_quantity(row);
            if quantity <= 0 {
                report.skipped_non_positive_quantity += 1;
                continue;
            }

            let key = DemandKey {
                product_id: product.id,
                delivery_date,
            };
            let entry = pending.entry(key).or_insert_with(|| {
                order.push(key);
                PendingDemand {
                    quantity: 0,
                    manual: false,
                }
            });
            let Some(total) = entry.quantity.checked_add(quantity) else {
                report.skipped_quantity_overflow += 1;
                debug!(row = row_idx, demand = %key, "跳过: 合并数量溢出");
                continue;
            };
            entry.quantity = total;
            entry.manual |= manual;
        }

        // 2. 构建需求并按装车日分组
        let mut demands_by_day: BTreeMap<NaiveDate, Vec<Demand>> = BTreeMap::new();
        for key in order {
            let Some(merged) = pending.get(&key) else {
                continue;
            };
            let Some(product) = products.get(&key.product_id) else {
                continue;
            };
            let Some(container) = Self::container_of(product, &containers) else {
                continue;
            };

            let loading_date = loading_date_for(
                calendar,
                key.delivery_date,
                product.lead_time_days,
                config.lead_time_search_limit,
                config.max_working_day_search,
            );
            if !window_set.contains(&loading_date) {
                report.demands_outside_window += 1;
                debug!(demand = %key, %loading_date, "装车日不在规划窗口内");
                continue;
            }

            let demand = Self::build_demand(
                key,
                product,
                container,
                merged,
                loading_date,
                Self::eligible_trucks(product, &trucks),
            );
            demands_by_day.entry(loading_date).or_default().push(demand);
            report.demands_created += 1;
        }

        info!(
            demands = report.demands_created,
            rows_skipped = report.rows_skipped(),
            outside_window = report.demands_outside_window,
            "需求汇总完成"
        );

        Aggregation {
            demands_by_day,
            report,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 数量优先级: 手工数量-已发货 > 剩余数量 > 订单-已发货 > 订单数量
    ///
    /// 返回 (数量, 是否手工指定)
    pub fn resolve_quantity(row: &OrderRow) -> (i64, bool) {
        let value = |field: &Option<FieldValue>| field.as_ref().and_then(FieldValue::as_i64);
        let shipped = value(&row.shipped_quantity);

        if let Some(manual) = value(&row.manual_planning_quantity) {
            return (manual.saturating_sub(shipped.unwrap_or(0)).max(0), true);
        }
        if let Some(remaining) = value(&row.remaining_quantity) {
            return (remaining.max(0), false);
        }
        let ordered = value(&row.order_quantity).unwrap_or(0);
        match shipped {
            Some(shipped) => (ordered.saturating_sub(shipped).max(0), false),
            None => (ordered.max(0), false),
        }
    }

    /// 交货日（delivery_date 优先，其次 instruction_date）
    fn delivery_date(row: &OrderRow) -> Option<NaiveDate> {
        row.delivery_date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| row.instruction_date.as_deref().and_then(parse_date))
    }

    fn container_of<'a>(
        product: &ProductRef,
        containers: &'a BTreeMap<i64, Container>,
    ) -> Option<&'a Container> {
        product.used_container_id.and_then(|id| containers.get(&id))
    }

    /// 可用车辆：产品指定列表中已登记的车辆，未指定时取默认车辆
    fn eligible_trucks(product: &ProductRef, trucks: &BTreeMap<i64, Truck>) -> Vec<i64> {
        let listed: Vec<i64> = product
            .used_truck_ids
            .iter()
            .copied()
            .filter(|id| trucks.contains_key(id))
            .collect();
        if !listed.is_empty() {
            return listed;
        }
        if !product.used_truck_ids.is_empty() {
            debug!(product_id = product.id, "指定车辆均未登记，改用默认车辆");
        }
        trucks
            .values()
            .filter(|t| t.default_use)
            .map(|t| t.id)
            .collect()
    }

    fn build_demand(
        key: DemandKey,
        product: &ProductRef,
        container: &Container,
        merged: &PendingDemand,
        loading_date: NaiveDate,
        eligible_truck_ids: Vec<i64>,
    ) -> Demand {
        let capacity = product.capacity.unwrap_or(1).max(1);
        let stackable = product.stackable && container.stackable && container.max_stack > 1;
        Demand::new(
            key,
            product,
            container.id,
            merged.quantity,
            capacity,
            container.floor_area(),
            stackable,
            container.effective_max_stack(),
            loading_date,
            eligible_truck_ids,
            merged.manual,
        )
        .with_container_volume(container.volume())
    }
}

impl Default for DemandAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析日期: YYYY-MM-DD / YYYY/MM/DD（允许带时间部分）
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
