// ==========================================
// 车辆积载计划系统 - 营业日运算
// ==========================================
// 职责: 规划窗口、装车日推算、前一营业日查找
// ==========================================

use crate::calendar::port::PlanningCalendar;
use chrono::{Days, NaiveDate};

/// 自 start 起的前 n 个营业日
///
/// 日历全为休息日时最多搜索 max(n*7, 31) 天
pub fn working_dates(calendar: &PlanningCalendar, start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let search_limit = n.saturating_mul(7).max(31);
    let mut current = start;
    for _ in 0..search_limit {
        if dates.len() >= n {
            break;
        }
        if calendar.is_working_day(current) {
            dates.push(current);
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// 不晚于 date 的最近营业日（最多回溯 max_search 天）
pub fn nearest_working_day_at_or_before(
    calendar: &PlanningCalendar,
    date: NaiveDate,
    max_search: u32,
) -> NaiveDate {
    let mut current = date;
    for _ in 0..=max_search {
        if calendar.is_working_day(current) {
            return current;
        }
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
    }
    date
}

/// 前一营业日（最多回溯 max_search 天；找不到时取前一自然日）
pub fn previous_working_day(
    calendar: &PlanningCalendar,
    date: NaiveDate,
    max_search: u32,
) -> NaiveDate {
    let Some(fallback) = date.pred_opt() else {
        return date;
    };
    let mut current = fallback;
    for _ in 0..max_search {
        if calendar.is_working_day(current) {
            return current;
        }
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
    }
    fallback
}

/// 由交货日与提前期推算装车日
///
/// - 有日历: 逐日回溯，仅营业日计数，直到扣满 lead_time_days；
///   lead_time_search_limit 天内未扣满时按自然日扣减
/// - 无日历: 直接扣减自然日后对齐到不晚于该日的工作日
/// - lead_time_days <= 0: 不晚于交货日的最近营业日
pub fn loading_date_for(
    calendar: &PlanningCalendar,
    delivery_date: NaiveDate,
    lead_time_days: i64,
    lead_time_search_limit: u32,
    max_working_day_search: u32,
) -> NaiveDate {
    if lead_time_days <= 0 {
        return nearest_working_day_at_or_before(calendar, delivery_date, lead_time_search_limit);
    }

    let lead = u64::try_from(lead_time_days).unwrap_or(0);
    let calendar_day_fallback = delivery_date
        .checked_sub_days(Days::new(lead))
        .unwrap_or(delivery_date);

    if !calendar.has_port() {
        return nearest_working_day_at_or_before(
            calendar,
            calendar_day_fallback,
            max_working_day_search,
        );
    }

    let mut current = delivery_date;
    let mut counted = 0_i64;
    for _ in 0..lead_time_search_limit {
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
        if calendar.is_working_day(current) {
            counted += 1;
            if counted >= lead_time_days {
                return current;
            }
        }
    }
    calendar_day_fallback
}
