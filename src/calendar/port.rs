// ==========================================
// 车辆积载计划系统 - 日历端口
// ==========================================
// 职责: 营业日判定接口 + 工作日回退 + 表驱动日历
// 红线: 只读，不修改全局状态；可被多个规划并发读取
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// Trait: CalendarPort
// ==========================================
pub trait CalendarPort: Send + Sync {
    /// 是否为营业日
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// 周一至周五为营业日
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ==========================================
// WeekdayCalendar - 工作日日历
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayCalendar;

impl CalendarPort for WeekdayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        is_weekday(date)
    }
}

// ==========================================
// CalendarTable - 表驱动日历
// ==========================================
// 表中未登记的日期按工作日规则判定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarTable {
    entries: HashMap<NaiveDate, bool>,
}

impl CalendarTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, bool)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// 登记（覆盖）某日是否营业
    pub fn set(&mut self, date: NaiveDate, is_working_day: bool) {
        self.entries.insert(date, is_working_day);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 转为可共享的只读端口
    pub fn into_shared(self) -> Arc<dyn CalendarPort> {
        Arc::new(self)
    }
}

impl CalendarPort for CalendarTable {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        self.entries
            .get(&date)
            .copied()
            .unwrap_or_else(|| is_weekday(date))
    }
}

// ==========================================
// PlanningCalendar - 规划用日历
// ==========================================
// 持有可选的日历端口；缺失时退化为周一至周五
#[derive(Clone, Default)]
pub struct PlanningCalendar {
    port: Option<Arc<dyn CalendarPort>>,
}

impl PlanningCalendar {
    pub fn new(port: Arc<dyn CalendarPort>) -> Self {
        Self { port: Some(port) }
    }

    /// 无日历（工作日回退）
    pub fn weekday_fallback() -> Self {
        Self { port: None }
    }

    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        match &self.port {
            Some(port) => port.is_working_day(date),
            None => is_weekday(date),
        }
    }
}

impl std::fmt::Debug for PlanningCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningCalendar")
            .field("has_port", &self.has_port())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    #[test]
    fn test_weekday_calendar() {
        // 2026-03-06 周五, 03-07 周六
        assert!(WeekdayCalendar.is_working_day(d(3, 6)));
        assert!(!WeekdayCalendar.is_working_day(d(3, 7)));
        assert!(!WeekdayCalendar.is_working_day(d(3, 8)));
    }

    #[test]
    fn test_table_overrides_and_falls_back() {
        let mut table = CalendarTable::new();
        table.set(d(3, 7), true); // 周六出勤
        table.set(d(3, 9), false); // 周一休息
        assert!(table.is_working_day(d(3, 7)));
        assert!(!table.is_working_day(d(3, 9)));
        // 未登记日期按工作日规则
        assert!(table.is_working_day(d(3, 10)));
        assert!(!table.is_working_day(d(3, 8)));
    }

    #[test]
    fn test_shared_table_concurrent_reads() {
        let port = CalendarTable::from_entries(vec![(d(3, 9), false)]).into_shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let port = Arc::clone(&port);
                thread::spawn(move || port.is_working_day(d(3, 9)))
            })
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap());
        }
    }

    #[test]
    fn test_planning_calendar_without_port() {
        let cal = PlanningCalendar::weekday_fallback();
        assert!(!cal.has_port());
        assert!(cal.is_working_day(d(3, 6)));
        assert!(!cal.is_working_day(d(3, 7)));
    }
}
