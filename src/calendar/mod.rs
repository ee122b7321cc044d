// ==========================================
// 车辆积载计划系统 - 日历层
// ==========================================
// 职责: 营业日判定端口与营业日运算
// ==========================================

pub mod port;
pub mod working_days;

pub use port::{is_weekday, CalendarPort, CalendarTable, PlanningCalendar, WeekdayCalendar};
pub use working_days::{
    loading_date_for, nearest_working_day_at_or_before, previous_working_day, working_dates,
};
