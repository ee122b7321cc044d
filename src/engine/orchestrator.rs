// ==========================================
// 车辆积载计划系统 - 引擎编排器
// ==========================================
// 用途: 串联需求汇总、分配策略、结果汇总
// 流程: 规划窗口 -> 需求汇总 -> 策略执行 -> 计划汇总
// 红线: 单次调用内无 I/O，输入快照只读
// ==========================================

use crate::calendar::{working_dates, CalendarPort, PlanningCalendar};
use crate::config::{ConfigError, ConfigResult, PlannerConfig, PlanningProfile};
use crate::domain::plan::{Plan, PlanPeriod, PlanSummary};
use crate::domain::snapshot::PlanningInput;
use crate::domain::types::{ArrivalPreference, StrategyKind};
use crate::engine::aggregator::DemandAggregator;
use crate::engine::context::AllocationContext;
use crate::engine::events::{PlanningEvent, PlanningObserver, PlanningPhase, TracingObserver};
use crate::engine::strategy::strategy_for;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// PlanRequest - 规划请求
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub start: NaiveDate,
    /// 规划营业日数；未指定时取配置默认值
    pub days: Option<usize>,
    /// 策略；未指定时取客户配置，再缺省为完整策略
    pub strategy: Option<StrategyKind>,
    pub profile_id: Option<String>,
}

impl PlanRequest {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            days: None,
            strategy: None,
            profile_id: None,
        }
    }
}

// ==========================================
// LoadingPlanner - 积载计划编排器
// ==========================================

pub struct LoadingPlanner {
    config: PlannerConfig,
    calendar: PlanningCalendar,
    observer: Arc<dyn PlanningObserver>,
}

impl LoadingPlanner {
    /// 创建编排器（无日历端口时按周一至周五判定营业日）
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            calendar: PlanningCalendar::weekday_fallback(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_calendar(mut self, port: Arc<dyn CalendarPort>) -> Self {
        self.calendar = PlanningCalendar::new(port);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PlanningObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn calendar(&self) -> &PlanningCalendar {
        &self.calendar
    }

    /// 按请求规划（解析客户配置、天数、策略）
    pub fn plan_request(&self, input: &PlanningInput, request: &PlanRequest) -> ConfigResult<Plan> {
        let profile = match request.profile_id.as_deref() {
            Some(id) => Some(self.config.profile(id)?),
            None => None,
        };
        let days = request.days.unwrap_or(self.config.default_planning_days);
        if days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "days".to_string(),
                message: "规划天数必须 >= 1".to_string(),
            });
        }
        let strategy = request
            .strategy
            .or(profile.map(|p| p.strategy))
            .unwrap_or_default();

        Ok(self.run(input, request.start, days, strategy, profile))
    }

    /// 规划 start 起 days 个营业日
    pub fn plan(
        &self,
        input: &PlanningInput,
        start: NaiveDate,
        days: usize,
        strategy: StrategyKind,
    ) -> Plan {
        self.run(input, start, days, strategy, None)
    }

    #[instrument(skip(self, input, profile), fields(profile_id = profile.map(|p| p.profile_id.as_str())))]
    fn run(
        &self,
        input: &PlanningInput,
        start: NaiveDate,
        days: usize,
        strategy: StrategyKind,
        profile: Option<&PlanningProfile>,
    ) -> Plan {
        let window = working_dates(&self.calendar, start, days);
        let preference = self.arrival_preference(profile);
        info!(
            window_days = window.len(),
            %strategy,
            %preference,
            calendar = self.calendar.has_port(),
            "开始积载规划"
        );

        // 1. 需求汇总
        self.observer.notify(&PlanningEvent::PhaseStarted {
            phase: PlanningPhase::Aggregation,
        });
        let aggregation =
            DemandAggregator::new().aggregate(input, &self.calendar, &window, &self.config, profile);
        self.observer.notify(&PlanningEvent::PhaseCompleted {
            phase: PlanningPhase::Aggregation,
            affected: aggregation.demands_by_day.values().map(Vec::len).sum(),
        });

        // 2. 策略执行
        let mut ctx = AllocationContext::new(
            &self.config,
            &self.calendar,
            self.observer.as_ref(),
            preference,
            window.clone(),
            input.truck_map(),
            aggregation.demands_by_day,
        );
        strategy_for(strategy).run(&mut ctx);
        let use_non_default = ctx.use_non_default;
        let mut days_map = ctx.day_plans;
        for date in &window {
            days_map.entry(*date).or_default();
        }

        // 3. 计划汇总
        let summary = PlanSummary::from_days(&days_map, window.len());
        let loaded_dates: Vec<NaiveDate> = days_map
            .iter()
            .filter(|(_, day)| day.total_trips() > 0)
            .map(|(date, _)| *date)
            .collect();
        let period = match (loaded_dates.first(), loaded_dates.last()) {
            (Some(first), Some(last)) => Some(PlanPeriod {
                start: *first,
                end: *last,
            }),
            _ => match (window.first(), window.last()) {
                (Some(first), Some(last)) => Some(PlanPeriod {
                    start: *first,
                    end: *last,
                }),
                _ => None,
            },
        };

        info!(
            trips = summary.total_trips,
            warnings = summary.total_warnings,
            unallocated = summary.unallocated_count,
            status = ?summary.status,
            "积载规划完成"
        );

        Plan {
            strategy,
            working_dates: window,
            period,
            use_non_default_trucks: use_non_default,
            days: days_map,
            summary,
        }
    }

    fn arrival_preference(&self, profile: Option<&PlanningProfile>) -> ArrivalPreference {
        profile
            .and_then(|p| p.arrival_preference)
            .unwrap_or(self.config.arrival_preference)
    }
}
