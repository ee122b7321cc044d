// ==========================================
// 车辆积载计划系统 - 引擎层规划事件
// ==========================================
// 职责: 定义规划过程事件与观察者 trait
// 说明: 引擎只发布事件，由调用方决定如何消费
// ==========================================

use crate::domain::demand::DemandKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ==========================================
// 规划事件类型
// ==========================================

/// 规划阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningPhase {
    Aggregation,
    FleetSizing,
    ForwardScheduling,
    DailyAssignment,
    Relocation,
    ForwardRemaining,
    SurgeDispatch,
    FinalDayOverflow,
    NextDayArrival,
}

impl PlanningPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningPhase::Aggregation => "aggregation",
            PlanningPhase::FleetSizing => "fleet_sizing",
            PlanningPhase::ForwardScheduling => "forward_scheduling",
            PlanningPhase::DailyAssignment => "daily_assignment",
            PlanningPhase::Relocation => "relocation",
            PlanningPhase::ForwardRemaining => "forward_remaining",
            PlanningPhase::SurgeDispatch => "surge_dispatch",
            PlanningPhase::FinalDayOverflow => "final_day_overflow",
            PlanningPhase::NextDayArrival => "next_day_arrival",
        }
    }
}

/// 规划事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanningEvent {
    /// 阶段开始
    PhaseStarted { phase: PlanningPhase },
    /// 阶段完成（affected: 本阶段处理/变更的条目数）
    PhaseCompleted { phase: PlanningPhase, affected: usize },
    /// 需求提前一日
    DemandAdvanced {
        key: DemandKey,
        from: NaiveDate,
        to: NaiveDate,
        containers: u32,
    },
    /// 特派车装载
    SurgeDispatched {
        key: DemandKey,
        date: NaiveDate,
        truck_id: i64,
    },
    /// 次日到达车辆的装载记录前移
    LoadShifted {
        truck_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// 最终日溢出
    FinalDayOverflow {
        key: DemandKey,
        date: NaiveDate,
        containers: u32,
    },
}

// ==========================================
// 观察者 Trait
// ==========================================

/// 规划观察者
///
/// 在规划调用内同步调用，不得阻塞
pub trait PlanningObserver: Send + Sync {
    fn notify(&self, event: &PlanningEvent);
}

/// 空操作观察者
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PlanningObserver for NoOpObserver {
    fn notify(&self, _event: &PlanningEvent) {}
}

/// 以 tracing 事件输出的观察者（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PlanningObserver for TracingObserver {
    fn notify(&self, event: &PlanningEvent) {
        match event {
            PlanningEvent::PhaseStarted { phase } => {
                debug!(phase = phase.as_str(), "阶段开始");
            }
            PlanningEvent::PhaseCompleted { phase, affected } => {
                info!(phase = phase.as_str(), affected, "阶段完成");
            }
            PlanningEvent::DemandAdvanced {
                key,
                from,
                to,
                containers,
            } => {
                debug!(demand = %key, %from, %to, containers, "需求提前一日");
            }
            PlanningEvent::SurgeDispatched {
                key,
                date,
                truck_id,
            } => {
                info!(demand = %key, %date, truck_id, "特派车装载");
            }
            PlanningEvent::LoadShifted { truck_id, from, to } => {
                debug!(truck_id, %from, %to, "次日到达车辆装载记录前移");
            }
            PlanningEvent::FinalDayOverflow {
                key,
                date,
                containers,
            } => {
                warn!(demand = %key, %date, containers, "最终日容量不足");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录全部事件的观察者（测试用）
    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) events: Mutex<Vec<PlanningEvent>>,
    }

    impl PlanningObserver for RecordingObserver {
        fn notify(&self, event: &PlanningEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::default();
        observer.notify(&PlanningEvent::PhaseStarted {
            phase: PlanningPhase::FleetSizing,
        });
        observer.notify(&PlanningEvent::PhaseCompleted {
            phase: PlanningPhase::FleetSizing,
            affected: 0,
        });
        assert_eq!(observer.events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_noop_and_tracing_observers_accept_all_events() {
        let key = DemandKey {
            product_id: 1,
            delivery_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        };
        let events = vec![
            PlanningEvent::PhaseStarted {
                phase: PlanningPhase::SurgeDispatch,
            },
            PlanningEvent::SurgeDispatched {
                key,
                date: key.delivery_date,
                truck_id: 9,
            },
            PlanningEvent::FinalDayOverflow {
                key,
                date: key.delivery_date,
                containers: 2,
            },
        ];
        for event in &events {
            NoOpObserver.notify(event);
            TracingObserver.notify(event);
        }
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(PlanningPhase::NextDayArrival.as_str(), "next_day_arrival");
        assert_eq!(PlanningPhase::ForwardScheduling.as_str(), "forward_scheduling");
    }
}
