// ==========================================
// 阶段1: 车辆规模决策
// ==========================================
// 日均所需底面积 > 默认车辆总底面积 时，本次运行启用非默认车辆
// ==========================================

use crate::engine::context::AllocationContext;
use crate::engine::events::PlanningPhase;
use tracing::info;

/// 决定是否启用非默认车辆，写入 ctx.use_non_default
pub fn decide_fleet(ctx: &mut AllocationContext<'_>) -> bool {
    ctx.phase_started(PlanningPhase::FleetSizing);

    let default_area: f64 = ctx
        .trucks
        .values()
        .filter(|t| t.default_use)
        .map(|t| t.floor_area())
        .sum();
    let total_required: f64 = ctx
        .demands_by_day
        .values()
        .flatten()
        .map(|d| d.floor_area_total)
        .sum();
    let average_required = if ctx.window.is_empty() {
        0.0
    } else {
        total_required / ctx.window.len() as f64
    };

    ctx.use_non_default = average_required > default_area;
    info!(
        default_area,
        average_required,
        use_non_default = ctx.use_non_default,
        "车辆规模决策"
    );
    ctx.phase_completed(PlanningPhase::FleetSizing, usize::from(ctx.use_non_default));
    ctx.use_non_default
}
