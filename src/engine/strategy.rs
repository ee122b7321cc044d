// ==========================================
// 车辆积载计划系统 - 分配策略定义
// ==========================================
// 用途：
// - 简易策略与完整策略共享容量模型与装载原语；
// - 两者实现同一 AllocationStrategy 接口，由编排器统一驱动。

use crate::domain::types::StrategyKind;
use crate::engine::context::AllocationContext;
use crate::engine::full::FullStrategy;
use crate::engine::simple::SimpleStrategy;
use chrono::NaiveDate;

/// 分配策略
///
/// 驱动顺序: prepare -> 窗口内每日 assign_day -> finalize
pub trait AllocationStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// 逐日分配前的全局处理
    fn prepare(&self, _ctx: &mut AllocationContext<'_>) {}

    /// 单日分配
    fn assign_day(&self, ctx: &mut AllocationContext<'_>, date: NaiveDate);

    /// 收尾处理（含次日到达调整）
    fn finalize(&self, ctx: &mut AllocationContext<'_>);

    fn run(&self, ctx: &mut AllocationContext<'_>) {
        self.prepare(ctx);
        let window = ctx.window.clone();
        for date in window {
            self.assign_day(ctx, date);
        }
        self.finalize(ctx);
    }
}

/// 按策略类型构建策略实例
pub fn strategy_for(kind: StrategyKind) -> Box<dyn AllocationStrategy> {
    match kind {
        StrategyKind::Simple => Box::new(SimpleStrategy::new()),
        StrategyKind::Full => Box::new(FullStrategy::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_for_kind() {
        assert_eq!(strategy_for(StrategyKind::Simple).kind(), StrategyKind::Simple);
        assert_eq!(strategy_for(StrategyKind::Full).kind(), StrategyKind::Full);
    }
}
