// ==========================================
// 车辆积载计划系统 - 导入层
// ==========================================
// 职责: 外部文件读取，生成规划输入与营业日历
// 支持: JSON 快照, CSV 日历
// ==========================================

// 模块声明
pub mod calendar_csv;
pub mod error;
pub mod snapshot;

// 重导出核心类型
pub use calendar_csv::{load_calendar_csv, read_calendar};
pub use error::{ImportError, ImportResult};
pub use snapshot::load_snapshot;
