// ==========================================
// 消费品 S&OP 供需平衡计算器 - 领域模型层
// ==========================================
// 职责: 定义源表记录、派生表、情景与 KPI 类型
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod dataset;
pub mod kpi;
pub mod plan;
pub mod records;
pub mod scenario;
pub mod types;

// 重导出核心类型
pub use capacity::WeeklyCapacity;
pub use dataset::{PlanningDataset, PlanningDatasetBuilder, RawTable, SourceTable};
pub use kpi::{KpiDelta, KpiSummary, ServiceLevelComparison, SkuKpi, WeeklyGap};
pub use plan::{ForecastWeek, InventoryStart, PlanRow, PLAN_COLUMNS};
pub use records::{
    BomLine, CapacityCalendarDay, CostStructure, ForecastBaseline, InventorySnapshot, Product,
    ProductionCapacity,
};
pub use scenario::Scenario;
pub use types::{week_start_of, DateWindow, MissingCostPolicy};
