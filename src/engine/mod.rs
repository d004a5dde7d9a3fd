// ==========================================
// 消费品 S&OP 供需平衡计算器 - 引擎层
// ==========================================
// 职责: 实现计划计算规则，不读文件
// 红线: 所有引擎无状态，输入只借用，输出为新表
// ==========================================

pub mod balance;
pub mod capacity;
pub mod error;
pub mod forecast;
pub mod horizon;
pub mod inventory;
pub mod kpi;
pub mod orchestrator;
pub mod scenario;

// 重导出核心引擎
pub use balance::BalanceEngine;
pub use capacity::CapacityAggregator;
pub use error::{EngineError, EngineResult};
pub use forecast::ForecastSelector;
pub use horizon::{PlanningHorizon, DEFAULT_HORIZON_WEEKS};
pub use inventory::InventoryAggregator;
pub use kpi::KpiSummarizer;
pub use orchestrator::{
    BalanceReport, BaselineInputs, PlanRequest, PlanningOrchestrator, ScenarioReport,
};
pub use scenario::{delay_reduction, ScenarioAdjuster};
