// ==========================================
// 消费品 S&OP 供需平衡计算器 - 核心库
// ==========================================
// 技术栈: Rust + CSV/Excel 源表
// 系统定位: 周度供需平衡与 what-if 情景模拟（决策支持，不做优化）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 引擎层 - 计划计算规则
pub mod engine;

// 导入层 - 源表加载
pub mod importer;

// 配置层 - 默认值与情景配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{week_start_of, DateWindow, MissingCostPolicy};

// 领域实体
pub use domain::{
    KpiDelta, KpiSummary, PlanRow, PlanningDataset, Scenario, ServiceLevelComparison, SkuKpi,
    SourceTable, WeeklyCapacity, WeeklyGap,
};

// 引擎
pub use engine::{
    BalanceEngine, BalanceReport, CapacityAggregator, EngineError, ForecastSelector,
    InventoryAggregator, KpiSummarizer, PlanRequest, PlanningHorizon, PlanningOrchestrator,
    ScenarioAdjuster, ScenarioReport,
};

// 导入
pub use importer::{DatasetLoader, ImportError};

// 配置
pub use config::{ConfigError, ConfigManager, ScenarioProfile};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "消费品 S&OP 供需平衡计算器";
