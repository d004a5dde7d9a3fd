// ==========================================
// 消费品 S&OP 供需平衡计算器 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 空结果不是错误（按 0 处理），这里只收录必须中止计算的情形
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 连接缺失 =====
    #[error("成本结构缺失: sku_id={sku_id}（预测中存在但 cost_structures 无对应行）")]
    MissingCostStructure { sku_id: String },

    // ===== 计划周期 =====
    #[error("数据集中没有任何预测周 (forecast_baseline 为空)")]
    EmptyForecast,

    #[error("周范围非法: from={from} 晚于 to={to}")]
    InvalidWeekRange { from: NaiveDate, to: NaiveDate },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
