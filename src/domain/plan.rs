// ==========================================
// 消费品 S&OP 供需平衡计算器 - 周计划领域模型
// ==========================================
// 职责: 预测周行、期初库存行、周平衡计划行
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastWeek - 周需求（已跨区域汇总）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastWeek {
    pub week_start: NaiveDate,
    pub sku_id: String,
    pub forecast_units: f64,
}

impl ForecastWeek {
    pub fn new(week_start: NaiveDate, sku_id: impl Into<String>, forecast_units: f64) -> Self {
        Self {
            week_start,
            sku_id: sku_id.into(),
            forecast_units,
        }
    }
}

// ==========================================
// InventoryStart - 周初库存（跨库位汇总）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryStart {
    pub sku_id: String,
    pub week_start: NaiveDate,
    pub on_hand_units: f64,
}

impl InventoryStart {
    pub fn new(sku_id: impl Into<String>, week_start: NaiveDate, on_hand_units: f64) -> Self {
        Self {
            sku_id: sku_id.into(),
            week_start,
            on_hand_units,
        }
    }
}

// ==========================================
// PlanRow - 周平衡计划行
// ==========================================
// 一行对应一个 (week_start, sku_id)
// 红线:
// - shipped_units = min(supply_potential, demand) 取整
// - gap_units = max(demand - shipped_units, 0)
// - service_level ∈ [0, 1]，demand = 0 时为 0
// 字段顺序即输出列顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    pub week_start: NaiveDate,
    pub sku_id: String,
    pub demand: f64,
    pub weekly_capacity_units: i64,
    pub inv_to_use: f64,       // 仅 SKU 首周使用期初库存
    pub supply_potential: f64, // 周产能 + 期初库存
    pub shipped_units: i64,
    pub gap_units: i64,
    pub revenue: f64,
    pub margin: f64,
    pub service_level: f64,
}

/// 计划表输出列（固定顺序）
pub const PLAN_COLUMNS: [&str; 11] = [
    "week_start",
    "sku_id",
    "demand",
    "weekly_capacity_units",
    "inv_to_use",
    "supply_potential",
    "shipped_units",
    "gap_units",
    "revenue",
    "margin",
    "service_level",
];
