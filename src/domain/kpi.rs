// ==========================================
// 消费品 S&OP 供需平衡计算器 - KPI 领域模型
// ==========================================
// 职责: KPI 汇总、SKU 维度 KPI、周缺口、情景对比
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::round_to;

// ==========================================
// KpiSummary - KPI 汇总（固定结构）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiSummary {
    pub demand_units: i64,  // 需求（件）
    pub shipped_units: i64, // 发运（件）
    pub gap_units: i64,     // 缺口（件）
    pub service_level: f64, // 服务水平，3 位小数
    pub revenue: f64,       // 收入，2 位小数
    pub margin: f64,        // 毛利，2 位小数
}

// ==========================================
// SkuKpi - 单 SKU 的 KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuKpi {
    pub sku_id: String,
    #[serde(flatten)]
    pub kpis: KpiSummary,
}

// ==========================================
// WeeklyGap - 周缺口（跨 SKU 汇总）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyGap {
    pub week_start: NaiveDate,
    pub gap_units: i64,
}

// ==========================================
// ServiceLevelComparison - 基准 vs 情景服务水平
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLevelComparison {
    pub week_start: NaiveDate,
    pub sku_id: String,
    pub baseline: f64,
    pub scenario: f64,
}

// ==========================================
// KpiDelta - 情景相对基准的变化量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiDelta {
    pub demand_units: i64,
    pub shipped_units: i64,
    pub gap_units: i64,
    pub service_level: f64,
    pub revenue: f64,
    pub margin: f64,
}

impl KpiDelta {
    /// 情景 - 基准（逐字段）
    pub fn between(baseline: &KpiSummary, scenario: &KpiSummary) -> Self {
        Self {
            demand_units: scenario.demand_units - baseline.demand_units,
            shipped_units: scenario.shipped_units - baseline.shipped_units,
            gap_units: scenario.gap_units - baseline.gap_units,
            service_level: round_to(scenario.service_level - baseline.service_level, 3),
            revenue: round_to(scenario.revenue - baseline.revenue, 2),
            margin: round_to(scenario.margin - baseline.margin, 2),
        }
    }
}
