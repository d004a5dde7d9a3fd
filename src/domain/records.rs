// ==========================================
// 消费品 S&OP 供需平衡计算器 - 源数据记录
// ==========================================
// 职责: 定义引擎消费的源表行结构
// 红线: 日期字段在进入引擎前必须已解析为 NaiveDate
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku_id: String,   // SKU
    pub category: String, // 品类（情景需求上调的键）
}

// ==========================================
// ProductionCapacity - 工厂/SKU 日产能
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCapacity {
    pub plant_id: String,
    pub sku_id: String,
    pub daily_capacity_units: f64, // 日产能（件）
}

// ==========================================
// CapacityCalendarDay - 工厂日历
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityCalendarDay {
    pub plant_id: String,
    pub date: NaiveDate,
    pub available_minutes: f64, // 计划可用分钟
    pub downtime_minutes: f64,  // 停机分钟
}

impl CapacityCalendarDay {
    /// 开机率 = (可用 - 停机) / 可用
    ///
    /// 停机大于可用时返回负值（由上游按 0 截断）。
    /// 可用分钟非正时无法计算比率，按 0 处理。
    pub fn uptime_ratio(&self) -> f64 {
        if self.available_minutes <= 0.0 {
            return 0.0;
        }
        (self.available_minutes - self.downtime_minutes) / self.available_minutes
    }
}

// ==========================================
// InventorySnapshot - 库存快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub sku_id: String,
    pub location: String, // DC/仓库
    pub date: NaiveDate,
    pub on_hand_units: f64,
}

// ==========================================
// ForecastBaseline - 基准预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBaseline {
    pub week_start: NaiveDate,
    pub sku_id: String,
    pub region: String,
    pub forecast_units: f64,
}

// ==========================================
// CostStructure - 单位经济
// ==========================================
// 每个 SKU 一行，金额均非负
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    pub sku_id: String,
    pub unit_list_price: f64,
    pub material_cost: f64,
    pub conversion_cost: f64,
    pub logistics_cost: f64,
}

impl CostStructure {
    /// 单位成本 = 物料 + 加工 + 物流
    pub fn unit_cost(&self) -> f64 {
        self.material_cost + self.conversion_cost + self.logistics_cost
    }
}

// ==========================================
// BomLine - 物料清单
// ==========================================
// SKU 与物料多对多
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub sku_id: String,
    pub material_id: String,
}
