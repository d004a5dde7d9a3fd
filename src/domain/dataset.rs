// ==========================================
// 消费品 S&OP 供需平衡计算器 - 规划数据集
// ==========================================
// 职责: 一次加载、只读共享的源表容器
// 红线: 不可变；引擎只通过具名访问器借用，不做全局状态
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::domain::records::{
    BomLine, CapacityCalendarDay, CostStructure, ForecastBaseline, InventorySnapshot, Product,
    ProductionCapacity,
};

// ==========================================
// SourceTable - 源表标识
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTable {
    Calendar,
    Products,
    Customers,
    Promotions,
    SalesHistory,
    PosMarketSignal,
    InventorySnapshots,
    ProductionCapacity,
    CapacityCalendar,
    Bom,
    Suppliers,
    PurchaseOrders,
    LogisticsLanes,
    CostStructures,
    ForecastBaseline,
    Scenarios,
}

impl SourceTable {
    /// 全部必需源表（加载顺序）
    pub const ALL: [SourceTable; 16] = [
        SourceTable::Calendar,
        SourceTable::Products,
        SourceTable::Customers,
        SourceTable::Promotions,
        SourceTable::SalesHistory,
        SourceTable::PosMarketSignal,
        SourceTable::InventorySnapshots,
        SourceTable::ProductionCapacity,
        SourceTable::CapacityCalendar,
        SourceTable::Bom,
        SourceTable::Suppliers,
        SourceTable::PurchaseOrders,
        SourceTable::LogisticsLanes,
        SourceTable::CostStructures,
        SourceTable::ForecastBaseline,
        SourceTable::Scenarios,
    ];

    /// 表名（同时也是文件名主干）
    pub fn name(&self) -> &'static str {
        match self {
            SourceTable::Calendar => "calendar",
            SourceTable::Products => "products",
            SourceTable::Customers => "customers",
            SourceTable::Promotions => "promotions",
            SourceTable::SalesHistory => "sales_history",
            SourceTable::PosMarketSignal => "pos_market_signal",
            SourceTable::InventorySnapshots => "inventory_snapshots",
            SourceTable::ProductionCapacity => "production_capacity",
            SourceTable::CapacityCalendar => "capacity_calendar",
            SourceTable::Bom => "bom",
            SourceTable::Suppliers => "suppliers",
            SourceTable::PurchaseOrders => "purchase_orders",
            SourceTable::LogisticsLanes => "logistics_lanes",
            SourceTable::CostStructures => "cost_structures",
            SourceTable::ForecastBaseline => "forecast_baseline",
            SourceTable::Scenarios => "scenarios",
        }
    }

    /// 需按日期解析的列
    pub fn date_columns(&self) -> &'static [&'static str] {
        match self {
            SourceTable::Calendar => &["date"],
            SourceTable::Promotions => &["start_date", "end_date"],
            SourceTable::InventorySnapshots => &["date"],
            SourceTable::CapacityCalendar => &["date"],
            SourceTable::ForecastBaseline => &["week_start"],
            _ => &[],
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// RawTable - 未解释的原始表
// ==========================================
// 用途: 引擎不消费的源表（客户、促销、采购单等）原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
    /// 各行在源文件中的数据行号（表头下一行为 1，被跳过的空白行也占号）
    #[serde(default)]
    pub row_numbers: Vec<usize>,
}

impl RawTable {
    /// 第 `index` 行的数据行号；未记录时按顺序从 1 计
    pub fn row_number(&self, index: usize) -> usize {
        self.row_numbers.get(index).copied().unwrap_or(index + 1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// PlanningDataset - 规划数据集
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PlanningDataset {
    products: Vec<Product>,
    production_capacity: Vec<ProductionCapacity>,
    capacity_calendar: Vec<CapacityCalendarDay>,
    inventory_snapshots: Vec<InventorySnapshot>,
    forecast_baseline: Vec<ForecastBaseline>,
    cost_structures: Vec<CostStructure>,
    bom: Vec<BomLine>,
    raw_tables: BTreeMap<SourceTable, RawTable>,
}

impl PlanningDataset {
    pub fn builder() -> PlanningDatasetBuilder {
        PlanningDatasetBuilder::default()
    }

    // ===== 具名访问器 =====

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn production_capacity(&self) -> &[ProductionCapacity] {
        &self.production_capacity
    }

    pub fn capacity_calendar(&self) -> &[CapacityCalendarDay] {
        &self.capacity_calendar
    }

    pub fn inventory_snapshots(&self) -> &[InventorySnapshot] {
        &self.inventory_snapshots
    }

    pub fn forecast_baseline(&self) -> &[ForecastBaseline] {
        &self.forecast_baseline
    }

    pub fn cost_structures(&self) -> &[CostStructure] {
        &self.cost_structures
    }

    pub fn bom(&self) -> &[BomLine] {
        &self.bom
    }

    /// 原始表（引擎不消费的源表）
    pub fn raw_table(&self, table: SourceTable) -> Option<&RawTable> {
        self.raw_tables.get(&table)
    }

    // ===== 派生查询 =====

    /// SKU → 品类（同一 SKU 多行时取第一行）
    pub fn product_categories(&self) -> HashMap<&str, &str> {
        let mut categories = HashMap::new();
        for product in &self.products {
            categories
                .entry(product.sku_id.as_str())
                .or_insert(product.category.as_str());
        }
        categories
    }

    /// 产品表中的 SKU（按首次出现顺序去重）
    pub fn sku_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.products
            .iter()
            .filter(|p| seen.insert(p.sku_id.as_str()))
            .map(|p| p.sku_id.clone())
            .collect()
    }

    /// 预测表中的全部区域（去重排序）
    pub fn regions(&self) -> Vec<String> {
        self.forecast_baseline
            .iter()
            .map(|f| f.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 全部品类（去重排序）
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 预测表中的全部周（去重排序）
    pub fn forecast_weeks(&self) -> Vec<NaiveDate> {
        self.forecast_baseline
            .iter()
            .map(|f| f.week_start)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// BOM 中的全部物料（去重排序）
    pub fn materials(&self) -> Vec<String> {
        self.bom
            .iter()
            .map(|b| b.material_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ==========================================
// PlanningDatasetBuilder
// ==========================================
#[derive(Debug, Default)]
pub struct PlanningDatasetBuilder {
    dataset: PlanningDataset,
}

impl PlanningDatasetBuilder {
    pub fn products(mut self, rows: Vec<Product>) -> Self {
        self.dataset.products = rows;
        self
    }

    pub fn production_capacity(mut self, rows: Vec<ProductionCapacity>) -> Self {
        self.dataset.production_capacity = rows;
        self
    }

    pub fn capacity_calendar(mut self, rows: Vec<CapacityCalendarDay>) -> Self {
        self.dataset.capacity_calendar = rows;
        self
    }

    pub fn inventory_snapshots(mut self, rows: Vec<InventorySnapshot>) -> Self {
        self.dataset.inventory_snapshots = rows;
        self
    }

    pub fn forecast_baseline(mut self, rows: Vec<ForecastBaseline>) -> Self {
        self.dataset.forecast_baseline = rows;
        self
    }

    pub fn cost_structures(mut self, rows: Vec<CostStructure>) -> Self {
        self.dataset.cost_structures = rows;
        self
    }

    pub fn bom(mut self, rows: Vec<BomLine>) -> Self {
        self.dataset.bom = rows;
        self
    }

    pub fn raw_table(mut self, table: SourceTable, raw: RawTable) -> Self {
        self.dataset.raw_tables.insert(table, raw);
        self
    }

    pub fn build(self) -> PlanningDataset {
        self.dataset
    }
}
