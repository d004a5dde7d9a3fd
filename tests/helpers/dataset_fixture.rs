// ==========================================
// 数据集夹具 - 用于集成测试
// ==========================================
// 职责: 构建 16 张源表 CSV 并写入临时目录
// ==========================================

use chrono::{Duration, NaiveDate};
use cpg_sop_planner::domain::{PlanningDataset, SourceTable};
use cpg_sop_planner::importer::DatasetLoader;
use csv::Writer;
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 标准夹具第一周（周一）
pub fn week1() -> NaiveDate {
    d(2025, 3, 3)
}

/// 标准夹具第二周（周一）
pub fn week2() -> NaiveDate {
    d(2025, 3, 10)
}

// ==========================================
// DatasetFixture 构建器
// ==========================================

#[derive(Default, Clone)]
pub struct DatasetFixture {
    products: Vec<Vec<String>>,
    production_capacity: Vec<Vec<String>>,
    capacity_calendar: Vec<Vec<String>>,
    inventory_snapshots: Vec<Vec<String>>,
    forecast_baseline: Vec<Vec<String>>,
    cost_structures: Vec<Vec<String>>,
    bom: Vec<Vec<String>>,
    omitted: BTreeSet<SourceTable>,
}

impl DatasetFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, sku: &str, category: &str) -> Self {
        self.products.push(row(&[sku, category]));
        self
    }

    pub fn capacity(mut self, plant: &str, sku: &str, daily_units: f64) -> Self {
        self.production_capacity
            .push(row(&[plant, sku, &daily_units.to_string()]));
        self
    }

    pub fn calendar_day(
        mut self,
        plant: &str,
        date: NaiveDate,
        available_minutes: f64,
        downtime_minutes: f64,
    ) -> Self {
        self.capacity_calendar.push(row(&[
            plant,
            &date.to_string(),
            &available_minutes.to_string(),
            &downtime_minutes.to_string(),
        ]));
        self
    }

    /// 一整周（周一至周日）同样的可用/停机分钟
    pub fn calendar_week(
        mut self,
        plant: &str,
        week_start: NaiveDate,
        available_minutes: f64,
        downtime_minutes: f64,
    ) -> Self {
        for offset in 0..7 {
            self = self.calendar_day(
                plant,
                week_start + Duration::days(offset),
                available_minutes,
                downtime_minutes,
            );
        }
        self
    }

    pub fn inventory(mut self, sku: &str, location: &str, date: NaiveDate, units: f64) -> Self {
        self.inventory_snapshots
            .push(row(&[sku, location, &date.to_string(), &units.to_string()]));
        self
    }

    pub fn forecast(mut self, week: NaiveDate, sku: &str, region: &str, units: f64) -> Self {
        self.forecast_baseline
            .push(row(&[&week.to_string(), sku, region, &units.to_string()]));
        self
    }

    pub fn cost(
        mut self,
        sku: &str,
        price: f64,
        material: f64,
        conversion: f64,
        logistics: f64,
    ) -> Self {
        self.cost_structures.push(row(&[
            sku,
            &price.to_string(),
            &material.to_string(),
            &conversion.to_string(),
            &logistics.to_string(),
        ]));
        self
    }

    pub fn bom(mut self, sku: &str, material: &str) -> Self {
        self.bom.push(row(&[sku, material]));
        self
    }

    /// 不写出某张源表
    pub fn without(mut self, table: SourceTable) -> Self {
        self.omitted.insert(table);
        self
    }

    /// 写入临时目录（TempDir 需保持存活）
    pub fn write(&self) -> TempDir {
        let dir = TempDir::new().unwrap();
        for table in SourceTable::ALL {
            if self.omitted.contains(&table) {
                continue;
            }
            let (headers, rows) = self.table_content(table);
            write_csv(dir.path(), table.name(), &headers, &rows);
        }
        dir
    }

    /// 写入并加载
    pub fn load(&self) -> (TempDir, PlanningDataset) {
        let dir = self.write();
        let dataset = DatasetLoader::new().load_all(dir.path()).unwrap();
        (dir, dataset)
    }

    fn table_content(&self, table: SourceTable) -> (Vec<&'static str>, Vec<Vec<String>>) {
        match table {
            SourceTable::Products => (vec!["sku_id", "category"], self.products.clone()),
            SourceTable::ProductionCapacity => (
                vec!["plant_id", "sku_id", "daily_capacity_units"],
                self.production_capacity.clone(),
            ),
            SourceTable::CapacityCalendar => (
                vec!["plant_id", "date", "available_minutes", "downtime_minutes"],
                self.capacity_calendar.clone(),
            ),
            SourceTable::InventorySnapshots => (
                vec!["sku_id", "location", "date", "on_hand_units"],
                self.inventory_snapshots.clone(),
            ),
            SourceTable::ForecastBaseline => (
                vec!["week_start", "sku_id", "region", "forecast_units"],
                self.forecast_baseline.clone(),
            ),
            SourceTable::CostStructures => (
                vec![
                    "sku_id",
                    "unit_list_price",
                    "material_cost",
                    "conversion_cost",
                    "logistics_cost",
                ],
                self.cost_structures.clone(),
            ),
            SourceTable::Bom => (vec!["sku_id", "material_id"], self.bom.clone()),
            SourceTable::Calendar => (vec!["date", "week_start"], vec![row(&["20250303", "20250303"])]),
            SourceTable::Promotions => (
                vec!["promo_id", "sku_id", "start_date", "end_date"],
                vec![row(&["PROMO-1", "SKU-A", "20250303", "2025-03-16 00:00:00"])],
            ),
            SourceTable::Customers => (vec!["customer_id", "region"], vec![row(&["C1", "ANZ-North"])]),
            SourceTable::SalesHistory => (
                vec!["week_start", "sku_id", "region", "units_sold"],
                vec![row(&["2025-02-24", "SKU-A", "ANZ-North", "900"])],
            ),
            SourceTable::PosMarketSignal => {
                (vec!["week_start", "sku_id", "pos_units"], vec![row(&["2025-02-24", "SKU-A", "850"])])
            }
            SourceTable::Suppliers => (vec!["supplier_id", "material_id"], vec![row(&["SUP-1", "MAT-PET"])]),
            SourceTable::PurchaseOrders => (
                vec!["po_id", "material_id", "qty"],
                vec![row(&["PO-1", "MAT-PET", "1000"])],
            ),
            SourceTable::LogisticsLanes => (
                vec!["lane_id", "origin", "destination_region"],
                vec![row(&["L1", "DC-SYD", "ANZ-North"])],
            ),
            SourceTable::Scenarios => (vec!["scenario_id", "fuel_spike_pct"], vec![row(&["SCN-1", "20"])]),
        }
    }
}

/// 标准两 SKU 夹具
///
/// - SKU-A (Beverages): 日产能 100，每周一个日历日 → 周产能 700；W1 库存 100
/// - SKU-B (Snacks): 日产能 50 → 周产能 350；W1 库存 30 + 20
/// - 需求（ANZ-North + ANZ-South）: A = 1000 / 500，B = 300 / 400
/// - ANZ-East 的预测不应计入默认请求
pub fn standard_fixture() -> DatasetFixture {
    DatasetFixture::new()
        .product("SKU-A", "Beverages")
        .product("SKU-B", "Snacks")
        .capacity("P1", "SKU-A", 100.0)
        .capacity("P1", "SKU-B", 50.0)
        .calendar_day("P1", week1(), 1440.0, 0.0)
        .calendar_day("P1", week2(), 1440.0, 0.0)
        .inventory("SKU-A", "DC-SYD", week1(), 100.0)
        .inventory("SKU-B", "DC-SYD", week1(), 30.0)
        .inventory("SKU-B", "DC-MEL", week1() + Duration::days(2), 20.0)
        .inventory("SKU-A", "DC-SYD", week2(), 999.0)
        .forecast(week1(), "SKU-A", "ANZ-North", 600.0)
        .forecast(week1(), "SKU-A", "ANZ-South", 400.0)
        .forecast(week1(), "SKU-A", "ANZ-East", 5000.0)
        .forecast(week2(), "SKU-A", "ANZ-North", 500.0)
        .forecast(week1(), "SKU-B", "ANZ-North", 300.0)
        .forecast(week2(), "SKU-B", "ANZ-North", 400.0)
        .cost("SKU-A", 10.0, 3.0, 1.0, 1.0)
        .cost("SKU-B", 4.0, 1.0, 0.5, 0.5)
        .bom("SKU-A", "MAT-PET")
        .bom("SKU-B", "MAT-FOIL")
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn write_csv(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<String>]) {
    let mut wtr = Writer::from_path(dir.join(format!("{}.csv", name))).unwrap();
    wtr.write_record(headers).unwrap();
    for r in rows {
        wtr.write_record(r).unwrap();
    }
    wtr.flush().unwrap();
}
