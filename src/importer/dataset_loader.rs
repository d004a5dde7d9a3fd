// ==========================================
// 消费品 S&OP 供需平衡计算器 - 数据集加载器
// ==========================================
// 职责: 数据目录 → PlanningDataset（进程启动时加载一次）
// 流程: 定位 16 张源表 → 缺失即整体失败 → 解析 → 类型映射 → 构建
// 红线: 任一源表缺失时报告全部缺失表，不做部分加载
// ==========================================

use crate::domain::dataset::{PlanningDataset, RawTable, SourceTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// 源表文件扩展名（按优先级）
pub const TABLE_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

// ==========================================
// DatasetLoader - 数据集加载器
// ==========================================
pub struct DatasetLoader {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 定位源表文件: `<dir>/<table>.csv`，其次 `.xlsx` / `.xls`
    pub fn locate(&self, data_dir: &Path, table: SourceTable) -> Option<PathBuf> {
        TABLE_EXTENSIONS
            .iter()
            .map(|ext| data_dir.join(format!("{}.{}", table.name(), ext)))
            .find(|path| path.is_file())
    }

    /// 列出缺失的源表
    pub fn missing_tables(&self, data_dir: &Path) -> Vec<SourceTable> {
        SourceTable::ALL
            .iter()
            .copied()
            .filter(|table| self.locate(data_dir, *table).is_none())
            .collect()
    }

    /// 加载全部源表
    ///
    /// # 参数
    /// - data_dir: 数据目录
    ///
    /// # 返回
    /// - Ok(PlanningDataset): 只读数据集
    /// - Err(MissingTables): 列出全部缺失表
    /// - Err: 解析或映射失败（带表名/行号）
    #[instrument(skip_all, fields(data_dir = %data_dir.as_ref().display()))]
    pub fn load_all(&self, data_dir: impl AsRef<Path>) -> ImportResult<PlanningDataset> {
        let data_dir = data_dir.as_ref();
        let started = Instant::now();

        // === 步骤 1: 定位 ===
        let missing = self.missing_tables(data_dir);
        if !missing.is_empty() {
            return Err(ImportError::MissingTables {
                dir: data_dir.display().to_string(),
                tables: missing.iter().map(|t| t.name().to_string()).collect(),
            });
        }

        // === 步骤 2: 解析 ===
        let mut raw_tables: BTreeMap<SourceTable, RawTable> = BTreeMap::new();
        for table in SourceTable::ALL {
            let path = self
                .locate(data_dir, table)
                .ok_or_else(|| ImportError::FileNotFound(table.name().to_string()))?;
            let raw = self.parser.parse(&path)?;
            debug!(table = %table, rows = raw.len(), path = %path.display(), "源表解析完成");
            raw_tables.insert(table, raw);
        }

        // === 步骤 3: 类型映射 ===
        let mut take = |table: SourceTable| raw_tables.remove(&table).unwrap_or_default();

        let products = self.mapper.map_products(&take(SourceTable::Products))?;
        let production_capacity = self
            .mapper
            .map_production_capacity(&take(SourceTable::ProductionCapacity))?;
        let capacity_calendar = self
            .mapper
            .map_capacity_calendar(&take(SourceTable::CapacityCalendar))?;
        let inventory_snapshots = self
            .mapper
            .map_inventory_snapshots(&take(SourceTable::InventorySnapshots))?;
        let forecast_baseline = self
            .mapper
            .map_forecast_baseline(&take(SourceTable::ForecastBaseline))?;
        let cost_structures = self
            .mapper
            .map_cost_structures(&take(SourceTable::CostStructures))?;
        let bom = self.mapper.map_bom(&take(SourceTable::Bom))?;

        // === 步骤 4: 构建 ===
        let mut builder = PlanningDataset::builder()
            .products(products)
            .production_capacity(production_capacity)
            .capacity_calendar(capacity_calendar)
            .inventory_snapshots(inventory_snapshots)
            .forecast_baseline(forecast_baseline)
            .cost_structures(cost_structures)
            .bom(bom);

        // 其余源表原样保留（日期列规范化）
        for (table, raw) in raw_tables {
            builder = builder.raw_table(table, self.mapper.normalize_dates(table, raw)?);
        }
        let dataset = builder.build();

        info!(
            products = dataset.products().len(),
            forecast_rows = dataset.forecast_baseline().len(),
            capacity_rows = dataset.production_capacity().len(),
            calendar_rows = dataset.capacity_calendar().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "数据集加载完成"
        );
        Ok(dataset)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}
