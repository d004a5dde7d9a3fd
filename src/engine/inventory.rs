// ==========================================
// 消费品 S&OP 供需平衡计算器 - 期初库存汇总引擎
// ==========================================
// 职责: 库存快照 → SKU 在周边界的在手量（跨库位求和）
// 红线: 不做向前填充，无快照的周不生成行（下游按 0 处理）
// ==========================================

use crate::domain::dataset::PlanningDataset;
use crate::domain::plan::InventoryStart;
use crate::domain::records::InventorySnapshot;
use crate::domain::types::week_start_of;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// InventoryAggregator - 期初库存汇总引擎
// ==========================================
pub struct InventoryAggregator;

impl InventoryAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 从数据集计算周初库存
    pub fn compute(
        &self,
        dataset: &PlanningDataset,
        skus: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<InventoryStart> {
        self.aggregate(dataset.inventory_snapshots(), skus, week_starts)
    }

    /// 按 (SKU, 周一) 汇总在手量，仅保留请求的 SKU 与周
    ///
    /// 输出按 (sku_id, week_start) 排序。
    #[instrument(skip_all, fields(snapshots = snapshots.len(), skus = skus.len(), weeks = week_starts.len()))]
    pub fn aggregate(
        &self,
        snapshots: &[InventorySnapshot],
        skus: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<InventoryStart> {
        let sku_set: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let week_set: HashSet<NaiveDate> = week_starts.iter().copied().collect();

        let mut on_hand: BTreeMap<(&str, NaiveDate), f64> = BTreeMap::new();
        for snapshot in snapshots {
            let week_start = week_start_of(snapshot.date);
            if !sku_set.contains(snapshot.sku_id.as_str()) || !week_set.contains(&week_start) {
                continue;
            }
            *on_hand
                .entry((snapshot.sku_id.as_str(), week_start))
                .or_insert(0.0) += snapshot.on_hand_units;
        }

        let rows: Vec<InventoryStart> = on_hand
            .into_iter()
            .map(|((sku_id, week_start), units)| InventoryStart::new(sku_id, week_start, units))
            .collect();

        debug!(rows = rows.len(), "期初库存汇总完成");
        rows
    }
}

impl Default for InventoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}
