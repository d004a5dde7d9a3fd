// ==========================================
// 消费品 S&OP 供需平衡计算器 - 基准预测选择器
// ==========================================
// 职责: 按 SKU/区域/周 过滤基准预测并跨区域汇总
// 说明: 区域明细在此之后不再保留
// ==========================================

use crate::domain::dataset::PlanningDataset;
use crate::domain::plan::ForecastWeek;
use crate::domain::records::ForecastBaseline;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// ForecastSelector - 基准预测选择器
// ==========================================
pub struct ForecastSelector;

impl ForecastSelector {
    pub fn new() -> Self {
        Self
    }

    /// 从数据集选择基准预测
    pub fn compute(
        &self,
        dataset: &PlanningDataset,
        skus: &[String],
        regions: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<ForecastWeek> {
        self.select(dataset.forecast_baseline(), skus, regions, week_starts)
    }

    /// 三个集合取交集后按 (week_start, sku_id) 求和
    ///
    /// 输出按 (week_start, sku_id) 排序。
    #[instrument(skip_all, fields(rows = rows.len(), skus = skus.len(), regions = regions.len(), weeks = week_starts.len()))]
    pub fn select(
        &self,
        rows: &[ForecastBaseline],
        skus: &[String],
        regions: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<ForecastWeek> {
        let sku_set: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let region_set: HashSet<&str> = regions.iter().map(String::as_str).collect();
        let week_set: HashSet<NaiveDate> = week_starts.iter().copied().collect();

        let mut totals: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
        for row in rows.iter().filter(|r| {
            sku_set.contains(r.sku_id.as_str())
                && region_set.contains(r.region.as_str())
                && week_set.contains(&r.week_start)
        }) {
            *totals
                .entry((row.week_start, row.sku_id.as_str()))
                .or_insert(0.0) += row.forecast_units;
        }

        let forecast: Vec<ForecastWeek> = totals
            .into_iter()
            .map(|((week_start, sku_id), units)| ForecastWeek::new(week_start, sku_id, units))
            .collect();

        debug!(rows = forecast.len(), "基准预测选择完成");
        forecast
    }
}

impl Default for ForecastSelector {
    fn default() -> Self {
        Self::new()
    }
}
