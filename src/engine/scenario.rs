// ==========================================
// 消费品 S&OP 供需平衡计算器 - 情景调整引擎
// ==========================================
// 职责: 三个相互独立、可组合的 what-if 调整
// - 需求上调（按品类，可选日期窗口）
// - 物料延迟导致的产能折减
// - 燃油涨价导致的物流成本上涨
// 红线: 输入只借用不修改，每次返回新表；缺省旋钮为空操作
// ==========================================

use crate::domain::capacity::WeeklyCapacity;
use crate::domain::dataset::PlanningDataset;
use crate::domain::plan::ForecastWeek;
use crate::domain::records::{BomLine, CostStructure};
use crate::domain::scenario::Scenario;
use crate::domain::types::round_half_even;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// 每延迟 7 天损失 15% 产能
pub const DELAY_REDUCTION_PER_WEEK: f64 = 0.15;

/// 产能折减上限
pub const MAX_DELAY_REDUCTION: f64 = 0.9;

/// 物料延迟天数 → 产能折减比例
///
/// `min(0.9, 0.15 × delay_days / 7)`，delay_days ≤ 0 时为 0。
pub fn delay_reduction(delay_days: i64) -> f64 {
    if delay_days <= 0 {
        return 0.0;
    }
    (DELAY_REDUCTION_PER_WEEK * (delay_days as f64 / 7.0)).min(MAX_DELAY_REDUCTION)
}

/// 单行需求上调
///
/// 乘数取 `uplift_by_category[category]`，缺省为 1.0；
/// 配置了完整窗口且 week_start 不在窗口内时乘数回到 1.0。
pub fn uplifted_units(
    category: Option<&str>,
    week_start: NaiveDate,
    forecast_units: f64,
    scenario: &Scenario,
) -> f64 {
    let mut multiplier = category
        .and_then(|c| scenario.uplift_by_category.get(c))
        .copied()
        .unwrap_or(1.0);

    if let Some(window) = scenario.uplift_window() {
        if !window.contains(week_start) {
            multiplier = 1.0;
        }
    }

    round_half_even(forecast_units * multiplier)
}

// ==========================================
// ScenarioAdjuster - 情景调整引擎
// ==========================================
// 红线: 无状态引擎，情景配置显式传参
pub struct ScenarioAdjuster;

impl ScenarioAdjuster {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 需求上调
    // ==========================================

    /// 以数据集中的产品品类执行需求上调
    pub fn apply_demand_uplift_with(
        &self,
        dataset: &PlanningDataset,
        forecast: &[ForecastWeek],
        scenario: &Scenario,
    ) -> Vec<ForecastWeek> {
        self.apply_demand_uplift(forecast, &dataset.product_categories(), scenario)
    }

    /// 需求上调
    ///
    /// 乘数表为空时原样返回输入（不做取整）。
    /// 没有产品行的 SKU 乘数为 1.0（但仍会取整）。
    #[instrument(skip_all, fields(rows = forecast.len(), categories = scenario.uplift_by_category.len()))]
    pub fn apply_demand_uplift(
        &self,
        forecast: &[ForecastWeek],
        categories: &HashMap<&str, &str>,
        scenario: &Scenario,
    ) -> Vec<ForecastWeek> {
        if scenario.uplift_by_category.is_empty() {
            return forecast.to_vec();
        }

        let adjusted: Vec<ForecastWeek> = forecast
            .iter()
            .map(|row| {
                let category = categories.get(row.sku_id.as_str()).copied();
                ForecastWeek {
                    forecast_units: uplifted_units(
                        category,
                        row.week_start,
                        row.forecast_units,
                        scenario,
                    ),
                    ..row.clone()
                }
            })
            .collect();

        info!(
            rows = adjusted.len(),
            windowed = scenario.uplift_window().is_some(),
            "需求上调已应用"
        );
        adjusted
    }

    // ==========================================
    // 物料延迟产能折减
    // ==========================================

    /// 以数据集中的 BOM 执行产能折减
    pub fn apply_capacity_delay_with(
        &self,
        dataset: &PlanningDataset,
        capacity: &[WeeklyCapacity],
        scenario: &Scenario,
    ) -> Vec<WeeklyCapacity> {
        self.apply_capacity_delay(capacity, dataset.bom(), scenario)
    }

    /// 物料延迟产能折减
    ///
    /// 规则：
    /// 1) 未配置物料或 delay_days ≤ 0 → 原样返回
    /// 2) 受影响 SKU = BOM 中使用该物料的 SKU
    /// 3) 配置了完整窗口时仅折减窗口内的周，否则折减全部周
    /// 4) weekly_capacity_units := round(units × (1 - reduction))
    #[instrument(skip_all, fields(rows = capacity.len(), delay_days = scenario.delay_days))]
    pub fn apply_capacity_delay(
        &self,
        capacity: &[WeeklyCapacity],
        bom: &[BomLine],
        scenario: &Scenario,
    ) -> Vec<WeeklyCapacity> {
        let material_id = match scenario.delay_material() {
            Some(id) if scenario.delay_days > 0 => id,
            _ => return capacity.to_vec(),
        };

        let affected: HashSet<&str> = bom
            .iter()
            .filter(|line| line.material_id == material_id)
            .map(|line| line.sku_id.as_str())
            .collect();
        let window = scenario.delay_window();
        let reduction = delay_reduction(scenario.delay_days);

        let mut reduced_rows = 0usize;
        let adjusted: Vec<WeeklyCapacity> = capacity
            .iter()
            .map(|row| {
                let in_window = window.map_or(true, |w| w.contains(row.week_start));
                if in_window && affected.contains(row.sku_id.as_str()) {
                    reduced_rows += 1;
                    WeeklyCapacity {
                        weekly_capacity_units: round_half_even(
                            row.weekly_capacity_units as f64 * (1.0 - reduction),
                        ) as i64,
                        ..row.clone()
                    }
                } else {
                    row.clone()
                }
            })
            .collect();

        info!(
            material_id,
            affected_skus = affected.len(),
            reduction,
            reduced_rows,
            "物料延迟产能折减已应用"
        );
        adjusted
    }

    // ==========================================
    // 燃油涨价
    // ==========================================

    /// 物流成本上涨 `fuel_spike_pct` 百分比
    ///
    /// fuel_spike_pct 为 0 时原样返回。
    pub fn apply_fuel_adjustment(
        &self,
        costs: &[CostStructure],
        fuel_spike_pct: f64,
    ) -> Vec<CostStructure> {
        if fuel_spike_pct == 0.0 {
            return costs.to_vec();
        }

        let factor = 1.0 + fuel_spike_pct / 100.0;
        debug!(fuel_spike_pct, factor, rows = costs.len(), "物流成本上调");
        costs
            .iter()
            .map(|cost| CostStructure {
                logistics_cost: cost.logistics_cost * factor,
                ..cost.clone()
            })
            .collect()
    }
}

impl Default for ScenarioAdjuster {
    fn default() -> Self {
        Self::new()
    }
}
