// ==========================================
// 消费品 S&OP 供需平衡计算器 - 供需平衡引擎
// ==========================================
// 职责: 预测 + 周产能 + 期初库存 + 单位经济 → 周平衡计划
// 输入: ForecastWeek / WeeklyCapacity / InventoryStart(仅首周) / CostStructure
// 输出: PlanRow（按 sku_id, week_start 排序）
// 红线:
// - 左连接未命中一律显式补 0
// - 期初库存只注入 SKU 最早的一周，不做周间滚存
// ==========================================

use crate::domain::capacity::WeeklyCapacity;
use crate::domain::plan::{ForecastWeek, InventoryStart, PlanRow};
use crate::domain::records::CostStructure;
use crate::domain::types::{round_to, MissingCostPolicy};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

// ==========================================
// 左连接 + 补零
// ==========================================

/// 预测左连接周产能后的中间行
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityJoinedRow {
    pub week_start: NaiveDate,
    pub sku_id: String,
    pub forecast_units: f64,
    pub weekly_capacity_units: i64,
}

/// 预测左连接周产能，缺失产能补 0
///
/// 同一 (周, SKU) 出现多条产能行时求和。
pub fn left_join_capacity(
    forecast: &[ForecastWeek],
    capacity: &[WeeklyCapacity],
) -> Vec<CapacityJoinedRow> {
    let mut capacity_index: HashMap<(NaiveDate, &str), i64> = HashMap::new();
    for row in capacity {
        *capacity_index.entry(row.key()).or_insert(0) += row.weekly_capacity_units;
    }

    forecast
        .iter()
        .map(|f| CapacityJoinedRow {
            week_start: f.week_start,
            sku_id: f.sku_id.clone(),
            forecast_units: f.forecast_units,
            weekly_capacity_units: capacity_index
                .get(&(f.week_start, f.sku_id.as_str()))
                .copied()
                .unwrap_or(0),
        })
        .collect()
}

/// 按 SKU 汇总期初库存（同 SKU 多行求和）
pub fn starting_inventory_by_sku(inventory: &[InventoryStart]) -> HashMap<&str, f64> {
    let mut by_sku: HashMap<&str, f64> = HashMap::new();
    for row in inventory {
        *by_sku.entry(row.sku_id.as_str()).or_insert(0.0) += row.on_hand_units;
    }
    by_sku
}

/// 服务水平 = shipped / demand
///
/// 除零与非数值映射为 0，截断到 [0, 1]，保留 3 位小数。
pub fn service_level(shipped_units: i64, demand: f64) -> f64 {
    let ratio = shipped_units as f64 / demand;
    if !ratio.is_finite() {
        return 0.0;
    }
    round_to(ratio.clamp(0.0, 1.0), 3)
}

// ==========================================
// BalanceEngine - 供需平衡引擎
// ==========================================
pub struct BalanceEngine {
    missing_cost_policy: MissingCostPolicy,
}

impl BalanceEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `missing_cost_policy`: 成本表缺失 SKU 时的处理方式
    pub fn new(missing_cost_policy: MissingCostPolicy) -> Self {
        Self {
            missing_cost_policy,
        }
    }

    pub fn missing_cost_policy(&self) -> MissingCostPolicy {
        self.missing_cost_policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算周平衡计划
    ///
    /// 步骤：
    /// 1) 预测左连接周产能，缺失补 0
    /// 2) 期初库存按 SKU 求和，缺失补 0
    /// 3) 期初库存只分配给 SKU 最早的一周
    /// 4) supply_potential = 周产能 + inv_to_use
    /// 5) demand = forecast_units
    /// 6) shipped = min(supply_potential, demand) 取整
    /// 7) gap = max(demand - shipped, 0) 取整
    /// 8) 收入 = shipped × 单价；毛利 = 收入 - shipped × 单位成本
    /// 9) service_level = shipped / demand（见 [`service_level`]）
    ///
    /// # 错误
    /// - `MissingCostStructure`: 策略为 FailFast 且某 SKU 无成本行
    #[instrument(skip_all, fields(
        forecast_rows = forecast.len(),
        capacity_rows = capacity.len(),
        inventory_rows = inventory.len(),
        policy = %self.missing_cost_policy
    ))]
    pub fn compute_plan(
        &self,
        forecast: &[ForecastWeek],
        capacity: &[WeeklyCapacity],
        inventory: &[InventoryStart],
        costs: &[CostStructure],
    ) -> EngineResult<Vec<PlanRow>> {
        // 1. 预测 ⟕ 产能
        let mut joined = left_join_capacity(forecast, capacity);

        // 2. 期初库存
        let starting_inventory = starting_inventory_by_sku(inventory);

        // 3. 按 (SKU, 周) 排序，每个 SKU 的第一行即最早一周
        joined.sort_by(|a, b| {
            a.sku_id
                .cmp(&b.sku_id)
                .then_with(|| a.week_start.cmp(&b.week_start))
        });

        let mut cost_index: HashMap<&str, &CostStructure> = HashMap::new();
        for cost in costs {
            cost_index.entry(cost.sku_id.as_str()).or_insert(cost);
        }

        let mut seen_skus: HashSet<String> = HashSet::new();
        let mut plan = Vec::with_capacity(joined.len());

        for row in joined {
            let is_first_week = seen_skus.insert(row.sku_id.clone());
            let inv_to_use = if is_first_week {
                starting_inventory
                    .get(row.sku_id.as_str())
                    .copied()
                    .unwrap_or(0.0)
            } else {
                0.0
            };

            // 4-7. 供给、发运、缺口
            let supply_potential = row.weekly_capacity_units as f64 + inv_to_use;
            let demand = row.forecast_units;
            let shipped_units = supply_potential.min(demand).trunc() as i64;
            let gap_units = (demand - shipped_units as f64).max(0.0).trunc() as i64;

            // 8. 单位经济
            let (revenue, margin) = match cost_index.get(row.sku_id.as_str()) {
                Some(cost) => {
                    let revenue = shipped_units as f64 * cost.unit_list_price;
                    let margin = revenue - shipped_units as f64 * cost.unit_cost();
                    (revenue, margin)
                }
                None => match self.missing_cost_policy {
                    MissingCostPolicy::FailFast => {
                        return Err(EngineError::MissingCostStructure {
                            sku_id: row.sku_id,
                        });
                    }
                    MissingCostPolicy::ZeroEconomics => {
                        if is_first_week {
                            warn!(sku_id = %row.sku_id, "成本结构缺失，收入/毛利按 0 计");
                        }
                        (0.0, 0.0)
                    }
                },
            };

            // 9. 服务水平
            let service_level = service_level(shipped_units, demand);

            plan.push(PlanRow {
                week_start: row.week_start,
                sku_id: row.sku_id,
                demand,
                weekly_capacity_units: row.weekly_capacity_units,
                inv_to_use,
                supply_potential,
                shipped_units,
                gap_units,
                revenue,
                margin,
                service_level,
            });
        }

        debug!(rows = plan.len(), skus = seen_skus.len(), "周平衡计划计算完成");
        Ok(plan)
    }
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self::new(MissingCostPolicy::default())
    }
}
