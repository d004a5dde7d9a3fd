// ==========================================
// 消费品 S&OP 供需平衡计算器 - KPI 汇总引擎
// ==========================================
// 职责: 计划表 → KPI 汇总 / SKU KPI / 周缺口 / 情景对比
// 红线: 纯归约，无副作用
// ==========================================

use crate::domain::kpi::{KpiSummary, ServiceLevelComparison, SkuKpi, WeeklyGap};
use crate::domain::plan::PlanRow;
use crate::domain::types::round_to;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// KpiSummarizer - KPI 汇总引擎
// ==========================================
pub struct KpiSummarizer;

impl KpiSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// 汇总任意子集的计划行
    ///
    /// - 需求/发运/缺口为整数合计
    /// - 服务水平 = 总发运 / 总需求（总需求为 0 时为 0），3 位小数
    /// - 收入、毛利保留 2 位小数
    pub fn summarize(&self, plan: &[PlanRow]) -> KpiSummary {
        summarize_rows(plan.iter())
    }

    /// 按 SKU 汇总（按 sku_id 排序）
    pub fn summarize_by_sku(&self, plan: &[PlanRow]) -> Vec<SkuKpi> {
        let mut groups: BTreeMap<&str, Vec<&PlanRow>> = BTreeMap::new();
        for row in plan {
            groups.entry(row.sku_id.as_str()).or_default().push(row);
        }

        groups
            .into_iter()
            .map(|(sku_id, rows)| SkuKpi {
                sku_id: sku_id.to_string(),
                kpis: summarize_rows(rows.into_iter()),
            })
            .collect()
    }

    /// 每周缺口合计（跨 SKU，按周排序）
    pub fn gap_by_week(&self, plan: &[PlanRow]) -> Vec<WeeklyGap> {
        let mut gaps: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in plan {
            *gaps.entry(row.week_start).or_insert(0) += row.gap_units;
        }

        gaps.into_iter()
            .map(|(week_start, gap_units)| WeeklyGap {
                week_start,
                gap_units,
            })
            .collect()
    }

    /// 基准 vs 情景的逐行服务水平对比
    ///
    /// 以基准计划的行序为准，按 (week_start, sku_id) 对齐；
    /// 情景中找不到的行不输出。
    pub fn compare_service_levels(
        &self,
        baseline: &[PlanRow],
        scenario: &[PlanRow],
    ) -> Vec<ServiceLevelComparison> {
        let scenario_index: HashMap<(NaiveDate, &str), f64> = scenario
            .iter()
            .map(|row| ((row.week_start, row.sku_id.as_str()), row.service_level))
            .collect();

        baseline
            .iter()
            .filter_map(|row| {
                scenario_index
                    .get(&(row.week_start, row.sku_id.as_str()))
                    .map(|scenario_level| ServiceLevelComparison {
                        week_start: row.week_start,
                        sku_id: row.sku_id.clone(),
                        baseline: round_to(row.service_level, 3),
                        scenario: round_to(*scenario_level, 3),
                    })
            })
            .collect()
    }
}

impl Default for KpiSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize_rows<'a>(rows: impl Iterator<Item = &'a PlanRow>) -> KpiSummary {
    let mut demand = 0.0;
    let mut shipped = 0i64;
    let mut gap = 0i64;
    let mut revenue = 0.0;
    let mut margin = 0.0;

    for row in rows {
        demand += row.demand;
        shipped += row.shipped_units;
        gap += row.gap_units;
        revenue += row.revenue;
        margin += row.margin;
    }

    let service_level = if demand != 0.0 {
        round_to(shipped as f64 / demand, 3)
    } else {
        0.0
    };

    KpiSummary {
        demand_units: demand.trunc() as i64,
        shipped_units: shipped,
        gap_units: gap,
        service_level,
        revenue: round_to(revenue, 2),
        margin: round_to(margin, 2),
    }
}
