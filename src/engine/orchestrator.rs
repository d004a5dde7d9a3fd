// ==========================================
// 消费品 S&OP 供需平衡计算器 - 引擎编排器
// ==========================================
// 用途: 协调各引擎的执行顺序，产出两类报告
// - 供需平衡（基准计划 + SKU KPI + 周缺口）
// - 情景模拟（基准 vs 情景）
// 红线: 每次请求全量重算，不保留中间状态；基础表只借用
// ==========================================

use crate::domain::capacity::WeeklyCapacity;
use crate::domain::dataset::PlanningDataset;
use crate::domain::kpi::{KpiDelta, KpiSummary, ServiceLevelComparison, SkuKpi, WeeklyGap};
use crate::domain::plan::{ForecastWeek, InventoryStart, PlanRow};
use crate::domain::records::CostStructure;
use crate::domain::scenario::Scenario;
use crate::domain::types::MissingCostPolicy;
use crate::engine::error::EngineResult;
use crate::engine::{
    BalanceEngine, CapacityAggregator, ForecastSelector, InventoryAggregator, KpiSummarizer,
    ScenarioAdjuster,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// PlanRequest - 计划请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub skus: Vec<String>,
    pub regions: Vec<String>,
    pub week_starts: Vec<NaiveDate>,
}

impl PlanRequest {
    /// 期初库存只取最早的请求周
    pub fn first_week(&self) -> Option<NaiveDate> {
        self.week_starts.iter().min().copied()
    }
}

// ==========================================
// BaselineInputs - 基准输入（情景调整前）
// ==========================================
#[derive(Debug, Clone)]
pub struct BaselineInputs {
    pub forecast: Vec<ForecastWeek>,
    pub capacity: Vec<WeeklyCapacity>,
    pub inventory: Vec<InventoryStart>,
    pub costs: Vec<CostStructure>,
}

// ==========================================
// BalanceReport - 供需平衡报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub run_id: Uuid,
    pub request: PlanRequest,
    pub plan: Vec<PlanRow>,
    pub sku_kpis: Vec<SkuKpi>,
    pub total_kpis: KpiSummary,
    pub gap_by_week: Vec<WeeklyGap>,
}

// ==========================================
// ScenarioReport - 情景模拟报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    pub request: PlanRequest,
    pub scenario: Scenario,
    pub baseline_plan: Vec<PlanRow>,
    pub scenario_plan: Vec<PlanRow>,
    pub service_levels: Vec<ServiceLevelComparison>,
    pub baseline_kpis: KpiSummary,
    pub scenario_kpis: KpiSummary,
    pub delta: KpiDelta,
}

// ==========================================
// PlanningOrchestrator - 引擎编排器
// ==========================================
pub struct PlanningOrchestrator<'a> {
    dataset: &'a PlanningDataset,
    capacity: CapacityAggregator,
    inventory: InventoryAggregator,
    forecast: ForecastSelector,
    adjuster: ScenarioAdjuster,
    balance: BalanceEngine,
    kpi: KpiSummarizer,
}

impl<'a> PlanningOrchestrator<'a> {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - dataset: 只读数据集（进程启动时加载一次）
    /// - missing_cost_policy: 成本缺失处理策略
    pub fn new(dataset: &'a PlanningDataset, missing_cost_policy: MissingCostPolicy) -> Self {
        Self {
            dataset,
            capacity: CapacityAggregator::new(),
            inventory: InventoryAggregator::new(),
            forecast: ForecastSelector::new(),
            adjuster: ScenarioAdjuster::new(),
            balance: BalanceEngine::new(missing_cost_policy),
            kpi: KpiSummarizer::new(),
        }
    }

    /// 计算基准输入（预测、周产能、首周库存、成本）
    pub fn baseline_inputs(&self, request: &PlanRequest) -> BaselineInputs {
        let forecast = self.forecast.compute(
            self.dataset,
            &request.skus,
            &request.regions,
            &request.week_starts,
        );
        let capacity = self
            .capacity
            .compute(self.dataset, &request.skus, &request.week_starts);
        let first_week: Vec<NaiveDate> = request.first_week().into_iter().collect();
        let inventory = self.inventory.compute(self.dataset, &request.skus, &first_week);
        let costs = self.dataset.cost_structures().to_vec();

        debug!(
            forecast_rows = forecast.len(),
            capacity_rows = capacity.len(),
            inventory_rows = inventory.len(),
            cost_rows = costs.len(),
            "基准输入准备完成"
        );

        BaselineInputs {
            forecast,
            capacity,
            inventory,
            costs,
        }
    }

    /// 执行供需平衡
    pub fn run_balance(&self, request: &PlanRequest) -> EngineResult<BalanceReport> {
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            skus = request.skus.len(),
            regions = request.regions.len(),
            weeks = request.week_starts.len(),
            policy = %self.balance.missing_cost_policy(),
            "开始执行供需平衡"
        );

        let inputs = self.baseline_inputs(request);
        let plan = self.balance.compute_plan(
            &inputs.forecast,
            &inputs.capacity,
            &inputs.inventory,
            &inputs.costs,
        )?;

        let report = BalanceReport {
            run_id,
            request: request.clone(),
            sku_kpis: self.kpi.summarize_by_sku(&plan),
            total_kpis: self.kpi.summarize(&plan),
            gap_by_week: self.kpi.gap_by_week(&plan),
            plan,
        };

        info!(
            %run_id,
            rows = report.plan.len(),
            service_level = report.total_kpis.service_level,
            gap_units = report.total_kpis.gap_units,
            "供需平衡完成"
        );
        Ok(report)
    }

    /// 执行情景模拟
    ///
    /// 基准与情景共用同一份基准输入；情景调整返回新表，基准表保持不变。
    pub fn run_scenario(
        &self,
        request: &PlanRequest,
        scenario: &Scenario,
    ) -> EngineResult<ScenarioReport> {
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            skus = request.skus.len(),
            weeks = request.week_starts.len(),
            noop = scenario.is_noop(),
            "开始执行情景模拟"
        );

        let inputs = self.baseline_inputs(request);

        // 情景调整
        let scenario_forecast =
            self.adjuster
                .apply_demand_uplift_with(self.dataset, &inputs.forecast, scenario);
        let scenario_capacity =
            self.adjuster
                .apply_capacity_delay_with(self.dataset, &inputs.capacity, scenario);
        let scenario_costs = self
            .adjuster
            .apply_fuel_adjustment(&inputs.costs, scenario.fuel_spike_pct);

        // 基准计划 + 情景计划
        let baseline_plan = self.balance.compute_plan(
            &inputs.forecast,
            &inputs.capacity,
            &inputs.inventory,
            &inputs.costs,
        )?;
        let scenario_plan = self.balance.compute_plan(
            &scenario_forecast,
            &scenario_capacity,
            &inputs.inventory,
            &scenario_costs,
        )?;

        let baseline_kpis = self.kpi.summarize(&baseline_plan);
        let scenario_kpis = self.kpi.summarize(&scenario_plan);
        let delta = KpiDelta::between(&baseline_kpis, &scenario_kpis);

        info!(
            %run_id,
            baseline_service_level = baseline_kpis.service_level,
            scenario_service_level = scenario_kpis.service_level,
            revenue_delta = delta.revenue,
            margin_delta = delta.margin,
            "情景模拟完成"
        );

        Ok(ScenarioReport {
            run_id,
            request: request.clone(),
            scenario: scenario.clone(),
            service_levels: self
                .kpi
                .compare_service_levels(&baseline_plan, &scenario_plan),
            baseline_plan,
            scenario_plan,
            baseline_kpis,
            scenario_kpis,
            delta,
        })
    }
}
