// ==========================================
// 消费品 S&OP 供需平衡计算器 - 命令行入口
// ==========================================
// 子命令:
// - balance   供需平衡（计划 + SKU KPI + 周缺口）
// - scenario  情景模拟（基准 vs 情景）
// - catalog   列出可选 SKU / 区域 / 品类 / 物料 / 周
// 输出: 默认文本表格，--json 输出完整报告
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cpg_sop_planner::config::{ConfigManager, ScenarioProfile};
use cpg_sop_planner::domain::{PlanningDataset, PLAN_COLUMNS};
use cpg_sop_planner::engine::{PlanRequest, PlanningHorizon, PlanningOrchestrator};
use cpg_sop_planner::importer::DatasetLoader;
use cpg_sop_planner::logging::{self, LogFormat};
use cpg_sop_planner::{BalanceReport, MissingCostPolicy, Scenario, ScenarioReport};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// 周度供需平衡与情景模拟
#[derive(Parser, Debug)]
#[command(name = "sop-planner", version)]
#[command(about = "Weekly supply/demand balancing and what-if scenarios for CPG S&OP")]
struct Cli {
    /// 数据目录（默认取配置文件 data_dir）
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 配置文件路径（默认平台配置目录）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 缺失成本策略: fail_fast | zero_economics
    #[arg(long, global = true)]
    missing_cost_policy: Option<MissingCostPolicy>,

    /// 以 JSON 输出完整报告
    #[arg(long, global = true)]
    json: bool,

    /// 以 JSON 输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 基准供需平衡
    Balance {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// 基准 vs 情景
    Scenario {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        knobs: ScenarioArgs,
    },
    /// 列出数据集中可选的维度
    Catalog,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// SKU（逗号分隔，默认取产品表前 N 个）
    #[arg(long = "sku", value_delimiter = ',')]
    skus: Vec<String>,

    /// 区域（逗号分隔，默认取配置 default_regions）
    #[arg(long = "region", value_delimiter = ',')]
    regions: Vec<String>,

    /// 起始周（YYYY-MM-DD，含）
    #[arg(long)]
    from: Option<NaiveDate>,

    /// 结束周（YYYY-MM-DD，含）
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// 品类需求乘数，如 Beverages=1.2（可重复）
    #[arg(long = "uplift")]
    uplifts: Vec<String>,

    #[arg(long)]
    uplift_start: Option<NaiveDate>,

    #[arg(long)]
    uplift_end: Option<NaiveDate>,

    /// 延迟物料 ID
    #[arg(long)]
    delay_material: Option<String>,

    /// 延迟天数（显式给出时覆盖命名情景，0 表示清除）
    #[arg(long)]
    delay_days: Option<i64>,

    #[arg(long)]
    delay_start: Option<NaiveDate>,

    #[arg(long)]
    delay_end: Option<NaiveDate>,

    /// 物流成本上涨百分比（20 表示 +20%，0 表示清除）
    #[arg(long)]
    fuel_spike: Option<f64>,

    /// 使用配置文件中的命名情景
    #[arg(long, conflicts_with = "scenario_file")]
    scenario_profile: Option<String>,

    /// 从 JSON 文件读取情景
    #[arg(long)]
    scenario_file: Option<PathBuf>,

    /// 将最终情景保存为命名情景
    #[arg(long)]
    save_profile: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_with(LogFormat::Json, "info");
    } else {
        logging::init();
    }

    let mut config = match &cli.config {
        Some(path) => ConfigManager::load(path),
        None => ConfigManager::load_default(),
    }
    .context("加载配置失败")?;

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let dataset = DatasetLoader::new()
        .load_all(&data_dir)
        .with_context(|| format!("加载数据目录失败: {}", data_dir.display()))?;

    let policy = cli
        .missing_cost_policy
        .unwrap_or_else(|| config.missing_cost_policy());

    match &cli.command {
        Command::Catalog => print_catalog(&dataset)?,
        Command::Balance { selection } => {
            let request = build_request(&dataset, &config, selection)?;
            let report = PlanningOrchestrator::new(&dataset, policy).run_balance(&request)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_balance(&report);
            }
        }
        Command::Scenario { selection, knobs } => {
            let request = build_request(&dataset, &config, selection)?;
            let scenario = build_scenario(&config, knobs)?;

            if let Some(id) = &knobs.save_profile {
                let profile = ScenarioProfile {
                    scenario_id: id.trim().to_string(),
                    title: id.trim().to_string(),
                    description: None,
                    scenario: scenario.clone(),
                };
                config.put_scenario_profile(&profile)?;
                config.save()?;
                info!(scenario_id = %profile.scenario_id, "情景已保存");
            }

            let report =
                PlanningOrchestrator::new(&dataset, policy).run_scenario(&request, &scenario)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_scenario(&report);
            }
        }
    }

    Ok(())
}

// ==========================================
// 请求与情景构建
// ==========================================

fn build_request(
    dataset: &PlanningDataset,
    config: &ConfigManager,
    selection: &SelectionArgs,
) -> Result<PlanRequest> {
    let skus = if selection.skus.is_empty() {
        dataset
            .sku_ids()
            .into_iter()
            .take(config.default_sku_count())
            .collect()
    } else {
        trimmed(&selection.skus)
    };

    let regions = if selection.regions.is_empty() {
        config.default_regions()
    } else {
        trimmed(&selection.regions)
    };

    let horizon = PlanningHorizon::from_dataset(dataset)?;
    let week_starts =
        horizon.select_or_default(selection.from, selection.to, config.horizon_weeks())?;

    Ok(PlanRequest {
        skus,
        regions,
        week_starts,
    })
}

fn trimmed(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// 情景 = 命名情景/情景文件（如有）+ 命令行显式旋钮
fn build_scenario(config: &ConfigManager, knobs: &ScenarioArgs) -> Result<Scenario> {
    let mut scenario = if let Some(id) = &knobs.scenario_profile {
        config.get_scenario_profile(id)?.scenario
    } else if let Some(path) = &knobs.scenario_file {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取情景文件失败: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("情景文件格式错误: {}", path.display()))?
    } else {
        Scenario::default()
    };

    scenario
        .uplift_by_category
        .extend(parse_uplifts(&knobs.uplifts)?);
    if knobs.uplift_start.is_some() {
        scenario.uplift_start = knobs.uplift_start;
    }
    if knobs.uplift_end.is_some() {
        scenario.uplift_end = knobs.uplift_end;
    }
    if knobs.delay_material.is_some() {
        scenario.delay_material_id = knobs.delay_material.clone();
    }
    if let Some(delay_days) = knobs.delay_days {
        scenario.delay_days = delay_days;
    }
    if knobs.delay_start.is_some() {
        scenario.delay_start = knobs.delay_start;
    }
    if knobs.delay_end.is_some() {
        scenario.delay_end = knobs.delay_end;
    }
    if let Some(fuel_spike) = knobs.fuel_spike {
        scenario.fuel_spike_pct = fuel_spike;
    }

    if let Err(message) = scenario.validate() {
        bail!("情景参数非法: {}", message);
    }
    Ok(scenario)
}

/// 解析 `Category=multiplier`
fn parse_uplifts(values: &[String]) -> Result<BTreeMap<String, f64>> {
    let mut uplifts = BTreeMap::new();
    for value in values {
        let (category, multiplier) = value
            .split_once('=')
            .with_context(|| format!("需求乘数格式应为 品类=乘数: {}", value))?;
        let multiplier: f64 = multiplier
            .trim()
            .parse()
            .with_context(|| format!("需求乘数不是数值: {}", value))?;
        uplifts.insert(category.trim().to_string(), multiplier);
    }
    Ok(uplifts)
}

// ==========================================
// 文本输出
// ==========================================

fn print_header(title: &str) {
    println!("\n{}", "═".repeat(100));
    println!("  {}", title);
    println!("{}\n", "═".repeat(100));
}

fn print_section(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(100));
}

fn print_plan(plan: &[cpg_sop_planner::PlanRow]) {
    println!(
        "  {:10} {:10} {:>9} {:>9} {:>9} {:>9} {:>9} {:>8} {:>12} {:>12} {:>7}",
        PLAN_COLUMNS[0],
        PLAN_COLUMNS[1],
        "demand",
        "capacity",
        "inv",
        "supply",
        "shipped",
        "gap",
        "revenue",
        "margin",
        "svc"
    );
    for row in plan {
        println!(
            "  {:10} {:10} {:>9.1} {:>9} {:>9.1} {:>9.1} {:>9} {:>8} {:>12.2} {:>12.2} {:>7.3}",
            row.week_start.to_string(),
            row.sku_id,
            row.demand,
            row.weekly_capacity_units,
            row.inv_to_use,
            row.supply_potential,
            row.shipped_units,
            row.gap_units,
            row.revenue,
            row.margin,
            row.service_level
        );
    }
}

fn print_kpis(label: &str, kpis: &cpg_sop_planner::KpiSummary) {
    println!(
        "  {:12} {:>10} {:>10} {:>10} {:>7.3} {:>14.2} {:>14.2}",
        label,
        kpis.demand_units,
        kpis.shipped_units,
        kpis.gap_units,
        kpis.service_level,
        kpis.revenue,
        kpis.margin
    );
}

fn print_kpi_header() {
    println!(
        "  {:12} {:>10} {:>10} {:>10} {:>7} {:>14} {:>14}",
        "", "demand", "shipped", "gap", "svc", "revenue", "margin"
    );
}

fn print_balance(report: &BalanceReport) {
    print_header(&format!("供需平衡  run_id={}", report.run_id));
    println!("  SKU:    {}", report.request.skus.join(", "));
    println!("  区域:   {}", report.request.regions.join(", "));
    println!("  周数:   {}", report.request.week_starts.len());

    print_section("计划");
    print_plan(&report.plan);

    print_section("SKU KPI");
    print_kpi_header();
    for sku in &report.sku_kpis {
        print_kpis(&sku.sku_id, &sku.kpis);
    }
    print_kpis("TOTAL", &report.total_kpis);

    print_section("周缺口");
    for gap in &report.gap_by_week {
        println!("  {}  {:>10}", gap.week_start, gap.gap_units);
    }
}

fn print_scenario(report: &ScenarioReport) {
    print_header(&format!("情景模拟  run_id={}", report.run_id));
    println!("  SKU:    {}", report.request.skus.join(", "));
    println!("  区域:   {}", report.request.regions.join(", "));
    println!("  周数:   {}", report.request.week_starts.len());

    print_section("KPI 对比");
    print_kpi_header();
    print_kpis("baseline", &report.baseline_kpis);
    print_kpis("scenario", &report.scenario_kpis);
    let delta = &report.delta;
    println!(
        "  {:12} {:>+10} {:>+10} {:>+10} {:>+7.3} {:>+14.2} {:>+14.2}",
        "delta",
        delta.demand_units,
        delta.shipped_units,
        delta.gap_units,
        delta.service_level,
        delta.revenue,
        delta.margin
    );

    print_section("服务水平（周 × SKU）");
    println!("  {:10} {:10} {:>9} {:>9}", "week_start", "sku_id", "baseline", "scenario");
    for row in &report.service_levels {
        println!(
            "  {:10} {:10} {:>9.3} {:>9.3}",
            row.week_start.to_string(),
            row.sku_id,
            row.baseline,
            row.scenario
        );
    }

    print_section("情景计划");
    print_plan(&report.scenario_plan);
}

fn print_catalog(dataset: &PlanningDataset) -> Result<()> {
    let horizon = PlanningHorizon::from_dataset(dataset)?;

    print_header("数据集目录");
    println!("  SKU:    {}", dataset.sku_ids().join(", "));
    println!("  区域:   {}", dataset.regions().join(", "));
    println!("  品类:   {}", dataset.categories().join(", "));
    println!("  物料:   {}", dataset.materials().join(", "));
    println!(
        "  周:     {} ~ {} ({} 周)",
        horizon.first_week(),
        horizon.last_week(),
        horizon.weeks().len()
    );
    Ok(())
}
