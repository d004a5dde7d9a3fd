// ==========================================
// 演示数据生成器
// ==========================================
// 用途: 生成 16 张源表 CSV（确定性，无随机数）
// 输出: 默认 data/*.csv
// 用法: cargo run --bin generate_demo_data -- --output data --weeks 26
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use clap::Parser;
use csv::Writer;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// 演示数据生成器
#[derive(Parser, Debug)]
#[command(name = "generate_demo_data")]
#[command(about = "Generate a deterministic CPG S&OP demo dataset")]
struct Args {
    /// 输出目录
    #[arg(long, default_value = "data")]
    output: PathBuf,

    /// 首个计划周（周一）
    #[arg(long, default_value = "2025-01-06")]
    start: NaiveDate,

    /// 预测周数
    #[arg(long, default_value_t = 26)]
    weeks: i64,
}

// (sku_id, 名称, 品类, 周基准需求, 单价, 物料成本, 加工成本, 物流成本)
const SKUS: &[(&str, &str, &str, f64, f64, f64, f64, f64)] = &[
    ("SKU-001", "Sparkling Water 1L", "Beverages", 1800.0, 2.40, 0.70, 0.35, 0.25),
    ("SKU-002", "Cola 375ml 6pk", "Beverages", 1500.0, 6.90, 2.10, 0.90, 0.60),
    ("SKU-003", "Potato Chips 175g", "Snacks", 1200.0, 3.80, 1.10, 0.55, 0.30),
    ("SKU-004", "Corn Chips 200g", "Snacks", 900.0, 4.20, 1.30, 0.60, 0.32),
    ("SKU-005", "Dish Liquid 500ml", "Household", 700.0, 3.50, 0.95, 0.45, 0.40),
    ("SKU-006", "Laundry Powder 2kg", "Household", 500.0, 11.50, 3.80, 1.40, 1.10),
];

const PLANTS: &[&str] = &["PLANT-SYD", "PLANT-MEL"];
const REGIONS: &[(&str, f64)] = &[
    ("ANZ-North", 0.30),
    ("ANZ-South", 0.25),
    ("ANZ-East", 0.28),
    ("ANZ-West", 0.17),
];
const LOCATIONS: &[&str] = &["DC-SYD", "DC-MEL"];

// (sku_id, material_id, 单耗)
const BOM: &[(&str, &str, f64)] = &[
    ("SKU-001", "MAT-PET", 0.040),
    ("SKU-001", "MAT-CARTON", 0.010),
    ("SKU-002", "MAT-ALU", 0.090),
    ("SKU-002", "MAT-CARTON", 0.020),
    ("SKU-003", "MAT-FOIL", 0.012),
    ("SKU-003", "MAT-POTATO", 0.350),
    ("SKU-004", "MAT-FOIL", 0.012),
    ("SKU-004", "MAT-CORN", 0.300),
    ("SKU-005", "MAT-PET", 0.030),
    ("SKU-005", "MAT-SURFACTANT", 0.120),
    ("SKU-006", "MAT-CARTON", 0.080),
    ("SKU-006", "MAT-SURFACTANT", 0.600),
];

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let start = args.start - Duration::days(args.start.weekday().num_days_from_monday() as i64);
    let weeks = args.weeks.max(1);
    let days = weeks * 7;

    fs::create_dir_all(&args.output)?;
    println!("开始生成演示数据集 → {}", args.output.display());

    let week = |i: i64| start + Duration::weeks(i);
    let day = |i: i64| start + Duration::days(i);

    // ===== calendar =====
    let rows = (0..days)
        .map(|i| {
            let date = day(i);
            vec![
                fmt_date(date),
                fmt_date(week(i / 7)),
                date.iso_week().week().to_string(),
                date.month().to_string(),
                date.year().to_string(),
            ]
        })
        .collect();
    write_table(&args.output, "calendar", &["date", "week_start", "iso_week", "month", "year"], rows)?;

    // ===== products =====
    let rows = SKUS
        .iter()
        .map(|(sku, name, category, ..)| {
            vec![sku.to_string(), name.to_string(), category.to_string(), "EA".to_string()]
        })
        .collect();
    write_table(&args.output, "products", &["sku_id", "sku_name", "category", "uom"], rows)?;

    // ===== customers =====
    let rows = REGIONS
        .iter()
        .enumerate()
        .flat_map(|(r, (region, _))| {
            ["Grocery", "Convenience"].into_iter().enumerate().map(move |(c, channel)| {
                vec![
                    format!("CUST-{:03}", r * 2 + c + 1),
                    format!("{} {}", region, channel),
                    region.to_string(),
                    channel.to_string(),
                ]
            })
        })
        .collect();
    write_table(&args.output, "customers", &["customer_id", "customer_name", "region", "channel"], rows)?;

    // ===== promotions =====
    let rows = SKUS
        .iter()
        .enumerate()
        .map(|(i, (sku, ..))| {
            let promo_start = week(2 + (i as i64 * 3) % weeks.max(3));
            vec![
                format!("PROMO-{:03}", i + 1),
                sku.to_string(),
                REGIONS[i % REGIONS.len()].0.to_string(),
                fmt_date(promo_start),
                fmt_date(promo_start + Duration::days(13)),
                format!("{:.2}", 0.10 + 0.05 * (i % 3) as f64),
            ]
        })
        .collect();
    write_table(
        &args.output,
        "promotions",
        &["promo_id", "sku_id", "region", "start_date", "end_date", "discount_pct"],
        rows,
    )?;

    // ===== sales_history（计划期前 26 周）=====
    let mut rows = Vec::new();
    for w in -26..0 {
        for (s, (sku, _, _, base, ..)) in SKUS.iter().enumerate() {
            for (region, share) in REGIONS {
                let units = (base * share * seasonal(w, s)).round();
                rows.push(vec![fmt_date(week(w)), sku.to_string(), region.to_string(), format!("{}", units)]);
            }
        }
    }
    write_table(&args.output, "sales_history", &["week_start", "sku_id", "region", "units_sold"], rows)?;

    // ===== pos_market_signal =====
    let mut rows = Vec::new();
    for w in -8..0 {
        for (s, (sku, _, _, base, ..)) in SKUS.iter().enumerate() {
            rows.push(vec![
                fmt_date(week(w)),
                sku.to_string(),
                format!("{}", (base * 0.9 * seasonal(w, s)).round()),
                format!("{:.3}", 0.18 + 0.01 * s as f64),
            ]);
        }
    }
    write_table(&args.output, "pos_market_signal", &["week_start", "sku_id", "pos_units", "market_share"], rows)?;

    // ===== inventory_snapshots（每周一快照）=====
    let mut rows = Vec::new();
    for w in 0..weeks {
        for (s, (sku, _, _, base, ..)) in SKUS.iter().enumerate() {
            for (l, location) in LOCATIONS.iter().enumerate() {
                let on_hand = (base * (0.6 - 0.2 * l as f64) * (1.0 - 0.02 * ((w + s as i64) % 5) as f64)).round();
                rows.push(vec![sku.to_string(), location.to_string(), fmt_date(week(w)), format!("{}", on_hand)]);
            }
        }
    }
    write_table(&args.output, "inventory_snapshots", &["sku_id", "location", "date", "on_hand_units"], rows)?;

    // ===== production_capacity =====
    // 饮料在两个工厂生产，其余只在一个工厂生产
    let mut rows = Vec::new();
    for (s, (sku, _, category, base, ..)) in SKUS.iter().enumerate() {
        let plants: Vec<&str> = if *category == "Beverages" {
            PLANTS.to_vec()
        } else {
            vec![PLANTS[s % PLANTS.len()]]
        };
        let per_plant = (base / 7.0 * 0.95 / plants.len() as f64).round();
        for plant in plants {
            rows.push(vec![plant.to_string(), sku.to_string(), format!("{}", per_plant)]);
        }
    }
    write_table(&args.output, "production_capacity", &["plant_id", "sku_id", "daily_capacity_units"], rows)?;

    // ===== capacity_calendar =====
    let mut rows = Vec::new();
    for i in 0..days {
        for (p, plant) in PLANTS.iter().enumerate() {
            let date = day(i);
            let available = if date.weekday().num_days_from_monday() >= 5 { 960 } else { 1440 };
            let downtime = (i * 37 + p as i64 * 11) % 150;
            rows.push(vec![plant.to_string(), fmt_date(date), available.to_string(), downtime.to_string()]);
        }
    }
    write_table(
        &args.output,
        "capacity_calendar",
        &["plant_id", "date", "available_minutes", "downtime_minutes"],
        rows,
    )?;

    // ===== bom =====
    let rows = BOM
        .iter()
        .map(|(sku, material, qty)| vec![sku.to_string(), material.to_string(), format!("{:.3}", qty)])
        .collect();
    write_table(&args.output, "bom", &["sku_id", "material_id", "qty_per_unit"], rows)?;

    // ===== suppliers =====
    let mut materials: Vec<&str> = BOM.iter().map(|(_, m, _)| *m).collect();
    materials.sort();
    materials.dedup();
    let rows = materials
        .iter()
        .enumerate()
        .map(|(i, material)| {
            vec![
                format!("SUP-{:03}", i + 1),
                format!("{} Supplier", material.trim_start_matches("MAT-")),
                material.to_string(),
                (7 + (i as i64 * 5) % 21).to_string(),
            ]
        })
        .collect();
    write_table(&args.output, "suppliers", &["supplier_id", "supplier_name", "material_id", "lead_time_days"], rows)?;

    // ===== purchase_orders =====
    let rows = materials
        .iter()
        .enumerate()
        .map(|(i, material)| {
            let order_date = week(i as i64 % weeks);
            vec![
                format!("PO-{:05}", i + 1),
                format!("SUP-{:03}", i + 1),
                material.to_string(),
                fmt_date(order_date),
                fmt_date(order_date + Duration::days(14)),
                (5000 + i * 750).to_string(),
            ]
        })
        .collect();
    write_table(
        &args.output,
        "purchase_orders",
        &["po_id", "supplier_id", "material_id", "order_date", "due_date", "qty"],
        rows,
    )?;

    // ===== logistics_lanes =====
    let mut rows = Vec::new();
    for (l, location) in LOCATIONS.iter().enumerate() {
        for (r, (region, _)) in REGIONS.iter().enumerate() {
            rows.push(vec![
                format!("LANE-{}{}", l + 1, r + 1),
                location.to_string(),
                region.to_string(),
                (1 + (l + r) % 4).to_string(),
                format!("{:.2}", 0.12 + 0.03 * ((l + r) % 4) as f64),
            ]);
        }
    }
    write_table(
        &args.output,
        "logistics_lanes",
        &["lane_id", "origin", "destination_region", "transit_days", "cost_per_unit"],
        rows,
    )?;

    // ===== cost_structures =====
    let rows = SKUS
        .iter()
        .map(|(sku, _, _, _, price, material, conversion, logistics)| {
            vec![
                sku.to_string(),
                format!("{:.2}", price),
                format!("{:.2}", material),
                format!("{:.2}", conversion),
                format!("{:.2}", logistics),
            ]
        })
        .collect();
    write_table(
        &args.output,
        "cost_structures",
        &["sku_id", "unit_list_price", "material_cost", "conversion_cost", "logistics_cost"],
        rows,
    )?;

    // ===== forecast_baseline =====
    let mut rows = Vec::new();
    for w in 0..weeks {
        for (s, (sku, _, _, base, ..)) in SKUS.iter().enumerate() {
            for (region, share) in REGIONS {
                let units = (base * share * seasonal(w, s)).round();
                rows.push(vec![fmt_date(week(w)), sku.to_string(), region.to_string(), format!("{}", units)]);
            }
        }
    }
    write_table(&args.output, "forecast_baseline", &["week_start", "sku_id", "region", "forecast_units"], rows)?;

    // ===== scenarios =====
    let rows = vec![
        vec![
            "SCN-001".to_string(),
            "Summer beverage uplift".to_string(),
            "Beverages".to_string(),
            "1.20".to_string(),
            String::new(),
            "0".to_string(),
            "0".to_string(),
        ],
        vec![
            "SCN-002".to_string(),
            "Foil supplier delay".to_string(),
            String::new(),
            String::new(),
            "MAT-FOIL".to_string(),
            "14".to_string(),
            "0".to_string(),
        ],
        vec![
            "SCN-003".to_string(),
            "Fuel price spike".to_string(),
            String::new(),
            String::new(),
            String::new(),
            "0".to_string(),
            "20".to_string(),
        ],
    ];
    write_table(
        &args.output,
        "scenarios",
        &[
            "scenario_id",
            "description",
            "uplift_category",
            "uplift_multiplier",
            "delay_material_id",
            "delay_days",
            "fuel_spike_pct",
        ],
        rows,
    )?;

    println!("✓ 所有源表生成完成！");
    Ok(())
}

/// 季节系数: 按 SKU 错峰的 13 周波动
fn seasonal(week_index: i64, sku_index: usize) -> f64 {
    let phase = (week_index + sku_index as i64 * 2).rem_euclid(13) as f64;
    1.0 + 0.15 * ((phase - 6.0) / 6.0).abs() - 0.075
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn write_table(
    dir: &Path,
    table: &str,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<(), Box<dyn Error>> {
    let path = dir.join(format!("{}.csv", table));
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(headers)?;
    for row in &rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    println!("✓ 生成 {}.csv ({}条)", table, rows.len());
    Ok(())
}
