// ==========================================
// 消费品 S&OP 供需平衡计算器 - 字段映射器
// ==========================================
// 职责: RawTable → 类型化记录 + 日期列规范化
// 红线: 日期在进入引擎前必须解析为日历日期；解析失败即报错，不静默跳过
// ==========================================

use crate::domain::dataset::{RawTable, SourceTable};
use crate::domain::records::{
    BomLine, CapacityCalendarDay, CostStructure, ForecastBaseline, InventorySnapshot, Product,
    ProductionCapacity,
};
use crate::importer::error::{ImportError, ImportResult};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Excel 日期序列号的纪元（1900 闰年缺陷已折算）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 解析单个日期值
///
/// 依次尝试: `YYYY-MM-DD`、`YYYYMMDD`、`YYYY/MM/DD`、
/// 带时间部分的日期时间（截断为日期）、Excel 日期序列号。
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    // 日期时间: 只取日期部分
    if let Some(prefix) = value.get(..10) {
        let rest = &value[10..];
        if rest.starts_with(' ') || rest.starts_with('T') {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    // Excel 序列号
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.trunc() as i64)))
}

// ==========================================
// RowReader - 带上下文的单行读取
// ==========================================
struct RowReader<'a> {
    table: SourceTable,
    row: &'a HashMap<String, String>,
    row_number: usize,
}

impl<'a> RowReader<'a> {
    fn string(&self, key: &str) -> ImportResult<String> {
        match self.row.get(key).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(ImportError::TypeConversionError {
                table: self.table.to_string(),
                row: self.row_number,
                field: key.to_string(),
                message: "值为空".to_string(),
            }),
        }
    }

    fn f64(&self, key: &str) -> ImportResult<f64> {
        let value = self.string(key)?;
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                table: self.table.to_string(),
                row: self.row_number,
                field: key.to_string(),
                message: format!("无法解析为数值: {}", value),
            })
    }

    fn date(&self, key: &str) -> ImportResult<NaiveDate> {
        let value = self.row.get(key).map(|v| v.trim()).unwrap_or("");
        parse_date_value(value).ok_or_else(|| ImportError::DateFormatError {
            table: self.table.to_string(),
            row: self.row_number,
            field: key.to_string(),
            value: value.to_string(),
        })
    }
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    pub fn map_products(&self, raw: &RawTable) -> ImportResult<Vec<Product>> {
        self.map_rows(SourceTable::Products, raw, &["sku_id", "category"], |r| {
            Ok(Product {
                sku_id: r.string("sku_id")?,
                category: r.string("category")?,
            })
        })
    }

    pub fn map_production_capacity(&self, raw: &RawTable) -> ImportResult<Vec<ProductionCapacity>> {
        self.map_rows(
            SourceTable::ProductionCapacity,
            raw,
            &["plant_id", "sku_id", "daily_capacity_units"],
            |r| {
                Ok(ProductionCapacity {
                    plant_id: r.string("plant_id")?,
                    sku_id: r.string("sku_id")?,
                    daily_capacity_units: r.f64("daily_capacity_units")?,
                })
            },
        )
    }

    pub fn map_capacity_calendar(&self, raw: &RawTable) -> ImportResult<Vec<CapacityCalendarDay>> {
        self.map_rows(
            SourceTable::CapacityCalendar,
            raw,
            &["plant_id", "date", "available_minutes", "downtime_minutes"],
            |r| {
                Ok(CapacityCalendarDay {
                    plant_id: r.string("plant_id")?,
                    date: r.date("date")?,
                    available_minutes: r.f64("available_minutes")?,
                    downtime_minutes: r.f64("downtime_minutes")?,
                })
            },
        )
    }

    pub fn map_inventory_snapshots(&self, raw: &RawTable) -> ImportResult<Vec<InventorySnapshot>> {
        self.map_rows(
            SourceTable::InventorySnapshots,
            raw,
            &["sku_id", "location", "date", "on_hand_units"],
            |r| {
                Ok(InventorySnapshot {
                    sku_id: r.string("sku_id")?,
                    location: r.string("location")?,
                    date: r.date("date")?,
                    on_hand_units: r.f64("on_hand_units")?,
                })
            },
        )
    }

    pub fn map_forecast_baseline(&self, raw: &RawTable) -> ImportResult<Vec<ForecastBaseline>> {
        self.map_rows(
            SourceTable::ForecastBaseline,
            raw,
            &["week_start", "sku_id", "region", "forecast_units"],
            |r| {
                Ok(ForecastBaseline {
                    week_start: r.date("week_start")?,
                    sku_id: r.string("sku_id")?,
                    region: r.string("region")?,
                    forecast_units: r.f64("forecast_units")?,
                })
            },
        )
    }

    pub fn map_cost_structures(&self, raw: &RawTable) -> ImportResult<Vec<CostStructure>> {
        self.map_rows(
            SourceTable::CostStructures,
            raw,
            &[
                "sku_id",
                "unit_list_price",
                "material_cost",
                "conversion_cost",
                "logistics_cost",
            ],
            |r| {
                Ok(CostStructure {
                    sku_id: r.string("sku_id")?,
                    unit_list_price: r.f64("unit_list_price")?,
                    material_cost: r.f64("material_cost")?,
                    conversion_cost: r.f64("conversion_cost")?,
                    logistics_cost: r.f64("logistics_cost")?,
                })
            },
        )
    }

    pub fn map_bom(&self, raw: &RawTable) -> ImportResult<Vec<BomLine>> {
        self.map_rows(SourceTable::Bom, raw, &["sku_id", "material_id"], |r| {
            Ok(BomLine {
                sku_id: r.string("sku_id")?,
                material_id: r.string("material_id")?,
            })
        })
    }

    /// 规范化原始表的日期列为 `YYYY-MM-DD`
    ///
    /// 空值保留为空；非空且无法解析的值报 `DateFormatError`。
    pub fn normalize_dates(&self, table: SourceTable, mut raw: RawTable) -> ImportResult<RawTable> {
        let columns: Vec<&str> = table
            .date_columns()
            .iter()
            .copied()
            .filter(|c| raw.headers.iter().any(|h| h == c))
            .collect();
        if columns.is_empty() {
            return Ok(raw);
        }

        for idx in 0..raw.rows.len() {
            let row_number = raw.row_number(idx);
            let row = &mut raw.rows[idx];
            for column in &columns {
                let Some(value) = row.get_mut(*column) else {
                    continue;
                };
                if value.trim().is_empty() {
                    continue;
                }
                let date = parse_date_value(value).ok_or_else(|| ImportError::DateFormatError {
                    table: table.to_string(),
                    row: row_number,
                    field: column.to_string(),
                    value: value.clone(),
                })?;
                *value = date.format("%Y-%m-%d").to_string();
            }
        }
        Ok(raw)
    }

    /// 校验必需列后逐行映射；行号取源文件数据行号（表头下一行为 1）
    fn map_rows<T>(
        &self,
        table: SourceTable,
        raw: &RawTable,
        required: &[&str],
        map: impl Fn(&RowReader<'_>) -> ImportResult<T>,
    ) -> ImportResult<Vec<T>> {
        if let Some(column) = required
            .iter()
            .find(|c| !raw.headers.iter().any(|h| h == *c))
        {
            return Err(ImportError::ColumnMissing {
                table: table.to_string(),
                column: column.to_string(),
            });
        }

        raw.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                map(&RowReader {
                    table,
                    row,
                    row_number: raw.row_number(idx),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|cells| {
                    headers
                        .iter()
                        .zip(cells.iter())
                        .map(|(h, v)| (h.to_string(), v.to_string()))
                        .collect()
                })
                .collect(),
            row_numbers: Vec::new(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_value_formats() {
        assert_eq!(parse_date_value("2025-01-06"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("20250106"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("2025/01/06"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("2025-01-06 00:00:00"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("2025-01-06T08:30:00"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("45663"), Some(d(2025, 1, 6)));
        assert_eq!(parse_date_value("next monday"), None);
        assert_eq!(parse_date_value(""), None);
    }

    #[test]
    fn test_map_forecast_baseline() {
        let table = raw(
            &["week_start", "sku_id", "region", "forecast_units", "model"],
            &[&["2025-01-06", "SKU-001", "ANZ-North", "1200.5", "ets"]],
        );

        let rows = FieldMapper.map_forecast_baseline(&table).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].week_start, d(2025, 1, 6));
        assert_eq!(rows[0].forecast_units, 1200.5);
    }

    #[test]
    fn test_map_missing_column() {
        let table = raw(&["sku_id"], &[&["SKU-001"]]);

        let err = FieldMapper.map_products(&table).unwrap_err();
        assert!(matches!(
            err,
            ImportError::ColumnMissing { ref table, ref column }
                if table == "products" && column == "category"
        ));
    }

    #[test]
    fn test_map_invalid_number_reports_row() {
        let table = raw(
            &["plant_id", "sku_id", "daily_capacity_units"],
            &[&["P1", "SKU-001", "100"], &["P1", "SKU-002", "lots"]],
        );

        let err = FieldMapper.map_production_capacity(&table).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 2, .. }));
    }

    #[test]
    fn test_map_invalid_date() {
        let table = raw(
            &["plant_id", "date", "available_minutes", "downtime_minutes"],
            &[&["P1", "06/01/2025", "1440", "0"]],
        );

        let err = FieldMapper.map_capacity_calendar(&table).unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { row: 1, .. }));
    }

    #[test]
    fn test_normalize_dates_rewrites_iso() {
        let table = raw(
            &["promo_id", "start_date", "end_date"],
            &[&["PR1", "20250106", ""]],
        );

        let normalized = FieldMapper
            .normalize_dates(SourceTable::Promotions, table)
            .unwrap();
        assert_eq!(normalized.rows[0]["start_date"], "2025-01-06");
        assert_eq!(normalized.rows[0]["end_date"], "");
    }
}
