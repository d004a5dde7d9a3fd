// ==========================================
// 消费品 S&OP 供需平衡计算器 - 领域类型定义
// ==========================================
// 职责: 周度时间桶、日期窗口、缺失成本策略
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 周起始日 (Week Start)
// ==========================================
// 红线: 周桶一律取所在 ISO 周的周一

/// 返回 `date` 所在 ISO 周的周一
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

// ==========================================
// 日期窗口 (Date Window)
// ==========================================
// 用途: 情景调整的生效区间（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 仅当起止日期都配置时才构成窗口
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    /// 是否落在窗口内（含两端）
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ==========================================
// 缺失成本策略 (Missing Cost Policy)
// ==========================================
// 预测中存在、成本表中缺失的 SKU 如何处理
// 序列化格式: snake_case (与配置文件一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCostPolicy {
    #[default]
    FailFast,      // 直接报错，指出缺失的 SKU
    ZeroEconomics, // 收入/毛利按 0 计
}

impl fmt::Display for MissingCostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCostPolicy::FailFast => write!(f, "fail_fast"),
            MissingCostPolicy::ZeroEconomics => write!(f, "zero_economics"),
        }
    }
}

impl FromStr for MissingCostPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail_fast" => Ok(MissingCostPolicy::FailFast),
            "zero_economics" => Ok(MissingCostPolicy::ZeroEconomics),
            other => Err(format!("未知的缺失成本策略: {}", other)),
        }
    }
}

// ==========================================
// 数值舍入
// ==========================================
// 舍入一律采用银行家舍入（四舍六入五成双）

/// 舍入到整数
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// 舍入到指定小数位
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}
