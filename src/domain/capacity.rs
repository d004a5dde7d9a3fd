// ==========================================
// 消费品 S&OP 供需平衡计算器 - 周产能领域模型
// ==========================================
// 职责: 周度产能行（日产能 × 开机率 汇总到周）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// WeeklyCapacity - 周产能
// ==========================================
// 红线: 产能缺失的 (周, SKU) 不生成行，下游按 0 处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCapacity {
    pub week_start: NaiveDate,      // 周一
    pub sku_id: String,             // SKU
    pub weekly_capacity_units: i64, // 周产能（件，非负整数）
}

impl WeeklyCapacity {
    pub fn new(week_start: NaiveDate, sku_id: impl Into<String>, weekly_capacity_units: i64) -> Self {
        Self {
            week_start,
            sku_id: sku_id.into(),
            weekly_capacity_units,
        }
    }

    /// 连接键 (week_start, sku_id)
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.week_start, self.sku_id.as_str())
    }
}
