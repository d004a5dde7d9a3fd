// ==========================================
// 消费品 S&OP 供需平衡计算器 - 情景配置
// ==========================================
// 职责: what-if 情景的可识别旋钮
// 红线: 缺省/为零的旋钮一律视为"无影响"
// ==========================================

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::DateWindow;

// ==========================================
// Scenario - 情景
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    // ===== 需求上调 =====
    /// 品类 → 需求乘数
    #[serde(default, deserialize_with = "null_as_default")]
    pub uplift_by_category: BTreeMap<String, f64>,
    #[serde(default)]
    pub uplift_start: Option<NaiveDate>,
    #[serde(default)]
    pub uplift_end: Option<NaiveDate>,

    // ===== 物料延迟 =====
    #[serde(default)]
    pub delay_material_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_days")]
    pub delay_days: i64,
    #[serde(default)]
    pub delay_start: Option<NaiveDate>,
    #[serde(default)]
    pub delay_end: Option<NaiveDate>,

    // ===== 燃油涨价 =====
    /// 物流成本上涨百分比（20 表示 +20%）
    #[serde(default, deserialize_with = "null_as_default")]
    pub fuel_spike_pct: f64,
}

impl Scenario {
    /// 需求上调生效窗口（起止都配置时才生效）
    pub fn uplift_window(&self) -> Option<DateWindow> {
        DateWindow::from_bounds(self.uplift_start, self.uplift_end)
    }

    /// 产能延迟生效窗口（起止都配置时才生效）
    pub fn delay_window(&self) -> Option<DateWindow> {
        DateWindow::from_bounds(self.delay_start, self.delay_end)
    }

    /// 延迟物料（空字符串视为未配置）
    pub fn delay_material(&self) -> Option<&str> {
        self.delay_material_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// 是否不含任何有效调整
    pub fn is_noop(&self) -> bool {
        self.uplift_by_category.is_empty()
            && (self.delay_material().is_none() || self.delay_days <= 0)
            && self.fuel_spike_pct == 0.0
    }

    /// 校验旋钮取值范围
    ///
    /// 调整函数本身对任何取值都是全函数，这里只用于拦截明显的录入错误
    /// （配置文件/命令行）。
    pub fn validate(&self) -> Result<(), String> {
        for (category, multiplier) in &self.uplift_by_category {
            if !multiplier.is_finite() || *multiplier < 0.0 {
                return Err(format!(
                    "品类 {} 的需求乘数非法: {}",
                    category, multiplier
                ));
            }
        }
        if self.delay_days < 0 {
            return Err(format!("delay_days 不能为负: {}", self.delay_days));
        }
        if !self.fuel_spike_pct.is_finite() || self.fuel_spike_pct < 0.0 {
            return Err(format!("fuel_spike_pct 不能为负: {}", self.fuel_spike_pct));
        }
        if let (Some(start), Some(end)) = (self.uplift_start, self.uplift_end) {
            if start > end {
                return Err(format!("需求上调窗口起始晚于结束: {} > {}", start, end));
            }
        }
        if let (Some(start), Some(end)) = (self.delay_start, self.delay_end) {
            if start > end {
                return Err(format!("延迟窗口起始晚于结束: {} > {}", start, end));
            }
        }
        Ok(())
    }
}

// ==========================================
// 反序列化辅助
// ==========================================
// 情景文件/命名情景中的 null 与缺省等价

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 天数接受整数或浮点数（向零截断），null 视为 0
fn lenient_days<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(0),
        Some(days) if days.is_finite() => Ok(days.trunc() as i64),
        Some(days) => Err(D::Error::custom(format!("delay_days 不是有限数值: {}", days))),
    }
}
