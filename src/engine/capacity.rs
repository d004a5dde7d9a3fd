// ==========================================
// 消费品 S&OP 供需平衡计算器 - 周产能汇总引擎
// ==========================================
// 职责: 日产能 × 工厂日历开机率 → SKU 周产能
// 输入: production_capacity + capacity_calendar + 请求的 SKU/周
// 输出: WeeklyCapacity（按 week_start, sku_id 排序）
// ==========================================

use crate::domain::capacity::WeeklyCapacity;
use crate::domain::dataset::PlanningDataset;
use crate::domain::records::{CapacityCalendarDay, ProductionCapacity};
use crate::domain::types::{round_half_even, week_start_of};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// 日产能折算为周产能的天数
const DAYS_PER_WEEK: f64 = 7.0;

// ==========================================
// CapacityAggregator - 周产能汇总引擎
// ==========================================
// 红线: 无状态引擎，所有方法都是纯函数
pub struct CapacityAggregator;

impl CapacityAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 从数据集计算周产能
    pub fn compute(
        &self,
        dataset: &PlanningDataset,
        skus: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<WeeklyCapacity> {
        self.aggregate(
            dataset.production_capacity(),
            dataset.capacity_calendar(),
            skus,
            week_starts,
        )
    }

    /// 汇总周产能
    ///
    /// 规则：
    /// 1) 产能行按 plant_id 与该工厂日历的每一天做笛卡尔连接（不按日期区间裁剪）
    /// 2) effective_daily = daily_capacity × uptime_ratio，负值截断为 0
    /// 3) 按 (周一, SKU) 跨工厂、跨天求和
    /// 4) weekly_capacity_units = round(sum × 7)
    /// 5) 丢弃不在请求周内的行
    ///
    /// 没有产能行或工厂没有日历的 SKU 不产生任何行。
    #[instrument(skip_all, fields(
        capacity_rows = capacity.len(),
        calendar_rows = calendar.len(),
        skus = skus.len(),
        weeks = week_starts.len()
    ))]
    pub fn aggregate(
        &self,
        capacity: &[ProductionCapacity],
        calendar: &[CapacityCalendarDay],
        skus: &[String],
        week_starts: &[NaiveDate],
    ) -> Vec<WeeklyCapacity> {
        let sku_set: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let week_set: HashSet<NaiveDate> = week_starts.iter().copied().collect();

        // 工厂 → 日历
        let mut calendar_by_plant: HashMap<&str, Vec<&CapacityCalendarDay>> = HashMap::new();
        for day in calendar {
            calendar_by_plant
                .entry(day.plant_id.as_str())
                .or_default()
                .push(day);
        }

        // (周一, SKU) → Σ effective_daily
        let mut effective_sum: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
        for row in capacity.iter().filter(|c| sku_set.contains(c.sku_id.as_str())) {
            let Some(days) = calendar_by_plant.get(row.plant_id.as_str()) else {
                debug!(plant_id = %row.plant_id, sku_id = %row.sku_id, "工厂无日历，跳过");
                continue;
            };

            for day in days {
                let effective_daily = (row.daily_capacity_units * day.uptime_ratio()).max(0.0);
                *effective_sum
                    .entry((week_start_of(day.date), row.sku_id.as_str()))
                    .or_insert(0.0) += effective_daily;
            }
        }

        let weekly: Vec<WeeklyCapacity> = effective_sum
            .into_iter()
            .filter(|((week_start, _), _)| week_set.contains(week_start))
            .map(|((week_start, sku_id), sum)| {
                WeeklyCapacity::new(
                    week_start,
                    sku_id,
                    round_half_even(sum * DAYS_PER_WEEK) as i64,
                )
            })
            .collect();

        debug!(rows = weekly.len(), "周产能汇总完成");
        weekly
    }
}

impl Default for CapacityAggregator {
    fn default() -> Self {
        Self::new()
    }
}
