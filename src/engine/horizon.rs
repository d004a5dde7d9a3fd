// ==========================================
// 消费品 S&OP 供需平衡计算器 - 计划周期
// ==========================================
// 职责: 可选周列表（来自基准预测）与周范围选择
// ==========================================

use crate::domain::dataset::PlanningDataset;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDate};

/// 默认计划跨度（周）
pub const DEFAULT_HORIZON_WEEKS: i64 = 8;

// ==========================================
// PlanningHorizon - 计划周期
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningHorizon {
    weeks: Vec<NaiveDate>, // 去重、升序
}

impl PlanningHorizon {
    /// 由已排序去重的周列表构造
    ///
    /// # 错误
    /// - `EmptyForecast`: 周列表为空
    pub fn new(mut weeks: Vec<NaiveDate>) -> EngineResult<Self> {
        weeks.sort();
        weeks.dedup();
        if weeks.is_empty() {
            return Err(EngineError::EmptyForecast);
        }
        Ok(Self { weeks })
    }

    /// 以基准预测中出现的全部周构造
    pub fn from_dataset(dataset: &PlanningDataset) -> EngineResult<Self> {
        Self::new(dataset.forecast_weeks())
    }

    pub fn weeks(&self) -> &[NaiveDate] {
        &self.weeks
    }

    pub fn first_week(&self) -> NaiveDate {
        self.weeks[0]
    }

    pub fn last_week(&self) -> NaiveDate {
        self.weeks[self.weeks.len() - 1]
    }

    /// 默认范围: 首周 ~ 首周 + horizon_weeks 周（不超过末周）
    pub fn default_range(&self, horizon_weeks: i64) -> (NaiveDate, NaiveDate) {
        let first = self.first_week();
        let end = (first + Duration::weeks(horizon_weeks.max(0))).min(self.last_week());
        (first, end)
    }

    /// 选择 [from, to] 内的周（含两端）
    ///
    /// 范围内没有任何周时返回空列表（不是错误）。
    ///
    /// # 错误
    /// - `InvalidWeekRange`: from 晚于 to
    pub fn select(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<NaiveDate>> {
        if from > to {
            return Err(EngineError::InvalidWeekRange { from, to });
        }
        Ok(self
            .weeks
            .iter()
            .copied()
            .filter(|w| from <= *w && *w <= to)
            .collect())
    }

    /// 选择范围，缺省端点取默认范围
    pub fn select_or_default(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        horizon_weeks: i64,
    ) -> EngineResult<Vec<NaiveDate>> {
        let (default_from, default_to) = self.default_range(horizon_weeks);
        self.select(from.unwrap_or(default_from), to.unwrap_or(default_to))
    }
}
