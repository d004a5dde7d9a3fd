use crate::domain::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// 情景配置前缀（配置键: `scenario/{scenario_id}`）
pub const SCENARIO_KEY_PREFIX: &str = "scenario/";

/// 命名情景（持久化对象）
///
/// 存储位置：配置文件，key='scenario/{scenario_id}'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    /// 情景 ID（用于选择/引用）
    pub scenario_id: String,

    /// 显示名称
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    /// 情景旋钮
    #[serde(default)]
    pub scenario: Scenario,
}

impl ScenarioProfile {
    pub fn config_key(&self) -> String {
        scenario_key(&self.scenario_id)
    }
}

/// 情景 ID → 配置键
pub fn scenario_key(scenario_id: &str) -> String {
    format!("{}{}", SCENARIO_KEY_PREFIX, scenario_id.trim())
}
