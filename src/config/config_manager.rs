// ==========================================
// 消费品 S&OP 供需平衡计算器 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、情景配置存取
// 存储: 扁平 JSON 键值文件
//       默认位置 {config_dir}/cpg-sop-planner/config.json
// 红线: 配置文件不存在即全部取默认值；取值非法时告警并回落默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::scenario_profile::{scenario_key, ScenarioProfile, SCENARIO_KEY_PREFIX};
use crate::domain::types::MissingCostPolicy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 配置目录名
pub const CONFIG_DIR_NAME: &str = "cpg-sop-planner";

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 默认配置文件路径（平台配置目录不可用时返回 None）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值，不关联文件）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok: 文件不存在时返回空配置（仍记住路径，便于保存）
    /// - Err(ParseError): 文件不是 JSON 对象
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self {
                path: Some(path.to_path_buf()),
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(path)?;
        let values: BTreeMap<String, Value> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };

        info!(path = %path.display(), keys = values.len(), "配置文件加载完成");
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// 从默认位置加载
    pub fn load_default() -> ConfigResult<Self> {
        match default_config_path() {
            Some(path) => Self::load(path),
            None => {
                warn!("无法确定平台配置目录，使用默认配置");
                Ok(Self::new())
            }
        }
    }

    /// 关联的配置文件路径
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 读取配置值（字符串值原样返回，其他 JSON 值返回其文本）
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// 写入配置值（仅内存，调用 save 持久化）
    pub fn set_config_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// 保存到关联的配置文件（必要时创建目录）
    pub fn save(&self) -> ConfigResult<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| ConfigError::FileReadError("未关联配置文件".to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        info!(path = %path.display(), keys = self.values.len(), "配置文件已保存");
        Ok(())
    }

    /// 解析配置值，非法时告警并回落默认值
    fn parse_or_default<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                warn!(config_key = key, raw_value = %raw, "配置项格式错误，使用默认值");
                default
            }),
        }
    }

    // ===== 计划默认值 =====

    /// 数据目录（默认 ./data）
    pub fn data_dir(&self) -> PathBuf {
        self.get_config_value(config_keys::DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::DATA_DIR))
    }

    /// 默认区域列表
    ///
    /// 支持 JSON 数组或逗号分隔字符串。
    pub fn default_regions(&self) -> Vec<String> {
        let regions: Vec<String> = match self.values.get(config_keys::DEFAULT_REGIONS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(other) => {
                warn!(
                    config_key = config_keys::DEFAULT_REGIONS,
                    raw_value = %other,
                    "区域配置格式错误，使用默认值"
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        if regions.is_empty() {
            defaults::REGIONS.iter().map(|r| r.to_string()).collect()
        } else {
            regions
        }
    }

    /// 未指定 SKU 时默认选取的 SKU 数（取产品表前 N 个）
    pub fn default_sku_count(&self) -> usize {
        self.parse_or_default(config_keys::DEFAULT_SKU_COUNT, defaults::SKU_COUNT)
    }

    /// 默认计划跨度（周）
    pub fn horizon_weeks(&self) -> i64 {
        let weeks = self.parse_or_default(config_keys::HORIZON_WEEKS, defaults::HORIZON_WEEKS);
        if weeks < 0 {
            warn!(config_key = config_keys::HORIZON_WEEKS, weeks, "计划跨度为负，使用默认值");
            return defaults::HORIZON_WEEKS;
        }
        weeks
    }

    /// 缺失成本策略（默认 fail_fast）
    pub fn missing_cost_policy(&self) -> MissingCostPolicy {
        self.parse_or_default(config_keys::MISSING_COST_POLICY, MissingCostPolicy::default())
    }

    /// 严格读取缺失成本策略（非法值报错，供校验使用）
    pub fn missing_cost_policy_strict(&self) -> ConfigResult<MissingCostPolicy> {
        match self.get_config_value(config_keys::MISSING_COST_POLICY) {
            None => Ok(MissingCostPolicy::default()),
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: config_keys::MISSING_COST_POLICY.to_string(),
                value: raw.clone(),
                message,
            }),
        }
    }

    // ===== 情景配置 =====

    /// 读取情景配置（存储于 scenario/{scenario_id}）
    ///
    /// 值可以是 JSON 对象，也可以是内容为 JSON 的字符串。
    pub fn get_scenario_profile(&self, scenario_id: &str) -> ConfigResult<ScenarioProfile> {
        let id = scenario_id.trim();
        let value = self
            .values
            .get(&scenario_key(id))
            .ok_or_else(|| ConfigError::ScenarioProfileNotFound(id.to_string()))?;

        let profile: ScenarioProfile = match value {
            Value::String(raw) => serde_json::from_str(raw)?,
            other => serde_json::from_value(other.clone())?,
        };

        profile
            .scenario
            .validate()
            .map_err(|msg| ConfigError::InvalidScenario(format!("{}: {}", id, msg)))?;
        Ok(profile)
    }

    /// 写入情景配置（校验后写入内存）
    pub fn put_scenario_profile(&mut self, profile: &ScenarioProfile) -> ConfigResult<()> {
        profile
            .scenario
            .validate()
            .map_err(|msg| ConfigError::InvalidScenario(format!("{}: {}", profile.scenario_id, msg)))?;
        self.values
            .insert(profile.config_key(), serde_json::to_value(profile)?);
        Ok(())
    }

    /// 全部情景 ID（排序）
    pub fn scenario_profile_ids(&self) -> Vec<String> {
        self.values
            .keys()
            .filter_map(|key| key.strip_prefix(SCENARIO_KEY_PREFIX))
            .map(str::to_string)
            .collect()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const DATA_DIR: &str = "data_dir";
    pub const DEFAULT_REGIONS: &str = "default_regions";
    pub const DEFAULT_SKU_COUNT: &str = "default_sku_count";
    pub const HORIZON_WEEKS: &str = "horizon_weeks";
    pub const MISSING_COST_POLICY: &str = "missing_cost_policy";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const DATA_DIR: &str = "data";
    pub const REGIONS: [&str; 4] = ["ANZ-North", "ANZ-South", "ANZ-East", "ANZ-West"];
    pub const SKU_COUNT: usize = 2;
    pub const HORIZON_WEEKS: i64 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::Scenario;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigManager::load(dir.path().join("config.json")).unwrap();

        assert_eq!(config.data_dir(), PathBuf::from("data"));
        assert_eq!(config.default_regions().len(), 4);
        assert_eq!(config.default_sku_count(), 2);
        assert_eq!(config.horizon_weeks(), 8);
        assert_eq!(config.missing_cost_policy(), MissingCostPolicy::FailFast);
    }

    #[test]
    fn test_load_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            json!({
                "data_dir": "/srv/sop",
                "default_regions": ["ANZ-North"],
                "default_sku_count": 5,
                "horizon_weeks": "12",
                "missing_cost_policy": "zero_economics"
            })
            .to_string(),
        )
        .unwrap();

        let config = ConfigManager::load(&path).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/sop"));
        assert_eq!(config.default_regions(), vec!["ANZ-North".to_string()]);
        assert_eq!(config.default_sku_count(), 5);
        assert_eq!(config.horizon_weeks(), 12);
        assert_eq!(config.missing_cost_policy(), MissingCostPolicy::ZeroEconomics);
    }

    #[test]
    fn test_invalid_value_falls_back() {
        let mut config = ConfigManager::new();
        config.set_config_value(config_keys::MISSING_COST_POLICY, json!("ignore"));
        config.set_config_value(config_keys::HORIZON_WEEKS, json!(-3));

        assert_eq!(config.missing_cost_policy(), MissingCostPolicy::FailFast);
        assert!(matches!(
            config.missing_cost_policy_strict(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config.horizon_weeks(), 8);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(ConfigManager::load(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_scenario_profile_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ConfigManager::load(&path).unwrap();
        let profile = ScenarioProfile {
            scenario_id: "fuel-20".to_string(),
            title: "Fuel +20%".to_string(),
            description: None,
            scenario: Scenario {
                fuel_spike_pct: 20.0,
                ..Default::default()
            },
        };
        config.put_scenario_profile(&profile).unwrap();
        config.save().unwrap();

        let reloaded = ConfigManager::load(&path).unwrap();
        assert_eq!(reloaded.scenario_profile_ids(), vec!["fuel-20".to_string()]);
        assert_eq!(reloaded.get_scenario_profile("fuel-20").unwrap(), profile);
    }

    #[test]
    fn test_scenario_profile_errors() {
        let mut config = ConfigManager::new();
        assert!(matches!(
            config.get_scenario_profile("missing"),
            Err(ConfigError::ScenarioProfileNotFound(id)) if id == "missing"
        ));

        // 字符串形式的 JSON，delay_days 为负
        config.set_config_value(
            "scenario/bad",
            json!(r#"{"scenario_id":"bad","title":"Bad","scenario":{"delay_days":-1}}"#),
        );
        assert!(matches!(
            config.get_scenario_profile("bad"),
            Err(ConfigError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_scenario_profile_with_null_knobs() {
        let mut config = ConfigManager::new();
        config.set_config_value(
            "scenario/fuel-only",
            json!({
                "scenario_id": "fuel-only",
                "title": "Fuel only",
                "scenario": {
                    "uplift_by_category": null,
                    "delay_material_id": "MAT-FOIL",
                    "delay_days": null,
                    "fuel_spike_pct": 15
                }
            }),
        );

        let profile = config.get_scenario_profile("fuel-only").unwrap();
        assert!(profile.scenario.uplift_by_category.is_empty());
        assert_eq!(profile.scenario.delay_days, 0);
        assert_eq!(profile.scenario.fuel_spike_pct, 15.0);
    }
}
