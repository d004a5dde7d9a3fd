// ==========================================
// 消费品 S&OP 供需平衡计算器 - 配置层
// ==========================================
// 职责: 计划默认值与命名情景配置
// 存储: JSON 键值文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod scenario_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_config_path, defaults, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use scenario_profile::{scenario_key, ScenarioProfile};
