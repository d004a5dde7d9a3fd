// ==========================================
// 消费品 S&OP 供需平衡计算器 - 导入层
// ==========================================
// 职责: 数据目录中的 16 张源表 → 只读 PlanningDataset
// 支持: CSV, Excel
// ==========================================

pub mod dataset_loader;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use dataset_loader::{DatasetLoader, TABLE_EXTENSIONS};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_date_value, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
