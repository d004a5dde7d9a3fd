// ==========================================
// 消费品 S&OP 供需平衡计算器 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 导入失败对整个计算是致命的，错误必须指明缺失/出错的表
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 数据目录 =====
    #[error("数据目录 {dir} 缺少源表: {}", .tables.join(", "))]
    MissingTables { dir: String, tables: Vec<String> },

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 数据映射错误 =====
    #[error("表 {table} 缺少列: {column}")]
    ColumnMissing { table: String, column: String },

    #[error("类型转换失败 (表 {table}, 行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        table: String,
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (表 {table}, 行 {row}, 字段 {field}): 期望 YYYY-MM-DD，实际 {value}")]
    DateFormatError {
        table: String,
        row: usize,
        field: String,
        value: String,
    },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
