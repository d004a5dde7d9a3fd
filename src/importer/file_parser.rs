// ==========================================
// 消费品 S&OP 供需平衡计算器 - 文件解析器
// ==========================================
// 职责: 单个源表文件 → RawTable（表头 + 字符串行）
// 支持: CSV (.csv) / Excel (.xlsx/.xls，读取第一个工作表)
// ==========================================

use crate::domain::dataset::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 解析文件为原始表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawTable): 去掉首尾空白的表头与行；完全空白的行被跳过
    /// - Err: 文件不存在 / 格式不支持 / 解析失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let header_record = reader.headers()?.clone();
        let header_line = header_record.position().map_or(1, |p| p.line());
        let headers: Vec<String> = header_record
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        // csv 会静默跳过空行，行号取记录所在的文件行
        let mut rows = Vec::new();
        let mut row_numbers = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map_or(header_line + idx as u64 + 1, |p| p.line());
            if let Some(row) = zip_row(&headers, record.iter().map(str::to_string)) {
                rows.push(row);
                row_numbers.push(line.saturating_sub(header_line) as usize);
            }
        }

        Ok(RawTable {
            headers,
            rows,
            row_numbers,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut row_numbers = Vec::new();
        for (idx, data_row) in sheet_rows.enumerate() {
            if let Some(row) = zip_row(&headers, data_row.iter().map(|c| c.to_string())) {
                rows.push(row);
                row_numbers.push(idx + 1);
            }
        }

        Ok(RawTable {
            headers,
            rows,
            row_numbers,
        })
    }
}

/// 表头与单元格按列对齐；完全空白的行返回 None
fn zip_row(
    headers: &[String],
    cells: impl Iterator<Item = String>,
) -> Option<HashMap<String, String>> {
    let row: HashMap<String, String> = headers
        .iter()
        .zip(cells)
        .map(|(header, value)| (header.clone(), value.trim().to_string()))
        .collect();

    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_table(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
