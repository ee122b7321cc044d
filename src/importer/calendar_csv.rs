// ==========================================
// 车辆积载计划系统 - 日历 CSV 导入
// ==========================================
// 格式: 表头含 date, is_working_day 两列（列顺序不限）
// 取值: 1/true/yes/y/出/营业 视为营业日；0/false/no/n/休/休息 视为休息日
// ==========================================

use crate::calendar::CalendarTable;
use crate::engine::aggregator::parse_date;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const DATE_COLUMN: &str = "date";
const WORKING_COLUMN: &str = "is_working_day";

/// 从 CSV 文件读取营业日历
pub fn load_calendar_csv(path: &Path) -> ImportResult<CalendarTable> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    if let Some(ext) = path.extension() {
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(
                ext.to_string_lossy().to_string(),
            ));
        }
    }

    let table = read_calendar(File::open(path)?)?;
    info!(path = %path.display(), entries = table.len(), "日历加载完成");
    Ok(table)
}

/// 从任意输入流读取营业日历
pub fn read_calendar<R: Read>(source: R) -> ImportResult<CalendarTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
        .collect();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
    };
    let date_idx = column(DATE_COLUMN)?;
    let working_idx = column(WORKING_COLUMN)?;

    let mut table = CalendarTable::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // 数据行号（表头为第 1 行）
        let row = row_idx + 2;

        let raw_date = record.get(date_idx).unwrap_or("").trim();
        let raw_flag = record.get(working_idx).unwrap_or("").trim();
        // 跳过完全空白的行
        if raw_date.is_empty() && raw_flag.is_empty() {
            continue;
        }

        let date = parse_date(raw_date).ok_or_else(|| ImportError::CalendarRowError {
            row,
            field: DATE_COLUMN.to_string(),
            value: raw_date.to_string(),
        })?;
        let is_working_day = parse_flag(raw_flag).ok_or_else(|| ImportError::CalendarRowError {
            row,
            field: WORKING_COLUMN.to_string(),
            value: raw_flag.to_string(),
        })?;
        debug!(%date, is_working_day, "日历行");
        table.set(date, is_working_day);
    }

    Ok(table)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "出" | "营业" => Some(true),
        "0" | "false" | "no" | "n" | "休" | "休息" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarPort;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::Builder;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_read_calendar_mixed_flags() {
        let csv = "is_working_day,date\n1,2026-03-07\n休,2026/03/10\n,\ntrue,2026-03-08\n";
        let table = read_calendar(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_working_day(d(7)));
        assert!(!table.is_working_day(d(10)));
        // 未登记日期按周一至周五判定
        assert!(table.is_working_day(d(11)));
    }

    #[test]
    fn test_read_calendar_missing_column() {
        let result = read_calendar("day,flag\n2026-03-09,1\n".as_bytes());
        assert!(matches!(result, Err(ImportError::MissingColumn(c)) if c == "date"));
    }

    #[test]
    fn test_read_calendar_bad_row_reports_line() {
        let csv = "date,is_working_day\n2026-03-09,1\n2026-13-40,1\n";
        match read_calendar(csv.as_bytes()) {
            Err(ImportError::CalendarRowError { row, field, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(field, "date");
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_load_calendar_csv_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "date,is_working_day").unwrap();
        writeln!(temp_file, "2026-03-09,0").unwrap();
        let table = load_calendar_csv(temp_file.path()).unwrap();
        assert!(!table.is_working_day(d(9)));
    }

    #[test]
    fn test_load_calendar_rejects_other_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_calendar_csv(temp_file.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
