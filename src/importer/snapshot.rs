// ==========================================
// 车辆积载计划系统 - 快照加载
// ==========================================
// 职责: 从 JSON 文件读取规划输入快照
// 格式: {"orders": [...], "products": [...], "containers": [...], "trucks": [...]}
// ==========================================

use crate::domain::snapshot::PlanningInput;
use crate::importer::error::{ImportError, ImportResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// 读取规划输入快照
pub fn load_snapshot(path: &Path) -> ImportResult<PlanningInput> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let input: PlanningInput = serde_json::from_reader(BufReader::new(file))?;
    info!(
        path = %path.display(),
        orders = input.orders.len(),
        products = input.products.len(),
        containers = input.containers.len(),
        trucks = input.trucks.len(),
        "快照加载完成"
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_snapshot_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{
                "orders": [{{"product_id": 1, "delivery_date": "2026/03/10", "order_quantity": 25}}],
                "products": [{{"id": 1, "product_code": "P-01", "capacity": 10, "used_container_id": 1}}],
                "containers": [{{"id": 1, "width": 1000, "depth": 1200}}],
                "trucks": [{{"id": 1, "width": 2400, "depth": 9600, "default_use": true}}]
            }}"#
        )
        .unwrap();

        let input = load_snapshot(temp_file.path()).unwrap();
        assert_eq!(input.orders.len(), 1);
        assert_eq!(input.products[0].capacity, Some(10));
        assert!(input.trucks[0].default_use);
    }

    #[test]
    fn test_load_snapshot_file_not_found() {
        let result = load_snapshot(Path::new("non_existent_snapshot.json"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_load_snapshot_malformed_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{\"orders\": [").unwrap();
        let result = load_snapshot(temp_file.path());
        assert!(matches!(result, Err(ImportError::JsonParseError(_))));
    }
}
