//! 参照カタログ（CSV）の読み込み
//!
//! 信頼できる既存データベースのエクスポートを行単位で取り込む。
//! 重複排除や型変換はせず、セルのテキストをそのまま保持する。

use crate::config::ColumnMap;
use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::FieldSet;
use std::io::Read;
use std::path::Path;

/// カタログ1行分のレコード
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// 行順の連番ID（0始まり）
    pub id: usize,
    pub fields: FieldSet,
}

/// CSVファイルからカタログを読み込む
pub fn load_catalog(path: &Path, columns: &ColumnMap) -> Result<Vec<CatalogRecord>> {
    if !path.exists() {
        return Err(NfoTweakerError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    parse_catalog(file, columns)
}

/// リーダーからカタログを読み込む
pub fn parse_catalog<R: Read>(reader: R, columns: &ColumnMap) -> Result<Vec<CatalogRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    // 論理フィールド→列番号を解決（未割り当てのフィールドは対象外）
    let mut plan = Vec::new();
    for (field, column) in columns.entries() {
        let Some(column) = column else { continue };
        let index = headers.iter().position(|h| h == column).ok_or_else(|| {
            NfoTweakerError::ColumnNotFound {
                field: field.node_name().to_string(),
                column: column.to_string(),
            }
        })?;
        plan.push((field, index));
    }

    let mut records = Vec::new();
    for (id, row) in csv_reader.records().enumerate() {
        let row = row?;
        let mut fields = FieldSet::default();
        for &(field, index) in &plan {
            if let Some(value) = row.get(index) {
                fields.set(field, value);
            }
        }
        records.push(CatalogRecord { id, fields });
    }

    Ok(records)
}
