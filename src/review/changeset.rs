//! 変更セットの保存と再読込
//!
//! レビューを通過した候補一式をCSVに書き出し、手動確認・編集を挟んで
//! そのまま書き込み工程へ戻せるようにする。列は固定の識別列に加えて、
//! 実際に値のある列だけをヘッダに並べる。

use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::{FieldSet, MatchCandidate, NfoField};
use std::io::Read;
use std::path::{Path, PathBuf};

/// 候補識別用の固定列（この順で先頭に並ぶ）
const CORE_COLUMNS: [&str; 8] = [
    "score",
    "nfo_id",
    "filename",
    "root",
    "path",
    "matchname",
    "matchtitle",
    "match_id",
];

/// レビュー判定の列名
const ACCEPT_COLUMN: &str = "accept";

/// 現行NFO値スナップショット列の接頭辞
const SNAPSHOT_PREFIX: &str = "nfo";

/// 出力ファイル名に使うローカル時刻（秒精度）
///
/// 同一秒内の再実行で衝突しうるが、運用上は許容している。
pub(crate) fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H-%M-%S").to_string()
}

/// 変更セットをCSVへ保存してパスを返す
///
/// 保持された候補が0件の場合はエラー。
pub fn save_changeset(entries: &[MatchCandidate], dir: &Path) -> Result<PathBuf> {
    if entries.is_empty() {
        return Err(NfoTweakerError::EmptyMatchList);
    }

    let path = dir.join(format!("{}_Matched.csv", timestamp()));
    write_changeset(entries, &path)?;
    Ok(path)
}

/// 変更セットを指定パスへ書き出す
pub fn write_changeset(entries: &[MatchCandidate], path: &Path) -> Result<()> {
    let field_columns: Vec<NfoField> = NfoField::ALL
        .into_iter()
        .filter(|&f| entries.iter().any(|e| e.fields.get(f).is_some()))
        .collect();
    let snapshot_columns: Vec<NfoField> = NfoField::ALL
        .into_iter()
        .filter(|&f| {
            entries
                .iter()
                .any(|e| e.snapshot.as_ref().and_then(|s| s.get(f)).is_some())
        })
        .collect();
    let has_accept = entries.iter().any(|e| e.accept.is_some());

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = CORE_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(field_columns.iter().map(|f| f.node_name().to_string()));
    header.extend(
        snapshot_columns
            .iter()
            .map(|f| format!("{}{}", SNAPSHOT_PREFIX, f.node_name())),
    );
    if has_accept {
        header.push(ACCEPT_COLUMN.to_string());
    }
    writer.write_record(&header)?;

    for entry in entries {
        let mut row: Vec<String> = vec![
            entry.score.to_string(),
            entry.nfo_id.to_string(),
            entry.filename.clone(),
            entry.root.display().to_string(),
            entry.path.display().to_string(),
            entry.match_key.clone(),
            entry.match_title.clone().unwrap_or_default(),
            entry
                .match_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ];
        for &field in &field_columns {
            row.push(entry.fields.get(field).unwrap_or_default().to_string());
        }
        for &field in &snapshot_columns {
            row.push(
                entry
                    .snapshot
                    .as_ref()
                    .and_then(|s| s.get(field))
                    .unwrap_or_default()
                    .to_string(),
            );
        }
        if has_accept {
            row.push(match entry.accept {
                Some(true) => "1".to_string(),
                Some(false) => "0".to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// 保存済み変更セットを読み込む
///
/// CSVとして読めるかだけを検証する。セルの内容は編集者の意図として
/// 信頼し、空セルは欠損、スナップショット列は読み飛ばす。
pub fn load_changeset(path: &Path) -> Result<Vec<MatchCandidate>> {
    if !path.exists() {
        return Err(NfoTweakerError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    parse_changeset(file)
}

/// リーダーから変更セットを読み込む
pub fn parse_changeset<R: Read>(reader: R) -> Result<Vec<MatchCandidate>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut entries = Vec::new();
    for (row_index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let cell = |name: &str| -> Option<&str> {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .filter(|v| !v.is_empty())
        };

        let mut fields = FieldSet::default();
        for field in NfoField::ALL {
            if let Some(value) = cell(field.node_name()) {
                fields.set(field, value);
            }
        }

        entries.push(MatchCandidate {
            nfo_id: cell("nfo_id")
                .and_then(|v| v.parse().ok())
                .unwrap_or(row_index),
            filename: cell("filename").unwrap_or_default().to_string(),
            root: PathBuf::from(cell("root").unwrap_or_default()),
            path: PathBuf::from(cell("path").unwrap_or_default()),
            match_key: cell("matchname").unwrap_or_default().to_string(),
            score: cell("score").and_then(|v| v.parse().ok()).unwrap_or(0),
            match_id: cell("match_id").and_then(|v| v.parse().ok()),
            match_title: cell("matchtitle").map(String::from),
            fields,
            accept: match cell(ACCEPT_COLUMN) {
                Some("1") => Some(true),
                Some("0") => Some(false),
                _ => None,
            },
            snapshot: None,
        });
    }

    Ok(entries)
}
