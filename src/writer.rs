//! 変更セットの書き込み
//!
//! 1件ずつバックアップを取ってから元ファイルを書き換える。書き込みは
//! 非アトミックで、途中で失敗した場合は処理済みのファイルがそのまま
//! 残る（ロールバックしない）。

use crate::config::BackupMode;
use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::MatchCandidate;
use crate::nfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// 固定のバックアップ拡張子
pub const BACKUP_SUFFIX: &str = ".bak";

/// 書き込み結果の集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    /// 書き換えたファイル数
    pub files: usize,
    /// 書き換えたフィールド延べ数
    pub fields_updated: usize,
    /// 要素がなくスキップしたフィールド延べ数
    pub fields_absent: usize,
}

/// 変更セットを順に適用する
///
/// 最初の失敗で止まり、失敗したファイルのパスを添えて返す。
pub fn apply_changeset(
    entries: &[MatchCandidate],
    mode: BackupMode,
    verbose: bool,
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    let bar = progress_bar(entries.len() as u64);

    for entry in entries {
        let outcome = write_entry(entry, mode)
            .map_err(|e| NfoTweakerError::Write(format!("{}: {}", entry.path.display(), e)))?;

        for field in &outcome.absent {
            bar.println(format!(
                "⚠ {}: <{}> 要素がないため書き込みを飛ばしました",
                entry.filename, field
            ));
        }
        if verbose {
            bar.println(format!(
                "  ✔ {} （{}項目更新 / lockdata {}件）",
                entry.filename,
                outcome.updated.len(),
                outcome.locked
            ));
        }

        summary.files += 1;
        summary.fields_updated += outcome.updated.len();
        summary.fields_absent += outcome.absent.len();
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(summary)
}

/// バックアップを取ってから1件書き換える
fn write_entry(entry: &MatchCandidate, mode: BackupMode) -> Result<nfo::EditOutcome> {
    let backup = backup_path(&entry.path, mode);
    std::fs::copy(&entry.path, &backup)?;

    let xml = std::fs::read_to_string(&entry.path)?;
    let (output, outcome) = nfo::apply_edits(&xml, &entry.fields)?;
    std::fs::write(&entry.path, output)?;

    Ok(outcome)
}

/// バックアップ先のパスを決める
///
/// Overwriteは常に「元パス + .bak」。Versionedは空いている
/// .bak / .bak.1 / .bak.2 … を探す。
fn backup_path(path: &Path, mode: BackupMode) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    let base = PathBuf::from(name);

    match mode {
        BackupMode::Overwrite => base,
        BackupMode::Versioned => {
            if !base.exists() {
                return base;
            }
            let mut n = 1u32;
            loop {
                let mut name = base.as_os_str().to_os_string();
                name.push(format!(".{}", n));
                let versioned = PathBuf::from(name);
                if !versioned.exists() {
                    return versioned;
                }
                n += 1;
            }
        }
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}
