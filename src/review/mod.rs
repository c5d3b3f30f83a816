//! 照合候補の対話レビュー
//!
//! タイトル照合の候補を1件ずつ操作者に提示し、承認/却下を記録する。
//! 判定の入力元はトレイトで差し替えられるため、中核の処理は端末の
//! 有無を前提にしない。

pub mod changeset;

use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::{MatchCandidate, MatchStrategy};
use crate::nfo;
use dialoguer::Input;
use std::path::{Path, PathBuf};

/// レビュー判定の問い合わせ先
pub trait MatchReviewer {
    /// 候補を提示して承認可否を返す
    fn confirm(&mut self, candidate: &MatchCandidate) -> Result<bool>;
}

/// 標準入力からy/nを受け取るレビュアー
///
/// yまたはYで承認、それ以外の入力（空含む）は却下。
pub struct ConsoleReviewer;

impl MatchReviewer for ConsoleReviewer {
    fn confirm(&mut self, candidate: &MatchCandidate) -> Result<bool> {
        println!(
            "候補: {} ⇔ {} （一致度 {}%）",
            candidate.match_key,
            candidate.match_title.as_deref().unwrap_or("(タイトルなし)"),
            candidate.score
        );

        let input: String = Input::new()
            .with_prompt("y:承認 それ以外:却下")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| NfoTweakerError::Prompt(e.to_string()))?;

        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}

/// 候補を1件ずつ確認して判定を記録する
pub fn confirm_matches(
    candidates: &mut [MatchCandidate],
    reviewer: &mut dyn MatchReviewer,
) -> Result<()> {
    let total = candidates.len();
    for (count, candidate) in candidates.iter_mut().enumerate() {
        println!("[{}/{}] {}", count + 1, total, candidate.filename);
        let accepted = reviewer.confirm(candidate)?;
        candidate.accept = Some(accepted);
        println!("  → {}\n", if accepted { "承認" } else { "却下" });
    }
    Ok(())
}

/// 候補を保持/却下に二分する
///
/// タイトル照合は操作者が承認したもの、番号照合はスコアが0より
/// 大きいものを保持する。全候補が必ずどちらか一方に入る。
pub fn partition(
    candidates: Vec<MatchCandidate>,
    strategy: MatchStrategy,
) -> (Vec<MatchCandidate>, Vec<MatchCandidate>) {
    candidates.into_iter().partition(|c| match strategy {
        MatchStrategy::Title => c.accept == Some(true),
        MatchStrategy::Episode => c.score > 0,
    })
}

/// 却下した候補のパスをタイムスタンプ付きログへ書き出す
///
/// 0件でも空のログを残す。
pub fn write_rejection_log(declined: &[MatchCandidate], dir: &Path) -> Result<PathBuf> {
    let paths: Vec<String> = declined
        .iter()
        .map(|c| c.path.display().to_string())
        .collect();

    let path = dir.join(format!("{}_Skipped.txt", changeset::timestamp()));
    let json = serde_json::to_string_pretty(&paths)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// レビュー専用モード向けに現行NFO値を候補へ写し取る
///
/// 手動確認時に新旧の値を見比べるための参考情報。読めないファイルは
/// 警告を出してスナップショットなしのまま続行する。
pub fn attach_snapshots(candidates: &mut [MatchCandidate]) {
    for candidate in candidates.iter_mut() {
        if candidate.match_id.is_none() {
            continue;
        }
        let result = std::fs::read_to_string(&candidate.path)
            .map_err(NfoTweakerError::from)
            .and_then(|xml| nfo::read_fields(&xml));
        match result {
            Ok(fields) => candidate.snapshot = Some(fields),
            Err(e) => println!(
                "⚠ {}: 現行値を読み取れません（{}）",
                candidate.filename, e
            ),
        }
    }
}
