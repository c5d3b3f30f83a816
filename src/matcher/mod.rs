//! カタログ照合
//!
//! 走査結果とカタログを突き合わせ、対象ファイルごとに照合候補を作る。
//! 入出力はメモリ上で完結し、ファイルには触れない。

pub mod types;

use crate::catalog::CatalogRecord;
use crate::scanner::TargetFile;
use types::{ComparisonKey, FieldSet, KeyCollision, MatchCandidate, MatchOutcome, NfoField};

/// 正規化レーベンシュタイン類似度を0-100の整数に写す
pub fn similarity_score(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// 対象ファイルをカタログと照合する
///
/// キーの種別（タイトル/番号）ごとに照合方法が決まる。
pub fn match_targets(targets: &[TargetFile], catalog: &[CatalogRecord]) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for target in targets {
        let candidate = match &target.key {
            ComparisonKey::Title(key) => match_by_title(target, key, catalog),
            ComparisonKey::Episode { season, episode } => {
                match_by_episode(target, *season, *episode, catalog, &mut outcome.collisions)
            }
        };
        outcome.candidates.push(candidate);
    }

    outcome
}

/// trim用: タイトルだけを書き込む候補を作る
pub fn title_candidate(target: &TargetFile, title: &str) -> MatchCandidate {
    let mut candidate = base_candidate(target);
    candidate.score = 100;
    candidate.fields.set(NfoField::Title, title);
    candidate
}

fn base_candidate(target: &TargetFile) -> MatchCandidate {
    MatchCandidate {
        nfo_id: target.id,
        filename: target.filename.clone(),
        root: target.root.clone(),
        path: target.path.clone(),
        match_key: target.key.to_string(),
        score: 0,
        match_id: None,
        match_title: None,
        fields: FieldSet::default(),
        accept: None,
        snapshot: None,
    }
}

/// ファジー照合: 最高スコアのレコードを採用する（同点は先勝ち）
///
/// 全レコードが0点でも先頭のレコードを0点のまま候補に残し、
/// レビューで却下させる。titleのないレコードは採点できないため飛ばす。
fn match_by_title(target: &TargetFile, key: &str, catalog: &[CatalogRecord]) -> MatchCandidate {
    let mut candidate = base_candidate(target);
    let mut best: Option<u8> = None;

    for record in catalog {
        let Some(title) = record.fields.get(NfoField::Title) else {
            continue;
        };
        let score = similarity_score(key, title);
        if best.map_or(true, |b| score > b) {
            best = Some(score);
            candidate.score = score;
            candidate.match_id = Some(record.id);
            candidate.match_title = Some(title.to_string());
            candidate.fields = record.fields.clone();
        }
    }

    candidate
}

/// 番号照合: シーズン・エピソードの文字列一致で100点（先勝ち）
///
/// 2件目以降の一致は採用せず、衝突として記録する。
fn match_by_episode(
    target: &TargetFile,
    season: u32,
    episode: u32,
    catalog: &[CatalogRecord],
    collisions: &mut Vec<KeyCollision>,
) -> MatchCandidate {
    let mut candidate = base_candidate(target);
    let season_text = season.to_string();
    let episode_text = episode.to_string();

    for record in catalog {
        let hit = record.fields.get(NfoField::Season) == Some(season_text.as_str())
            && record.fields.get(NfoField::Episode) == Some(episode_text.as_str());
        if !hit {
            continue;
        }

        match candidate.match_id {
            None => {
                candidate.score = 100;
                candidate.match_id = Some(record.id);
                candidate.match_title = record.fields.get(NfoField::Title).map(String::from);
                candidate.fields = record.fields.clone();
            }
            Some(kept) => collisions.push(KeyCollision {
                filename: target.filename.clone(),
                key: candidate.match_key.clone(),
                kept_id: kept,
                duplicate_id: record.id,
            }),
        }
    }

    candidate
}
