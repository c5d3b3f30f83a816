//! 変更セットの保存・再開統合テスト
//!
//! 保存した変更セットを読み戻して書き込んだ結果が、中断なしの実行と
//! 一致することを検証する

use nfo_tweaker::catalog;
use nfo_tweaker::config::{BackupMode, JobConfig};
use nfo_tweaker::matcher::{self, types::MatchStrategy};
use nfo_tweaker::review::{self, changeset};
use nfo_tweaker::scanner::{self, keys::KeyPatterns};
use nfo_tweaker::writer;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CATALOG_CSV: &str = "\
season,episode,title,plot
1,5,Pilot,First episode
1,6,Second,Another one
";

const NFO: &str = concat!(
    "<episodedetails>",
    "<season>0</season><episode>0</episode>",
    "<title>x</title><plot>x</plot>",
    "<lockdata>false</lockdata>",
    "</episodedetails>"
);

fn build_library(root: &Path) {
    fs::create_dir(root).expect("library作成失敗");
    for name in ["Show.S01E05.nfo", "Show.S01E06.nfo"] {
        fs::write(root.join(name), NFO).expect("NFO作成失敗");
    }
}

fn config() -> JobConfig {
    JobConfig::from_json(
        r#"{"columns": {"season": "season", "episode": "episode", "title": "title", "plot": "plot"}}"#,
    )
    .expect("設定の構築失敗")
}

/// 再開の忠実性: 保存→再読込→書き込みが、直接書き込みと同じ結果を生む
#[test]
fn test_resume_matches_direct_run() {
    let dir = tempdir().expect("Failed to create temp dir");
    let direct_root = dir.path().join("direct");
    let resumed_root = dir.path().join("resumed");
    build_library(&direct_root);
    build_library(&resumed_root);

    let catalog_path = dir.path().join("catalog.csv");
    fs::write(&catalog_path, CATALOG_CSV).expect("カタログ作成失敗");

    let config = config();
    let patterns = KeyPatterns::from_config(&config).expect("パターン構築失敗");
    let records = catalog::load_catalog(&catalog_path, &config.columns).expect("カタログ読込失敗");

    let run = |root: &Path| {
        let targets = scanner::scan_targets(
            root,
            ".nfo",
            &[],
            MatchStrategy::Episode,
            &patterns,
        )
        .expect("走査失敗");
        let outcome = matcher::match_targets(&targets, &records);
        review::partition(outcome.candidates, MatchStrategy::Episode).0
    };

    // 直接実行
    let direct = run(&direct_root);
    writer::apply_changeset(&direct, BackupMode::Overwrite, false).expect("直接書き込み失敗");

    // 保存してから再開
    let resumed = run(&resumed_root);
    let saved = changeset::save_changeset(&resumed, dir.path()).expect("保存失敗");
    let reloaded = changeset::load_changeset(&saved).expect("再読込失敗");
    assert_eq!(reloaded.len(), resumed.len());
    writer::apply_changeset(&reloaded, BackupMode::Overwrite, false).expect("再開書き込み失敗");

    // 両ツリーのファイル内容がフィールド単位で一致する
    for name in ["Show.S01E05.nfo", "Show.S01E06.nfo"] {
        let direct_content = fs::read_to_string(direct_root.join(name)).expect("読込失敗");
        let resumed_content = fs::read_to_string(resumed_root.join(name)).expect("読込失敗");
        assert_eq!(direct_content, resumed_content, "{}が不一致", name);
    }
}

/// 手編集した変更セット: 編集後の値がそのまま書き込まれる
#[test]
fn test_hand_edited_changeset_is_trusted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let nfo_path = dir.path().join("ep.nfo");
    fs::write(&nfo_path, NFO).expect("NFO作成失敗");

    // 操作者が手で書いた最小構成のCSV
    let csv = format!(
        "path,title,plot\n{},Hand Edited Title,Hand edited plot\n",
        nfo_path.display()
    );
    let changeset_path = dir.path().join("edited_Matched.csv");
    fs::write(&changeset_path, csv).expect("CSV作成失敗");

    let entries = changeset::load_changeset(&changeset_path).expect("読込失敗");
    assert_eq!(entries.len(), 1);
    writer::apply_changeset(&entries, BackupMode::Overwrite, false).expect("書き込み失敗");

    let edited = fs::read_to_string(&nfo_path).expect("読み戻し失敗");
    assert!(edited.contains("<title>Hand Edited Title</title>"));
    assert!(edited.contains("<plot>Hand edited plot</plot>"));
    assert!(edited.contains("<lockdata>true</lockdata>"));
}

/// 編集で行を削った変更セット: 残した行だけが書き込まれる
#[test]
fn test_rows_removed_by_editor_are_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let library = dir.path().join("library");
    build_library(&library);

    let catalog_path = dir.path().join("catalog.csv");
    fs::write(&catalog_path, CATALOG_CSV).expect("カタログ作成失敗");

    let config = config();
    let patterns = KeyPatterns::from_config(&config).expect("パターン構築失敗");
    let records = catalog::load_catalog(&catalog_path, &config.columns).expect("カタログ読込失敗");
    let targets = scanner::scan_targets(
        &library,
        ".nfo",
        &[],
        MatchStrategy::Episode,
        &patterns,
    )
    .expect("走査失敗");
    let outcome = matcher::match_targets(&targets, &records);
    let (retained, _) = review::partition(outcome.candidates, MatchStrategy::Episode);
    assert_eq!(retained.len(), 2);

    let saved = changeset::save_changeset(&retained, dir.path()).expect("保存失敗");

    // 操作者が2行目を削除
    let content = fs::read_to_string(&saved).expect("読込失敗");
    let kept: Vec<&str> = content.lines().take(2).collect();
    fs::write(&saved, kept.join("\n")).expect("書き戻し失敗");

    let reloaded = changeset::load_changeset(&saved).expect("再読込失敗");
    assert_eq!(reloaded.len(), 1);
    writer::apply_changeset(&reloaded, BackupMode::Overwrite, false).expect("書き込み失敗");

    let first = fs::read_to_string(library.join("Show.S01E05.nfo")).expect("読込失敗");
    let second = fs::read_to_string(library.join("Show.S01E06.nfo")).expect("読込失敗");
    assert!(first.contains("<title>Pilot</title>"));
    // 削除した行のファイルは未変更
    assert_eq!(second, NFO);
    assert!(!library.join("Show.S01E06.nfo.bak").exists());
}

/// 存在しない変更セットの読み込みはエラー
#[test]
fn test_load_missing_changeset_fails() {
    let result = changeset::load_changeset(Path::new("/nonexistent/set.csv"));
    assert!(result.is_err());
}
