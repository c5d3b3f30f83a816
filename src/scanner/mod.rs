pub mod keys;

use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::{ComparisonKey, MatchStrategy};
use keys::KeyPatterns;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 走査で見つかった書き換え対象ファイル
#[derive(Debug, Clone)]
pub struct TargetFile {
    /// 検出順の連番ID（0始まり）
    pub id: usize,
    pub filename: String,
    /// ファイルを含むディレクトリ
    pub root: PathBuf,
    /// フルパス
    pub path: PathBuf,
    /// 照合キー
    pub key: ComparisonKey,
}

/// ルート以下を再帰的に走査して対象NFOを集める
///
/// suffixは大文字小文字を無視した末尾一致、excludeはファイル名の
/// 完全一致で除外する。シンボリックリンクは辿らない。
pub fn scan_targets(
    root: &Path,
    suffix: &str,
    exclude: &[String],
    strategy: MatchStrategy,
    patterns: &KeyPatterns,
) -> Result<Vec<TargetFile>> {
    if !root.exists() {
        return Err(NfoTweakerError::RootNotFound(root.display().to_string()));
    }

    let suffix_lower = suffix.to_lowercase();
    let mut targets = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };

        if !filename.to_lowercase().ends_with(&suffix_lower) {
            continue;
        }
        if exclude.iter().any(|name| name == &filename) {
            continue;
        }

        let key = match strategy {
            MatchStrategy::Title => patterns.title_key(&filename, suffix),
            MatchStrategy::Episode => patterns.episode_key(&filename),
        };

        targets.push(TargetFile {
            id: targets.len(),
            filename,
            root: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            path: path.to_path_buf(),
            key,
        });
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobConfig;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn default_patterns() -> KeyPatterns {
        KeyPatterns::from_config(&JobConfig::default()).unwrap()
    }

    fn touch(path: &Path) {
        File::create(path).unwrap().write_all(b"<tvshow/>").unwrap();
    }

    #[test]
    fn test_scan_root_not_found() {
        let result = scan_targets(
            Path::new("/nonexistent/library"),
            ".nfo",
            &[],
            MatchStrategy::Title,
            &default_patterns(),
        );
        assert!(matches!(result, Err(NfoTweakerError::RootNotFound(_))));
    }

    #[test]
    fn test_scan_matches_suffix_case_insensitive() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.nfo"));
        touch(&dir.path().join("b.NFO"));
        touch(&dir.path().join("c.txt"));

        let targets = scan_targets(
            dir.path(),
            ".nfo",
            &[],
            MatchStrategy::Title,
            &default_patterns(),
        )
        .unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].filename, "a.nfo");
        assert_eq!(targets[1].filename, "b.NFO");
    }

    #[test]
    fn test_scan_recurses_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Season 1")).unwrap();
        touch(&dir.path().join("Season 1").join("ep1.nfo"));
        touch(&dir.path().join("tvshow.nfo"));

        let targets = scan_targets(
            dir.path(),
            ".nfo",
            &[],
            MatchStrategy::Title,
            &default_patterns(),
        )
        .unwrap();

        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_scan_exclusion_exact_name() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("season.nfo"));
        touch(&dir.path().join("tvshow.nfo"));
        touch(&dir.path().join("ep1.nfo"));

        let exclude = vec!["season.nfo".to_string(), "tvshow.nfo".to_string()];
        let targets = scan_targets(
            dir.path(),
            ".nfo",
            &exclude,
            MatchStrategy::Title,
            &default_patterns(),
        )
        .unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].filename, "ep1.nfo");
    }

    #[test]
    fn test_scan_ids_sequential() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("c.nfo"));
        touch(&dir.path().join("a.nfo"));
        touch(&dir.path().join("b.nfo"));

        let targets = scan_targets(
            dir.path(),
            ".nfo",
            &[],
            MatchStrategy::Title,
            &default_patterns(),
        )
        .unwrap();

        let ids: Vec<usize> = targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        // ファイル名順に走査される
        assert_eq!(targets[0].filename, "a.nfo");
    }

    #[test]
    fn test_scan_derives_episode_keys() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("Show.S01E05.nfo"));

        let targets = scan_targets(
            dir.path(),
            ".nfo",
            &[],
            MatchStrategy::Episode,
            &default_patterns(),
        )
        .unwrap();

        assert_eq!(
            targets[0].key,
            ComparisonKey::Episode { season: 1, episode: 5 }
        );
    }
}
