//! ファイル名からの照合キー導出

use crate::config::JobConfig;
use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::ComparisonKey;
use regex::Regex;

/// 設定からコンパイルした抽出パターン一式
#[derive(Debug)]
pub struct KeyPatterns {
    filters: Vec<Regex>,
    season: Regex,
    episode: Regex,
}

impl KeyPatterns {
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let mut filters = Vec::new();
        for pattern in &config.filters {
            filters.push(compile(pattern)?);
        }
        Ok(Self {
            filters,
            season: compile(&config.season_pattern)?,
            episode: compile(&config.episode_pattern)?,
        })
    }

    /// タイトルキー: 除去パターンを順に適用し、末尾の拡張子を取り除く
    ///
    /// すべて除去されて空になることもある（その場合も正規のキー）。
    pub fn title_key(&self, filename: &str, suffix: &str) -> ComparisonKey {
        let mut key = filename.to_string();
        for filter in &self.filters {
            key = filter.replace_all(&key, "").into_owned();
        }
        ComparisonKey::Title(strip_suffix_ci(&key, suffix))
    }

    /// 番号キー: 最初に一致したシーズン・エピソード表記から数字を取り出す
    ///
    /// 見つからない成分は0になる。
    pub fn episode_key(&self, filename: &str) -> ComparisonKey {
        ComparisonKey::Episode {
            season: extract_number(&self.season, filename),
            episode: extract_number(&self.episode, filename),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| NfoTweakerError::InvalidPattern(format!("{}: {}", pattern, e)))
}

/// 末尾のsuffixを大文字小文字を無視して1回だけ取り除く
fn strip_suffix_ci(name: &str, suffix: &str) -> String {
    if !suffix.is_empty() && name.len() >= suffix.len() {
        let split = name.len() - suffix.len();
        if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
            return name[..split].to_string();
        }
    }
    name.to_string()
}

/// パターンの最初の一致から数字以外を捨てて整数にする
fn extract_number(pattern: &Regex, name: &str) -> u32 {
    pattern
        .find(name)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(filters: &[&str]) -> KeyPatterns {
        let config = JobConfig {
            filters: filters.iter().map(|f| f.to_string()).collect(),
            ..JobConfig::default()
        };
        KeyPatterns::from_config(&config).unwrap()
    }

    #[test]
    fn test_title_key_strips_suffix() {
        let key = patterns(&[]).title_key("Pilot.nfo", ".nfo");
        assert_eq!(key, ComparisonKey::Title("Pilot".into()));
    }

    #[test]
    fn test_title_key_suffix_case_insensitive() {
        let key = patterns(&[]).title_key("Pilot.NFO", ".nfo");
        assert_eq!(key, ComparisonKey::Title("Pilot".into()));
    }

    #[test]
    fn test_title_key_applies_filters_in_order() {
        let key = patterns(&["[.]WEBRip.*", "[.]1080p.*"])
            .title_key("Show.Pilot.WEBRip.1080p.nfo", ".nfo");
        // 1つ目のパターンがWEBRip以降をまとめて除去する
        assert_eq!(key, ComparisonKey::Title("Show.Pilot".into()));
    }

    #[test]
    fn test_title_key_can_become_empty() {
        let key = patterns(&["Pilot"]).title_key("Pilot.nfo", ".nfo");
        assert_eq!(key, ComparisonKey::Title("".into()));
    }

    #[test]
    fn test_episode_key() {
        let key = patterns(&[]).episode_key("Show.S01E05.Pilot.nfo");
        assert_eq!(key, ComparisonKey::Episode { season: 1, episode: 5 });
    }

    #[test]
    fn test_episode_key_missing_markers() {
        let key = patterns(&[]).episode_key("Pilot.nfo");
        assert_eq!(key, ComparisonKey::Episode { season: 0, episode: 0 });
    }

    #[test]
    fn test_episode_key_first_match_wins() {
        let key = patterns(&[]).episode_key("Show.S02E01.vs.S05E09.nfo");
        assert_eq!(key, ComparisonKey::Episode { season: 2, episode: 1 });
    }

    #[test]
    fn test_invalid_filter_pattern() {
        let config = JobConfig {
            filters: vec!["[".into()],
            ..JobConfig::default()
        };
        let result = KeyPatterns::from_config(&config);
        assert!(matches!(result, Err(NfoTweakerError::InvalidPattern(_))));
    }
}
