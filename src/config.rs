use crate::error::{NfoTweakerError, Result};
use crate::matcher::types::NfoField;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 列指定の欠損マーカー（この値の論理フィールドは扱わない）
pub const ABSENT_COLUMN: &str = "NA";

/// カタログCSVの列割り当て
///
/// 各論理フィールドに対応するCSVのヘッダ名を指定する。Noneまたは
/// "NA"のフィールドはレコードに取り込まれない。columnsを部分的に
/// 指定した場合、書かなかったフィールドは未割り当てになる。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnMap {
    pub season: Option<String>,
    pub episode: Option<String>,
    pub title: Option<String>,
    pub plot: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub imdbid: Option<String>,
    pub tvdbid: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            season: Some("0".into()),
            episode: Some("1".into()),
            title: Some("2".into()),
            plot: Some("3".into()),
            year: None,
            runtime: None,
            imdbid: None,
            tvdbid: None,
        }
    }
}

impl ColumnMap {
    /// 論理フィールドと列名の組を定義順に返す
    pub fn entries(&self) -> [(NfoField, Option<&str>); 8] {
        [
            (NfoField::Season, self.season.as_deref()),
            (NfoField::Episode, self.episode.as_deref()),
            (NfoField::Title, self.title.as_deref()),
            (NfoField::Plot, self.plot.as_deref()),
            (NfoField::Year, self.year.as_deref()),
            (NfoField::Runtime, self.runtime.as_deref()),
            (NfoField::ImdbId, self.imdbid.as_deref()),
            (NfoField::TvdbId, self.tvdbid.as_deref()),
        ]
    }

    /// "NA"と空文字列の列指定をNoneに揃える
    fn normalize(&mut self) {
        for slot in [
            &mut self.season,
            &mut self.episode,
            &mut self.title,
            &mut self.plot,
            &mut self.year,
            &mut self.runtime,
            &mut self.imdbid,
            &mut self.tvdbid,
        ] {
            if matches!(slot.as_deref(), Some(ABSENT_COLUMN) | Some("")) {
                *slot = None;
            }
        }
    }
}

/// バックアップ方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupMode {
    /// 既存の .bak を上書きする
    #[default]
    Overwrite,
    /// .bak が既にあれば .bak.1, .bak.2 と連番を振る
    Versioned,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobConfig {
    /// カタログCSVの列割り当て
    pub columns: ColumnMap,
    /// タイトルキー導出時に除去する正規表現（先頭から順に適用）
    pub filters: Vec<String>,
    /// シーズン番号の抽出パターン
    pub season_pattern: String,
    /// エピソード番号の抽出パターン
    pub episode_pattern: String,
    /// trimで整形後タイトルの末尾に付加する語
    pub append: String,
    /// fixで除外するファイル名（完全一致）
    pub fix_exclude: Vec<String>,
    /// trimで除外するファイル名（完全一致）
    pub trim_exclude: Vec<String>,
    /// バックアップ方式
    pub backup: BackupMode,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            filters: Vec::new(),
            season_pattern: "[Ss][0-9]+".into(),
            episode_pattern: "[Ee][0-9]+".into(),
            append: String::new(),
            fix_exclude: Vec::new(),
            trim_exclude: vec!["season.nfo".into(), "tvshow.nfo".into()],
            backup: BackupMode::Overwrite,
        }
    }
}

impl JobConfig {
    /// 設定を読み込む
    ///
    /// パス指定があればそのファイルを、なければ既定パスを読む。
    /// 既定パスにファイルがない場合はデフォルト設定を返す。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(NfoTweakerError::FileNotFound(p.display().to_string()));
                }
                let content = std::fs::read_to_string(p)?;
                Self::from_json(&content)
            }
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    let content = std::fs::read_to_string(&default_path)?;
                    Self::from_json(&content)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// JSONテキストから設定を構築する
    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: JobConfig = serde_json::from_str(content)?;
        config.columns.normalize();
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| NfoTweakerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("nfo-tweaker").join("config.json"))
    }
}
