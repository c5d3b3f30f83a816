use std::fmt;
use std::path::PathBuf;

/// 照合方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// 整形したファイル名とカタログのtitleをファジー照合
    #[default]
    Title,
    /// ファイル名から抽出した(シーズン, エピソード)番号で完全一致照合
    Episode,
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" | "name" => Ok(MatchStrategy::Title),
            "episode" | "number" => Ok(MatchStrategy::Episode),
            _ => Err(format!("Unknown strategy: {}. Use title or episode", s)),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Title => write!(f, "title"),
            MatchStrategy::Episode => write!(f, "episode"),
        }
    }
}

/// NFOの書き換え対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NfoField {
    Season,
    Episode,
    Title,
    Plot,
    Year,
    Runtime,
    ImdbId,
    TvdbId,
}

impl NfoField {
    pub const ALL: [NfoField; 8] = [
        NfoField::Season,
        NfoField::Episode,
        NfoField::Title,
        NfoField::Plot,
        NfoField::Year,
        NfoField::Runtime,
        NfoField::ImdbId,
        NfoField::TvdbId,
    ];

    /// NFOドキュメント内の要素名（変更セットCSVの列名も同じ）
    pub fn node_name(self) -> &'static str {
        match self {
            NfoField::Season => "season",
            NfoField::Episode => "episode",
            NfoField::Title => "title",
            NfoField::Plot => "plot",
            NfoField::Year => "year",
            NfoField::Runtime => "runtime",
            NfoField::ImdbId => "imdbid",
            NfoField::TvdbId => "tvdbid",
        }
    }
}

impl fmt::Display for NfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node_name())
    }
}

/// 8フィールドの値セット
///
/// 欠損はNone。空文字列も欠損として扱い、書き込み時に既存の値を
/// 空にしてしまうことがないようにする。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    pub season: Option<String>,
    pub episode: Option<String>,
    pub title: Option<String>,
    pub plot: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub imdb_id: Option<String>,
    pub tvdb_id: Option<String>,
}

impl FieldSet {
    pub fn get(&self, field: NfoField) -> Option<&str> {
        match field {
            NfoField::Season => self.season.as_deref(),
            NfoField::Episode => self.episode.as_deref(),
            NfoField::Title => self.title.as_deref(),
            NfoField::Plot => self.plot.as_deref(),
            NfoField::Year => self.year.as_deref(),
            NfoField::Runtime => self.runtime.as_deref(),
            NfoField::ImdbId => self.imdb_id.as_deref(),
            NfoField::TvdbId => self.tvdb_id.as_deref(),
        }
    }

    /// 値を設定する（空文字列は無視）
    pub fn set(&mut self, field: NfoField, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match field {
            NfoField::Season => &mut self.season,
            NfoField::Episode => &mut self.episode,
            NfoField::Title => &mut self.title,
            NfoField::Plot => &mut self.plot,
            NfoField::Year => &mut self.year,
            NfoField::Runtime => &mut self.runtime,
            NfoField::ImdbId => &mut self.imdb_id,
            NfoField::TvdbId => &mut self.tvdb_id,
        };
        *slot = Some(value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        NfoField::ALL.iter().all(|&f| self.get(f).is_none())
    }

    /// 値のあるフィールドを定義順に列挙する
    pub fn present(&self) -> impl Iterator<Item = (NfoField, &str)> + '_ {
        NfoField::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }
}

/// ファイル名から導出した照合キー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonKey {
    /// 整形済みタイトル
    Title(String),
    /// シーズン・エピソード番号（抽出できなかった成分は0）
    Episode { season: u32, episode: u32 },
}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonKey::Title(name) => write!(f, "{}", name),
            ComparisonKey::Episode { season, episode } => {
                write!(f, "S{:02}E{:02}", season, episode)
            }
        }
    }
}

/// 照合候補（対象ファイル1件につき1件）
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// 対象ファイルの連番ID（走査順、0始まり）
    pub nfo_id: usize,
    pub filename: String,
    /// 対象ファイルを含むディレクトリ
    pub root: PathBuf,
    /// 対象ファイルのフルパス
    pub path: PathBuf,
    /// 照合キーの表示形
    pub match_key: String,
    /// 類似度スコア（0-100）
    pub score: u8,
    /// 一致したカタログレコードのID
    pub match_id: Option<usize>,
    /// 一致したレコードのタイトル
    pub match_title: Option<String>,
    /// 書き込むフィールド値（一致レコードから複製）
    pub fields: FieldSet,
    /// レビュー判定（未確認はNone）
    pub accept: Option<bool>,
    /// レビュー専用モードで読み取った現行NFO値
    pub snapshot: Option<FieldSet>,
}

/// 番号照合で同一キーに複数レコードが一致した記録
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCollision {
    pub filename: String,
    pub key: String,
    /// 採用したレコードのID（先勝ち）
    pub kept_id: usize,
    pub duplicate_id: usize,
}

/// 照合結果一式
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub candidates: Vec<MatchCandidate>,
    pub collisions: Vec<KeyCollision>,
}
