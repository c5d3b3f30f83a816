use thiserror::Error;

#[derive(Error, Debug)]
pub enum NfoTweakerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    RootNotFound(String),

    #[error("カタログに列 '{column}' が見つかりません（{field}用）")]
    ColumnNotFound { field: String, column: String },

    #[error("正規表現が不正: {0}")]
    InvalidPattern(String),

    #[error("対象のNFOが見つかりません: {0}")]
    NoTargetsFound(String),

    #[error("保持された候補が0件です（全件却下または不一致）")]
    EmptyMatchList,

    #[error("書き込みエラー: {0}")]
    Write(String),

    #[error("入力プロンプトエラー: {0}")]
    Prompt(String),

    #[error("CSV解析エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML解析エラー: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NfoTweakerError>;
