use crate::matcher::types::MatchStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nfo-tweaker")]
#[command(about = "メディアサーバ向けNFOメタデータ修復ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSVカタログと照合してNFOのメタデータを修復
    Fix {
        /// NFOを探すルートフォルダ
        #[arg(required = true)]
        root: PathBuf,

        /// 参照カタログ（CSV）
        #[arg(short, long)]
        catalog: PathBuf,

        /// 照合方法 (title/episode)
        #[arg(short, long, default_value = "title")]
        strategy: MatchStrategy,

        /// 対象の拡張子
        #[arg(long, default_value = ".nfo")]
        suffix: String,

        /// 設定ファイル（JSON、省略時は ~/.config/nfo-tweaker/config.json）
        #[arg(long)]
        config: Option<PathBuf>,

        /// ログと変更セットの出力先
        #[arg(short, long, default_value = ".")]
        info_dir: PathBuf,

        /// 変更セットを保存し、書き込まずに終了（手動確認用）
        #[arg(long)]
        review_only: bool,
    },

    /// 保存済み変更セットから書き込みを再開
    Resume {
        /// 変更セットCSV（編集済みでもよい）
        #[arg(required = true)]
        changeset: PathBuf,

        /// 設定ファイル（JSON）
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// ファイル名から整形したタイトルをNFOへ書き込む
    Trim {
        /// NFOを探すルートフォルダ
        #[arg(required = true)]
        root: PathBuf,

        /// 対象の拡張子
        #[arg(long, default_value = ".nfo")]
        suffix: String,

        /// 設定ファイル（JSON）
        #[arg(long)]
        config: Option<PathBuf>,

        /// ドライラン（変更を適用せずプレビュー）
        #[arg(long)]
        dry_run: bool,
    },
}
