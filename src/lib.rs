//! メディアサーバ向けNFOメタデータ修復ツール
//!
//! 信頼できるCSVカタログとの照合でNFOサイドカーを修復するfix、
//! ファイル名からタイトルだけを整形するtrim、保存済み変更セットから
//! 書き込みを再開するresumeの3機能を提供する。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod nfo;
pub mod review;
pub mod scanner;
pub mod writer;
