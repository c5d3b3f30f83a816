//! NFOドキュメントの読み書き
//!
//! メディアサーバが参照するXML形式のサイドカーを、宣言・コメント・
//! 未対象の要素をそのまま通しながら、対象要素のテキストだけ
//! 差し替える。

use crate::error::Result;
use crate::matcher::types::{FieldSet, NfoField};
use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

/// メディアサーバによる上書きを防ぐロックフラグの要素名
pub const LOCK_NODE: &str = "lockdata";
/// ロックフラグに書き込む値
pub const LOCK_VALUE: &str = "true";

/// 1ドキュメント分の書き換え結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOutcome {
    /// ドキュメント内で実際に書き換えたフィールド
    pub updated: Vec<NfoField>,
    /// 値はあるが対応する要素がなかったフィールド
    pub absent: Vec<NfoField>,
    /// trueにしたlockdata要素の数
    pub locked: usize,
}

/// フィールド値をドキュメントへ書き込み、lockdataをtrueにする
///
/// 対象要素が見つからないフィールドは書き込まず、結果に記録して
/// 呼び出し側の診断に回す。値のないフィールドの要素には触れない。
pub fn apply_edits(xml: &str, fields: &FieldSet) -> Result<(String, EditOutcome)> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut updated: Vec<NfoField> = Vec::new();
    let mut locked = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                let tag = start.name().as_ref().to_vec();
                if let Some((field, value)) = replacement(&tag, fields) {
                    writer.write_event(Event::Start(start))?;
                    writer.write_event(Event::Text(BytesText::new(value)))?;
                    // 元の中身（テキスト・子要素）は読み捨てて閉じ直す
                    reader.read_to_end(QName(&tag))?;
                    writer.write_event(Event::End(BytesEnd::new(String::from_utf8_lossy(
                        &tag,
                    ))))?;
                    note(field, &mut updated, &mut locked);
                } else {
                    writer.write_event(Event::Start(start))?;
                }
            }
            Event::Empty(empty) => {
                let tag = empty.name().as_ref().to_vec();
                if let Some((field, value)) = replacement(&tag, fields) {
                    // 自己終了要素は開始・終了タグに展開して値を入れる
                    let name = String::from_utf8_lossy(&tag).into_owned();
                    writer.write_event(Event::Start(empty))?;
                    writer.write_event(Event::Text(BytesText::new(value)))?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                    note(field, &mut updated, &mut locked);
                } else {
                    writer.write_event(Event::Empty(empty))?;
                }
            }
            event => writer.write_event(event)?,
        }
    }

    let absent = fields
        .present()
        .map(|(f, _)| f)
        .filter(|f| !updated.contains(f))
        .collect();
    let outcome = EditOutcome { updated, absent, locked };

    let buffer = writer.into_inner();
    Ok((String::from_utf8_lossy(&buffer).into_owned(), outcome))
}

/// ドキュメントから8フィールドの現在値を読み取る
///
/// 同じ要素が複数ある場合は最初の値を採る。
pub fn read_fields(xml: &str) -> Result<FieldSet> {
    let mut reader = Reader::from_str(xml);
    let mut fields = FieldSet::default();
    let mut current: Option<NfoField> = None;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                current = field_for(start.name().as_ref());
            }
            Event::Text(text) => {
                if let Some(field) = current {
                    if fields.get(field).is_none() {
                        let value = text.unescape().map_err(quick_xml::Error::from)?;
                        fields.set(field, &value);
                    }
                }
            }
            Event::End(_) => current = None,
            _ => {}
        }
    }

    Ok(fields)
}

/// タグに対する書き込み内容を返す（lockdataはNone扱い）
fn replacement<'a>(tag: &[u8], fields: &'a FieldSet) -> Option<(Option<NfoField>, &'a str)> {
    if tag == LOCK_NODE.as_bytes() {
        return Some((None, LOCK_VALUE));
    }
    let field = field_for(tag)?;
    fields.get(field).map(|value| (Some(field), value))
}

fn field_for(tag: &[u8]) -> Option<NfoField> {
    NfoField::ALL
        .into_iter()
        .find(|f| f.node_name().as_bytes() == tag)
}

fn note(field: Option<NfoField>, updated: &mut Vec<NfoField>, locked: &mut usize) {
    match field {
        Some(f) => {
            if !updated.contains(&f) {
                updated.push(f);
            }
        }
        None => *locked += 1,
    }
}
