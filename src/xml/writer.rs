//! XML Writer
//!
//! 要素ツリーのインデント整形とバイト列へのシリアライズ。
//!
//! 出力形式はポータルへの取り込みのためバイト単位で固定です。
//!
//! - 先頭に`<?xml version='1.0' encoding='utf-8'?>`と改行
//! - 1階層につき空白2文字のインデント、空行なし
//! - テキストは`&`、`<`、`>`のみエスケープ
//! - 属性値はさらに`"`と改行・タブをエスケープ（`'`はそのまま）
//! - 子もテキストも持たない要素は`<name />`

use std::borrow::Cow;

use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::Element;
use crate::error::CatalogError;

/// XML宣言（改行込み）
pub const XML_DECLARATION: &[u8] = b"<?xml version='1.0' encoding='utf-8'?>\n";

/// 1階層分のインデント
pub const INDENT: &str = "  ";

/// ツリーにインデント用の空白テキストを設定する
///
/// 深さ優先・左から右に走査し、子を持つ要素にのみ`text`/`tail`を設定します。
/// 空白以外の内容を持つ`text`/`tail`は変更しません。
/// 子の再帰処理が終わった後に、最後の子の`tail`を親の階層に合わせて修正します。
pub fn indent(element: &mut Element, level: usize) {
    let newline = format!("\n{}", INDENT.repeat(level));

    if !element.children.is_empty() {
        if is_blank(&element.text) {
            element.text = Some(format!("{}{}", newline, INDENT));
        }
        if is_blank(&element.tail) {
            element.tail = Some(newline.clone());
        }
        for child in element.children.iter_mut() {
            indent(child, level + 1);
        }
        if let Some(last) = element.children.last_mut() {
            if is_blank(&last.tail) {
                last.tail = Some(newline);
            }
        }
    } else if level > 0 && is_blank(&element.tail) {
        element.tail = Some(newline);
    }
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().map_or(true, |t| t.trim().is_empty())
}

/// ツリーを整形してバイト列にシリアライズする
///
/// 入力ツリーは変更しません。同じツリーからは常に同じバイト列が得られます。
pub fn serialize(root: &Element) -> Result<Vec<u8>, CatalogError> {
    let mut tree = root.clone();
    indent(&mut tree, 0);

    let mut writer = Writer::new(Vec::new());
    writer.get_mut().extend_from_slice(XML_DECLARATION);
    write_element(&mut writer, &tree)?;

    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), CatalogError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());

    if text.is_none() && element.children.is_empty() {
        // `<name />`（閉じ記号の前に空白を入れる）
        let content = format!("{} ", String::from_utf8_lossy(&start));
        let empty = BytesStart::from_content(content, element.name.len());
        writer.write_event(Event::Empty(empty))?;
    } else {
        writer.write_event(Event::Start(start))?;
        if let Some(text) = text {
            write_text(writer, text)?;
        }
        for child in &element.children {
            write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    }

    if let Some(tail) = element.tail.as_deref().filter(|t| !t.is_empty()) {
        write_text(writer, tail)?;
    }

    Ok(())
}

/// 属性値のエスケープ
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in partial_escape(value).chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#09;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), CatalogError> {
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    Ok(())
}
