//! XML Reader
//!
//! quick-xmlを使用して既存のカタログ文書を要素ツリーに読み込む。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::Element;
use crate::error::CatalogError;

/// XML文書を要素ツリーとして読み込む
///
/// 空白テキストもそのまま`text`/`tail`として保持します。
/// 宣言、コメント、処理命令は読み飛ばします。
///
/// # 戻り値
///
/// * `Ok(Element)` - ルート要素
/// * `Err(CatalogError::Xml)` - 整形式でない場合（閉じタグの不一致など）
/// * `Err(CatalogError::MalformedXml)` - ルート要素がない、または複数ある場合
pub fn parse(content: &[u8]) -> Result<Element, CatalogError> {
    let mut reader = Reader::from_reader(content);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(start_element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CatalogError::MalformedXml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // 宣言、コメント、処理命令、DOCTYPE
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(CatalogError::MalformedXml(format!(
            "element <{}> is not closed",
            open.name
        )));
    }

    root.ok_or_else(|| CatalogError::MalformedXml("document has no root element".to_string()))
}

fn start_element(reader: &Reader<&[u8]>, start: &BytesStart) -> Result<Element, CatalogError> {
    let name = reader.decoder().decode(start.name().as_ref())?.into_owned();
    let mut element = Element::new(name);

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decoder().decode(attribute.key.as_ref())?.into_owned();
        let value = attribute.decode_and_unescape_value(reader)?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// 完成した要素を親（またはルート）に接続
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CatalogError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(CatalogError::MalformedXml(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

/// テキストを現在の要素の`text`、または直前の子要素の`tail`に追加
fn append_text(stack: &mut [Element], text: &str) -> Result<(), CatalogError> {
    let Some(current) = stack.last_mut() else {
        // ルート要素の外側は空白のみ許容
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(CatalogError::MalformedXml(
            "text outside of the root element".to_string(),
        ));
    };

    let slot = match current.children.last_mut() {
        Some(previous) => &mut previous.tail,
        None => &mut current.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);

    Ok(())
}
