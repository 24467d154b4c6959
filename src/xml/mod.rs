//! XML Tree Module
//!
//! カタログ文書を表すシンプルな要素ツリーと、その読み書きを提供するモジュール。
//!
//! 各要素は開始タグ直後のテキスト（`text`）と終了タグ直後のテキスト（`tail`）を
//! 保持します。インデントはこの2つの空白テキストとして表現されます。

mod reader;
mod writer;

pub use reader::parse;
pub use writer::{indent, serialize, INDENT, XML_DECLARATION};

/// XML要素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// 要素名（`ns2:datasets`のような接頭辞付きの名前もそのまま保持）
    pub name: String,

    /// 属性（出現順）
    pub attributes: Vec<(String, String)>,

    /// 開始タグ直後のテキスト
    pub text: Option<String>,

    /// 終了タグ直後のテキスト
    pub tail: Option<String>,

    /// 子要素
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// テキストのみを持つ葉要素
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 指定名の最初の子要素
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// 指定名の子要素すべて
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// 指定名の最初の子要素のテキスト（前後の空白を除去）
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .and_then(|c| c.text.as_deref())
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let element = Element::new("dataset")
            .with_attribute("status", "published")
            .with_child(Element::leaf("extIdent", "abc"))
            .with_child(Element::new("resources"));

        assert_eq!(element.attribute("status"), Some("published"));
        assert_eq!(element.attribute("missing"), None);
        assert_eq!(element.child_text("extIdent"), Some("abc"));
        assert!(element.child("resources").unwrap().children.is_empty());
        assert!(element.child("tags").is_none());
    }

    #[test]
    fn test_child_text_is_trimmed() {
        let element = Element::new("r").with_child(Element::leaf("extIdent", "\n  kerim_dane_20250601\n"));
        assert_eq!(element.child_text("extIdent"), Some("kerim_dane_20250601"));
    }

    #[test]
    fn test_children_named() {
        let mut element = Element::new("resources");
        element.push(Element::new("resource"));
        element.push(Element::new("other"));
        element.push(Element::new("resource"));
        assert_eq!(element.children_named("resource").count(), 2);
    }

    #[test]
    fn test_child_mut() {
        let mut element = Element::new("dataset").with_child(Element::new("resources"));
        element
            .child_mut("resources")
            .unwrap()
            .push(Element::new("resource"));
        assert_eq!(element.child("resources").unwrap().children.len(), 1);
    }
}
