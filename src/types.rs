//! Types Module
//!
//! スプレッドシートから読み込んだ表データの型を定義するモジュール。

/// 読み込んだ表（ヘッダー行とデータ行）
///
/// 列の意味は解釈せず、列順と値をそのままCSVへ受け渡します。
/// 各値はスプレッドシートのセルをCSV用テキストに変換したものです。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// ヘッダー（列名）
    pub headers: Vec<String>,

    /// データ行（各行の長さは`headers`と同じ）
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// ヘッダーと行から表を生成する
    ///
    /// 行の長さがヘッダーより短い場合は空文字で補い、長い場合は切り詰めます。
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// データ行数（ヘッダーを除く）
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}
