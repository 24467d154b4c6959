//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// cenykatalogクレート全体で使用するエラー型
///
/// スプレッドシートの読み込み、CSV出力、XMLカタログの生成・解析、
/// ファイル書き込み中に発生するすべてのエラーを統一的に扱うために使用されます。
///
/// 入力ファイルが存在しない場合はエラーではなく
/// [`RunOutcome::InputMissing`](crate::RunOutcome::InputMissing)として報告されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use cenykatalog::CatalogError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), CatalogError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// ワークシートを1枚も含まないスプレッドシート
    #[error("Spreadsheet contains no worksheets")]
    EmptyWorkbook,

    /// XMLの読み書き中に発生したエラー（quick-xml由来）
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML属性の解析エラー
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// 整形式だが構造が不正なXML（ルート要素なし、閉じられていない要素など）
    #[error("Malformed XML document: {0}")]
    MalformedXml(String),

    /// CSV書き込み中に発生したエラー
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// ファイル名パターンの構築に失敗したエラー
    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// 設定ファイル（JSON）の解析エラー
    #[error("Failed to parse configuration file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `PipelineBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、ファイル名テンプレートに`{date}`が
    /// 含まれていない場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use cenykatalog::{CatalogConfig, CatalogError, PipelineBuilder};
    ///
    /// let config = CatalogConfig {
    ///     csv_file_template: "prices.csv".to_string(),
    ///     ..CatalogConfig::default()
    /// };
    ///
    /// match PipelineBuilder::new().with_config(config).build() {
    ///     Err(CatalogError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// `YYYY-MM-DD`形式でない、または存在しない日付
    #[error("Invalid publication date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
