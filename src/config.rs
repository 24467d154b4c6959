//! Configuration Module
//!
//! 開発業者名、URL、ファイル名テンプレートなどの設定値と
//! カタログ生成モードを定義するモジュール。
//!
//! 設定値はプロセス全体のグローバル定数ではなく、各コンポーネントの
//! 構築時に明示的に渡される不変の値として扱います。

use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

/// 日付プレースホルダー（ファイル名テンプレート用）
pub(crate) const DATE_PLACEHOLDER: &str = "{date}";

/// 年プレースホルダー（データセット識別子テンプレート用）
pub(crate) const YEAR_PLACEHOLDER: &str = "{year}";

/// カタログ生成モード
///
/// 1つのデプロイメントにつき、どちらか一方を正規のモードとして選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum CatalogMode {
    /// 検出されたCSVの日付一覧から毎回XMLを再生成する（デフォルト）
    #[default]
    Rebuild,

    /// 前回のXMLを読み込み、未登録の日付のリソースのみを追加する
    Merge,
}

/// カタログ生成の設定
///
/// すべての項目にデフォルト値（Kerim Sp. z o.o.向けの値）が設定されており、
/// JSON設定ファイルで必要な項目のみを上書きできます。
///
/// # 使用例
///
/// ```rust
/// use cenykatalog::CatalogConfig;
///
/// let config = CatalogConfig {
///     developer_name: "Acme".to_string(),
///     ..CatalogConfig::default()
/// };
/// assert_eq!(config.csv_root_dir, "csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 開発業者名（タイトル・説明文に埋め込まれる）
    pub developer_name: String,

    /// データセット識別子のテンプレート（`{year}`を含む）
    pub ext_ident_template: String,

    /// リソース識別子の接頭辞
    pub resource_ident_prefix: String,

    /// 公開URLのベース（末尾は`/`）
    pub url_base: String,

    /// CSVを年別に格納するディレクトリ
    pub csv_root_dir: String,

    /// CSVファイル名のテンプレート（`{date}`を含む）
    pub csv_file_template: String,

    /// 入力スプレッドシート
    pub input_file: String,

    /// メインXMLファイル
    pub xml_file: String,

    /// メインXMLのMD5ファイル
    pub md5_file: String,

    /// 前年分アーカイブの出力ディレクトリ
    pub history_dir: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            developer_name: "Kerim".to_string(),
            ext_ident_template: "kerim_ceny_mieszkan_{year}_dataset".to_string(),
            resource_ident_prefix: "kerim_dane".to_string(),
            url_base: "https://oskar-bednarek.github.io/ceny-mieszkan/".to_string(),
            csv_root_dir: "csv".to_string(),
            csv_file_template: "Kerim-ceny-mieszkan-{date}.csv".to_string(),
            input_file: "Kerim_Dane_ceny_mieszkan.xlsx".to_string(),
            xml_file: "kerim-ceny-mieszkan.xml".to_string(),
            md5_file: "kerim-ceny-mieszkan.md5".to_string(),
            history_dir: "history".to_string(),
        }
    }
}

impl CatalogConfig {
    /// JSON設定ファイルを読み込む
    ///
    /// ファイルに記載されていない項目はデフォルト値になります。
    ///
    /// # 戻り値
    ///
    /// * `Ok(CatalogConfig)` - 読み込みに成功した場合
    /// * `Err(CatalogError::Io)` - ファイルを読めない場合
    /// * `Err(CatalogError::ConfigFile)` - JSONとして不正な場合
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 指定年のデータセット識別子
    pub fn dataset_ident(&self, year: i32) -> String {
        self.ext_ident_template
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }

    /// 設定値を検証する
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if self.developer_name.trim().is_empty() {
            return Err(CatalogError::Config(
                "developer_name must not be empty".to_string(),
            ));
        }

        if !self.csv_file_template.contains(DATE_PLACEHOLDER) {
            return Err(CatalogError::Config(format!(
                "csv_file_template must contain '{}': '{}'",
                DATE_PLACEHOLDER, self.csv_file_template
            )));
        }

        if self.csv_file_template.matches(DATE_PLACEHOLDER).count() > 1 {
            return Err(CatalogError::Config(format!(
                "csv_file_template must contain '{}' exactly once: '{}'",
                DATE_PLACEHOLDER, self.csv_file_template
            )));
        }

        if self.csv_file_template.contains('/') || self.csv_file_template.contains('\\') {
            return Err(CatalogError::Config(format!(
                "csv_file_template must be a bare file name: '{}'",
                self.csv_file_template
            )));
        }

        if !self.ext_ident_template.contains(YEAR_PLACEHOLDER) {
            return Err(CatalogError::Config(format!(
                "ext_ident_template must contain '{}': '{}'",
                YEAR_PLACEHOLDER, self.ext_ident_template
            )));
        }

        if self.resource_ident_prefix.is_empty() {
            return Err(CatalogError::Config(
                "resource_ident_prefix must not be empty".to_string(),
            ));
        }

        if !self.url_base.ends_with('/') {
            return Err(CatalogError::Config(format!(
                "url_base must end with '/': '{}'",
                self.url_base
            )));
        }

        for (name, value) in [
            ("csv_root_dir", &self.csv_root_dir),
            ("input_file", &self.input_file),
            ("xml_file", &self.xml_file),
            ("md5_file", &self.md5_file),
            ("history_dir", &self.history_dir),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.xml_file == self.md5_file {
            return Err(CatalogError::Config(
                "xml_file and md5_file must differ".to_string(),
            ));
        }

        Ok(())
    }
}
