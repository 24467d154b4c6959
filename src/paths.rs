//! Date/Path Resolver Module
//!
//! 公開日（`PublicationDate`）と、そこから導出される年別の保存先パス・公開URLを扱うモジュール。
//!
//! ディスク上のレイアウト（`<root>/<csv_root_dir>/<year>/<file>`）と公開URLの
//! 相対パスは常に一致します。

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::config::{CatalogConfig, DATE_PLACEHOLDER};
use crate::error::CatalogError;

/// 公開日（`YYYY-MM-DD`）
///
/// 「この日付のリソースは既に存在するか」の検索キー、識別子とURLの構成要素、
/// 保存先の年パーティションキーとして使用されます。
/// 実在する日付からのみ構築できるため、下流の処理で不正な日付を扱う必要はありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicationDate(NaiveDate);

impl PublicationDate {
    /// 文字列表現の書式
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// 年（年パーティションキー）
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// ハイフンを除いた8桁の数字（例: `20250601`）
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for PublicationDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for PublicationDate {
    type Err = CatalogError;

    /// `YYYY-MM-DD`形式のみ受け付ける（`2025-6-1`のようなゼロ埋めなしは拒否）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(CatalogError::InvalidDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|_| CatalogError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// 公開日から保存先パスと公開URLを導出するリゾルバ
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    config: CatalogConfig,
}

impl PathResolver {
    /// # 引数
    ///
    /// * `root` - 作業ディレクトリ（CSV・XMLの相対パスの基準）
    /// * `config` - ファイル名テンプレートなどの設定
    pub fn new(root: impl Into<PathBuf>, config: CatalogConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// 年別CSVの格納ルート（`<root>/<csv_root_dir>`）
    pub fn csv_root(&self) -> PathBuf {
        self.root.join(&self.config.csv_root_dir)
    }

    /// 日付の年に対応する保存ディレクトリ
    pub fn storage_dir(&self, date: &PublicationDate) -> PathBuf {
        self.csv_root().join(date.year().to_string())
    }

    /// テンプレートに日付を埋め込んだファイル名
    pub fn file_name(&self, date: &PublicationDate) -> String {
        self.config
            .csv_file_template
            .replace(DATE_PLACEHOLDER, &date.to_string())
    }

    pub fn local_path(&self, date: &PublicationDate) -> PathBuf {
        self.storage_dir(date).join(self.file_name(date))
    }

    /// 公開URL（ディスク上のレイアウトと同じ相対パス）
    pub fn public_url(&self, date: &PublicationDate) -> String {
        format!(
            "{}{}/{}/{}",
            self.config.url_base,
            self.config.csv_root_dir,
            date.year(),
            self.file_name(date)
        )
    }

    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.config.input_file)
    }

    pub fn xml_path(&self) -> PathBuf {
        self.root.join(&self.config.xml_file)
    }

    pub fn md5_path(&self) -> PathBuf {
        self.root.join(&self.config.md5_file)
    }

    /// 前年分アーカイブのXML・MD5パス
    ///
    /// ファイル名はメインXMLのステムに年を付けたもの（例: `kerim-ceny-mieszkan-2024.xml`）
    pub fn history_paths(&self, year: i32) -> (PathBuf, PathBuf) {
        let stem = Path::new(&self.config.xml_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.xml_file.clone());
        let dir = self.root.join(&self.config.history_dir);
        (
            dir.join(format!("{}-{}.xml", stem, year)),
            dir.join(format!("{}-{}.md5", stem, year)),
        )
    }
}
