//! CSV Discovery Module
//!
//! 作業ディレクトリを走査して既存の日次CSVファイルを検出し、
//! ファイル名に埋め込まれた公開日の一覧を返すモジュール。
//!
//! 2つのレイアウトを対象とします。
//!
//! - 年別レイアウト: `<root>/<csv_root_dir>/*/<template>`
//! - 旧フラットレイアウト: `<root>/<template>`（年別化以前のアーカイブ互換）

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::{CatalogConfig, DATE_PLACEHOLDER};
use crate::error::CatalogError;
use crate::paths::PublicationDate;

/// ファイル名から公開日を抽出する正規表現
const DATE_PATTERN: &str = r"(\d{4}-\d{2}-\d{2})";

/// 検出結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// 重複を除いた昇順の公開日
    pub dates: Vec<PublicationDate>,

    /// ファイル名パターンには一致したが、有効な日付を含まなかったファイル数
    pub skipped: usize,
}

impl Discovery {
    /// 指定年の日付のみ（昇順を維持）
    pub fn dates_in_year(&self, year: i32) -> Vec<PublicationDate> {
        self.dates
            .iter()
            .filter(|d| d.year() == year)
            .copied()
            .collect()
    }
}

/// CSVファイル検出器
#[derive(Debug, Clone)]
pub struct CsvDiscovery {
    csv_root_dir: String,
    /// テンプレートの`{date}`を`*`相当に置き換えたファイル名パターン
    file_pattern: Regex,
    date_pattern: Regex,
}

impl CsvDiscovery {
    /// 設定のファイル名テンプレートから検出器を構築する
    ///
    /// # 戻り値
    ///
    /// * `Err(CatalogError::Pattern)` - テンプレートから正規表現を構築できない場合
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let (prefix, suffix) = config
            .csv_file_template
            .split_once(DATE_PLACEHOLDER)
            .ok_or_else(|| {
                CatalogError::Config(format!(
                    "csv_file_template must contain '{}'",
                    DATE_PLACEHOLDER
                ))
            })?;
        let file_pattern = Regex::new(&format!(
            "^{}.*{}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ))?;

        Ok(Self {
            csv_root_dir: config.csv_root_dir.clone(),
            file_pattern,
            date_pattern: Regex::new(DATE_PATTERN)?,
        })
    }

    /// `root`以下のCSVを検出する
    ///
    /// 存在しないディレクトリは空として扱います。同じ日付を参照するファイルが
    /// 複数存在しても（旧レイアウトと年別レイアウトの併存など）、結果は1件になります。
    pub fn discover(&self, root: &Path) -> Result<Discovery, CatalogError> {
        let mut names = Vec::new();

        // 年別レイアウト
        let csv_root = root.join(&self.csv_root_dir);
        if csv_root.is_dir() {
            for entry in fs::read_dir(&csv_root)? {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    self.collect_matching(&entry.path(), &mut names)?;
                }
            }
        }

        // 旧フラットレイアウト
        self.collect_matching(root, &mut names)?;

        let mut dates = BTreeSet::new();
        let mut skipped = 0;
        for name in &names {
            match self.extract_date(name) {
                Some(date) => {
                    dates.insert(date);
                }
                None => {
                    warn!(file = %name, "CSV file name does not contain a valid date, skipping");
                    skipped += 1;
                }
            }
        }

        let discovery = Discovery {
            dates: dates.into_iter().collect(),
            skipped,
        };
        info!(
            files = names.len(),
            dates = discovery.dates.len(),
            skipped,
            "Discovered CSV files"
        );
        for date in &discovery.dates {
            debug!(%date, "CSV date");
        }

        Ok(discovery)
    }

    /// ファイル名から最初の`YYYY-MM-DD`部分文字列を抽出し、日付として解釈する
    pub fn extract_date(&self, file_name: &str) -> Option<PublicationDate> {
        let found = self.date_pattern.captures(file_name)?.get(1)?;
        found.as_str().parse().ok()
    }

    /// ディレクトリ直下のパターン一致ファイル名を収集
    fn collect_matching(&self, dir: &Path, names: &mut Vec<String>) -> Result<(), CatalogError> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // globの`*`と同様、隠しファイルは対象外
            if name.starts_with('.') {
                continue;
            }
            if self.file_pattern.is_match(&name) {
                names.push(name);
            }
        }

        Ok(())
    }
}
