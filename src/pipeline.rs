//! Pipeline Module
//!
//! スプレッドシートの読み込みからCSV出力、カタログXML・MD5の書き出しまでの
//! 1回分の実行を統括するモジュール。

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing::{error, info, warn};

use crate::catalog::{resource_dates, CatalogBuilder, MergeOutcome};
use crate::config::CatalogMode;
use crate::discovery::CsvDiscovery;
use crate::error::CatalogError;
use crate::export::{CsvExporter, ExportOutcome};
use crate::parser::load_table;
use crate::paths::{PathResolver, PublicationDate};
use crate::store::{write_catalog, WrittenFiles};
use crate::xml::{self, Element};

/// 1回の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// すべての出力を書き出した
    Completed(RunSummary),

    /// 入力スプレッドシートが存在しなかったため何もしなかった
    InputMissing(PathBuf),
}

/// 完了した実行の概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 処理日
    pub today: PublicationDate,

    /// 使用したカタログ生成モード
    pub mode: CatalogMode,

    /// 当日分CSVの出力結果
    pub csv: ExportOutcome,

    /// メインXMLに含まれるリソースの公開日（出現順）
    pub resource_dates: Vec<String>,

    /// マージモードで新たに追加したリソース数
    pub inserted: usize,

    /// マージモードで既に存在していたリソース数
    pub already_present: usize,

    /// メインXMLとMD5
    pub catalog: WrittenFiles,

    /// 前年分アーカイブ（前年のCSVがある場合のみ）
    pub history: Option<WrittenFiles>,

    /// 日付を解釈できずに読み飛ばしたCSVファイル数
    pub skipped_files: usize,
}

/// 実行パイプライン
///
/// [`PipelineBuilder`](crate::PipelineBuilder)で構築します。
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: PathResolver,
    discovery: CsvDiscovery,
    mode: CatalogMode,
    input: Option<PathBuf>,
    today: Option<PublicationDate>,
}

impl Pipeline {
    pub(crate) fn new(
        resolver: PathResolver,
        discovery: CsvDiscovery,
        mode: CatalogMode,
        input: Option<PathBuf>,
        today: Option<PublicationDate>,
    ) -> Self {
        Self {
            resolver,
            discovery,
            mode,
            input,
            today,
        }
    }

    /// 入力スプレッドシートのパス
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| self.resolver.input_path())
    }

    /// 処理日（固定されていなければ実行時のローカル日付）
    pub fn today(&self) -> PublicationDate {
        self.today
            .unwrap_or_else(|| PublicationDate::new(Local::now().date_naive()))
    }

    /// パイプラインを1回実行する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力スプレッドシートの存在確認（なければ`InputMissing`）
    /// 2. 最初のシートを表として読み込み
    /// 3. 当日分のCSVを出力（既にあれば何もしない）
    /// 4. 既存のCSVを検出し、当年分の日付を抽出（なければ当日のみ）
    /// 5. モードに応じてカタログを構築し、XMLとMD5を書き出し
    /// 6. 前年分のCSVがあれば履歴XMLとMD5を書き出し
    ///
    /// # 戻り値
    ///
    /// * `Ok(RunOutcome::Completed)` - すべての出力を書き出した場合
    /// * `Ok(RunOutcome::InputMissing)` - 入力スプレッドシートが存在しない場合
    /// * `Err(CatalogError)` - 読み込み・書き込みに失敗した場合
    pub fn run(&self) -> Result<RunOutcome, CatalogError> {
        // 1. 入力の確認
        let input = self.input_path();
        if !input.is_file() {
            error!(path = %input.display(), "Input spreadsheet not found");
            return Ok(RunOutcome::InputMissing(input));
        }

        // 2. 表の読み込み
        let table = load_table(&input)?;
        let today = self.today();
        let year = today.year();
        info!(%today, mode = ?self.mode, "Starting catalog run");

        // 3. 当日分CSV
        let csv = CsvExporter::new(self.resolver.clone()).export(&table, &today)?;

        // 4. 検出
        let found = self.discovery.discover(self.resolver.root())?;
        let mut current = found.dates_in_year(year);
        if current.is_empty() {
            warn!(year, %today, "No CSV files found for the current year, using today only");
            current.push(today);
        }

        // 5. メインカタログ
        let builder = CatalogBuilder::new(self.resolver.clone());
        let mut inserted = 0;
        let mut already_present = 0;
        let root = match self.mode {
            CatalogMode::Merge => {
                let mut root = self.read_existing()?;
                for date in &current {
                    let (merged, outcome) = builder.merge(root.take(), date, year);
                    match outcome {
                        MergeOutcome::Inserted => inserted += 1,
                        MergeOutcome::AlreadyPresent => already_present += 1,
                    }
                    root = Some(merged);
                }
                root.unwrap_or_else(|| builder.rebuild(&[], year))
            }
            CatalogMode::Rebuild => builder.rebuild(&current, year),
        };
        let catalog = write_catalog(
            &xml::serialize(&root)?,
            &self.resolver.xml_path(),
            &self.resolver.md5_path(),
        )?;

        // 6. 前年分アーカイブ
        let previous = found.dates_in_year(year - 1);
        let history = if previous.is_empty() {
            None
        } else {
            info!(year = year - 1, resources = previous.len(), "Writing history catalog");
            let (xml_path, md5_path) = self.resolver.history_paths(year - 1);
            let archive = builder.rebuild(&previous, year - 1);
            Some(write_catalog(&xml::serialize(&archive)?, &xml_path, &md5_path)?)
        };

        let summary = RunSummary {
            today,
            mode: self.mode,
            csv,
            resource_dates: resource_dates(&root),
            inserted,
            already_present,
            catalog,
            history,
            skipped_files: found.skipped,
        };
        info!(
            resources = summary.resource_dates.len(),
            dates = %summary.resource_dates.join(", "),
            digest = %summary.catalog.digest,
            "Catalog run completed"
        );

        Ok(RunOutcome::Completed(summary))
    }

    /// マージモードの起点となる既存のXML
    ///
    /// ファイルがない場合、または解析に失敗した場合は`None`（新規作成）になります。
    fn read_existing(&self) -> Result<Option<Element>, CatalogError> {
        let path = self.resolver.xml_path();
        if !path.is_file() {
            info!(path = %path.display(), "No existing catalog, starting a new one");
            return Ok(None);
        }

        let content = fs::read(&path)?;
        match xml::parse(&content) {
            Ok(root) => Ok(Some(root)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Existing catalog could not be parsed, rebuilding");
                Ok(None)
            }
        }
    }
}
