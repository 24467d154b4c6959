//! CSV Exporter Module
//!
//! 表データを公開日付きのCSVファイルへ書き出すモジュール。
//! 同じ日付のCSVが既に存在する場合は上書きしません。

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::CatalogError;
use crate::paths::{PathResolver, PublicationDate};
use crate::types::Table;

/// CSV書き出しの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// CSVファイルのパス
    pub path: PathBuf,

    /// 今回新たに作成した場合は`true`、既存ファイルを再利用した場合は`false`
    pub created: bool,
}

/// CSVエクスポーター
#[derive(Debug, Clone)]
pub struct CsvExporter {
    resolver: PathResolver,
}

impl CsvExporter {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// 表を指定日のCSVとして書き出す
    ///
    /// 保存ディレクトリが存在しない場合は作成します。対象ファイルが既に存在する
    /// 場合は何も書き込まずに既存のパスを返します（冪等）。
    ///
    /// 出力はUTF-8、カンマ区切り、必要な場合のみクォート、改行は`\n`、
    /// 行番号の列は含みません。
    pub fn export(
        &self,
        table: &Table,
        date: &PublicationDate,
    ) -> Result<ExportOutcome, CatalogError> {
        let dir = self.resolver.storage_dir(date);
        fs::create_dir_all(&dir)?;

        let path = self.resolver.local_path(date);
        if path.exists() {
            info!(%date, path = %path.display(), "CSV already exists");
            return Ok(ExportOutcome {
                path,
                created: false,
            });
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&path)?;
        // 列のない表は空ファイルになる
        if table.width() > 0 {
            writer.write_record(&table.headers)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;

        info!(%date, path = %path.display(), rows = table.len(), "Created CSV");
        Ok(ExportOutcome {
            path,
            created: true,
        })
    }
}
