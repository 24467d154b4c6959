//! Workbook Parser
//!
//! calamineを使用してスプレッドシートの先頭シートを`Table`に読み込む。

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::formatter::CellFormatter;
use crate::types::Table;

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// xlsx/xlsm/xls/ods形式に対応します（形式は拡張子から判定）。
pub(crate) struct WorkbookParser<RS: std::io::Read + std::io::Seek> {
    workbook: Sheets<RS>,
    formatter: CellFormatter,
}

impl WorkbookParser<std::io::BufReader<std::fs::File>> {
    /// ファイルパスからワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(CatalogError::Spreadsheet)` - ファイルが存在しない、読めない、スプレッドシートでない場合
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self {
            workbook,
            formatter: CellFormatter::new(),
        })
    }
}

impl<RS: std::io::Read + std::io::Seek> WorkbookParser<RS> {
    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// 先頭シートを表として読み込む
    ///
    /// 1行目をヘッダーとし、空のヘッダーセルは`Unnamed: <列番号>`とします。
    /// すべてのセルが空のデータ行は読み飛ばします。
    pub fn read_first_sheet(&mut self) -> Result<Table, CatalogError> {
        let names = self.sheet_names();
        let first = names.first().ok_or(CatalogError::EmptyWorkbook)?;
        debug!(sheet = %first, "Reading worksheet");

        let range = self
            .workbook
            .worksheet_range_at(0)
            .ok_or(CatalogError::EmptyWorkbook)??;

        Ok(self.build_table(&range))
    }

    fn build_table(&self, range: &Range<Data>) -> Table {
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let name = self.formatter.format_cell(cell);
                    if name.is_empty() {
                        format!("Unnamed: {}", col)
                    } else {
                        name
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let data: Vec<Vec<String>> = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| row.iter().map(|cell| self.formatter.format_cell(cell)).collect())
            .collect();

        Table::new(headers, data)
    }
}

/// スプレッドシートを読み込む
///
/// 入力ファイルの存在確認は呼び出し側（パイプライン）の責務です。
/// 読み込みに失敗した場合はエラーを回復せずに返します。
pub fn load_table(path: &Path) -> Result<Table, CatalogError> {
    info!(path = %path.display(), "Loading spreadsheet");
    let mut parser = WorkbookParser::open(path)?;
    let table = parser.read_first_sheet()?;
    info!(rows = table.len(), columns = table.width(), "Loaded listings");
    Ok(table)
}
