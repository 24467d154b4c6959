//! Parser Module
//!
//! calamineを使用したスプレッドシート読み込み。

mod workbook;

pub use workbook::load_table;
