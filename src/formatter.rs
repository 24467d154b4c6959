//! Formatter Module
//!
//! セル値をCSV用のテキストに変換するモジュール。
//!
//! 出力は表計算データをCSVへ書き出したときの一般的な表記に合わせます。
//! 整数値の数値セルは小数点なし、論理値は`True`/`False`、空セルは空文字です。

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// 1日の秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値をテキストに変換
    pub fn format_cell(&self, cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => self.number_formatter.format(*f),
            Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    self.date_formatter.format_duration(dt.as_f64())
                } else {
                    self.date_formatter.format(dt.as_f64())
                }
            }
            Data::DateTimeIso(s) => s.replacen('T', " ", 1),
            Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
            #[allow(unreachable_patterns)]
            _ => String::new(),
        }
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値（1900年システム）を文字列に変換します。
///
/// - 1899年12月30日起算
/// - シリアル値60未満は1900年うるう年バグの影響を受けないよう1日補正
/// - 時刻部分が0時ちょうどの場合は日付のみ（`%Y-%m-%d`）
#[derive(Debug, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    pub fn format(&self, serial_value: f64) -> String {
        match Self::to_datetime(serial_value) {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            // 範囲外の値は数値として出力
            None => NumberFormatter.format(serial_value),
        }
    }

    /// 経過時間（シリアル値の日数）を`N days HH:MM:SS`に変換
    pub fn format_duration(&self, serial_value: f64) -> String {
        let total = (serial_value * SECONDS_PER_DAY).round() as i64;
        let days = total.div_euclid(86_400);
        let rest = total.rem_euclid(86_400);
        format!(
            "{} days {:02}:{:02}:{:02}",
            days,
            rest / 3600,
            (rest % 3600) / 60,
            rest % 60
        )
    }

    fn to_datetime(serial_value: f64) -> Option<NaiveDateTime> {
        if !serial_value.is_finite() || serial_value < 0.0 {
            return None;
        }

        let epoch = if serial_value < 60.0 {
            NaiveDate::from_ymd_opt(1899, 12, 31)?
        } else {
            NaiveDate::from_ymd_opt(1899, 12, 30)?
        };

        let days = serial_value.floor();
        let seconds = ((serial_value - days) * SECONDS_PER_DAY).round() as i64;
        epoch
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::days(days as i64))?
            .checked_add_signed(Duration::seconds(seconds))
    }
}

/// 数値フォーマッター
#[derive(Debug, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// 整数値は小数点なし、それ以外は往復可能な最短表記
    pub fn format(&self, value: f64) -> String {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_format_basic_values() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Empty), "");
        assert_eq!(formatter.format_cell(&Data::String("Lokal A1".to_string())), "Lokal A1");
        assert_eq!(formatter.format_cell(&Data::Int(42)), "42");
        assert_eq!(formatter.format_cell(&Data::Bool(true)), "True");
        assert_eq!(formatter.format_cell(&Data::Bool(false)), "False");
    }

    #[test]
    fn test_format_numbers() {
        let formatter = NumberFormatter;
        assert_eq!(formatter.format(350000.0), "350000");
        assert_eq!(formatter.format(-3.0), "-3");
        assert_eq!(formatter.format(12345.67), "12345.67");
        assert_eq!(formatter.format(0.5), "0.5");
        assert_eq!(formatter.format(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_format_error_cell() {
        let formatter = CellFormatter::new();
        assert_eq!(formatter.format_cell(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
    }

    #[test]
    fn test_format_iso_datetime() {
        let formatter = CellFormatter::new();
        assert_eq!(
            formatter.format_cell(&Data::DateTimeIso("2025-06-01T10:30:00".to_string())),
            "2025-06-01 10:30:00"
        );
    }

    #[test]
    fn test_date_formatter_serials() {
        let formatter = DateFormatter;
        // 2025-01-01 = 45658
        assert_eq!(formatter.format(45658.0), "2025-01-01");
        assert_eq!(formatter.format(45809.0), "2025-06-01");
        assert_eq!(formatter.format(1.0), "1900-01-01");
        assert_eq!(formatter.format(45809.5), "2025-06-01 12:00:00");
    }

    #[test]
    fn test_date_formatter_out_of_range() {
        assert_eq!(DateFormatter.format(-1.0), "-1");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(DateFormatter.format_duration(1.5), "1 days 12:00:00");
        assert_eq!(DateFormatter.format_duration(0.25), "0 days 06:00:00");
    }
}
