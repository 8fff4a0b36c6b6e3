//! Type Inference Module
//!
//! HTMLから取り出したセル文字列を、書き込み用の`CellValue`とスタイル種別に分類します。
//!
//! 判定は次の優先順位で行われ、最初に該当したものが採用されます。
//!
//! 1. 空文字列 → 空セル（文字列スタイル）
//! 2. カスタム書式あり かつ 数値 → 数値（カスタム書式）
//! 3. 先頭列 かつ 日付形式 → 日付 / 日時（解析できなければ文字列）
//! 4. 先頭列以外 かつ 数値 → 数値（カスタム書式、なければ既定の数値書式）
//! 5. それ以外 → 文字列
//!
//! 先頭列の数値文字列は、カスタム書式がない限り文字列のまま出力されます。

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::CellValue;

/// 日付部分の長さ（`YYYY-MM-DD`）
const DATE_LEN: usize = 10;

/// 日時部分の長さ（`YYYY-MM-DDTHH:MM:SS`）
const DATETIME_LEN: usize = 19;

/// 時刻なしとみなす末尾
const MIDNIGHT_SUFFIX: &str = " 00:00:00";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 日付文字列の形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// 日付のみ（`YYYY-MM-DD`、または時刻が`00:00:00`）
    DateOnly,

    /// 日付＋時刻
    WithTime,
}

/// セルに適用するスタイルの種別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellStyle {
    /// 左寄せの文字列
    Text,

    /// 既定の数値書式（`###,##0`、右寄せ）
    DefaultNumber,

    /// FORMATディレクティブで指定された数値書式（右寄せ）
    CustomNumber(String),

    /// 日付（`yyyy/mm/dd`）
    Date,

    /// 日時（`yyyy/mm/dd hh:mm`）
    DateTime,
}

/// 数値文字列を解析する
///
/// 桁区切りの`,`を除去してから浮動小数点数として解釈します。
/// `NaN`や無限大はワークシートに格納できないため数値とみなしません。
///
/// # 使用例
///
/// ```rust
/// use awrxlsx::parse_numeric;
///
/// assert_eq!(parse_numeric("1,234.56"), Some(1234.56));
/// assert_eq!(parse_numeric(""), None);
/// assert_eq!(parse_numeric("12a"), None);
/// ```
pub fn parse_numeric(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    text.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 日付形式かどうかを判定する
///
/// 先頭10文字が`YYYY-MM-DD`（数字のみ）であれば日付とみなします。
/// 実在する日付かどうかは`parse_date`で検証します。
pub fn classify_date(text: &str) -> Option<DateShape> {
    let head = text.as_bytes().get(..DATE_LEN)?;

    let is_date = head.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !is_date {
        return None;
    }

    if text.len() > DATE_LEN && !text.ends_with(MIDNIGHT_SUFFIX) {
        Some(DateShape::WithTime)
    } else {
        Some(DateShape::DateOnly)
    }
}

/// 日付文字列を解析する
///
/// 時刻付きの場合は空白を`T`に置き換えた先頭19文字を
/// `%Y-%m-%dT%H:%M:%S`として解釈します。解析できない場合は`None`を返します。
pub fn parse_date(text: &str) -> Option<CellValue> {
    match classify_date(text)? {
        DateShape::DateOnly => {
            // classify_dateにより先頭10バイトはASCII
            NaiveDate::parse_from_str(&text[..DATE_LEN], DATE_FORMAT)
                .ok()
                .map(CellValue::Date)
        }
        DateShape::WithTime => {
            let iso: String = text
                .chars()
                .map(|c| if c == ' ' { 'T' } else { c })
                .take(DATETIME_LEN)
                .collect();
            NaiveDateTime::parse_from_str(&iso, DATETIME_FORMAT)
                .ok()
                .map(CellValue::DateTime)
        }
    }
}

/// セル文字列を分類する
///
/// # 引数
///
/// * `text` - タグ除去・トリム済みのセル文字列
/// * `col` - 0始まりの列インデックス
/// * `custom_format` - このセルに適用されるFORMATルールの数値書式
///
/// # 戻り値
///
/// 書き込む値とスタイル種別の組
///
/// # 使用例
///
/// ```rust
/// use awrxlsx::{infer_cell, CellStyle, CellValue};
///
/// let (value, style) = infer_cell("1,234", 1, None);
/// assert_eq!(value, CellValue::Number(1234.0));
/// assert_eq!(style, CellStyle::DefaultNumber);
///
/// // 先頭列の数値はカスタム書式がなければ文字列
/// let (value, style) = infer_cell("42", 0, None);
/// assert_eq!(value, CellValue::Text("42".to_string()));
/// assert_eq!(style, CellStyle::Text);
/// ```
pub fn infer_cell(text: &str, col: usize, custom_format: Option<&str>) -> (CellValue, CellStyle) {
    if text.is_empty() {
        return (CellValue::Empty, CellStyle::Text);
    }

    let number = parse_numeric(text);

    if let (Some(format), Some(value)) = (custom_format, number) {
        return (CellValue::Number(value), CellStyle::CustomNumber(format.to_string()));
    }

    if col == 0 && classify_date(text).is_some() {
        return match parse_date(text) {
            Some(value @ CellValue::DateTime(_)) => (value, CellStyle::DateTime),
            Some(value) => (value, CellStyle::Date),
            None => text_cell(text),
        };
    }

    if col > 0 {
        if let Some(value) = number {
            // カスタム書式がある数値は上で処理済み
            return (CellValue::Number(value), CellStyle::DefaultNumber);
        }
    }

    text_cell(text)
}

fn text_cell(text: &str) -> (CellValue, CellStyle) {
    (CellValue::Text(text.to_string()), CellStyle::Text)
}
