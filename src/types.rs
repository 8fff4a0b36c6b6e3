//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Excelワークシートの最大行数
///
/// FORMATディレクティブの`E`（最終行）はこの値に置き換えられます。
pub const N_NROWS_EXCEL_MAX: u32 = 1_048_576;

/// Excelワークシートの最大列数
pub const N_NCOLS_EXCEL_MAX: u16 = 16_384;

/// Excelシート名の最大長
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;

/// 推論後のセル値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル
    Empty,

    /// 数値（桁区切りを除去済み）
    Number(f64),

    /// 日付のみ
    Date(NaiveDate),

    /// 日付＋時刻
    DateTime(NaiveDateTime),

    /// 文字列
    Text(String),
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// 1始まり・両端を含む矩形範囲 `(r1, c1)-(r2, c2)`
///
/// 生成は`range`モジュールの解析を通じて行われ、`r1 <= r2`かつ`c1 <= c2`、
/// すべての座標が1以上であることが保証されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    pub r1: u32,
    pub c1: u16,
    pub r2: u32,
    pub c2: u16,
}

impl Rectangle {
    pub(crate) fn new(r1: u32, c1: u16, r2: u32, c2: u16) -> Self {
        Self { r1, c1, r2, c2 }
    }

    /// 1始まりの座標が範囲内にあるかを判定
    pub fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.r1 && row <= self.r2 && col >= self.c1 && col <= self.c2
    }

    /// 0始まりの座標 `(r1, c1, r2, c2)` に変換
    pub fn to_zero_based(&self) -> (u32, u16, u32, u16) {
        (self.r1 - 1, self.c1 - 1, self.r2 - 1, self.c2 - 1)
    }

    /// A1形式の文字列に変換（例: (1, 2, 5, 4) -> "B1:D5"）
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letters(u32::from(self.c1)),
            self.r1,
            column_letters(u32::from(self.c2)),
            self.r2
        )
    }
}

/// 1始まりの列番号をExcel列文字に変換（1 -> "A", 26 -> "Z", 27 -> "AA"）
///
/// 0は空文字列になります。
pub fn column_letters(mut col: u32) -> String {
    let mut result = String::new();
    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    result
}

/// 0始まりの列インデックスをExcel列文字に変換（0 -> "A"）
pub fn column_letters_from_index(index: u32) -> String {
    column_letters(index + 1)
}

/// HTMLから抽出された1つの表
///
/// 行ごとのセル数は揃っている必要はありません（ragged rows）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 行データから表を生成（セルのない行は除外）
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: rows.into_iter().filter(|row| !row.is_empty()).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0始まりの座標でセルを取得
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}
