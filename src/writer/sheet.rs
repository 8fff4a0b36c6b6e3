//! Sheet Writer
//!
//! 抽出した表をワークシートに書き込みます。セルごとに適用するFORMATルールを解決し、
//! 型推論の結果に応じた書式で値を出力します。

use chrono::{Datelike, NaiveDate, Timelike};
use log::debug;
use rust_xlsxwriter::{ExcelDateTime, Worksheet};

use crate::config::FormatRule;
use crate::error::HtmlToXlsxError;
use crate::infer::{infer_cell, CellStyle};
use crate::types::{CellValue, Table, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};

use super::styles::StyleCache;

/// 書き込み予定のセル（0始まり）
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub style: CellStyle,
}

/// セルに適用される数値書式を解決する
///
/// 宣言順で最初に範囲が一致したルールが採用されます。
/// 一致したルールの書式が空の場合、後続のルールは参照せず`None`を返します。
///
/// # 引数
///
/// * `rules` - 対象シートの書式ルール（宣言順）
/// * `row` - 0始まりの行インデックス
/// * `col` - 0始まりの列インデックス
pub fn resolve_format(rules: &[FormatRule], row: usize, col: usize) -> Option<&str> {
    rules
        .iter()
        .find(|rule| rule.covers(row, col))
        .and_then(|rule| rule.number_format.as_deref())
}

/// 表の各セルについて書き込む値と書式を決定する
///
/// ワークシートの上限を超える位置のセルは除外されます。
pub fn plan_cells(table: &Table, rules: &[FormatRule]) -> Vec<PlannedCell> {
    let mut planned = Vec::new();

    for (row_idx, row) in table.rows().iter().enumerate() {
        let Some(row_num) = u32::try_from(row_idx).ok().filter(|r| *r < N_NROWS_EXCEL_MAX) else {
            debug!("Row {} exceeds the worksheet limit, remaining rows skipped", row_idx + 1);
            break;
        };

        for (col_idx, text) in row.iter().enumerate() {
            let Some(col_num) = u16::try_from(col_idx).ok().filter(|c| *c < N_NCOLS_EXCEL_MAX)
            else {
                debug!("Row {} has more columns than a worksheet allows", row_idx + 1);
                break;
            };

            let custom = resolve_format(rules, row_idx, col_idx);
            let (value, style) = infer_cell(text, col_idx, custom);
            planned.push(PlannedCell {
                row: row_num,
                col: col_num,
                value,
                style,
            });
        }
    }

    planned
}

/// ワークシートへの書き込みを行う
///
/// 書式キャッシュを保持するため、1つのワークブックにつき1つのインスタンスを使用します。
#[derive(Debug, Default)]
pub struct SheetWriter {
    styles: StyleCache,
}

impl SheetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 表をワークシートに書き込み、書き込んだ行数を返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(usize)` - 書き込んだ行数（チャート範囲の`E`の解決に使用）
    /// * `Err(HtmlToXlsxError::Xlsx)` - セルの書き込みに失敗した場合
    pub fn write_sheet(
        &mut self,
        worksheet: &mut Worksheet,
        table: &Table,
        rules: &[FormatRule],
    ) -> Result<usize, HtmlToXlsxError> {
        let cells = plan_cells(table, rules);
        let rows = cells.last().map_or(0, |cell| cell.row as usize + 1);

        for cell in &cells {
            self.write_cell(worksheet, cell)?;
        }

        Ok(rows)
    }

    fn write_cell(
        &mut self,
        worksheet: &mut Worksheet,
        cell: &PlannedCell,
    ) -> Result<(), HtmlToXlsxError> {
        let (row, col) = (cell.row, cell.col);

        match &cell.value {
            CellValue::Empty => {
                worksheet.write_blank(row, col, self.styles.text())?;
            }
            CellValue::Number(number) => {
                let format = self.styles.format_for(&cell.style);
                worksheet.write_number_with_format(row, col, *number, format)?;
            }
            CellValue::Text(text) => {
                worksheet.write_string_with_format(row, col, text, self.styles.text())?;
            }
            CellValue::Date(_) | CellValue::DateTime(_) => match to_excel_datetime(&cell.value) {
                Some(datetime) => {
                    let format = self.styles.format_for(&cell.style);
                    worksheet.write_datetime_with_format(row, col, &datetime, format)?;
                }
                None => {
                    // 1900年より前などワークシートで表現できない日付
                    debug!("Date at ({}, {}) is out of range, written as text", row, col);
                    let text = date_text(&cell.value);
                    worksheet.write_string_with_format(row, col, &text, self.styles.text())?;
                }
            },
        }

        Ok(())
    }
}

fn to_excel_datetime(value: &CellValue) -> Option<ExcelDateTime> {
    match value {
        CellValue::Date(date) => to_excel_date(*date),
        CellValue::DateTime(datetime) => {
            let time = datetime.time();
            to_excel_date(datetime.date())?
                .and_hms(time.hour() as u16, time.minute() as u8, time.second())
                .ok()
        }
        _ => None,
    }
}

fn to_excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

fn date_text(value: &CellValue) -> String {
    match value {
        CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        CellValue::DateTime(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}
