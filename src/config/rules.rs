//! Rule Records
//!
//! 設定ファイルから生成される不変のルールレコード。

use serde::Serialize;

use crate::api::ChartKind;
use crate::range::{parse_range_spec, RangeSet, RowBound};
use crate::types::Rectangle;

/// セル範囲に対する数値書式ルール
///
/// FORMATディレクティブの部分範囲1つにつき1件生成されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRule {
    /// 対象シート名
    pub sheet: String,

    /// 対象範囲（1始まり）
    pub rect: Rectangle,

    /// Excel数値書式文字列（空の場合は`None`）
    pub number_format: Option<String>,
}

impl FormatRule {
    /// 0始まりの座標がこのルールの範囲内にあるかを判定
    pub fn covers(&self, row: usize, col: usize) -> bool {
        match (u32::try_from(row + 1), u16::try_from(col + 1)) {
            (Ok(row), Ok(col)) => self.rect.contains(row, col),
            _ => false,
        }
    }
}

/// チャート生成ルール
///
/// 範囲指定の`E`は抽出された表の行数に依存するため、
/// 解析せずに保持し、シート出力時に`resolve_ranges`で解決します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRule {
    /// 対象シート名
    pub sheet: String,

    /// 範囲指定（角括弧除去済み、未解決）
    pub range_spec: String,

    /// 有効フラグ（予約、未使用）
    pub active_flag: String,

    /// SQL名（予約、未使用）
    pub sql_name: String,

    /// チャートタイトル
    pub title: String,

    /// 配置行（1始まり）
    pub anchor_row: u32,

    /// 配置列（1始まり）
    pub anchor_col: u16,

    /// チャート種別
    pub kind: ChartKind,

    /// 予約フラグ（未使用）
    pub reserved_flag: String,

    /// X軸の数値書式
    pub x_axis_format: String,

    /// X軸タイトル
    pub x_axis_title: String,
}

impl ChartRule {
    /// 範囲指定を実際の行数で解決する
    ///
    /// 先頭の矩形がカテゴリ（X軸）、以降が値系列の矩形です。
    pub fn resolve_ranges(&self, rows: u32) -> RangeSet {
        parse_range_spec(&self.range_spec, RowBound::Rows(rows))
    }

    /// 0始まりの配置座標 `(row, col)`
    pub fn anchor(&self) -> (u32, u16) {
        (self.anchor_row - 1, self.anchor_col - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_rule(range_spec: &str) -> ChartRule {
        ChartRule {
            sheet: "load".to_string(),
            range_spec: range_spec.to_string(),
            active_flag: "ACTIVE".to_string(),
            sql_name: "load".to_string(),
            title: "Transactions".to_string(),
            anchor_row: 2,
            anchor_col: 56,
            kind: ChartKind::Line,
            reserved_flag: "TRUE".to_string(),
            x_axis_format: String::new(),
            x_axis_title: String::new(),
        }
    }

    #[test]
    fn test_format_rule_covers_zero_based_point() {
        let rule = FormatRule {
            sheet: "s".to_string(),
            rect: Rectangle::new(2, 2, 3, 3),
            number_format: Some("0.0".to_string()),
        };

        assert!(rule.covers(1, 1));
        assert!(rule.covers(2, 2));
        assert!(!rule.covers(0, 1));
        assert!(!rule.covers(1, 3));
    }

    #[test]
    fn test_chart_rule_resolves_end_against_rows() {
        let rule = chart_rule("1.2:E.2/1.31:E.32");
        let set = rule.resolve_ranges(120);
        assert_eq!(
            set.rects,
            vec![Rectangle::new(1, 2, 120, 2), Rectangle::new(1, 31, 120, 32)]
        );
    }

    #[test]
    fn test_chart_rule_anchor_is_zero_based() {
        assert_eq!(chart_rule("1.1:2.2").anchor(), (1, 55));
    }
}
