//! Chart Builder
//!
//! CHARTルールから系列構成（`ChartPlan`）を組み立て、rust_xlsxwriterのチャートとして
//! ワークシートに挿入します。
//!
//! 範囲指定の先頭の矩形がカテゴリ（X軸）、以降の矩形が値系列です。値系列の矩形は
//! 列ごとに1系列に展開されます。開始行がヘッダー行（0始まりの0行目）の場合、
//! その列のヘッダーを系列名とし、値は次の行から取ります。

use log::{debug, warn};
use rust_xlsxwriter::{Chart, ChartFont, ChartFormat, ChartLegendPosition, Worksheet};

use crate::api::ChartKind;
use crate::config::ChartRule;
use crate::error::ChartError;
use crate::types::N_NROWS_EXCEL_MAX;

/// 0始まりのセル範囲 `(first_row, first_col, last_row, last_col)`
pub type CellSpan = (u32, u16, u32, u16);

const TITLE_FONT_NAME: &str = "Arial";
const TITLE_FONT_SIZE: u8 = 10;

/// 凡例の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPlacement {
    /// 凡例を表示しない
    Hidden,

    /// 右側にプロット領域と重ねて表示
    OverlayRight,
}

/// 1系列の構成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPlan {
    /// 系列名を取るセル（0始まり）
    pub name: Option<(u32, u16)>,

    /// 値の範囲（単一列）
    pub values: CellSpan,
}

/// チャート1件の構成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPlan {
    /// 参照先シート名
    pub sheet: String,
    pub title: String,
    pub kind: ChartKind,

    /// すべての系列で共有するカテゴリ範囲
    pub categories: CellSpan,
    pub series: Vec<SeriesPlan>,
    pub x_axis_title: String,
    pub x_axis_format: String,
    pub legend: LegendPlacement,

    /// 挿入位置（0始まり）
    pub anchor: (u32, u16),
}

/// CHARTルールを実際の行数で解決し、チャートの構成を組み立てる
///
/// # 引数
///
/// * `sheet` - 参照先のシート名
/// * `rule` - CHARTルール
/// * `rows` - シートに書き込まれた行数（範囲指定の`E`に代入）
/// * `legend` - 凡例の配置
///
/// # 戻り値
///
/// * `Ok(ChartPlan)` - 1系列以上を構成できた場合
/// * `Err(ChartError::NoSeries)` - 有効な値系列がない場合
pub fn plan_chart(
    sheet: &str,
    rule: &ChartRule,
    rows: usize,
    legend: LegendPlacement,
) -> Result<ChartPlan, ChartError> {
    let rows = u32::try_from(rows).unwrap_or(N_NROWS_EXCEL_MAX);
    let resolved = rule.resolve_ranges(rows);
    for error in &resolved.errors {
        debug!("Chart '{}': ignored range: {}", rule.title, error);
    }

    let mut rects = resolved.rects.iter().map(|rect| rect.to_zero_based());
    let no_series = || ChartError::NoSeries {
        title: rule.title.clone(),
    };
    let categories = rects.next().ok_or_else(no_series)?;

    let mut series = Vec::new();
    for (r1, c1, r2, c2) in rects {
        for col in c1..=c2 {
            let (name, first_row) = if r1 == 0 {
                (Some((0, col)), 1)
            } else {
                (None, r1)
            };

            if first_row > r2 {
                debug!(
                    "Chart '{}': column {} has no values below its header",
                    rule.title,
                    col + 1
                );
                continue;
            }

            series.push(SeriesPlan {
                name,
                values: (first_row, col, r2, col),
            });
        }
    }

    if series.is_empty() {
        return Err(no_series());
    }

    Ok(ChartPlan {
        sheet: sheet.to_string(),
        title: rule.title.clone(),
        kind: rule.kind,
        categories,
        series,
        x_axis_title: rule.x_axis_title.clone(),
        x_axis_format: rule.x_axis_format.clone(),
        legend,
        anchor: rule.anchor(),
    })
}

/// チャートの構成からrust_xlsxwriterのチャートを生成する
pub fn render_chart(plan: &ChartPlan) -> Chart {
    let mut chart = Chart::new(plan.kind.to_chart_type());
    let sheet = plan.sheet.as_str();
    let (cat_r1, cat_c1, cat_r2, cat_c2) = plan.categories;

    for series_plan in &plan.series {
        let (r1, c1, r2, c2) = series_plan.values;
        let series = chart
            .add_series()
            .set_categories((sheet, cat_r1, cat_c1, cat_r2, cat_c2))
            .set_values((sheet, r1, c1, r2, c2));

        if let Some((row, col)) = series_plan.name {
            series.set_name((sheet, row, col));
        }
    }

    if !plan.title.is_empty() {
        chart
            .title()
            .set_name(plan.title.as_str())
            .set_font(
                ChartFont::new()
                    .set_name(TITLE_FONT_NAME)
                    .set_size(TITLE_FONT_SIZE),
            );
    }

    if !plan.x_axis_title.is_empty() || !plan.x_axis_format.is_empty() {
        let axis = chart.x_axis();
        if !plan.x_axis_title.is_empty() {
            axis.set_name(plan.x_axis_title.as_str());
        }
        if !plan.x_axis_format.is_empty() {
            axis.set_num_format(plan.x_axis_format.as_str());
        }
    }

    match plan.legend {
        LegendPlacement::Hidden => {
            chart.legend().set_hidden();
        }
        LegendPlacement::OverlayRight => {
            chart
                .legend()
                .set_position(ChartLegendPosition::Right)
                .set_overlay(true);
        }
    }

    chart.chart_area().set_format(ChartFormat::new().set_no_border());

    chart
}

/// シートのCHARTルールをすべて処理し、挿入できたチャートの数を返す
///
/// 失敗したチャートは警告を出力してスキップし、残りのチャートの処理を続けます。
pub fn build_charts(
    worksheet: &mut Worksheet,
    sheet: &str,
    rules: &[ChartRule],
    rows: usize,
    legend: LegendPlacement,
) -> usize {
    if !rules.is_empty() {
        debug!("Adding {} charts to worksheet '{}'", rules.len(), sheet);
    }

    let mut inserted = 0;
    for (index, rule) in rules.iter().enumerate() {
        match insert_chart(worksheet, sheet, rule, rows, legend) {
            Ok(()) => {
                debug!(
                    "Chart {}: {} at ({}, {})",
                    index + 1,
                    rule.title,
                    rule.anchor_row,
                    rule.anchor_col
                );
                inserted += 1;
            }
            Err(e) => warn!("Failed to create chart {} on '{}': {}", index + 1, sheet, e),
        }
    }

    inserted
}

fn insert_chart(
    worksheet: &mut Worksheet,
    sheet: &str,
    rule: &ChartRule,
    rows: usize,
    legend: LegendPlacement,
) -> Result<(), ChartError> {
    let plan = plan_chart(sheet, rule, rows, legend)?;
    let chart = render_chart(&plan);
    let (row, col) = plan.anchor;

    worksheet
        .insert_chart(row, col, &chart)
        .map_err(|source| ChartError::Rejected {
            title: rule.title.clone(),
            source,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;

    fn chart_rule(line: &str) -> ChartRule {
        let rules = RuleSet::parse(line);
        assert!(rules.diagnostics().is_empty(), "{:?}", rules.diagnostics());
        rules.chart_rules("load")[0].clone()
    }

    #[test]
    fn test_header_row_supplies_series_name() {
        let rule = chart_rule("CHART1=load,[1.1:3.1/1.2:3.2],ACTIVE,load,TPS,5,4,LINE");
        let plan = plan_chart("load", &rule, 3, LegendPlacement::OverlayRight).unwrap();

        assert_eq!(plan.categories, (0, 0, 2, 0));
        assert_eq!(
            plan.series,
            vec![SeriesPlan {
                name: Some((0, 1)),
                values: (1, 1, 2, 1),
            }]
        );
        assert_eq!(plan.anchor, (4, 3));
    }

    #[test]
    fn test_series_below_header_keeps_span_and_has_no_name() {
        let rule = chart_rule("CHART1=load,[2.1:E.1/2.2:E.3],ACTIVE,load,TPS,2,2,BAR");
        let plan = plan_chart("load", &rule, 10, LegendPlacement::Hidden).unwrap();

        assert_eq!(plan.categories, (1, 0, 9, 0));
        assert_eq!(
            plan.series,
            vec![
                SeriesPlan {
                    name: None,
                    values: (1, 1, 9, 1),
                },
                SeriesPlan {
                    name: None,
                    values: (1, 2, 9, 2),
                },
            ]
        );
        assert_eq!(plan.kind, ChartKind::Bar);
    }

    #[test]
    fn test_end_token_uses_row_count() {
        let rule = chart_rule("CHART1=load,[1.1:E.1/1.2:E.2/1.5:E.5],ACTIVE,load,T,2,2,LINE");
        let plan = plan_chart("load", &rule, 120, LegendPlacement::OverlayRight).unwrap();

        assert_eq!(plan.categories, (0, 0, 119, 0));
        assert_eq!(plan.series.len(), 2);
        assert_eq!(plan.series[1].values, (1, 4, 119, 4));
        assert_eq!(plan.series[1].name, Some((0, 4)));
    }

    #[test]
    fn test_first_resolved_range_becomes_categories() {
        let rule = chart_rule("CHART1=load,[x.1:3.1/1.1:3.1/1.2:3.2],ACTIVE,load,T,2,2,LINE");
        let plan = plan_chart("load", &rule, 3, LegendPlacement::OverlayRight).unwrap();

        assert_eq!(plan.categories, (0, 0, 2, 0));
        assert_eq!(plan.series.len(), 1);
    }

    #[test]
    fn test_no_series_is_an_error() {
        let rule = chart_rule("CHART1=load,[1.1:3.1],ACTIVE,load,Lonely,2,2,LINE");
        let result = plan_chart("load", &rule, 3, LegendPlacement::OverlayRight);
        assert!(matches!(result, Err(ChartError::NoSeries { ref title }) if title == "Lonely"));
    }

    #[test]
    fn test_header_only_series_is_skipped() {
        // 1行しかない場合、ヘッダーの下に値がない
        let rule = chart_rule("CHART1=load,[1.1:E.1/1.2:E.2],ACTIVE,load,T,2,2,LINE");
        let result = plan_chart("load", &rule, 1, LegendPlacement::OverlayRight);
        assert!(matches!(result, Err(ChartError::NoSeries { .. })));
    }

    #[test]
    fn test_build_charts_counts_and_skips_failures() {
        let rules = RuleSet::parse(
            "CHART1=load,[1.1:E.1/1.2:E.2],ACTIVE,load,Good,2,5,LINE,,yyyy/mm/dd,Time\n\
             CHART2=load,[1.1:E.1],ACTIVE,load,Bad,20,5,LINE\n\
             CHART3=load,[1.1:E.1/1.2:E.3],ACTIVE,load,,38,5,COLUMN\n",
        );
        let mut worksheet = Worksheet::new();
        worksheet.set_name("load").unwrap();

        let inserted = build_charts(
            &mut worksheet,
            "load",
            rules.chart_rules("load"),
            5,
            LegendPlacement::OverlayRight,
        );
        assert_eq!(inserted, 2);
    }
}
