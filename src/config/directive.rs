//! Directive Parser
//!
//! `FORMATn=`および`CHARTn=`ディレクティブ1行を解析します。
//! 数字の接尾辞は装飾であり、インデックスとしては使用しません。

use crate::api::ChartKind;
use crate::config::rules::{ChartRule, FormatRule};
use crate::error::{DirectiveError, RangeError};
use crate::range::{parse_range_spec, strip_brackets, RowBound};

/// FORMATディレクティブの接頭辞
pub(crate) const FORMAT_PREFIX: &str = "FORMAT";

/// CHARTディレクティブの接頭辞
pub(crate) const CHART_PREFIX: &str = "CHART";

/// FORMATの最小トークン数（ディレクティブ名を含む）
const FORMAT_MIN_FIELDS: usize = 4;

/// CHARTの最小フィールド数（`=`より後）
const CHART_MIN_FIELDS: usize = 8;

const DEFAULT_ANCHOR_ROW: u32 = 2;
const DEFAULT_ANCHOR_COL: u16 = 2;

/// FORMATディレクティブの解析結果
#[derive(Debug)]
pub(crate) struct ParsedFormat {
    /// 有効な部分範囲ごとのルール
    pub rules: Vec<FormatRule>,

    /// 破棄された部分範囲のエラー
    pub dropped: Vec<RangeError>,
}

/// `FORMATn=<sheet>^[<rangeSpec>]^<numberFormat>` を解析する
///
/// # 引数
///
/// * `line` - 前後の空白を除去したディレクティブ行
/// * `bound` - 範囲指定の`E`の解決方法（通常は`RowBound::Sentinel`）
///
/// # 戻り値
///
/// * `Ok(ParsedFormat)` - 1件以上の部分範囲が有効な場合
/// * `Err(DirectiveError)` - フィールド不足、またはすべての部分範囲が不正な場合
pub(crate) fn parse_format_directive(
    line: &str,
    bound: RowBound,
) -> Result<ParsedFormat, DirectiveError> {
    let fields: Vec<&str> = match line.split_once('=') {
        Some((_, rest)) => rest.split('^').collect(),
        None => Vec::new(),
    };

    if fields.len() + 1 < FORMAT_MIN_FIELDS {
        return Err(DirectiveError::TooFewFields {
            directive: FORMAT_PREFIX,
            required: FORMAT_MIN_FIELDS,
            found: fields.len() + 1,
        });
    }

    let sheet = fields[0].trim();
    let number_format = Some(fields[2].trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    let set = parse_range_spec(fields[1], bound);
    if set.rects.is_empty() {
        return Err(match set.errors.into_iter().next() {
            Some(e) => DirectiveError::Range(e),
            None => DirectiveError::EmptyRange(fields[1].to_string()),
        });
    }

    let rules = set
        .rects
        .into_iter()
        .map(|rect| FormatRule {
            sheet: sheet.to_string(),
            rect,
            number_format: number_format.clone(),
        })
        .collect();

    Ok(ParsedFormat {
        rules,
        dropped: set.errors,
    })
}

/// `CHARTn=<sheet>,[<rangeSpec>],<active>,<sqlName>,<title>,<row>,<col>,<TYPE>,<bool>,<xFmt>,<xTitle>` を解析する
///
/// 配置行・列・種別が空の場合はそれぞれ`2`・`2`・`LINE`になります。
/// 範囲指定はここでは検証せず、シート出力時に実際の行数で解決します。
pub(crate) fn parse_chart_directive(line: &str) -> Result<ChartRule, DirectiveError> {
    let fields: Vec<&str> = match line.split_once('=') {
        Some((_, rest)) => rest.split(',').collect(),
        None => Vec::new(),
    };

    if fields.len() < CHART_MIN_FIELDS {
        return Err(DirectiveError::TooFewFields {
            directive: CHART_PREFIX,
            required: CHART_MIN_FIELDS,
            found: fields.len(),
        });
    }

    let field = |index: usize| fields.get(index).map(|f| f.trim()).unwrap_or("");

    let anchor_row = parse_anchor(field(5), "anchor row", DEFAULT_ANCHOR_ROW)?;
    let anchor_col = parse_anchor(field(6), "anchor col", DEFAULT_ANCHOR_COL)?;

    let kind = match field(7) {
        "" => ChartKind::default(),
        token => ChartKind::from_token(token)
            .ok_or_else(|| DirectiveError::UnknownChartType(token.to_string()))?,
    };

    Ok(ChartRule {
        sheet: field(0).to_string(),
        range_spec: strip_brackets(field(1)).to_string(),
        active_flag: field(2).to_string(),
        sql_name: field(3).to_string(),
        title: field(4).to_string(),
        anchor_row,
        anchor_col,
        kind,
        reserved_flag: field(8).to_string(),
        x_axis_format: field(9).to_string(),
        x_axis_title: field(10).to_string(),
    })
}

/// 配置座標を1以上の整数として解釈する（空なら既定値）
fn parse_anchor<T>(token: &str, name: &'static str, default: T) -> Result<T, DirectiveError>
where
    T: std::str::FromStr + PartialEq + From<u8>,
{
    if token.is_empty() {
        return Ok(default);
    }

    match token.parse::<T>() {
        Ok(value) if value != T::from(0) => Ok(value),
        _ => Err(DirectiveError::InvalidNumber {
            field: name,
            value: token.to_string(),
        }),
    }
}
