//! Range Module
//!
//! 設定ファイルの範囲指定ミニ言語
//! `r1.c1:r2.c2[/r1.c1:r2.c2...]` を矩形のリストに変換します。
//!
//! 行位置には整数の代わりに`E`（最終行）を書けます。`E`の解決方法は
//! 呼び出し側が`RowBound`で指定します。FORMATでは固定の大きな値、
//! CHARTでは実際に抽出された行数です。

use crate::error::RangeError;
use crate::types::{Rectangle, N_NROWS_EXCEL_MAX};

/// 最終行トークン
const END_ROW_TOKEN: &str = "E";

/// `E`トークンの解決方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBound {
    /// ワークシートの最大行数（FORMAT用）
    Sentinel,

    /// 指定された行数（CHART用、実際の行数）
    Rows(u32),
}

impl RowBound {
    /// `E`を置き換える1始まりの行番号
    pub fn end_row(self) -> u32 {
        match self {
            RowBound::Sentinel => N_NROWS_EXCEL_MAX,
            RowBound::Rows(rows) => rows,
        }
    }
}

/// 範囲指定の解析結果
///
/// 不正な部分範囲は個別に破棄され、`errors`に記録されます。
/// 有効な兄弟範囲は`rects`に宣言順で残ります。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    pub rects: Vec<Rectangle>,
    pub errors: Vec<RangeError>,
}

/// 範囲指定文字列を解析する
///
/// # 引数
///
/// * `spec` - 範囲指定（例: `"[1.2:E.4/1.6:E.8]"`、角括弧は省略可）
/// * `bound` - `E`トークンの解決方法
///
/// # 使用例
///
/// ```rust
/// use awrxlsx::{parse_range_spec, RowBound};
///
/// let set = parse_range_spec("1.2:E.4", RowBound::Rows(30));
/// assert_eq!(set.rects[0].r2, 30);
/// ```
pub fn parse_range_spec(spec: &str, bound: RowBound) -> RangeSet {
    let mut set = RangeSet::default();

    for part in strip_brackets(spec).split('/') {
        match parse_rectangle(part, bound) {
            Ok(rect) => set.rects.push(rect),
            Err(e) => set.errors.push(e),
        }
    }

    set
}

/// 前後の空白と角括弧を除去する
pub(crate) fn strip_brackets(spec: &str) -> &str {
    spec.trim().trim_matches(|c| c == '[' || c == ']').trim()
}

/// 部分範囲1つ（`r1.c1:r2.c2`）を解析する
fn parse_rectangle(part: &str, bound: RowBound) -> Result<Rectangle, RangeError> {
    let spec = strip_brackets(part);
    let tokens: Vec<&str> = spec.split(['.', ':']).map(str::trim).collect();

    if tokens.len() != 4 {
        return Err(RangeError::WrongArity {
            spec: spec.to_string(),
            found: tokens.len(),
        });
    }

    let r1 = parse_row(tokens[0], spec, bound)?;
    let c1 = parse_col(tokens[1], spec)?;
    let r2 = parse_row(tokens[2], spec, bound)?;
    let c2 = parse_col(tokens[3], spec)?;

    if r1 == 0 || c1 == 0 || r2 == 0 || c2 == 0 {
        return Err(RangeError::ZeroCoordinate {
            spec: spec.to_string(),
        });
    }

    if r1 > r2 || c1 > c2 {
        return Err(RangeError::Inverted {
            spec: spec.to_string(),
        });
    }

    Ok(Rectangle::new(r1, c1, r2, c2))
}

fn parse_row(token: &str, spec: &str, bound: RowBound) -> Result<u32, RangeError> {
    if token == END_ROW_TOKEN {
        return Ok(bound.end_row());
    }

    token.parse::<u32>().map_err(|_| RangeError::NotAnInteger {
        spec: spec.to_string(),
        token: token.to_string(),
    })
}

fn parse_col(token: &str, spec: &str) -> Result<u16, RangeError> {
    token.parse::<u16>().map_err(|_| RangeError::NotAnInteger {
        spec: spec.to_string(),
        token: token.to_string(),
    })
}
