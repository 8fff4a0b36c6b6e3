//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::Serialize;

/// チャートの種類
///
/// CHARTディレクティブの第8フィールド（`LINE`, `BAR`など）に対応します。
/// 大文字・小文字は区別しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum ChartKind {
    /// 折れ線グラフ（デフォルト）
    #[default]
    Line,

    /// 横棒グラフ
    Bar,

    /// 縦棒グラフ
    Column,

    /// 面グラフ
    Area,

    /// 円グラフ
    Pie,

    /// ドーナツグラフ
    Doughnut,

    /// 散布図
    Scatter,

    /// レーダーチャート
    Radar,
}

impl ChartKind {
    /// ディレクティブのトークンからチャート種別を解釈する
    ///
    /// 未知の種別の場合は`None`を返します。
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "LINE" => Some(ChartKind::Line),
            "BAR" => Some(ChartKind::Bar),
            "COLUMN" => Some(ChartKind::Column),
            "AREA" => Some(ChartKind::Area),
            "PIE" => Some(ChartKind::Pie),
            "DOUGHNUT" => Some(ChartKind::Doughnut),
            "SCATTER" => Some(ChartKind::Scatter),
            "RADAR" => Some(ChartKind::Radar),
            _ => None,
        }
    }

    pub(crate) fn to_chart_type(self) -> rust_xlsxwriter::ChartType {
        use rust_xlsxwriter::ChartType;

        match self {
            ChartKind::Line => ChartType::Line,
            ChartKind::Bar => ChartType::Bar,
            ChartKind::Column => ChartType::Column,
            ChartKind::Area => ChartType::Area,
            ChartKind::Pie => ChartType::Pie,
            ChartKind::Doughnut => ChartType::Doughnut,
            ChartKind::Scatter => ChartType::Scatter,
            ChartKind::Radar => ChartType::Radar,
        }
    }
}

/// 入力文書の文字エンコーディング
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SourceEncoding {
    /// 自動判定（デフォルト）
    ///
    /// BOM → UTF-8（厳密） → EUC-KR の順に試します。
    #[default]
    Auto,

    /// UTF-8として厳密にデコード
    ///
    /// 不正なバイト列があれば`HtmlToXlsxError::Encoding`になります。
    Utf8,

    /// EUC-KRとしてデコード（不正なバイトは置換文字）
    EucKr,
}
