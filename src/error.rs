//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! 致命的なエラーは`HtmlToXlsxError`として呼び出し元まで伝播します。
//! 設定ファイルの1行やチャート1件の失敗など、回復可能なエラーは
//! `DirectiveError` / `RangeError` / `ChartError`として最小単位で捕捉されます。

use std::path::PathBuf;

use thiserror::Error;

/// awrxlsxクレート全体で使用するエラー型
///
/// HTMLレポートの読み込み、設定ファイルの読み込み、ワークブックの生成中に発生する
/// 致命的なエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Xlsx`: ワークブックの生成・保存中に発生したエラー（rust_xlsxwriter由来）
/// - `Encoding`: 対応するどのエンコーディングでも文書を読めなかったエラー
/// - `ConfigNotFound`: 設定ファイルが存在しないエラー
/// - `Config`: 変換設定の検証に失敗したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use awrxlsx::HtmlToXlsxError;
/// use std::fs::File;
///
/// fn open_report(path: &str) -> Result<(), HtmlToXlsxError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum HtmlToXlsxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの生成・保存中に発生したエラー
    ///
    /// 出力ファイルを作成できない場合や、保存に失敗した場合に発生します。
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 正規表現のコンパイルエラー
    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// JSONシリアライズのエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 文書のデコードに失敗したエラー
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// 設定ファイルが存在しないエラー
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合や、文書内に設定ファイルの参照が見つからない場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use awrxlsx::{ConverterBuilder, HtmlToXlsxError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_format_end_row(0)  // 無効な行番号
    ///     .build();
    ///
    /// match result {
    ///     Err(HtmlToXlsxError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 範囲指定（`r1.c1:r2.c2`）1件の解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// トークン数が4でない
    #[error("range '{spec}' must have 4 coordinates, found {found}")]
    WrongArity { spec: String, found: usize },

    /// 整数として解釈できないトークン
    #[error("range '{spec}' has a non-integer coordinate '{token}'")]
    NotAnInteger { spec: String, token: String },

    /// 座標に0が含まれる（1始まり）
    #[error("range '{spec}' uses 0, coordinates are 1-based")]
    ZeroCoordinate { spec: String },

    /// 開始座標が終了座標より大きい
    #[error("range '{spec}' is inverted")]
    Inverted { spec: String },
}

/// 設定ディレクティブ1行の解析エラー
///
/// このエラーはディレクティブ単位で捕捉され、読み込み処理を中断しません。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// フィールド数が不足している
    #[error("{directive} directive needs at least {required} fields, found {found}")]
    TooFewFields {
        directive: &'static str,
        required: usize,
        found: usize,
    },

    /// 数値フィールドが不正
    #[error("field '{field}' is not a positive integer: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// 未知のチャート種別
    #[error("unknown chart type '{0}'")]
    UnknownChartType(String),

    /// 範囲指定の一部が不正（その範囲のみ破棄）
    #[error(transparent)]
    Range(#[from] RangeError),

    /// 有効な範囲が1つもない
    #[error("no usable range in '{0}'")]
    EmptyRange(String),
}

/// チャート1件の構築エラー
///
/// このエラーはチャート単位で捕捉され、同じシートの他のチャートや
/// 他のシートの処理を中断しません。
#[derive(Error, Debug)]
pub enum ChartError {
    /// 系列を1つも作れなかった
    #[error("chart '{title}' has no data series")]
    NoSeries { title: String },

    /// rust_xlsxwriterがチャートを拒否した
    #[error("chart '{title}' was rejected: {source}")]
    Rejected {
        title: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}
