//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::api::SourceEncoding;
use crate::config::RuleSet;
use crate::error::HtmlToXlsxError;
use crate::html::TableExtractor;
use crate::range::RowBound;
use crate::source::{find_config_reference, read_document};
use crate::types::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NROWS_EXCEL_MAX};
use crate::writer::{build_charts, LegendPlacement, SheetWriter};

/// 凡例を表示しないシートの既定値
const DEFAULT_LEGENDLESS_SHEETS: [&str; 1] = ["dbsize"];

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 入力文書・設定ファイルのエンコーディング
    pub encoding: SourceEncoding,

    /// 凡例を表示しないシート名
    pub legendless_sheets: Vec<String>,

    /// 列幅を内容に合わせて調整するか
    pub autofit: bool,

    /// FORMATの`E`を置き換える行番号（Noneの場合はワークシートの最大行数）
    pub format_end_row: Option<u32>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            encoding: SourceEncoding::Auto,
            legendless_sheets: DEFAULT_LEGENDLESS_SHEETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            autofit: false,
            format_end_row: None,
        }
    }
}

impl ConversionConfig {
    fn format_bound(&self) -> RowBound {
        match self.format_end_row {
            Some(rows) => RowBound::Rows(rows),
            None => RowBound::Sentinel,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use awrxlsx::{ConverterBuilder, SourceEncoding};
///
/// # fn main() -> Result<(), awrxlsx::HtmlToXlsxError> {
/// let converter = ConverterBuilder::new()
///     .with_encoding(SourceEncoding::EucKr)
///     .with_autofit(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - エンコーディング: 自動判定（BOM → UTF-8 → EUC-KR）
    /// - 凡例なしのシート: `dbsize`
    /// - 列幅の自動調整: しない
    /// - FORMATの`E`: ワークシートの最大行数（1,048,576）
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 入力文書と設定ファイルのエンコーディングを指定する
    ///
    /// # 引数
    ///
    /// * `encoding: SourceEncoding`: デコード方式
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// 凡例を表示しないシートを指定する（既定値を置き換える）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use awrxlsx::ConverterBuilder;
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_legendless_sheets(["dbsize", "tbs_usage"]);
    /// ```
    pub fn with_legendless_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.legendless_sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    /// 書き込み後に列幅を内容に合わせて調整するかを指定する
    pub fn with_autofit(mut self, autofit: bool) -> Self {
        self.config.autofit = autofit;
        self
    }

    /// FORMATディレクティブの`E`を置き換える行番号を指定する
    ///
    /// 旧形式（.xls）のワークシートに合わせる場合は`65_535`を指定します。
    ///
    /// # 制約
    ///
    /// * `1..=1_048_576`の範囲でなければならない
    /// * 制約違反の場合、`build()`時に`HtmlToXlsxError::Config`を返す
    pub fn with_format_end_row(mut self, row: u32) -> Self {
        self.config.format_end_row = Some(row);
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合、Converterインスタンス
    /// * `Err(HtmlToXlsxError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * `HtmlToXlsxError::Config(String)`: 設定の検証に失敗した場合
    ///   * FORMATの最終行が範囲外
    ///   * 凡例なしのシート名が空
    pub fn build(self) -> Result<Converter, HtmlToXlsxError> {
        // 1. FORMATの最終行の検証
        if let Some(row) = self.config.format_end_row {
            if row == 0 || row > N_NROWS_EXCEL_MAX {
                return Err(HtmlToXlsxError::Config(format!(
                    "Invalid format end row: {} (must be 1..={})",
                    row, N_NROWS_EXCEL_MAX
                )));
            }
        }

        // 2. シート名の検証
        if self
            .config
            .legendless_sheets
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(HtmlToXlsxError::Config(
                "Legendless sheet names must not be empty".to_string(),
            ));
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// AWR HTMLレポートをXLSXワークブックに変換するためのメインエントリーポイントです。
/// `ConverterBuilder`を使用して構築された設定に基づいて変換処理を実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use awrxlsx::ConverterBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), awrxlsx::HtmlToXlsxError> {
/// let converter = ConverterBuilder::new().build()?;
/// converter.convert_file(
///     Path::new("awr_rac.html"),
///     Some(Path::new("awr_rac.ini")),
///     Path::new("awr_rac.xlsx"),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// 設定ファイルを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(RuleSet)` - 読み込みに成功した場合（不正な行は診断情報として記録）
    /// * `Err(HtmlToXlsxError::ConfigNotFound)` - ファイルが存在しない場合
    pub fn load_rules(&self, path: &Path) -> Result<RuleSet, HtmlToXlsxError> {
        RuleSet::from_path(path, self.config.encoding, self.config.format_bound())
    }

    /// 設定テキストを解析する
    pub fn parse_rules(&self, text: &str) -> RuleSet {
        RuleSet::parse_with_bound(text, self.config.format_bound())
    }

    /// 入力文書を読み込んでデコードする
    pub fn read_document(&self, path: &Path) -> Result<String, HtmlToXlsxError> {
        read_document(path, self.config.encoding)
    }

    /// シートの凡例の配置
    pub fn legend_for(&self, sheet: &str) -> LegendPlacement {
        if self.config.legendless_sheets.iter().any(|name| name == sheet) {
            LegendPlacement::Hidden
        } else {
            LegendPlacement::OverlayRight
        }
    }

    /// 文書をワークブックに変換する
    ///
    /// # 引数
    ///
    /// * `document` - デコード済みのHTMLレポート
    /// * `rules` - 書式・チャートルール
    ///
    /// # 戻り値
    ///
    /// * `Ok(Workbook)` - 変換されたワークブック（未保存）
    /// * `Err(HtmlToXlsxError)` - 抽出パターンの生成に失敗した場合
    ///
    /// # 処理フロー
    ///
    /// 1. 文書から表を抽出
    /// 2. 各表について処理（文書内の出現順）
    ///    - ワークシートの生成（名前が不正なシートはスキップ）
    ///    - セルの書き込み
    ///    - チャートの挿入
    ///
    /// 1シートの失敗は警告を出力してスキップし、他のシートの処理を続けます。
    pub fn convert_document(
        &self,
        document: &str,
        rules: &RuleSet,
    ) -> Result<Workbook, HtmlToXlsxError> {
        let tables = TableExtractor::new()?.extract(document);
        debug!("Found {} tables in HTML", tables.len());

        let mut workbook = Workbook::new();
        let mut writer = SheetWriter::new();
        // ワークシート名は大文字・小文字を区別せずに一意でなければならない
        let mut used_names = HashSet::new();

        for (name, table) in tables.iter() {
            info!("Processing sheet: [{}]", name);

            if table.is_empty() {
                debug!("Sheet '{}' has no rows, skipped", name);
                continue;
            }

            if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
                warn!(
                    "Failed to create worksheet '{}': name exceeds {} characters",
                    name, N_LEN_EXCEL_SHEET_NAME_MAX
                );
                continue;
            }

            if !used_names.insert(name.to_lowercase()) {
                warn!("Failed to create worksheet '{}': duplicate sheet name", name);
                continue;
            }

            let mut worksheet = Worksheet::new();
            if let Err(e) = worksheet.set_name(name) {
                warn!("Failed to create worksheet '{}': {}", name, e);
                continue;
            }

            let rows = match writer.write_sheet(&mut worksheet, table, rules.format_rules(name)) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Failed to write worksheet '{}': {}", name, e);
                    continue;
                }
            };

            let charts = build_charts(
                &mut worksheet,
                name,
                rules.chart_rules(name),
                rows,
                self.legend_for(name),
            );

            if self.config.autofit {
                worksheet.autofit();
            }

            debug!(
                "Wrote {} rows and {} charts to worksheet '{}'",
                rows, charts, name
            );
            workbook.push_worksheet(worksheet);
        }

        Ok(workbook)
    }

    /// 文書を変換し、XLSXファイルのバイト列を返す
    pub fn convert_to_buffer(
        &self,
        document: &str,
        rules: &RuleSet,
    ) -> Result<Vec<u8>, HtmlToXlsxError> {
        let mut workbook = self.convert_document(document, rules)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 入力ファイルを変換してXLSXファイルに保存する
    ///
    /// # 引数
    ///
    /// * `input` - HTMLレポートのパス
    /// * `rules` - 設定ファイルのパス（`None`の場合は文書内の`INI_NAME`参照を使用）
    /// * `output` - 出力先のパス
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 保存に成功した場合
    /// * `Err(HtmlToXlsxError::Config)` - 設定ファイルの参照が文書内にない場合
    /// * `Err(HtmlToXlsxError::ConfigNotFound)` - 設定ファイルが存在しない場合
    pub fn convert_file(
        &self,
        input: &Path,
        rules: Option<&Path>,
        output: &Path,
    ) -> Result<(), HtmlToXlsxError> {
        let document = self.read_document(input)?;

        let rules = match rules {
            Some(path) => self.load_rules(path)?,
            None => {
                let path = find_config_reference(&document).ok_or_else(|| {
                    HtmlToXlsxError::Config(
                        "INI_NAME reference not found in the HTML report".to_string(),
                    )
                })?;
                self.load_rules(&path)?
            }
        };

        let mut workbook = self.convert_document(&document, &rules)?;
        workbook.save(output)?;
        info!("Excel file saved: {}", output.display());

        Ok(())
    }
}
