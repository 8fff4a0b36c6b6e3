//! Config Module
//!
//! INI形式の設定ファイルから`FORMAT`/`CHART`ディレクティブを読み込み、
//! シート名ごとにまとめた`RuleSet`を構築します。
//!
//! 不正な行は`Diagnostic`として記録してスキップし、読み込みは中断しません。

mod directive;
mod rules;

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::{Serialize, Serializer};

use crate::api::SourceEncoding;
use crate::error::{DirectiveError, HtmlToXlsxError};
use crate::range::RowBound;
use crate::source::read_document;

use directive::{parse_chart_directive, parse_format_directive, CHART_PREFIX, FORMAT_PREFIX};
pub use rules::{ChartRule, FormatRule};

/// 設定ファイル1行分の診断情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 行番号（1始まり）
    pub line: usize,

    /// エラー内容
    #[serde(serialize_with = "serialize_display")]
    pub error: DirectiveError,
}

fn serialize_display<S: Serializer>(
    error: &DirectiveError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// シート名ごとにまとめた書式・チャートルール
///
/// 各シートのルールはファイル内の宣言順に並びます。同じシートに対する
/// 複数のディレクティブ（接尾辞の重複を含む）はすべて連結されます。
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleSet {
    format_rules: BTreeMap<String, Vec<FormatRule>>,
    chart_rules: BTreeMap<String, Vec<ChartRule>>,
    diagnostics: Vec<Diagnostic>,
}

impl RuleSet {
    /// 設定テキストを解析する（FORMATの`E`はワークシートの最大行数）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use awrxlsx::RuleSet;
    ///
    /// let rules = RuleSet::parse("FORMAT1=load^[2.2:E.3]^###,##0\n");
    /// assert_eq!(rules.format_rules("load").len(), 1);
    /// assert!(rules.chart_rules("load").is_empty());
    /// ```
    pub fn parse(text: &str) -> Self {
        Self::parse_with_bound(text, RowBound::Sentinel)
    }

    /// FORMATの`E`の解決方法を指定して設定テキストを解析する
    pub fn parse_with_bound(text: &str, format_bound: RowBound) -> Self {
        let mut rules = RuleSet::default();

        for (index, raw) in text.lines().enumerate() {
            let line_num = index + 1;
            let line = raw.trim();

            if line.starts_with(FORMAT_PREFIX) {
                match parse_format_directive(line, format_bound) {
                    Ok(parsed) => {
                        for dropped in parsed.dropped {
                            rules.record(line_num, dropped.into());
                        }
                        for rule in parsed.rules {
                            debug!(
                                "FORMAT (line {}): sheet={}, range={}, format={:?}",
                                line_num,
                                rule.sheet,
                                rule.rect.to_a1(),
                                rule.number_format
                            );
                            rules
                                .format_rules
                                .entry(rule.sheet.clone())
                                .or_default()
                                .push(rule);
                        }
                    }
                    Err(e) => rules.record(line_num, e),
                }
            } else if line.starts_with(CHART_PREFIX) {
                match parse_chart_directive(line) {
                    Ok(rule) => {
                        debug!(
                            "CHART (line {}): sheet={}, title={}, pos=({}, {}), type={:?}",
                            line_num,
                            rule.sheet,
                            rule.title,
                            rule.anchor_row,
                            rule.anchor_col,
                            rule.kind
                        );
                        rules
                            .chart_rules
                            .entry(rule.sheet.clone())
                            .or_default()
                            .push(rule);
                    }
                    Err(e) => rules.record(line_num, e),
                }
            }
        }

        debug!(
            "Loaded format rules for {} sheets, chart rules for {} sheets ({} skipped)",
            rules.format_rules.len(),
            rules.chart_rules.len(),
            rules.diagnostics.len()
        );

        rules
    }

    /// 設定ファイルを読み込んで解析する
    ///
    /// # 戻り値
    ///
    /// * `Ok(RuleSet)` - 読み込みに成功した場合（不正な行はスキップ済み）
    /// * `Err(HtmlToXlsxError::ConfigNotFound)` - ファイルが存在しない場合
    pub fn from_path(
        path: &Path,
        encoding: SourceEncoding,
        format_bound: RowBound,
    ) -> Result<Self, HtmlToXlsxError> {
        if !path.exists() {
            return Err(HtmlToXlsxError::ConfigNotFound(path.to_path_buf()));
        }

        debug!("Parsing config file: {}", path.display());
        let text = read_document(path, encoding)?;
        Ok(Self::parse_with_bound(&text, format_bound))
    }

    fn record(&mut self, line: usize, error: DirectiveError) {
        debug!("Skipped config line {}: {}", line, error);
        self.diagnostics.push(Diagnostic { line, error });
    }

    /// シートの書式ルール（宣言順）
    pub fn format_rules(&self, sheet: &str) -> &[FormatRule] {
        self.format_rules.get(sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// シートのチャートルール（宣言順）
    pub fn chart_rules(&self, sheet: &str) -> &[ChartRule] {
        self.chart_rules.get(sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// スキップされた行・範囲の診断情報
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// JSON形式（整形済み）に変換する
    pub fn to_json(&self) -> Result<String, HtmlToXlsxError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 設定テキストを読み込む（`RuleSet::parse`の別名）
pub fn load_configuration(text: &str) -> RuleSet {
    RuleSet::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChartKind;
    use crate::types::{Rectangle, N_NROWS_EXCEL_MAX};
    use std::io::Write;

    const SAMPLE_INI: &str = "\
[AWR]
; comment line
INI_NAME=awr.ini

FORMAT1=load^[1.3:E.36]^###,##0
FORMAT2=load^[1.37:E.40]^###,##0.0
FORMAT3=sql^[2.2:E.4]^0.00
CHART1=load,[1.2:E.2/1.31:E.32],ACTIVE,load,Transactions,2,56,LINE,TRUE,dd hh:mm,Time
CHART2=load,[1.2:E.2/1.33:E.33],ACTIVE,load,Redo,20,56,COLUMN,TRUE
";

    #[test]
    fn test_parse_groups_by_sheet_in_order() {
        let rules = RuleSet::parse(SAMPLE_INI);

        let load = rules.format_rules("load");
        assert_eq!(load.len(), 2);
        assert_eq!(load[0].rect, Rectangle::new(1, 3, N_NROWS_EXCEL_MAX, 36));
        assert_eq!(load[1].number_format.as_deref(), Some("###,##0.0"));

        assert_eq!(rules.format_rules("sql").len(), 1);
        assert!(rules.format_rules("missing").is_empty());

        let charts = rules.chart_rules("load");
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].title, "Transactions");
        assert_eq!(charts[1].kind, ChartKind::Column);
        assert!(rules.diagnostics().is_empty());
    }

    #[test]
    fn test_duplicate_suffixes_are_all_applied() {
        let rules = RuleSet::parse(
            "FORMAT3=load^[1.1:5.5]^0\nFORMAT3=load^[1.1:9.9]^0.0\nCHART1=load,[1.1:2.1/1.2:2.2],A,q,T,2,2,LINE\nCHART1=load,[1.1:2.1/1.3:2.3],A,q,U,2,9,LINE\n",
        );
        assert_eq!(rules.format_rules("load").len(), 2);
        assert_eq!(rules.chart_rules("load").len(), 2);
    }

    #[test]
    fn test_bad_lines_are_skipped_not_fatal() {
        let rules = RuleSet::parse(
            "FORMAT1=load^[1.1:2.2]\nCHART1=load,[1.1:2.1],A,q,T,x,2,LINE\nFORMAT2=load^[1.1:2.2]^0\nCHART2=load,[1.1:2.1/1.2:2.2],A,q,T,2,2,LINE\n",
        );

        assert_eq!(rules.format_rules("load").len(), 1);
        assert_eq!(rules.chart_rules("load").len(), 1);

        let lines: Vec<usize> = rules.diagnostics().iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_dropped_sub_range_is_diagnosed() {
        let rules = RuleSet::parse("FORMAT1=load^[1.1:2/3.3:4.4]^0\n");
        assert_eq!(rules.format_rules("load").len(), 1);
        assert_eq!(rules.diagnostics().len(), 1);
        assert!(matches!(rules.diagnostics()[0].error, DirectiveError::Range(_)));
    }

    #[test]
    fn test_crlf_and_indentation() {
        let rules = RuleSet::parse(
            "  FORMAT1=load^[1.1:2.2]^0\r\n\tCHART1=load,[1.1:2.1/1.2:2.2],A,q,T,2,2,LINE\r\n",
        );
        assert_eq!(rules.format_rules("load").len(), 1);
        assert_eq!(rules.chart_rules("load")[0].kind, ChartKind::Line);
    }

    #[test]
    fn test_load_configuration_matches_parse() {
        let rules = load_configuration(SAMPLE_INI);

        assert_eq!(rules.format_rules("load").len(), 2);
        assert_eq!(
            rules.format_rules("sql")[0].number_format.as_deref(),
            Some("0.00")
        );
        assert_eq!(rules.chart_rules("load")[0].anchor(), (1, 55));
        assert_eq!(rules.chart_rules("load")[1].title, "Redo");
        assert_eq!(
            rules.to_json().unwrap(),
            RuleSet::parse(SAMPLE_INI).to_json().unwrap()
        );
    }

    #[test]
    fn test_to_json() {
        let rules = RuleSet::parse("FORMAT1=load^[1.1:2.2]^0\nCHART1=bad\n");
        let json = rules.to_json().unwrap();
        assert!(json.contains("\"format_rules\""));
        assert!(json.contains("\"load\""));
        assert!(json.contains("CHART directive needs at least 8 fields"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = RuleSet::from_path(
            Path::new("/nonexistent/awr.ini"),
            SourceEncoding::Auto,
            RowBound::Sentinel,
        );
        assert!(matches!(result, Err(HtmlToXlsxError::ConfigNotFound(_))));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_INI.as_bytes()).unwrap();

        let rules =
            RuleSet::from_path(file.path(), SourceEncoding::Auto, RowBound::Sentinel).unwrap();
        assert_eq!(rules.chart_rules("load").len(), 2);
    }
}
