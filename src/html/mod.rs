//! HTML Module
//!
//! SQL*Plus `markup html`形式のレポートから、シートラベル行
//! （`SQL&gt; rem [<シート名>]`）で区切られた表を抽出します。
//!
//! 抽出は行単位の走査で行い、表断片はシート名ごとに保持されます。
//! 同じシート名が再び現れた場合、後の表が前の表を置き換えます
//! （シートの並び順は最初に現れた位置のまま）。

mod table;

use log::debug;
use regex::Regex;

use crate::error::HtmlToXlsxError;
use crate::types::Table;

use table::TableParser;

const TABLE_START_TAG: &str = "<table";
const TABLE_END_TAG: &str = "</table>";

/// シート名付きで抽出された表の集合（文書内の出現順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTables {
    sheets: Vec<(String, Table)>,
}

impl ExtractedTables {
    /// 表を登録する（同名シートは位置を保ったまま置き換え）
    fn insert(&mut self, name: &str, table: Table) {
        match self.sheets.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = table,
            None => self.sheets.push((name.to_string(), table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// シート名の一覧（出現順）
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(name, table)| (name.as_str(), table))
    }
}

impl IntoIterator for ExtractedTables {
    type Item = (String, Table);
    type IntoIter = std::vec::IntoIter<(String, Table)>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

/// 表抽出器
///
/// シートラベル・行・セルの正規表現を保持します。
#[derive(Debug, Clone)]
pub struct TableExtractor {
    label: Regex,
    parser: TableParser,
}

impl TableExtractor {
    /// 新しい抽出器を生成する
    pub fn new() -> Result<Self, HtmlToXlsxError> {
        Ok(Self {
            label: Regex::new(r"(?:^\s*|SQL(?:&gt;|>)\s*)rem \[([^\]]+)\]")?,
            parser: TableParser::new()?,
        })
    }

    /// 文書全体から表を抽出する
    pub fn extract(&self, document: &str) -> ExtractedTables {
        let mut scan = Scan::default();

        for line in document.split('\n') {
            if let Some(name) = self.label.captures(line).and_then(|c| c.get(1)) {
                // 閉じられていない表は直前のシート名で確定する
                scan.commit_open(&self.parser);
                scan.pending = name.as_str().to_string();
                continue;
            }

            if line.contains(TABLE_START_TAG) {
                scan.open(line);
                if line.contains(TABLE_END_TAG) {
                    scan.close(&self.parser);
                }
                continue;
            }

            if let Some(buffer) = scan.buffer.as_mut() {
                buffer.push_str(line);
                buffer.push('\n');
                if line.contains(TABLE_END_TAG) {
                    scan.close(&self.parser);
                }
            }
        }

        scan.commit_open(&self.parser);

        debug!("Found {} tables in document", scan.tables.len());
        scan.tables
    }

    /// 単一の表断片を解析する
    pub fn parse_table(&self, fragment: &str) -> Table {
        self.parser.parse(fragment)
    }
}

/// 行走査の状態
#[derive(Default)]
struct Scan {
    /// 直近のシートラベル
    pending: String,
    /// 取り込み中の表断片
    buffer: Option<String>,
    tables: ExtractedTables,
}

impl Scan {
    fn open(&mut self, line: &str) {
        let mut buffer = String::with_capacity(line.len() + 1);
        buffer.push_str(line);
        buffer.push('\n');
        self.buffer = Some(buffer);
    }

    /// 表の終了タグで確定する
    fn close(&mut self, parser: &TableParser) {
        if let Some(fragment) = self.buffer.take() {
            self.commit(parser, &fragment);
        }
    }

    /// 閉じられていない表があれば確定する
    fn commit_open(&mut self, parser: &TableParser) {
        self.close(parser);
    }

    fn commit(&mut self, parser: &TableParser, fragment: &str) {
        if self.pending.is_empty() {
            debug!("Discarded a table without a sheet label");
            return;
        }
        let table = parser.parse(fragment);
        debug!("Captured table [{}] ({} rows)", self.pending, table.row_count());
        self.tables.insert(&self.pending, table);
    }
}

/// 文書全体から表を抽出する
///
/// # 使用例
///
/// ```rust
/// use awrxlsx::extract_tables;
///
/// let html = "SQL&gt; rem [load]\n<table>\n<tr><th>A</th></tr>\n</table>\n";
/// let tables = extract_tables(html)?;
/// assert_eq!(tables.get("load").map(|t| t.row_count()), Some(1));
/// # Ok::<(), awrxlsx::HtmlToXlsxError>(())
/// ```
pub fn extract_tables(document: &str) -> Result<ExtractedTables, HtmlToXlsxError> {
    Ok(TableExtractor::new()?.extract(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
<html>
<body>
SQL&gt; rem INI_NAME=awr.ini
SQL&gt; rem [load]
<p>
<table border='1' width='90%'>
<tr>
<th scope=\"col\">SNAP_TIME</th>
<th scope=\"col\">TPS</th>
</tr>
<tr>
<td>2021-01-26 19:30:00</td>
<td align=\"right\">1,234</td>
</tr>
</table>
<p>
SQL&gt; rem [dbsize]
<table>
<tr><th>TS</th><th>MB</th></tr>
<tr><td>USERS</td><td>10</td></tr>
</table>
</body>
</html>
";

    #[test]
    fn test_extract_tables_in_document_order() {
        let tables = extract_tables(REPORT).unwrap();
        let names: Vec<&str> = tables.sheet_names().collect();
        assert_eq!(names, vec!["load", "dbsize"]);

        let load = tables.get("load").unwrap();
        assert_eq!(load.row_count(), 2);
        assert_eq!(load.cell(1, 1), Some("1,234"));

        let dbsize = tables.get("dbsize").unwrap();
        assert_eq!(dbsize.cell(1, 0), Some("USERS"));
    }

    #[test]
    fn test_unterminated_table_is_committed_at_next_label() {
        let html = "SQL&gt; rem [a]\n<table>\n<tr><td>1</td></tr>\nSQL&gt; rem [b]\n<table>\n<tr><td>2</td></tr>\n</table>\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.get("a").and_then(|t| t.cell(0, 0)), Some("1"));
        assert_eq!(tables.get("b").and_then(|t| t.cell(0, 0)), Some("2"));
    }

    #[test]
    fn test_final_unterminated_table_is_committed() {
        let html = "SQL&gt; rem [tail]\n<table>\n<tr><td>x</td></tr>\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.get("tail").map(Table::row_count), Some(1));
    }

    #[test]
    fn test_table_without_label_is_discarded() {
        let html = "<table>\n<tr><td>orphan</td></tr>\n</table>\nSQL&gt; rem [s]\n<table>\n<tr><td>kept</td></tr>\n</table>\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.get("s").and_then(|t| t.cell(0, 0)), Some("kept"));
    }

    #[test]
    fn test_repeated_sheet_name_replaces_in_place() {
        let html = "\
SQL&gt; rem [a]
<table>
<tr><td>first</td></tr>
</table>
SQL&gt; rem [b]
<table>
<tr><td>b</td></tr>
</table>
SQL&gt; rem [a]
<table>
<tr><td>second</td></tr>
</table>
";
        let tables = extract_tables(html).unwrap();
        let names: Vec<&str> = tables.sheet_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(tables.get("a").and_then(|t| t.cell(0, 0)), Some("second"));
    }

    #[test]
    fn test_single_line_table() {
        let html = "SQL> rem [one]\n<table><tr><td>1</td><td>2</td></tr></table>\n<p>after</p>\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.get("one").map(|t| t.rows()[0].len()), Some(2));
    }

    #[test]
    fn test_label_without_table_adds_nothing() {
        let html = "SQL&gt; rem [empty]\n<p>no rows selected</p>\n";
        let tables = extract_tables(html).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_rem_text_inside_cell_is_not_a_label() {
        let html = "\
SQL&gt; rem [notes]
<table>
<tr><th>TEXT</th></tr>
<tr><td>Lorem [ipsum] dolor</td></tr>
<tr><td>sit amet</td></tr>
</table>
";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 1);

        let notes = tables.get("notes").unwrap();
        assert_eq!(notes.row_count(), 3);
        assert_eq!(notes.cell(1, 0), Some("Lorem [ipsum] dolor"));
    }

    #[test]
    fn test_bare_rem_label_at_line_start() {
        let html = "  rem [plain]\n<table>\n<tr><td>1</td></tr>\n</table>\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.get("plain").map(Table::row_count), Some(1));
    }

    #[test]
    fn test_parse_table_fragment() {
        let extractor = TableExtractor::new().unwrap();
        let table = extractor.parse_table(
            "<table>\n<tr><th>EVENT</th><th>WAITS</th></tr>\n<tr>\n<td>log file sync</td>\n<td>1,024</td>\n</tr>\n<tr></tr>\n</table>",
        );

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 1), Some("WAITS"));
        assert_eq!(table.cell(1, 0), Some("log file sync"));
    }

    #[test]
    fn test_into_iter_yields_owned_pairs_in_order() {
        let tables = extract_tables(REPORT).unwrap();
        let owned: Vec<(String, Table)> = tables.clone().into_iter().collect();

        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].0, "load");
        assert_eq!(owned[1].0, "dbsize");
        assert_eq!(Some(&owned[1].1), tables.get("dbsize"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let html = "SQL&gt; rem [w]\r\n<table>\r\n<tr><td>v</td></tr>\r\n</table>\r\n";
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.get("w").and_then(|t| t.cell(0, 0)), Some("v"));
    }
}
