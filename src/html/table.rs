//! Table Fragment Parser
//!
//! `<table>`断片から行・セルを取り出し、タグ除去と文字参照のデコードを行います。

use regex::Regex;

use crate::error::HtmlToXlsxError;
use crate::types::Table;

/// デコード対象の文字参照（この順に置換する）
const ENTITIES: [(&str, &str); 5] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
];

/// 表断片のパーサー
///
/// 正規表現はインスタンス生成時に1度だけコンパイルされます。
#[derive(Debug, Clone)]
pub(crate) struct TableParser {
    row: Regex,
    cell: Regex,
    tag: Regex,
}

impl TableParser {
    pub fn new() -> Result<Self, HtmlToXlsxError> {
        Ok(Self {
            row: Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>")?,
            cell: Regex::new(r"(?is)<t[hd][^>]*>(.*?)</t[hd]>")?,
            tag: Regex::new(r"<[^>]+>")?,
        })
    }

    /// 表断片を行 × セルの文字列グリッドに変換する
    ///
    /// `<th>`と`<td>`はどちらもセルとして扱います。セルを1つも含まない行は除外されます。
    pub fn parse(&self, fragment: &str) -> Table {
        let rows = self
            .row
            .captures_iter(fragment)
            .filter_map(|row| row.get(1))
            .map(|row_html| {
                self.cell
                    .captures_iter(row_html.as_str())
                    .filter_map(|cell| cell.get(1))
                    .map(|cell_html| self.cell_text(cell_html.as_str()))
                    .collect::<Vec<String>>()
            })
            .collect();

        Table::from_rows(rows)
    }

    /// セル内容からタグを除去し、文字参照をデコードして前後の空白を除去する
    fn cell_text(&self, cell_html: &str) -> String {
        let stripped = self.tag.replace_all(cell_html, "");
        let decoded = ENTITIES
            .iter()
            .fold(stripped.into_owned(), |text, (entity, ch)| text.replace(entity, ch));
        decoded.trim().to_string()
    }
}
