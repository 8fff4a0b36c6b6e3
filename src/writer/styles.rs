//! Style Cache
//!
//! ワークブック1つ分のセル書式を保持します。
//! 既定の4書式は生成時に作成し、FORMATディレクティブの数値書式は
//! 初めて使われた時点で作成して書式文字列ごとに再利用します。

use std::collections::HashMap;

use rust_xlsxwriter::{Format, FormatAlign};

use crate::infer::CellStyle;

/// 既定の数値書式
pub const DEFAULT_NUMBER_FORMAT: &str = "###,##0";

/// 日付の表示書式
pub const DATE_NUM_FORMAT: &str = "yyyy/mm/dd";

/// 日時の表示書式
pub const DATETIME_NUM_FORMAT: &str = "yyyy/mm/dd hh:mm";

/// ワークブック単位の書式キャッシュ
#[derive(Debug, Clone)]
pub struct StyleCache {
    text: Format,
    number: Format,
    date: Format,
    datetime: Format,
    custom: HashMap<String, Format>,
}

impl Default for StyleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCache {
    pub fn new() -> Self {
        Self {
            text: Format::new().set_align(FormatAlign::Left),
            number: Format::new()
                .set_num_format(DEFAULT_NUMBER_FORMAT)
                .set_align(FormatAlign::Right),
            date: Format::new()
                .set_num_format(DATE_NUM_FORMAT)
                .set_align(FormatAlign::Left),
            datetime: Format::new()
                .set_num_format(DATETIME_NUM_FORMAT)
                .set_align(FormatAlign::Left),
            custom: HashMap::new(),
        }
    }

    /// スタイル種別に対応する書式を取得する（カスタム書式は必要に応じて作成）
    pub fn format_for(&mut self, style: &CellStyle) -> &Format {
        match style {
            CellStyle::Text => &self.text,
            CellStyle::DefaultNumber => &self.number,
            CellStyle::Date => &self.date,
            CellStyle::DateTime => &self.datetime,
            CellStyle::CustomNumber(num_format) => self
                .custom
                .entry(num_format.clone())
                .or_insert_with(|| {
                    Format::new()
                        .set_num_format(num_format)
                        .set_align(FormatAlign::Right)
                }),
        }
    }

    /// 文字列書式
    pub fn text(&self) -> &Format {
        &self.text
    }

    /// 作成済みのカスタム書式の数
    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_formats_are_created_once_per_key() {
        let mut cache = StyleCache::new();
        assert_eq!(cache.custom_count(), 0);

        cache.format_for(&CellStyle::CustomNumber("0.00".to_string()));
        cache.format_for(&CellStyle::CustomNumber("0.00".to_string()));
        assert_eq!(cache.custom_count(), 1);

        cache.format_for(&CellStyle::CustomNumber("#,##0.0".to_string()));
        assert_eq!(cache.custom_count(), 2);
    }

    #[test]
    fn test_default_styles_do_not_touch_custom_map() {
        let mut cache = StyleCache::new();
        cache.format_for(&CellStyle::Text);
        cache.format_for(&CellStyle::DefaultNumber);
        cache.format_for(&CellStyle::Date);
        cache.format_for(&CellStyle::DateTime);
        assert_eq!(cache.custom_count(), 0);
    }

    #[test]
    fn test_custom_format_differs_from_default() {
        let mut cache = StyleCache::new();
        let custom = cache
            .format_for(&CellStyle::CustomNumber("0.000".to_string()))
            .clone();
        let default = cache.format_for(&CellStyle::DefaultNumber).clone();
        assert_ne!(custom, default);
    }
}
