//! awrxlsx - AWR HTML report to XLSX converter driven by FORMAT/CHART directives
//!
//! This crate converts the tabular sections of an Oracle AWR-style HTML report
//! (SQL*Plus `markup html` output) into an XLSX workbook. An INI-like
//! configuration file declares per-range number formats (`FORMATn=`) and
//! charts (`CHARTn=`) that are applied to each generated worksheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use awrxlsx::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Config path is taken from the `SQL> rem INI_NAME=` line when omitted
//!     converter.convert_file(
//!         Path::new("awr_rac.html"),
//!         None,
//!         Path::new("awr_rac.xlsx"),
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-memory Conversion
//!
//! ```rust
//! use awrxlsx::{ConverterBuilder, RuleSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = "SQL&gt; rem [load]\n<table>\n<tr><th>SNAP</th><th>TPS</th></tr>\n\
//!             <tr><td>2021-01-26</td><td>1,234</td></tr>\n</table>\n";
//! let rules = RuleSet::parse("FORMAT1=load^[2.2:E.2]^###,##0\n");
//!
//! let converter = ConverterBuilder::new().build()?;
//! let xlsx: Vec<u8> = converter.convert_to_buffer(html, &rules)?;
//! assert!(xlsx.starts_with(b"PK"));
//! # Ok(())
//! # }
//! ```
//!
//! # Directive Syntax
//!
//! ```text
//! FORMAT1=load^[1.3:E.36/1.40:E.41]^###,##0.0
//! CHART1=load,[1.2:E.2/1.31:E.32],ACTIVE,load,Transactions,2,56,LINE,TRUE,dd hh:mm,Time
//! ```
//!
//! Ranges are 1-based `row.col:row.col`; `E` in a row position means
//! "to the end" (the worksheet limit for FORMAT, the extracted row count for CHART).

mod api;
mod builder;
mod config;
mod error;
mod html;
mod infer;
mod range;
mod source;
mod types;
mod writer;

// 公開API
pub use api::{ChartKind, SourceEncoding};
pub use builder::{Converter, ConverterBuilder};
pub use config::{load_configuration, ChartRule, Diagnostic, FormatRule, RuleSet};
pub use error::{ChartError, DirectiveError, HtmlToXlsxError, RangeError};
pub use html::{extract_tables, ExtractedTables, TableExtractor};
pub use infer::{classify_date, infer_cell, parse_date, parse_numeric, CellStyle, DateShape};
pub use range::{parse_range_spec, RangeSet, RowBound};
pub use source::{decode_document, find_config_reference, read_document};
pub use types::{
    column_letters, column_letters_from_index, CellValue, Rectangle, Table,
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
};
pub use writer::{
    build_charts, plan_cells, plan_chart, render_chart, resolve_format, CellSpan, ChartPlan,
    LegendPlacement, PlannedCell, SeriesPlan, SheetWriter, StyleCache, DATETIME_NUM_FORMAT,
    DATE_NUM_FORMAT, DEFAULT_NUMBER_FORMAT,
};
