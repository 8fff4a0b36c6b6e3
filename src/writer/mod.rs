//! Writer Module
//!
//! 抽出した表・書式ルール・チャートルールからワークシートを生成するモジュール。
//!
//! - `sheet`: セル値の書き込みと書式の解決
//! - `styles`: ワークブック単位の書式キャッシュ
//! - `chart`: 系列構成の組み立てとチャートの挿入

mod chart;
mod sheet;
mod styles;

pub use chart::{
    build_charts, plan_chart, render_chart, CellSpan, ChartPlan, LegendPlacement, SeriesPlan,
};
pub use sheet::{plan_cells, resolve_format, PlannedCell, SheetWriter};
pub use styles::{StyleCache, DATETIME_NUM_FORMAT, DATE_NUM_FORMAT, DEFAULT_NUMBER_FORMAT};
