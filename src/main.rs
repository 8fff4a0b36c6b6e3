//! awrxlsx command line tool
//!
//! Converts an AWR HTML report into an XLSX workbook with the number formats
//! and charts declared in its INI configuration file.
//!
//! # Usage
//!
//! ```bash
//! # Config file is taken from the `SQL> rem INI_NAME=` line of the report
//! awrxlsx -i awr_report.html
//!
//! # Explicit output and config paths
//! awrxlsx -i awr_report.html -o output.xlsx -n config.ini --debug
//!
//! # Show how the config file was parsed
//! awrxlsx -i awr_report.html --dump-config
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use awrxlsx::{find_config_reference, ConverterBuilder, HtmlToXlsxError, SourceEncoding};

/// Convert Oracle AWR HTML report to Excel with formatting and charts
#[derive(Parser, Debug)]
#[command(name = "awrxlsx")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input AWR HTML file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output Excel file path (default: input filename with .xlsx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// INI configuration file path (default: INI_NAME reference in the HTML)
    #[arg(short = 'n', long)]
    ini: Option<PathBuf>,

    /// Character encoding of the HTML report and INI file
    #[arg(long, value_enum, default_value_t = EncodingArg::Auto)]
    encoding: EncodingArg,

    /// Adjust column widths to their contents
    #[arg(long)]
    autofit: bool,

    /// Print the parsed configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable debug output for troubleshooting
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    Auto,
    Utf8,
    EucKr,
}

impl From<EncodingArg> for SourceEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Auto => SourceEncoding::Auto,
            EncodingArg::Utf8 => SourceEncoding::Utf8,
            EncodingArg::EucKr => SourceEncoding::EucKr,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG takes precedence over --debug
    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), HtmlToXlsxError> {
    let converter = ConverterBuilder::new()
        .with_encoding(args.encoding.into())
        .with_autofit(args.autofit)
        .build()?;

    let document = converter.read_document(&args.input)?;

    let ini_path = match &args.ini {
        Some(path) => path.clone(),
        None => find_config_reference(&document).ok_or_else(|| {
            HtmlToXlsxError::Config(
                "HTML file does not contain INI file reference, specify it with -n".to_string(),
            )
        })?,
    };
    let rules = converter.load_rules(&ini_path)?;

    if args.dump_config {
        println!("{}", rules.to_json()?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    info!("Input HTML file : {}", args.input.display());
    info!("Output Excel file: {}", output.display());
    info!("INI config file  : {}", ini_path.display());

    if !rules.diagnostics().is_empty() {
        warn!(
            "{} configuration entries were skipped (run with --debug for details)",
            rules.diagnostics().len()
        );
    }

    let mut workbook = converter.convert_document(&document, &rules)?;
    workbook.save(&output)?;

    info!("Conversion completed successfully: {}", output.display());
    Ok(())
}

/// 入力ファイルの拡張子を`.xlsx`に置き換える
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}
