//! Source Module
//!
//! 入力文書（AWR HTMLレポート、設定ファイル）の読み込みとデコードを提供します。
//! SQL*Plusが出力するレポートはUTF-8またはEUC-KRで保存されていることが多いため、
//! 自動判定ではBOM → UTF-8（厳密） → EUC-KR の順に試します。

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, EUC_KR, UTF_8};
use log::debug;

use crate::api::SourceEncoding;
use crate::error::HtmlToXlsxError;

/// 設定ファイル参照行の接頭辞（SQL*Plusのプロンプトはエスケープされて出力される）
const CONFIG_REFERENCE_PREFIXES: [&str; 2] = ["SQL&gt; rem INI_NAME=", "SQL> rem INI_NAME="];

/// バイト列を文字列にデコードする
///
/// # 引数
///
/// * `bytes` - 文書のバイト列
/// * `encoding` - デコード方式
///
/// # 戻り値
///
/// * `Ok(String)` - デコード済みテキスト
/// * `Err(HtmlToXlsxError::Encoding)` - `SourceEncoding::Utf8`で不正なバイト列があった場合
pub fn decode_document(bytes: &[u8], encoding: SourceEncoding) -> Result<String, HtmlToXlsxError> {
    match encoding {
        SourceEncoding::Auto => {
            if let Some((bom_encoding, bom_len)) = Encoding::for_bom(bytes) {
                debug!("Detected {} byte order mark", bom_encoding.name());
                let (text, _) = bom_encoding.decode_without_bom_handling(&bytes[bom_len..]);
                return Ok(text.into_owned());
            }

            if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
                return Ok(text.into_owned());
            }

            debug!("Input is not valid UTF-8, falling back to EUC-KR");
            Ok(decode_lossy(EUC_KR, bytes).into_owned())
        }

        SourceEncoding::Utf8 => {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            UTF_8
                .decode_without_bom_handling_and_without_replacement(body)
                .map(Cow::into_owned)
                .ok_or_else(|| HtmlToXlsxError::Encoding("input is not valid UTF-8".to_string()))
        }

        SourceEncoding::EucKr => Ok(decode_lossy(EUC_KR, bytes).into_owned()),
    }
}

fn decode_lossy<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        debug!("Replaced malformed {} sequences", encoding.name());
    }
    text
}

/// ファイルを読み込んでデコードする
pub fn read_document(path: &Path, encoding: SourceEncoding) -> Result<String, HtmlToXlsxError> {
    let bytes = std::fs::read(path)?;
    decode_document(&bytes, encoding)
}

/// 文書内の`SQL> rem INI_NAME=<file>`行から設定ファイルのパスを取得する
///
/// パスはカレントディレクトリからの相対パスとして解釈されます。
/// 該当行がない場合は`None`を返します。
///
/// # 使用例
///
/// ```rust
/// use awrxlsx::find_config_reference;
///
/// let html = "<html>\nSQL&gt; rem INI_NAME=awr_load.ini\n";
/// assert_eq!(
///     find_config_reference(html),
///     Some(std::path::PathBuf::from("./awr_load.ini"))
/// );
/// ```
pub fn find_config_reference(document: &str) -> Option<PathBuf> {
    document.lines().find_map(|line| {
        let name = CONFIG_REFERENCE_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(*prefix))?
            .trim();

        if name.is_empty() {
            return None;
        }

        debug!("Found config file reference: {}", name);
        Some(Path::new(".").join(name))
    })
}
