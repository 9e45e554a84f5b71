use encoding_rs::{Encoding, UTF_8};
use news_logging::news_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed byte sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a response body to text using: BOM -> Content-Type charset -> UTF-8.
///
/// Never fails; malformed sequences are replaced and logged so the parser can
/// still make sense of the rest of the document.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let declared = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    // `decode` sniffs a BOM first and lets it override the declared charset.
    let (text, used, had_errors) = declared.decode(bytes);
    if had_errors {
        news_warn!(
            "Response body contained malformed {} sequences; replaced",
            used.name()
        );
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
        had_errors,
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches(['"', '\'']).to_string())
            } else {
                None
            }
        })
        .next()
}
