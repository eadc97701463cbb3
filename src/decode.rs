use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;

static HEADER_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).unwrap());
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).unwrap()
});

/// Browsers only look this far into a page for a `<meta charset>`.
const META_PREFIX_LEN: usize = 1024;

/// Decode a page body: BOM, then the `Content-Type` charset, then a `<meta>`
/// declaration, then UTF-8 with a windows-1252 fallback for invalid bytes.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0.into_owned();
    }

    let declared = content_type
        .and_then(|ct| charset_label(&HEADER_CHARSET_RE, ct))
        .or_else(|| {
            let head = &bytes[..bytes.len().min(META_PREFIX_LEN)];
            charset_label(&META_CHARSET_RE, &String::from_utf8_lossy(head))
        });
    if let Some(encoding) = declared {
        return encoding.decode_without_bom_handling(bytes).0.into_owned();
    }

    let (text, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if had_errors {
        WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
    } else {
        text.into_owned()
    }
}

fn charset_label(re: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = re.captures(haystack)?.get(1)?.as_str();
    Encoding::for_label(label.as_bytes())
}
