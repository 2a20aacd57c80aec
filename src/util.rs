/// UTF-8 Byte Order Mark. Some editors on Windows prepend it to "plain" text files.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Strip spaces, carriage returns and line feeds from both ends. Tabs are left alone.
pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\r' | '\n'))
}

/// Split the text after `=` into a trimmed value and an inline comment starting at the first `#`.
///
/// Without a `#` the comment is empty and the whole remainder is the value.
pub(crate) fn split_inline_comment(rest: &str) -> (&str, &str) {
    match rest.find('#') {
        Some(i) => (trim(&rest[..i]), trim(&rest[i..])),
        None => (trim(rest), ""),
    }
}

// Files are expected to be UTF-8; anything else is replaced rather than rejected.
pub(crate) fn decode_data(data: &[u8]) -> String {
    let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}
