//! Lenient HTML entity decoding applied to XML character data.
//!
//! Office documents written by some producers double-escape markup characters, so
//! character data is decoded once more after the XML reader resolved its own
//! references. Unknown or malformed references are kept verbatim.

use std::borrow::Cow;

/// Decode `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and numeric references in `text`.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        match candidate[1..].find(['&', ';']) {
            Some(end) if candidate.as_bytes()[end + 1] == b';' => {
                let reference = &candidate[..end + 2];
                match quick_xml::escape::unescape(reference) {
                    Ok(value) => decoded.push_str(&value),
                    Err(_) => decoded.push_str(reference),
                }
                rest = &candidate[end + 2..];
            }
            _ => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }
    decoded.push_str(rest);

    Cow::Owned(decoded)
}
