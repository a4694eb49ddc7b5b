//! Streaming XML processing for Office Open XML parts.
//!
//! Parts are read with `quick-xml`'s namespace-aware [`NsReader`] and replayed into an
//! [`XmlListener`]. Two listeners exist:
//!
//! - [`TextListener`] collects run text (`<t>` elements) of one namespace, with line
//!   breaks after paragraphs and explicit breaks.
//! - [`AttributesListener`] collects document properties from `docProps/core.xml`
//!   and `docProps/app.xml`.
//!
//! # Example
//!
//! ```rust
//! use decanter::extraction::ooxml::{TextListener, stream_part, DRAWINGML_NAMESPACE};
//!
//! # fn example() -> decanter::Result<()> {
//! let xml = br#"<p:sld xmlns:p="urn:p" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
//!   <a:p><a:r><a:t>Hello</a:t></a:r></a:p>
//! </p:sld>"#;
//!
//! let mut listener = TextListener::new(DRAWINGML_NAMESPACE);
//! stream_part(&xml[..], "ppt/slides/slide1.xml", &mut listener)?;
//! assert_eq!(listener.into_text(), "Hello\n");
//! # Ok(())
//! # }
//! ```

mod attributes_listener;
mod entities;
mod text_listener;
mod timestamps;

pub use attributes_listener::{AttributeKind, AttributesListener};
pub use entities::decode_html_entities;
pub use text_listener::TextListener;
pub use timestamps::parse_w3cdtf;

use crate::error::BudgetExhausted;
use crate::{DecanterError, Result};
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use std::io::BufRead;
use std::sync::Arc;

pub const WORDPROCESSINGML_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const DRAWINGML_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const CORE_PROPERTIES_NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const EXTENDED_PROPERTIES_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
pub const DUBLIN_CORE_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const DUBLIN_CORE_TERMS_NAMESPACE: &str = "http://purl.org/dc/terms/";

pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";
pub const APP_PROPERTIES_PART: &str = "docProps/app.xml";

/// Consumer of namespace-resolved XML events.
///
/// Namespaces are passed as the raw URI bytes, `None` for unqualified names. Empty
/// elements are delivered as a start immediately followed by an end.
pub trait XmlListener {
    fn start_element(&mut self, namespace: Option<&[u8]>, local_name: &[u8]);

    fn end_element(&mut self, namespace: Option<&[u8]>, local_name: &[u8]);

    /// Character data after XML reference resolution. CDATA sections arrive here too.
    fn characters(&mut self, text: &str);
}

/// Stream the XML read from `reader` into `listener`.
///
/// `part` names the zip entry and is only used in error messages.
///
/// # Errors
///
/// Returns `MalformedMarkup` when the part is not well-formed XML, including a part
/// that ends with elements still open or that has no root element. Read failures are
/// classified by [`DecanterError::from_entry_read`]: corrupt compressed data becomes
/// `MalformedContainer` and an exhausted byte budget `LimitExceeded`.
pub fn stream_part<R: BufRead, L: XmlListener>(reader: R, part: &str, listener: &mut L) -> Result<()> {
    let mut reader = NsReader::from_reader(reader);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let (resolved, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(pair) => pair,
            Err(e) => return Err(read_error(part, reader.buffer_position(), e)),
        };
        let namespace = match resolved {
            ResolveResult::Bound(Namespace(ns)) => Some(ns),
            _ => None,
        };

        match event {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                listener.start_element(namespace, e.local_name().as_ref());
            }
            Event::Empty(e) => {
                seen_root = true;
                let local_name = e.local_name();
                listener.start_element(namespace, local_name.as_ref());
                listener.end_element(namespace, local_name.as_ref());
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                listener.end_element(namespace, e.local_name().as_ref());
            }
            Event::Text(e) if depth == 0 => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(DecanterError::malformed_markup(format!(
                        "Character data outside the root element in {}",
                        part
                    )));
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| DecanterError::malformed_markup_with_source(format!("Invalid character data in {}", part), err))?;
                listener.characters(&text);
            }
            Event::CData(_) if depth == 0 => {
                return Err(DecanterError::malformed_markup(format!(
                    "CDATA section outside the root element in {}",
                    part
                )));
            }
            Event::CData(e) => listener.characters(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(DecanterError::malformed_markup(format!(
            "Unexpected end of {}: {} element(s) left open",
            part, depth
        )));
    }
    if !seen_root {
        return Err(DecanterError::malformed_markup(format!("{} has no root element", part)));
    }

    Ok(())
}

/// Classify a `quick-xml` error raised at byte `position` of `part`.
fn read_error(part: &str, position: usize, err: quick_xml::Error) -> DecanterError {
    match err {
        quick_xml::Error::Io(shared) => {
            let io = Arc::try_unwrap(shared).unwrap_or_else(|shared| {
                match shared.get_ref().filter(|inner| inner.is::<BudgetExhausted>()) {
                    Some(inner) => std::io::Error::other(BudgetExhausted(inner.to_string())),
                    None => std::io::Error::new(shared.kind(), shared.to_string()),
                }
            });
            DecanterError::from_entry_read(&format!("Failed to read {}", part), io)
        }
        other => DecanterError::malformed_markup_with_source(
            format!("XML parsing error in {} at position {}: {}", part, position, other),
            other,
        ),
    }
}
