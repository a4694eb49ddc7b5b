//! In-memory fixtures shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use tar::{Builder as TarBuilder, Header};
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

pub const CORE_PROPERTIES_NS: &str = r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/""#;

/// Build a zip archive holding `entries` in the given order.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// Overwrite the first compressed byte of the archive's first entry.
///
/// `0xFF` announces a final deflate block of the reserved type, so inflating the entry
/// fails on its first read while the zip structure stays intact.
pub fn corrupt_first_entry(mut zip: Vec<u8>) -> Vec<u8> {
    let name_len = u16::from_le_bytes([zip[26], zip[27]]) as usize;
    let extra_len = u16::from_le_bytes([zip[28], zip[29]]) as usize;
    zip[30 + name_len + extra_len] = 0xFF;
    zip
}

/// Build a tar archive holding `entries` in the given order.
pub fn build_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut tar = TarBuilder::new(&mut cursor);
        for (path, content) in entries {
            let mut header = Header::new_gnu();
            header.set_path(path).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append(&header, *content).unwrap();
        }
        tar.finish().unwrap();
    }
    cursor.into_inner()
}

/// Slide part whose only text run is `text`.
pub fn slide_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:r><a:t>{}</a:t></a:r></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        text
    )
}

/// Word body with one paragraph per element of `paragraphs`.
pub fn document_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    )
}

/// Core properties part carrying a title and a creation time.
pub fn core_xml(title: &str, created: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties {}><dc:title>{}</dc:title><dcterms:created>{}</dcterms:created></cp:coreProperties>"#,
        CORE_PROPERTIES_NS, title, created
    )
}

/// Presentation package with one slide per `(number, text)`, written in the given order.
pub fn build_pptx(slides: &[(u32, &str)]) -> Vec<u8> {
    let parts: Vec<(String, String)> = slides
        .iter()
        .map(|(number, text)| (format!("ppt/slides/slide{}.xml", number), slide_xml(text)))
        .collect();
    let mut entries: Vec<(&str, &[u8])> = vec![("[Content_Types].xml", b"<Types/>".as_slice())];
    entries.extend(parts.iter().map(|(name, xml)| (name.as_str(), xml.as_bytes())));
    build_zip(&entries)
}

/// Word package with the given paragraphs and core properties.
pub fn build_docx(paragraphs: &[&str], title: &str, created: &str) -> Vec<u8> {
    let document = document_xml(paragraphs);
    let core = core_xml(title, created);
    build_zip(&[
        ("[Content_Types].xml", b"<Types/>".as_slice()),
        ("word/document.xml", document.as_bytes()),
        ("docProps/core.xml", core.as_bytes()),
    ])
}
