//! Office Open XML decomposers (Word documents, PowerPoint presentations).
//!
//! One [`OfficeOpenXmlDecomposer`] type covers every package flavour. A flavour is a
//! configuration: which zip entries hold body text ([`PartMatcher`]), which XML
//! namespace their runs live in, and how text from several parts is combined
//! ([`Accumulation`]). Document properties are read from `docProps/core.xml` and
//! `docProps/app.xml` for every flavour.

use crate::Result;
use crate::extraction::archive::walk_zip_files;
use crate::extraction::ooxml::{
    APP_PROPERTIES_PART, AttributesListener, CORE_PROPERTIES_PART, DRAWINGML_NAMESPACE, TextListener,
    WORDPROCESSINGML_NAMESPACE, stream_part,
};
use crate::plugins::{DecomposeContext, Decomposer, Emit, Plugin};
use crate::types::{Data, Record, RecordInfo, TextData};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufReader;

pub const DOCUMENT_KEY: &str = "office-open-xml-document";
pub const PRESENTATION_KEY: &str = "office-open-xml-presentation";

const DOCUMENT_EXTENSIONS: &[&str] = &["docx", "docm", "dotx", "dotm"];
const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-word.document.macroEnabled.12",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
    "application/vnd.ms-word.template.macroEnabled.12",
];

const PRESENTATION_EXTENSIONS: &[&str] = &["pptx", "pptm", "ppsx", "ppsm", "potx", "potm", "sldx", "sldm"];
const PRESENTATION_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
    "application/vnd.ms-powerpoint.slideshow.macroEnabled.12",
    "application/vnd.openxmlformats-officedocument.presentationml.template",
    "application/vnd.ms-powerpoint.template.macroEnabled.12",
    "application/vnd.openxmlformats-officedocument.presentationml.slide",
    "application/vnd.ms-powerpoint.slide.macroEnabled.12",
];

static SLIDE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("Slide part regex pattern is valid and should compile"));

/// Selects the zip entries holding body text.
#[derive(Debug, Clone)]
pub enum PartMatcher {
    /// A single part at a fixed path.
    Exact(&'static str),
    /// Parts whose path carries an ordinal in the regex's first capture group.
    Numbered(&'static Regex),
}

impl PartMatcher {
    /// Ordinal of `path` if it is a body part; `Exact` parts are always ordinal 0.
    pub fn ordinal(&self, path: &str) -> Option<u64> {
        match self {
            PartMatcher::Exact(expected) => (path == *expected).then_some(0),
            PartMatcher::Numbered(pattern) => {
                let captures = pattern.captures(path)?;
                match captures.get(1)?.as_str().parse::<u64>() {
                    Ok(ordinal) => Some(ordinal),
                    Err(_) => {
                        tracing::debug!(part = path, "Ignoring part with out-of-range ordinal");
                        None
                    }
                }
            }
        }
    }
}

/// How text from several body parts is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Fragments joined in encounter order, without separator.
    Concatenate,
    /// Fragments sorted by part ordinal (stable) and joined with `"\n"`.
    NumberedParts,
}

/// Body text collected while walking a package.
#[derive(Debug)]
pub enum TextAccumulator {
    Concatenated(String),
    Indexed(Vec<(u64, String)>),
}

impl TextAccumulator {
    pub fn new(accumulation: Accumulation) -> Self {
        match accumulation {
            Accumulation::Concatenate => TextAccumulator::Concatenated(String::new()),
            Accumulation::NumberedParts => TextAccumulator::Indexed(Vec::new()),
        }
    }

    pub fn push(&mut self, ordinal: u64, fragment: String) {
        match self {
            TextAccumulator::Concatenated(text) => text.push_str(&fragment),
            TextAccumulator::Indexed(parts) => parts.push((ordinal, fragment)),
        }
    }

    pub fn finish(self) -> String {
        match self {
            TextAccumulator::Concatenated(text) => text,
            TextAccumulator::Indexed(mut parts) => {
                parts.sort_by_key(|(ordinal, _)| *ordinal);
                parts.into_iter().map(|(_, fragment)| fragment).collect::<Vec<_>>().join("\n")
            }
        }
    }
}

/// Extracts the text and document properties of an Office Open XML package.
///
/// Emits exactly one text record per package.
pub struct OfficeOpenXmlDecomposer {
    name: &'static str,
    description: &'static str,
    parts: PartMatcher,
    namespace: &'static str,
    accumulation: Accumulation,
    extensions: &'static [&'static str],
    mime_types: &'static [&'static str],
}

impl OfficeOpenXmlDecomposer {
    /// Word processing documents: text of `word/document.xml`.
    pub fn document() -> Self {
        Self {
            name: DOCUMENT_KEY,
            description: "Extracts text and properties from Word documents (docx, docm, dotx, dotm)",
            parts: PartMatcher::Exact("word/document.xml"),
            namespace: WORDPROCESSINGML_NAMESPACE,
            accumulation: Accumulation::Concatenate,
            extensions: DOCUMENT_EXTENSIONS,
            mime_types: DOCUMENT_MIME_TYPES,
        }
    }

    /// Presentations: text of every `ppt/slides/slide<N>.xml`, in slide order.
    pub fn presentation() -> Self {
        Self {
            name: PRESENTATION_KEY,
            description: "Extracts slide text and properties from PowerPoint presentations",
            parts: PartMatcher::Numbered(&SLIDE_PART),
            namespace: DRAWINGML_NAMESPACE,
            accumulation: Accumulation::NumberedParts,
            extensions: PRESENTATION_EXTENSIONS,
            mime_types: PRESENTATION_MIME_TYPES,
        }
    }

    pub fn extensions(&self) -> &[&str] {
        self.extensions
    }

    pub fn mime_types(&self) -> &[&str] {
        self.mime_types
    }
}

impl Plugin for OfficeOpenXmlDecomposer {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        self.description
    }

    fn author(&self) -> &str {
        "Decanter Team"
    }
}

impl Decomposer for OfficeOpenXmlDecomposer {
    fn target(&self, info: &RecordInfo) -> bool {
        info.extension().is_some_and(|ext| self.extensions.contains(&ext))
            || info.mime_type().is_some_and(|mime| self.mime_types.contains(&mime))
    }

    fn decompose(&self, data: Data<'_>, ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
        let source = data.info().clone();
        let package = data.into_seekable()?;

        let mut body = TextAccumulator::new(self.accumulation);
        let mut properties = AttributesListener::new(ctx.config().attribute_chunks);

        walk_zip_files(package, |path, entry| {
            let reader = BufReader::new(ctx.meter(entry));
            if let Some(ordinal) = self.parts.ordinal(path) {
                let mut listener = TextListener::new(self.namespace);
                stream_part(reader, path, &mut listener)?;
                body.push(ordinal, listener.into_text());
            } else if path == CORE_PROPERTIES_PART || path == APP_PROPERTIES_PART {
                stream_part(reader, path, &mut properties)?;
            }
            Ok(())
        })?;

        let mut text = TextData::new(body.finish(), &source);
        for (name, value) in properties.into_attributes() {
            text.set_attribute(name, value);
        }

        tracing::debug!(
            decomposer = self.name,
            source = %source.describe(),
            chars = text.body().len(),
            "Extracted package text"
        );
        emit(Record::Text(text))
    }
}
