//! Record model shared by the feeder and all decomposers.
//!
//! Three kinds of records flow through a decomposition run:
//!
//! - [`Data`] created by the caller for each top-level input,
//! - [`Data`] created by a container decomposer for each entry (a *virtual entry*),
//! - [`TextData`], the terminal output holding extracted text and attributes.
//!
//! Every record carries an [`Arc<RecordInfo>`] whose `parent` link forms the
//! provenance chain back to the top-level input.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{DecanterError, Result};

/// MIME type assigned to every extracted text record.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Immutable identity of a record: where it came from and how it is labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    path: Option<String>,
    mime_type: Option<String>,
    extension: Option<String>,
    is_virtual: bool,
    parent: Option<Arc<RecordInfo>>,
}

impl RecordInfo {
    /// Create info for a top-level record.
    pub fn new(path: Option<String>, mime_type: Option<String>) -> Self {
        let extension = path.as_deref().and_then(extension_of);
        Self {
            path,
            mime_type,
            extension,
            is_virtual: false,
            parent: None,
        }
    }

    /// Create info for an entry living inside `parent`.
    pub fn virtual_entry(name: impl Into<String>, parent: Arc<RecordInfo>) -> Self {
        let name = name.into();
        Self {
            extension: extension_of(&name),
            path: Some(name),
            mime_type: None,
            is_virtual: true,
            parent: Some(parent),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Lower-cased extension of the path, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Whether this record is an entry of a container rather than a caller input.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// The immediate source of this record, `None` for top-level inputs.
    pub fn parent(&self) -> Option<&Arc<RecordInfo>> {
        self.parent.as_ref()
    }

    /// Walk the parent links up to the top-level record.
    ///
    /// The returned chain is ordered outermost first; the last element is `self`'s
    /// immediate parent. Empty for top-level records.
    pub fn ancestors(&self) -> Vec<Arc<RecordInfo>> {
        let mut chain = Vec::new();
        let mut current = self.parent.clone();
        while let Some(info) = current {
            current = info.parent.clone();
            chain.push(info);
        }
        chain.reverse();
        chain
    }

    /// Number of containers between this record and the top-level input.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_ref();
        while let Some(info) = current {
            depth += 1;
            current = info.parent.as_ref();
        }
        depth
    }

    /// Human readable label for log lines and error messages.
    pub fn describe(&self) -> String {
        match (&self.path, &self.mime_type) {
            (Some(path), Some(mime)) => format!("{} ({})", path, mime),
            (Some(path), None) => path.clone(),
            (None, Some(mime)) => format!("<data> ({})", mime),
            (None, None) => "<data>".to_string(),
        }
    }
}

fn extension_of(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Byte content of a [`Data`] record.
pub enum Content<'a> {
    /// Bytes already held in memory.
    Memory(Vec<u8>),
    /// A file opened lazily when the content is first read.
    File(PathBuf),
    /// An arbitrary reader, typically bound to a container entry.
    Stream(Box<dyn Read + 'a>),
}

impl std::fmt::Debug for Content<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Memory(bytes) => f.debug_tuple("Memory").field(&bytes.len()).finish(),
            Content::File(path) => f.debug_tuple("File").field(path).finish(),
            Content::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Random-access view over record content, as needed by zip readers.
#[derive(Debug)]
pub enum SeekableContent {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

impl Read for SeekableContent {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            SeekableContent::Memory(cursor) => cursor.read(buf),
            SeekableContent::File(file) => file.read(buf),
        }
    }
}

impl Seek for SeekableContent {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            SeekableContent::Memory(cursor) => cursor.seek(pos),
            SeekableContent::File(file) => file.seek(pos),
        }
    }
}

/// A record whose bytes still have to be decomposed.
///
/// Top-level inputs are built with [`Data::from_path`] or [`Data::from_bytes`];
/// container decomposers build entries with [`Data::virtual_entry`]. A virtual entry
/// borrows its container's cursor and is only readable while the `emit` call that
/// delivered it is running.
#[derive(Debug)]
pub struct Data<'a> {
    info: Arc<RecordInfo>,
    content: Content<'a>,
}

impl<'a> Data<'a> {
    /// A top-level record backed by a file on disk. The file is opened on first read.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            info: Arc::new(RecordInfo::new(Some(path.to_string_lossy().into_owned()), None)),
            content: Content::File(path.to_path_buf()),
        }
    }

    /// A top-level record backed by in-memory bytes, without a path.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            info: Arc::new(RecordInfo::new(None, None)),
            content: Content::Memory(bytes.into()),
        }
    }

    /// A top-level record backed by a reader.
    pub fn from_reader(reader: impl Read + 'a) -> Self {
        Self {
            info: Arc::new(RecordInfo::new(None, None)),
            content: Content::Stream(Box::new(reader)),
        }
    }

    /// A record for one entry of the container described by `source`.
    pub fn virtual_entry(name: impl Into<String>, reader: impl Read + 'a, source: &Arc<RecordInfo>) -> Self {
        Self {
            info: Arc::new(RecordInfo::virtual_entry(name, Arc::clone(source))),
            content: Content::Stream(Box::new(reader)),
        }
    }

    /// Build a record from prepared parts.
    pub fn with_info(info: Arc<RecordInfo>, content: Content<'a>) -> Self {
        Self { info, content }
    }

    /// Set the path used for extension-based matching.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let current = &self.info;
        let mut info = RecordInfo::new(Some(path.into()), current.mime_type.clone());
        info.is_virtual = current.is_virtual;
        info.parent = current.parent.clone();
        self.info = Arc::new(info);
        self
    }

    /// Declare the MIME type of this record.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        let mut info = (*self.info).clone();
        info.mime_type = Some(mime_type.into());
        self.info = Arc::new(info);
        self
    }

    pub fn info(&self) -> &Arc<RecordInfo> {
        &self.info
    }

    pub fn path(&self) -> Option<&str> {
        self.info.path()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.info.mime_type()
    }

    pub fn extension(&self) -> Option<&str> {
        self.info.extension()
    }

    pub fn content(&self) -> &Content<'a> {
        &self.content
    }

    /// Split the record into its info and content.
    pub fn into_parts(self) -> (Arc<RecordInfo>, Content<'a>) {
        (self.info, self.content)
    }

    /// Consume the record as a sequential reader.
    pub fn into_reader(self) -> Result<Box<dyn Read + 'a>> {
        Ok(match self.content {
            Content::Memory(bytes) => Box::new(Cursor::new(bytes)),
            Content::File(path) => Box::new(File::open(path)?),
            Content::Stream(reader) => reader,
        })
    }

    /// Consume the record as a random-access reader.
    ///
    /// Streams are buffered into memory first.
    pub fn into_seekable(self) -> Result<SeekableContent> {
        Ok(match self.content {
            Content::Memory(bytes) => SeekableContent::Memory(Cursor::new(bytes)),
            Content::File(path) => SeekableContent::File(File::open(path)?),
            Content::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .map_err(|e| DecanterError::from_entry_read("Failed to read stream", e))?;
                SeekableContent::Memory(Cursor::new(bytes))
            }
        })
    }

    /// Consume the record and read all of its bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self.content {
            Content::Memory(bytes) => Ok(bytes),
            Content::File(path) => Ok(std::fs::read(path)?),
            Content::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .map_err(|e| DecanterError::from_entry_read("Failed to read stream", e))?;
                Ok(bytes)
            }
        }
    }
}

/// Value of a text record attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Time(DateTime<FixedOffset>),
    Text(String),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::Time(_) => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AttributeValue::Time(time) => Some(time),
            AttributeValue::Text(_) => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        AttributeValue::Time(value)
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::Time(time) => write!(f, "{}", time.to_rfc3339()),
        }
    }
}

/// Attribute map of a text record.
pub type Attributes = HashMap<String, AttributeValue>;

/// Terminal record: extracted plain text plus metadata attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    info: Arc<RecordInfo>,
    body: String,
    attributes: Attributes,
}

impl TextData {
    /// Create a text record derived from `source`.
    ///
    /// The record's path is the source path with its extension replaced by `txt`.
    pub fn new(body: impl Into<String>, source: &Arc<RecordInfo>) -> Self {
        let path = source.path().map(text_path_for);
        let mut info = RecordInfo::new(path, Some(TEXT_MIME_TYPE.to_string()));
        info.parent = Some(Arc::clone(source));
        Self {
            info: Arc::new(info),
            body: body.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn info(&self) -> &Arc<RecordInfo> {
        &self.info
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// The records this text was derived from, outermost first.
    ///
    /// The first element is always the top-level input handed to the feeder and the
    /// last one is the record the text was extracted from.
    pub fn source_chain(&self) -> Vec<Arc<RecordInfo>> {
        self.info.ancestors()
    }

    /// The record this text was directly extracted from.
    pub fn source(&self) -> Option<&Arc<RecordInfo>> {
        self.info.parent()
    }
}

fn text_path_for(path: &str) -> String {
    let split_at = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let (dir, file_name) = path.split_at(split_at);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{}{}.txt", dir, stem),
        _ => format!("{}.txt", path),
    }
}

/// Anything a decomposer emits.
#[derive(Debug)]
pub enum Record<'a> {
    /// Content that may need further decomposition.
    Data(Data<'a>),
    /// Extracted text.
    Text(TextData),
}

impl<'a> Record<'a> {
    pub fn info(&self) -> &Arc<RecordInfo> {
        match self {
            Record::Data(data) => data.info(),
            Record::Text(text) => text.info(),
        }
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match self {
            Record::Text(text) => Some(text),
            Record::Data(_) => None,
        }
    }

    pub fn into_text(self) -> Option<TextData> {
        match self {
            Record::Text(text) => Some(text),
            Record::Data(_) => None,
        }
    }

    /// View the record as decomposable data; text bodies become in-memory content.
    pub fn into_data(self) -> Data<'a> {
        match self {
            Record::Data(data) => data,
            Record::Text(text) => Data::with_info(text.info, Content::Memory(text.body.into_bytes())),
        }
    }
}

impl From<TextData> for Record<'_> {
    fn from(text: TextData) -> Self {
        Record::Text(text)
    }
}

impl<'a> From<Data<'a>> for Record<'a> {
    fn from(data: Data<'a>) -> Self {
        Record::Data(data)
    }
}

/// JSON-friendly snapshot of a text record, used by the CLI's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "mime-type")]
    pub mime_type: String,
    pub body: String,
    pub attributes: Attributes,
    /// Paths of the source chain, outermost first.
    pub sources: Vec<String>,
}

impl From<&TextData> for TextSummary {
    fn from(text: &TextData) -> Self {
        Self {
            path: text.info.path().map(str::to_string),
            mime_type: text.info.mime_type().unwrap_or(TEXT_MIME_TYPE).to_string(),
            body: text.body.clone(),
            attributes: text.attributes.clone(),
            sources: text.source_chain().iter().map(|info| info.describe()).collect(),
        }
    }
}
