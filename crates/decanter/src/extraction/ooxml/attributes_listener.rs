use super::entities::decode_html_entities;
use super::timestamps::parse_w3cdtf;
use super::{
    CORE_PROPERTIES_NAMESPACE, DUBLIN_CORE_NAMESPACE, DUBLIN_CORE_TERMS_NAMESPACE, EXTENDED_PROPERTIES_NAMESPACE,
    XmlListener,
};
use crate::core::config::AttributeChunkPolicy;
use crate::types::{AttributeValue, Attributes};

/// How the text of a property element is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Text,
    /// W3CDTF timestamp; unparseable values fall back to text.
    Time,
}

/// (namespace, element, attribute name, kind)
const PROPERTY_TABLE: &[(&str, &str, &str, AttributeKind)] = &[
    (CORE_PROPERTIES_NAMESPACE, "keywords", "keywords", AttributeKind::Text),
    (EXTENDED_PROPERTIES_NAMESPACE, "Application", "application", AttributeKind::Text),
    (DUBLIN_CORE_NAMESPACE, "description", "description", AttributeKind::Text),
    (DUBLIN_CORE_NAMESPACE, "title", "title", AttributeKind::Text),
    (DUBLIN_CORE_NAMESPACE, "subject", "subject", AttributeKind::Text),
    (DUBLIN_CORE_TERMS_NAMESPACE, "created", "created_time", AttributeKind::Time),
    (DUBLIN_CORE_TERMS_NAMESPACE, "modified", "modified_time", AttributeKind::Time),
];

fn lookup(namespace: Option<&[u8]>, local_name: &[u8]) -> Option<(&'static str, AttributeKind)> {
    let namespace = namespace?;
    PROPERTY_TABLE
        .iter()
        .find(|(ns, element, _, _)| ns.as_bytes() == namespace && element.as_bytes() == local_name)
        .map(|(_, _, name, kind)| (*name, *kind))
}

/// Collects document properties from `docProps/core.xml` and `docProps/app.xml`.
///
/// One listener may be fed several parts; later values replace earlier ones.
#[derive(Debug)]
pub struct AttributesListener {
    policy: AttributeChunkPolicy,
    pending: Option<(&'static str, AttributeKind)>,
    buffer: Option<String>,
    attributes: Attributes,
}

impl AttributesListener {
    pub fn new(policy: AttributeChunkPolicy) -> Self {
        Self {
            policy,
            pending: None,
            buffer: None,
            attributes: Attributes::new(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    fn store(&mut self, name: &'static str, kind: AttributeKind, raw: &str) {
        let value = match kind {
            AttributeKind::Text => AttributeValue::Text(raw.to_string()),
            AttributeKind::Time => match parse_w3cdtf(raw) {
                Some(time) => AttributeValue::Time(time),
                None => {
                    tracing::warn!(attribute = name, value = raw, "Unparseable W3CDTF timestamp kept as text");
                    AttributeValue::Text(raw.to_string())
                }
            },
        };
        self.attributes.insert(name.to_string(), value);
    }
}

impl XmlListener for AttributesListener {
    fn start_element(&mut self, namespace: Option<&[u8]>, local_name: &[u8]) {
        self.pending = lookup(namespace, local_name);
        self.buffer = None;
    }

    fn end_element(&mut self, _namespace: Option<&[u8]>, _local_name: &[u8]) {
        let pending = self.pending.take();
        let buffer = self.buffer.take();
        if let (AttributeChunkPolicy::Concatenate, Some((name, kind)), Some(value)) = (self.policy, pending, buffer) {
            self.store(name, kind, &value);
        }
    }

    fn characters(&mut self, text: &str) {
        let Some((name, kind)) = self.pending else {
            return;
        };
        let decoded = decode_html_entities(text);
        match self.policy {
            AttributeChunkPolicy::Concatenate => self.buffer.get_or_insert_with(String::new).push_str(&decoded),
            AttributeChunkPolicy::Overwrite => self.store(name, kind, &decoded),
        }
    }
}
