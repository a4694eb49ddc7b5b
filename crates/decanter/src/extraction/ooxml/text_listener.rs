use super::XmlListener;
use super::entities::decode_html_entities;

/// Collects the text runs of one XML namespace.
///
/// Character data is kept only inside `<t>` elements of the target namespace. The end
/// of every `<p>` or `<br>` element of that namespace appends a newline, whether or not
/// the paragraph held any text.
#[derive(Debug)]
pub struct TextListener<'n> {
    namespace: &'n [u8],
    in_run: bool,
    text: String,
}

impl<'n> TextListener<'n> {
    pub fn new(namespace: &'n str) -> Self {
        Self {
            namespace: namespace.as_bytes(),
            in_run: false,
            text: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn is_target(&self, namespace: Option<&[u8]>) -> bool {
        namespace == Some(self.namespace)
    }
}

impl XmlListener for TextListener<'_> {
    fn start_element(&mut self, namespace: Option<&[u8]>, local_name: &[u8]) {
        if self.is_target(namespace) && local_name == b"t" {
            self.in_run = true;
        }
    }

    fn end_element(&mut self, namespace: Option<&[u8]>, local_name: &[u8]) {
        if !self.is_target(namespace) {
            return;
        }
        match local_name {
            b"t" => self.in_run = false,
            b"p" | b"br" => self.text.push('\n'),
            _ => {}
        }
    }

    fn characters(&mut self, text: &str) {
        if self.in_run {
            self.text.push_str(&decode_html_entities(text));
        }
    }
}
