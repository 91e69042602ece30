//! XML text emission
//!
//! Writes start/end tags, text-only elements and verbatim markup into a
//! string buffer, applying the indentation policy from [`WriterOptions`].
//! Inline elements suspend that policy so mixed text and markup are written
//! back without added whitespace.

use quick_xml::escape::{escape, partial_escape};

use crate::attributes::Attributes;
use crate::options::WriterOptions;

/// Incremental XML text writer
#[derive(Debug)]
pub struct XmlWriter {
    out: String,
    options: WriterOptions,
    depth: usize,
    inline: usize,
}

impl XmlWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            out: String::with_capacity(4096),
            options,
            depth: 0,
            inline: 0,
        }
    }

    /// Current nesting depth (number of open tags)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Write `<name attr="value" ...>` and open a nesting level
    pub fn start_tag(&mut self, name: &str, attributes: &Attributes) {
        self.write_indent();
        self.out.push('<');
        self.out.push_str(name);
        self.write_attributes(attributes);
        self.out.push('>');
        self.write_newline();
        self.depth += 1;
    }

    /// Close the innermost nesting level with `</name>`
    pub fn end_tag(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.write_indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self.write_newline();
    }

    /// Open an element whose content is written on the same line.
    ///
    /// Until the matching [`XmlWriter::end_inline`], nothing inside gets
    /// indentation or newlines.
    pub fn start_inline(&mut self, name: &str, attributes: &Attributes) {
        self.write_indent();
        self.out.push('<');
        self.out.push_str(name);
        self.write_attributes(attributes);
        self.out.push('>');
        self.depth += 1;
        self.inline += 1;
    }

    /// Close an element opened with [`XmlWriter::start_inline`]
    pub fn end_inline(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.inline = self.inline.saturating_sub(1);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self.write_newline();
    }

    /// Write escaped character data
    pub fn text(&mut self, text: &str) {
        self.write_indent();
        self.out.push_str(&escape_text(text));
        self.write_newline();
    }

    /// Write `<name attr="value" ...>text</name>`, or `<name/>` when the
    /// text is empty
    pub fn text_element(&mut self, name: &str, attributes: &Attributes, text: &str) {
        self.write_indent();
        self.out.push('<');
        self.out.push_str(name);
        self.write_attributes(attributes);
        if text.is_empty() {
            self.out.push_str("/>");
        } else {
            self.out.push('>');
            self.out.push_str(&escape_text(text));
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
        self.write_newline();
    }

    /// Write already-formed markup verbatim on its own line
    pub fn raw(&mut self, markup: &str) {
        self.write_indent();
        self.out.push_str(markup);
        self.write_newline();
    }

    /// Consume the writer and return the text written so far
    pub fn finish(self) -> String {
        self.out
    }

    fn write_indent(&mut self) {
        if self.inline > 0 {
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(&self.options.indent);
        }
    }

    fn write_newline(&mut self) {
        if self.inline == 0 {
            self.out.push_str(&self.options.newline);
        }
    }

    fn write_attributes(&mut self, attributes: &Attributes) {
        for (name, value) in attributes.iter() {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(value));
            self.out.push('"');
        }
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new(WriterOptions::default())
    }
}

/// Escape character data. Quotes are left alone.
pub fn escape_text(s: &str) -> String {
    partial_escape(s).into_owned()
}

/// Escape an attribute value for use inside double quotes
pub fn escape_attribute(s: &str) -> String {
    escape(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_nesting() {
        let mut writer = XmlWriter::default();
        writer.start_tag("Folder", &Attributes::from_pairs([("id", "f1")]));
        writer.text_element("name", &Attributes::new(), "Sites");
        writer.end_tag("Folder");
        assert_eq!(
            writer.finish(),
            "<Folder id=\"f1\">\n  <name>Sites</name>\n</Folder>\n"
        );
    }

    #[test]
    fn test_raw_options() {
        let mut writer = XmlWriter::new(WriterOptions::raw());
        writer.start_tag("Point", &Attributes::new());
        writer.text_element("extrude", &Attributes::new(), "1");
        writer.end_tag("Point");
        assert_eq!(writer.finish(), "<Point><extrude>1</extrude></Point>");
    }

    #[test]
    fn test_empty_text_element() {
        let mut writer = XmlWriter::new(WriterOptions::raw());
        writer.text_element("name", &Attributes::new(), "");
        writer.text_element("open", &Attributes::from_pairs([("x", "1")]), "");
        assert_eq!(writer.finish(), "<name/><open x=\"1\"/>");
    }

    #[test]
    fn test_escaping() {
        let mut writer = XmlWriter::new(WriterOptions::raw());
        writer.start_tag("a", &Attributes::from_pairs([("title", "say \"hi\" & <go>")]));
        writer.text_element("b", &Attributes::new(), "1 < 2 & 3 > 2");
        writer.end_tag("a");
        assert_eq!(
            writer.finish(),
            "<a title=\"say &quot;hi&quot; &amp; &lt;go&gt;\"><b>1 &lt; 2 &amp; 3 &gt; 2</b></a>"
        );
    }

    #[test]
    fn test_escaping_quotes() {
        assert_eq!(escape_text("it's \"x\""), "it's \"x\"");
        assert_eq!(escape_attribute("it's"), "it&apos;s");
    }

    #[test]
    fn test_inline_element_inside_pretty_output() {
        let mut writer = XmlWriter::default();
        writer.start_tag("Placemark", &Attributes::new());
        writer.start_inline("name", &Attributes::from_pairs([("lang", "en")]));
        writer.text("a & b");
        writer.raw("<x:b/>");
        writer.start_tag("extrude", &Attributes::new());
        writer.end_tag("extrude");
        writer.end_inline("name");
        writer.text_element("open", &Attributes::new(), "1");
        writer.end_tag("Placemark");
        assert_eq!(
            writer.finish(),
            "<Placemark>\n  <name lang=\"en\">a &amp; b<x:b/><extrude></extrude></name>\n  <open>1</open>\n</Placemark>\n"
        );
    }

    #[test]
    fn test_raw_markup_is_verbatim() {
        let mut writer = XmlWriter::default();
        writer.start_tag("Placemark", &Attributes::new());
        writer.raw("<x:foo a=\"1\">&amp;</x:foo>");
        writer.end_tag("Placemark");
        assert_eq!(
            writer.finish(),
            "<Placemark>\n  <x:foo a=\"1\">&amp;</x:foo>\n</Placemark>\n"
        );
    }

    #[test]
    fn test_end_tag_does_not_underflow() {
        let mut writer = XmlWriter::new(WriterOptions::raw());
        writer.end_tag("x");
        assert_eq!(writer.depth(), 0);
    }
}
