//! Element serialization
//!
//! Elements describe themselves to a [`Serializer`] by type tag; the
//! [`XmlSerializer`] turns those calls into KML text.

use kmlbase::{escape_text, Attributes, WriterOptions, XmlWriter};
use tracing::warn;

use crate::element::Element;
use crate::kml22::KmlDomType;
use crate::xsd::Xsd;

/// Receiver of an element tree's markup.
pub trait Serializer {
    /// Open a complex element
    fn begin_by_id(&mut self, dom_type: KmlDomType, attributes: &Attributes);

    /// Close the complex element opened by the matching `begin_by_id`
    fn end_by_id(&mut self, dom_type: KmlDomType);

    /// Write a simple element with text content
    fn save_simple_element(&mut self, dom_type: KmlDomType, attributes: &Attributes, value: &str);

    /// Write raw markup verbatim
    fn save_unknown(&mut self, markup: &str);

    /// Write a child element
    fn save_element(&mut self, element: &dyn Element);

    /// Open a simple element whose text is followed by captured markup
    fn begin_mixed_by_id(&mut self, dom_type: KmlDomType, attributes: &Attributes) {
        self.begin_by_id(dom_type, attributes);
    }

    /// Close the element opened by the matching `begin_mixed_by_id`
    fn end_mixed_by_id(&mut self, dom_type: KmlDomType) {
        self.end_by_id(dom_type);
    }

    /// Write character data
    fn save_char_data(&mut self, text: &str) {
        self.save_unknown(&escape_text(text));
    }

    fn save_string_field_by_id(&mut self, dom_type: KmlDomType, value: &str) {
        self.save_simple_element(dom_type, &Attributes::new(), value);
    }

    fn save_bool_field_by_id(&mut self, dom_type: KmlDomType, value: bool) {
        self.save_string_field_by_id(dom_type, if value { "1" } else { "0" });
    }

    fn save_double_field_by_id(&mut self, dom_type: KmlDomType, value: f64) {
        self.save_string_field_by_id(dom_type, &value.to_string());
    }

    /// Write an enumerated field by its enumerant string.
    ///
    /// Ids with no enumerant in the registry are not written.
    fn save_enum_field_by_id(&mut self, dom_type: KmlDomType, id: i32) {
        match Xsd::get().enum_value(dom_type, id) {
            Some(value) => self.save_string_field_by_id(dom_type, value),
            None => warn!(?dom_type, id, "no enumerant for id"),
        }
    }
}

/// Serializer producing KML text
pub struct XmlSerializer {
    writer: XmlWriter,
    xsd: &'static Xsd,
}

impl XmlSerializer {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            writer: XmlWriter::new(options),
            xsd: Xsd::get(),
        }
    }

    /// Consume the serializer and return the text written so far
    pub fn finish(self) -> String {
        self.writer.finish()
    }

    fn element_name(&self, dom_type: KmlDomType) -> Option<&'static str> {
        let name = self.xsd.element_name(dom_type);
        if name.is_none() {
            warn!(?dom_type, "type has no element name, skipped");
        }
        name
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self::new(WriterOptions::default())
    }
}

impl Serializer for XmlSerializer {
    fn begin_by_id(&mut self, dom_type: KmlDomType, attributes: &Attributes) {
        if let Some(name) = self.element_name(dom_type) {
            self.writer.start_tag(name, attributes);
        }
    }

    fn end_by_id(&mut self, dom_type: KmlDomType) {
        if let Some(name) = self.element_name(dom_type) {
            self.writer.end_tag(name);
        }
    }

    fn save_simple_element(&mut self, dom_type: KmlDomType, attributes: &Attributes, value: &str) {
        if let Some(name) = self.element_name(dom_type) {
            self.writer.text_element(name, attributes, value);
        }
    }

    fn save_unknown(&mut self, markup: &str) {
        self.writer.raw(markup);
    }

    fn save_element(&mut self, element: &dyn Element) {
        element.serialize(self);
    }

    fn begin_mixed_by_id(&mut self, dom_type: KmlDomType, attributes: &Attributes) {
        if let Some(name) = self.element_name(dom_type) {
            self.writer.start_inline(name, attributes);
        }
    }

    fn end_mixed_by_id(&mut self, dom_type: KmlDomType) {
        if let Some(name) = self.element_name(dom_type) {
            self.writer.end_inline(name);
        }
    }

    fn save_char_data(&mut self, text: &str) {
        self.writer.text(text);
    }
}

/// Serialize an element tree with two-space indentation and newlines
pub fn serialize_pretty(element: &dyn Element) -> String {
    serialize_with_options(element, WriterOptions::default())
}

/// Serialize an element tree without any added whitespace
pub fn serialize_raw(element: &dyn Element) -> String {
    serialize_with_options(element, WriterOptions::raw())
}

pub fn serialize_with_options(element: &dyn Element, options: WriterOptions) -> String {
    let mut serializer = XmlSerializer::new(options);
    serializer.save_element(element);
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Serializer for Recorder {
        fn begin_by_id(&mut self, dom_type: KmlDomType, attributes: &Attributes) {
            let names: Vec<_> = attributes.names().collect();
            self.calls.push(format!("begin {:?} {:?}", dom_type, names));
        }

        fn end_by_id(&mut self, dom_type: KmlDomType) {
            self.calls.push(format!("end {:?}", dom_type));
        }

        fn save_simple_element(&mut self, dom_type: KmlDomType, _: &Attributes, value: &str) {
            self.calls.push(format!("field {:?}={}", dom_type, value));
        }

        fn save_unknown(&mut self, markup: &str) {
            self.calls.push(format!("unknown {}", markup));
        }

        fn save_element(&mut self, element: &dyn Element) {
            element.serialize(self);
        }
    }

    #[test]
    fn test_typed_field_helpers() {
        let mut recorder = Recorder::default();
        recorder.save_bool_field_by_id(KmlDomType::Visibility, false);
        recorder.save_double_field_by_id(KmlDomType::Name, 2.5);
        recorder.save_enum_field_by_id(KmlDomType::AltitudeMode, 2);
        recorder.save_enum_field_by_id(KmlDomType::AltitudeMode, 9);
        assert_eq!(
            recorder.calls,
            vec![
                "field Visibility=0",
                "field Name=2.5",
                "field AltitudeMode=absolute",
            ]
        );
    }

    #[test]
    fn test_save_element_dispatches_to_serialize() {
        let mut recorder = Recorder::default();
        recorder.save_element(&Field::with_char_data(KmlDomType::Address, "Main St"));
        assert_eq!(recorder.calls, vec!["field Address=Main St"]);
    }

    #[test]
    fn test_nameless_types_are_skipped() {
        let mut serializer = XmlSerializer::new(WriterOptions::raw());
        serializer.begin_by_id(KmlDomType::Feature, &Attributes::new());
        serializer.save_string_field_by_id(KmlDomType::Unknown, "x");
        serializer.end_by_id(KmlDomType::Feature);
        assert_eq!(serializer.finish(), "");
    }
}
