//! KML text to element tree.
//!
//! A single pass over quick-xml events. Known tags become elements from the
//! [`KmlFactory`]; an unknown tag below the root is captured verbatim with
//! its whole subtree and handed to the open parent as an [`UnknownElement`].
//! Each element is attached to its parent when it closes, so a parent sees
//! its children fully built, in document order.

use std::fmt::Display;

use kmlbase::Attributes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::element::{Element, ElementPtr};
use crate::factory::KmlFactory;
use crate::unknown::UnknownElement;
use crate::xsd::Xsd;
use crate::{KmlDomError, Result};

/// Limits applied while parsing
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Deepest allowed element nesting; the root is depth 1
    pub max_nesting_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 100,
        }
    }
}

/// Parse a KML document with default options
///
/// ```rust
/// use kmldom::{parse, serialize_raw};
///
/// let root = parse("<kml><Placemark><name>A</name></Placemark></kml>").unwrap();
/// assert_eq!(serialize_raw(root.as_ref()), "<kml><Placemark><name>A</name></Placemark></kml>");
/// ```
pub fn parse(xml: &str) -> Result<ElementPtr> {
    parse_with_options(xml, &ParserOptions::default())
}

pub fn parse_with_options(xml: &str, options: &ParserOptions) -> Result<ElementPtr> {
    let mut parser = Parser {
        xml,
        reader: Reader::from_str(xml),
        options,
        factory: KmlFactory::get(),
        xsd: Xsd::get(),
        stack: Vec::new(),
        root: None,
    };
    parser.run()?;
    let root = parser.root.ok_or(KmlDomError::NoRoot)?;
    debug!(root = ?root.dom_type(), "parsed document");
    Ok(root)
}

struct Open {
    element: ElementPtr,
    char_data: String,
}

struct Parser<'a> {
    xml: &'a str,
    reader: Reader<&'a [u8]>,
    options: &'a ParserOptions,
    factory: &'static KmlFactory,
    xsd: &'static Xsd,
    stack: Vec<Open>,
    root: Option<ElementPtr>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<()> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.xml_error(e))?;
            match event {
                Event::Start(start) => self.start(&start, false)?,
                Event::Empty(start) => self.start(&start, true)?,
                Event::End(_) => self.end()?,
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| self.xml_error(e))?;
                    self.push_char_data(&text);
                }
                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    self.push_char_data(&String::from_utf8_lossy(&bytes));
                }
                Event::Eof => break,
                // Comments, processing instructions, declarations, doctypes
                _ => {}
            }
        }
        if !self.stack.is_empty() {
            return Err(KmlDomError::UnclosedElements(self.stack.len()));
        }
        Ok(())
    }

    fn start(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<()> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let depth = self.stack.len() + 1;
        if depth > self.options.max_nesting_depth {
            return Err(KmlDomError::NestingTooDeep(self.options.max_nesting_depth));
        }
        if self.stack.is_empty() && self.root.is_some() {
            return Err(KmlDomError::MultipleRoots);
        }

        let dom_type = self.xsd.element_type(&name);
        let Some(mut element) = self.factory.create_element_by_id(dom_type) else {
            if self.stack.is_empty() {
                return Err(KmlDomError::UnknownRoot(name));
            }
            return self.capture_unknown(start, empty);
        };
        trace!(tag = %name, depth, "open element");

        let mut attributes = self.attributes(start)?;
        if let Some(xmlns) = attributes.cut_value("xmlns") {
            element.base_mut().set_default_xmlns(xmlns);
        }
        element.parse_attributes(attributes);

        self.stack.push(Open {
            element,
            char_data: String::new(),
        });
        if empty {
            self.end()?;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        // quick-xml rejects unmatched end tags itself
        let Some(Open {
            mut element,
            char_data,
        }) = self.stack.pop()
        else {
            return Ok(());
        };
        element.set_char_data(char_data);
        match self.stack.last_mut() {
            Some(parent) => parent.element.add_element(element),
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn capture_unknown(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<()> {
        let start_tag_end = self.reader.buffer_position() as usize;
        let tag_start = self.xml[..start_tag_end].rfind('<').unwrap_or(0);
        if !empty {
            self.reader
                .read_to_end(start.name())
                .map_err(|e| self.xml_error(e))?;
        }
        let markup = &self.xml[tag_start..self.reader.buffer_position() as usize];
        debug!(len = markup.len(), "captured unknown element");
        if let Some(parent) = self.stack.last_mut() {
            parent
                .element
                .add_element(Box::new(UnknownElement::new(markup)));
        }
        Ok(())
    }

    fn attributes(&self, start: &BytesStart<'a>) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(|e| self.xml_error(e))?;
            attributes.set_value(key, value.into_owned());
        }
        Ok(attributes)
    }

    fn push_char_data(&mut self, text: &str) {
        if let Some(open) = self.stack.last_mut() {
            open.char_data.push_str(text);
        }
    }

    fn xml_error(&self, error: impl Display) -> KmlDomError {
        KmlDomError::Xml(format!(
            "at byte {}: {}",
            self.reader.buffer_position(),
            error
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Container, Feature, Geometry, Kml, Placemark};
    use crate::element::downcast;
    use crate::kml22::{AltitudeMode, KmlDomType};
    use crate::serializer::{serialize_pretty, serialize_raw};

    const PLACEMARK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
  <!-- a comment -->
  <Placemark id="pm1" foo="bar">
    <name>Home</name>
    <gx:balloonVisibility>1</gx:balloonVisibility>
    <Point>
      <altitudeMode>absolute</altitudeMode>
      <coordinates>
        -122,37,0
      </coordinates>
    </Point>
    <Document/>
  </Placemark>
</kml>
"#;

    #[test]
    fn test_parse_tree() {
        let root = parse(PLACEMARK).unwrap();
        let kml = downcast::<Kml>(root).unwrap();
        assert_eq!(
            kml.base().default_xmlns(),
            Some("http://www.opengis.net/kml/2.2")
        );

        let feature = kml.feature().unwrap();
        assert_eq!(feature.dom_type(), KmlDomType::Placemark);
        assert_eq!(feature.feature().name(), Some("Home"));
        assert_eq!(feature.feature().object().id(), Some("pm1"));
        assert_eq!(
            feature.base().unknown_elements(),
            ["<gx:balloonVisibility>1</gx:balloonVisibility>"]
        );

        let placemark = crate::element::downcast_ref::<Placemark>(feature.as_element()).unwrap();
        let point = placemark.geometry().unwrap();
        assert_eq!(point.geometry().altitude_mode(), AltitudeMode::Absolute);
        let points = point.geometry().coordinates().unwrap().points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].longitude, -122.0);
        assert_eq!(placemark.base().misplaced_elements()[0].dom_type(), KmlDomType::Document);
    }

    #[test]
    fn test_round_trip_pretty() {
        let root = parse(PLACEMARK).unwrap();
        let expected = r#"<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
  <Placemark id="pm1" foo="bar">
    <name>Home</name>
    <Point>
      <altitudeMode>absolute</altitudeMode>
      <coordinates>-122,37,0</coordinates>
    </Point>
    <gx:balloonVisibility>1</gx:balloonVisibility>
    <Document>
    </Document>
  </Placemark>
</kml>
"#;
        assert_eq!(serialize_pretty(root.as_ref()), expected);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let first = serialize_raw(parse(PLACEMARK).unwrap().as_ref());
        let second = serialize_raw(parse(&first).unwrap().as_ref());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_subtree_kept_verbatim() {
        let xml = r#"<Folder><x:ext a="1"><x:inner>t &amp; u</x:inner><name>n</name></x:ext><name>f</name></Folder>"#;
        let root = parse(xml).unwrap();
        assert_eq!(
            root.base().unknown_elements(),
            [r#"<x:ext a="1"><x:inner>t &amp; u</x:inner><name>n</name></x:ext>"#]
        );
        assert_eq!(
            serialize_raw(root.as_ref()),
            r#"<Folder><name>f</name><x:ext a="1"><x:inner>t &amp; u</x:inner><name>n</name></x:ext></Folder>"#
        );
    }

    #[test]
    fn test_simple_element_with_extra_content_round_trips() {
        let xml = r#"<Placemark><name lang="en">a<x:b/>c</name><name>second</name></Placemark>"#;
        let root = parse(xml).unwrap();
        let placemark = downcast::<Placemark>(root).unwrap();
        // The first name carries more than text, so the plain one is taken
        assert_eq!(placemark.feature().name(), Some("second"));
        let misplaced = placemark.base().misplaced_elements();
        assert_eq!(misplaced.len(), 1);
        assert_eq!(misplaced[0].base().unknown_elements(), ["<x:b/>"]);

        let out = serialize_raw(&*placemark);
        assert_eq!(
            out,
            r#"<Placemark><name>second</name><name lang="en">ac<x:b/></name></Placemark>"#
        );
        assert_eq!(serialize_raw(parse(&out).unwrap().as_ref()), out);
    }

    #[test]
    fn test_coordinates_keep_bad_tuples_and_unknown_children() {
        let xml = "<Point><coordinates>1,2 west,north<x:q/></coordinates></Point>";
        let root = parse(xml).unwrap();
        let point = downcast::<crate::elements::Point>(root).unwrap();
        let coordinates = point.geometry().coordinates().unwrap();
        assert_eq!(coordinates.len(), 1);
        assert_eq!(coordinates.skipped_tuples(), ["west,north"]);
        assert_eq!(serialize_raw(&*point), xml);
    }

    #[test]
    fn test_stray_text_in_complex_element_round_trips() {
        let root = parse("<Folder>stray &amp; lost<name>x</name></Folder>").unwrap();
        let out = serialize_raw(root.as_ref());
        assert_eq!(out, "<Folder><name>x</name>stray &amp; lost</Folder>");
        assert_eq!(serialize_raw(parse(&out).unwrap().as_ref()), out);

        let pretty = serialize_pretty(root.as_ref());
        assert_eq!(pretty, "<Folder>\n  <name>x</name>\n  stray &amp; lost\n</Folder>\n");
        assert_eq!(serialize_raw(parse(&pretty).unwrap().as_ref()), out);
    }

    #[test]
    fn test_empty_unknown_element() {
        let root = parse("<Document><atom:link href=\"x\"/></Document>").unwrap();
        assert_eq!(root.base().unknown_elements(), ["<atom:link href=\"x\"/>"]);
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse(
            "<Placemark><description><![CDATA[<b>bold</b>]]> &amp; more</description></Placemark>",
        )
        .unwrap();
        let placemark = downcast::<Placemark>(root).unwrap();
        assert_eq!(placemark.feature().description(), Some("<b>bold</b> & more"));
    }

    #[test]
    fn test_container_children() {
        let root = parse(
            "<Document><Folder><name>a</name></Folder><Placemark/><Point/></Document>",
        )
        .unwrap();
        let document = downcast::<crate::elements::Document>(root).unwrap();
        assert_eq!(document.container().features().len(), 2);
        assert_eq!(document.base().misplaced_elements().len(), 1);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse(""), Err(KmlDomError::NoRoot)));
        assert!(matches!(
            parse("<gx:Tour/>"),
            Err(KmlDomError::UnknownRoot(name)) if name == "gx:Tour"
        ));
        assert!(matches!(
            parse("<kml><Document>"),
            Err(KmlDomError::UnclosedElements(2)) | Err(KmlDomError::Xml(_))
        ));
        assert!(matches!(
            parse("<kml/><kml/>"),
            Err(KmlDomError::MultipleRoots)
        ));
        assert!(matches!(
            parse("<kml><Document></Folder></kml>"),
            Err(KmlDomError::Xml(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let options = ParserOptions {
            max_nesting_depth: 2,
        };
        assert!(parse_with_options("<kml><Folder/></kml>", &options).is_ok());
        assert!(matches!(
            parse_with_options("<kml><Folder><Placemark/></Folder></kml>", &options),
            Err(KmlDomError::NestingTooDeep(2))
        ));
    }

    #[test]
    fn test_simple_root() {
        let root = parse("<name>solo</name>").unwrap();
        assert_eq!(root.dom_type(), KmlDomType::Name);
        assert_eq!(root.base().char_data(), "solo");
    }
}
