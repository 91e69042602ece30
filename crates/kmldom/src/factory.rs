//! Element construction by type tag.

use crate::element::ElementPtr;
use crate::elements::{Coordinates, Document, Folder, Kml, LineString, Placemark, Point};
use crate::field::Field;
use crate::kml22::KmlDomType;
use crate::xsd::Xsd;

static FACTORY: KmlFactory = KmlFactory { _private: () };

/// Creates every element of the catalog.
#[derive(Debug)]
pub struct KmlFactory {
    _private: (),
}

impl KmlFactory {
    pub fn get() -> &'static KmlFactory {
        &FACTORY
    }

    /// Create the element for `dom_type`.
    ///
    /// Simple tags produce a [`Field`]. Returns `None` for `Unknown` and the
    /// abstract layers, which have no element of their own.
    pub fn create_element_by_id(&self, dom_type: KmlDomType) -> Option<ElementPtr> {
        let element: ElementPtr = match dom_type {
            KmlDomType::Kml => self.create_kml(),
            KmlDomType::Document => self.create_document(),
            KmlDomType::Folder => self.create_folder(),
            KmlDomType::Placemark => self.create_placemark(),
            KmlDomType::Point => self.create_point(),
            KmlDomType::LineString => self.create_line_string(),
            KmlDomType::Coordinates => self.create_coordinates(),
            _ if Xsd::get().is_simple(dom_type) => Box::new(self.create_field(dom_type)),
            _ => return None,
        };
        Some(element)
    }

    pub fn create_kml(&self) -> Box<Kml> {
        Box::new(Kml::new())
    }

    pub fn create_document(&self) -> Box<Document> {
        Box::new(Document::new())
    }

    pub fn create_folder(&self) -> Box<Folder> {
        Box::new(Folder::new())
    }

    pub fn create_placemark(&self) -> Box<Placemark> {
        Box::new(Placemark::new())
    }

    pub fn create_point(&self) -> Box<Point> {
        Box::new(Point::new())
    }

    pub fn create_line_string(&self) -> Box<LineString> {
        Box::new(LineString::new())
    }

    pub fn create_coordinates(&self) -> Box<Coordinates> {
        Box::new(Coordinates::new())
    }

    /// A simple element with no character data yet
    pub fn create_field(&self, dom_type: KmlDomType) -> Field {
        Field::new(dom_type)
    }
}
