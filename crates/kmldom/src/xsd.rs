//! Schema registry.
//!
//! A read-only lookup of element names, their type tags, whether they carry
//! simple (text) or complex content, and the legal enumerant strings of
//! enumerated simple elements.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::kml22::KmlDomType;

/// Content model of a named element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XsdKind {
    /// Text-only content, parsed into a [`Field`](crate::Field)
    Simple,
    /// Element content, parsed into a concrete element
    Complex,
}

/// Element name, type tag and content model for every named KML element
const ELEMENTS: &[(&str, KmlDomType, XsdKind)] = &[
    ("kml", KmlDomType::Kml, XsdKind::Complex),
    ("Document", KmlDomType::Document, XsdKind::Complex),
    ("Folder", KmlDomType::Folder, XsdKind::Complex),
    ("Placemark", KmlDomType::Placemark, XsdKind::Complex),
    ("Point", KmlDomType::Point, XsdKind::Complex),
    ("LineString", KmlDomType::LineString, XsdKind::Complex),
    ("coordinates", KmlDomType::Coordinates, XsdKind::Complex),
    ("name", KmlDomType::Name, XsdKind::Simple),
    ("visibility", KmlDomType::Visibility, XsdKind::Simple),
    ("open", KmlDomType::Open, XsdKind::Simple),
    ("address", KmlDomType::Address, XsdKind::Simple),
    ("description", KmlDomType::Description, XsdKind::Simple),
    ("styleUrl", KmlDomType::StyleUrl, XsdKind::Simple),
    ("extrude", KmlDomType::Extrude, XsdKind::Simple),
    ("tessellate", KmlDomType::Tessellate, XsdKind::Simple),
    ("altitudeMode", KmlDomType::AltitudeMode, XsdKind::Simple),
];

/// Enumerant strings, indexed by enum id
const ALTITUDE_MODE_VALUES: &[&str] = &["clampToGround", "relativeToGround", "absolute"];

static XSD: Lazy<Xsd> = Lazy::new(Xsd::build);

/// The KML schema registry
#[derive(Debug)]
pub struct Xsd {
    by_name: HashMap<&'static str, KmlDomType>,
    by_type: HashMap<KmlDomType, (&'static str, XsdKind)>,
}

impl Xsd {
    /// The process-wide registry
    pub fn get() -> &'static Xsd {
        &XSD
    }

    fn build() -> Self {
        let mut by_name = HashMap::with_capacity(ELEMENTS.len());
        let mut by_type = HashMap::with_capacity(ELEMENTS.len());
        for &(name, dom_type, kind) in ELEMENTS {
            by_name.insert(name, dom_type);
            by_type.insert(dom_type, (name, kind));
        }
        Self { by_name, by_type }
    }

    /// Type tag for an element name, `Unknown` if the name is not KML
    pub fn element_type(&self, name: &str) -> KmlDomType {
        self.by_name
            .get(name)
            .copied()
            .unwrap_or(KmlDomType::Unknown)
    }

    /// Element name for a type tag. Abstract and unknown tags have none.
    pub fn element_name(&self, dom_type: KmlDomType) -> Option<&'static str> {
        self.by_type.get(&dom_type).map(|&(name, _)| name)
    }

    pub fn element_kind(&self, dom_type: KmlDomType) -> Option<XsdKind> {
        self.by_type.get(&dom_type).map(|&(_, kind)| kind)
    }

    pub fn is_simple(&self, dom_type: KmlDomType) -> bool {
        self.element_kind(dom_type) == Some(XsdKind::Simple)
    }

    pub fn is_complex(&self, dom_type: KmlDomType) -> bool {
        self.element_kind(dom_type) == Some(XsdKind::Complex)
    }

    /// Enum id of `value` for the enumerated element `dom_type`
    pub fn enum_id(&self, dom_type: KmlDomType, value: &str) -> Option<i32> {
        enum_values(dom_type)?
            .iter()
            .position(|&v| v == value)
            .and_then(|i| i32::try_from(i).ok())
    }

    /// Enumerant string of `id` for the enumerated element `dom_type`
    pub fn enum_value(&self, dom_type: KmlDomType, id: i32) -> Option<&'static str> {
        let index = usize::try_from(id).ok()?;
        enum_values(dom_type)?.get(index).copied()
    }
}

fn enum_values(dom_type: KmlDomType) -> Option<&'static [&'static str]> {
    match dom_type {
        KmlDomType::AltitudeMode => Some(ALTITUDE_MODE_VALUES),
        _ => None,
    }
}
