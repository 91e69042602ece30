//! # kmldom
//!
//! An object model for KML documents that survives a parse and serialize
//! round trip without losing anything.
//!
//! ## Design
//!
//! Every element embeds an [`ElementBase`] holding its type tag, a single
//! non-owning parent link, and the content no typed field accepted:
//!
//! - **Unknown elements**: markup outside the catalog, kept verbatim
//! - **Misplaced elements**: catalog elements where the schema does not allow
//!   them, kept as typed elements
//! - **Unknown attributes**: kept in an ordered bag, allocated on first use
//!
//! All three are written back after an element's known children, so
//! documents using extensions or newer schema versions come back intact.
//!
//! ## Example
//!
//! ```rust
//! use kmldom::{downcast, parse, serialize_raw, Element, Feature, Kml};
//!
//! let xml = r#"<kml><Placemark><name>Home</name><x:extra/></Placemark></kml>"#;
//! let root = parse(xml).unwrap();
//!
//! let kml = downcast::<Kml>(root).unwrap();
//! let placemark = kml.feature().unwrap();
//! assert_eq!(placemark.feature().name(), Some("Home"));
//! assert_eq!(placemark.base().unknown_elements(), ["<x:extra/>"]);
//!
//! assert_eq!(serialize_raw(&*kml), xml);
//! ```
//!
//! ## Example (building a tree)
//!
//! ```rust
//! use kmldom::{serialize_raw, Container, Feature, KmlFactory};
//!
//! let factory = KmlFactory::get();
//! let mut folder = factory.create_folder();
//! let mut placemark = factory.create_placemark();
//! placemark.feature_mut().set_name("Stop");
//! folder.add_feature(placemark).unwrap();
//!
//! assert_eq!(
//!     serialize_raw(&*folder),
//!     "<Folder><Placemark><name>Stop</name></Placemark></Folder>"
//! );
//! ```

mod element;
mod elements;
mod factory;
mod field;
pub mod kml22;
#[cfg(feature = "xml")]
mod parser;
mod serializer;
mod unknown;
mod xsd;

pub use element::{downcast, downcast_ref, Element, ElementBase, ElementId, ElementPtr};
pub use elements::{
    into_feature, into_geometry, Container, ContainerFields, Coordinates, Document, Feature,
    FeatureFields, FeaturePtr, Folder, Geometry, GeometryFields, GeometryPtr, Kml, LineString,
    ObjectFields, Placemark, Point, Vec3,
};
pub use factory::KmlFactory;
pub use field::{Field, Scalar, ScalarKind};
pub use kml22::{AltitudeMode, KmlDomType};
#[cfg(feature = "xml")]
pub use parser::{parse, parse_with_options, ParserOptions};
pub use serializer::{
    serialize_pretty, serialize_raw, serialize_with_options, Serializer, XmlSerializer,
};
pub use unknown::UnknownElement;
pub use xsd::{Xsd, XsdKind};

pub use kmlbase::{Attributes, WriterOptions};

/// Error type for parsing KML text
#[derive(Debug, thiserror::Error)]
pub enum KmlDomError {
    #[error("XML error {0}")]
    Xml(String),

    #[error("Unknown root element: {0}")]
    UnknownRoot(String),

    #[error("Nesting deeper than {0} elements")]
    NestingTooDeep(usize),

    #[error("Input ended with {0} unclosed elements")]
    UnclosedElements(usize),

    #[error("No root element")]
    NoRoot,

    #[error("More than one root element")]
    MultipleRoots,
}

pub type Result<T> = std::result::Result<T, KmlDomError>;
