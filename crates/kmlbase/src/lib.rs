//! kmlbase - shared building blocks for the KML object model
//!
//! This crate provides the pieces of KML handling that are independent of
//! any element catalog: the ordered attribute bag elements read from and
//! write to, and the XML text writer used by serializers.
//!
//! # Example
//!
//! ```rust
//! use kmlbase::{Attributes, WriterOptions, XmlWriter};
//!
//! let mut writer = XmlWriter::new(WriterOptions::raw());
//! writer.start_tag("Placemark", &Attributes::from_pairs([("id", "pm1")]));
//! writer.text_element("name", &Attributes::new(), "Home");
//! writer.end_tag("Placemark");
//!
//! assert_eq!(
//!     writer.finish(),
//!     "<Placemark id=\"pm1\"><name>Home</name></Placemark>"
//! );
//! ```

mod attributes;
mod options;
mod writer;

pub use attributes::Attributes;
pub use options::WriterOptions;
pub use writer::{escape_attribute, escape_text, XmlWriter};
