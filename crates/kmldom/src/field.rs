//! Simple-element values staged during parsing.
//!
//! A [`Field`] holds the tag and character data of a simple element such as
//! `<name>` or `<visibility>` until a parent that recognizes the tag copies
//! the value into its own typed field. A field nobody recognizes stays in the
//! parent's misplaced elements and serializes itself back to markup.

use crate::element::{save_text_element, Element, ElementBase};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;
use crate::xsd::Xsd;

/// Requested target type of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Double,
    Int,
    Enum,
    String,
}

/// A converted field value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Double(f64),
    Int(i32),
    Enum(i32),
    String(String),
}

/// A simple element's tag and character data.
#[derive(Debug)]
pub struct Field {
    base: ElementBase,
}

impl Field {
    pub fn new(dom_type: KmlDomType) -> Self {
        Self {
            base: ElementBase::new(dom_type),
        }
    }

    pub fn with_char_data(dom_type: KmlDomType, char_data: impl Into<String>) -> Self {
        let mut field = Self::new(dom_type);
        field.base.set_char_data(char_data);
        field
    }

    /// Convert the character data to `kind`.
    ///
    /// Booleans accept `1`/`true` and `0`/`false`, numbers use Rust's
    /// parsers, enumerants come from the schema registry. All but strings
    /// ignore surrounding whitespace. Strings are copied verbatim.
    pub fn convert(&self, kind: ScalarKind) -> Option<Scalar> {
        let raw = self.base.char_data();
        let text = raw.trim();
        match kind {
            ScalarKind::Bool => match text {
                "1" | "true" => Some(Scalar::Bool(true)),
                "0" | "false" => Some(Scalar::Bool(false)),
                _ => None,
            },
            ScalarKind::Double => text.parse().ok().map(Scalar::Double),
            ScalarKind::Int => text.parse().ok().map(Scalar::Int),
            ScalarKind::Enum => Xsd::get()
                .enum_id(self.base.dom_type(), text)
                .map(Scalar::Enum),
            ScalarKind::String => Some(Scalar::String(raw.to_string())),
        }
    }
}

impl Element for Field {
    crate::impl_element_base!();

    fn serialize(&self, serializer: &mut dyn Serializer) {
        save_text_element(self, serializer, self.base.char_data());
    }

    fn try_set_bool(&self, val: &mut bool) -> bool {
        match self.convert(ScalarKind::Bool) {
            Some(Scalar::Bool(b)) => {
                *val = b;
                true
            }
            _ => false,
        }
    }

    fn try_set_double(&self, val: &mut f64) -> bool {
        match self.convert(ScalarKind::Double) {
            Some(Scalar::Double(d)) => {
                *val = d;
                true
            }
            _ => false,
        }
    }

    fn try_set_int(&self, val: &mut i32) -> bool {
        match self.convert(ScalarKind::Int) {
            Some(Scalar::Int(i)) => {
                *val = i;
                true
            }
            _ => false,
        }
    }

    fn try_set_enum(&self, val: &mut i32) -> bool {
        match self.convert(ScalarKind::Enum) {
            Some(Scalar::Enum(id)) => {
                *val = id;
                true
            }
            _ => false,
        }
    }

    fn try_set_string(&self, val: &mut String) -> bool {
        match self.convert(ScalarKind::String) {
            Some(Scalar::String(s)) => {
                *val = s;
                true
            }
            _ => false,
        }
    }
}
