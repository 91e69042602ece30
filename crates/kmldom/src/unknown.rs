//! Markup with no typed representation.

use crate::element::{Element, ElementBase};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;

/// A fully unknown element, kept as the raw markup it was parsed from.
///
/// Offered to a parent through `add_element`, it ends up as a string in
/// the parent's unknown elements.
#[derive(Debug)]
pub struct UnknownElement {
    base: ElementBase,
    markup: String,
}

impl UnknownElement {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(KmlDomType::Unknown),
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl Element for UnknownElement {
    crate::impl_element_base!();

    fn serialize(&self, serializer: &mut dyn Serializer) {
        serializer.save_unknown(&self.markup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::serialize_pretty;

    #[test]
    fn test_serializes_verbatim() {
        let unknown = UnknownElement::new("<gx:Tour><gx:Playlist/></gx:Tour>");
        assert_eq!(unknown.dom_type(), KmlDomType::Unknown);
        assert_eq!(
            serialize_pretty(&unknown),
            "<gx:Tour><gx:Playlist/></gx:Tour>\n"
        );
    }
}
