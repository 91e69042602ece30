use kmlbase::Attributes;

use super::feature::{into_feature, FeaturePtr};
use crate::element::{begin_element, Element, ElementBase, ElementPtr};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;

/// The `<kml>` document root.
#[derive(Debug)]
pub struct Kml {
    base: ElementBase,
    hint: Option<String>,
    feature: Option<FeaturePtr>,
}

impl Kml {
    pub(crate) fn new() -> Self {
        Self {
            base: ElementBase::new(KmlDomType::Kml),
            hint: None,
            feature: None,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub fn feature(&self) -> Option<&FeaturePtr> {
        self.feature.as_ref()
    }

    pub fn has_feature(&self) -> bool {
        self.feature.is_some()
    }

    /// Replace the root feature. `None` clears it.
    ///
    /// A feature that already has a parent is handed back.
    pub fn set_feature(&mut self, feature: Option<FeaturePtr>) -> Result<(), FeaturePtr> {
        self.base.set_complex_child(feature, &mut self.feature)
    }

    pub fn clear_feature(&mut self) {
        self.feature = None;
    }
}

impl Element for Kml {
    crate::impl_element_base!();

    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::Kml || dom_type == KmlDomType::Unknown
    }

    fn add_element(&mut self, element: ElementPtr) {
        let element = if self.feature.is_none() && element.is_a(KmlDomType::Feature) {
            match into_feature(element) {
                Ok(feature) => match self.set_feature(Some(feature)) {
                    Ok(()) => return,
                    Err(feature) => feature.into_element(),
                },
                Err(element) => element,
            }
        } else {
            element
        };
        self.base.add_element(element);
    }

    fn parse_attributes(&mut self, mut attributes: Attributes) {
        if let Some(hint) = attributes.cut_value("hint") {
            self.hint = Some(hint);
        }
        self.base.parse_attributes(attributes);
    }

    fn get_attributes(&self, attributes: &mut Attributes) {
        if let Some(hint) = &self.hint {
            attributes.set_value("hint", hint.as_str());
        }
        self.base.get_attributes(attributes);
    }

    fn serialize(&self, serializer: &mut dyn Serializer) {
        begin_element(self, serializer);
        if let Some(feature) = &self.feature {
            serializer.save_element(feature.as_element());
        }
        self.base.serialize_unknown(serializer);
        serializer.end_by_id(self.dom_type());
    }
}
