//! The `Object` layer: `id` and `targetId` attributes.

use kmlbase::Attributes;

use crate::element::{ElementBase, ElementPtr};
use crate::kml22::KmlDomType;

pub(crate) fn is_a(dom_type: KmlDomType) -> bool {
    dom_type == KmlDomType::Object || dom_type == KmlDomType::Unknown
}

/// Attributes common to every KML object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFields {
    id: Option<String>,
    target_id: Option<String>,
}

impl ObjectFields {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    pub fn has_target_id(&self) -> bool {
        self.target_id.is_some()
    }

    pub fn set_target_id(&mut self, target_id: impl Into<String>) {
        self.target_id = Some(target_id.into());
    }

    pub fn clear_target_id(&mut self) {
        self.target_id = None;
    }

    pub(crate) fn add_element(&mut self, base: &mut ElementBase, element: ElementPtr) {
        base.add_element(element);
    }

    pub(crate) fn parse_attributes(&mut self, base: &mut ElementBase, mut attributes: Attributes) {
        if let Some(id) = attributes.cut_value("id") {
            self.id = Some(id);
        }
        if let Some(target_id) = attributes.cut_value("targetId") {
            self.target_id = Some(target_id);
        }
        base.parse_attributes(attributes);
    }

    pub(crate) fn get_attributes(&self, base: &ElementBase, attributes: &mut Attributes) {
        if let Some(id) = &self.id {
            attributes.set_value("id", id.as_str());
        }
        if let Some(target_id) = &self.target_id {
            attributes.set_value("targetId", target_id.as_str());
        }
        base.get_attributes(attributes);
    }
}
