//! The `Feature` layer: named, describable objects.

use kmlbase::Attributes;

use super::container::{Document, Folder};
use super::object::{self, ObjectFields};
use super::placemark::Placemark;
use super::{extract_bool, extract_string};
use crate::element::{downcast, Element, ElementBase, ElementPtr};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;

pub(crate) fn is_a(dom_type: KmlDomType) -> bool {
    dom_type == KmlDomType::Feature || object::is_a(dom_type)
}

/// An element usable wherever KML expects a Feature
pub trait Feature: Element {
    fn feature(&self) -> &FeatureFields;
    fn feature_mut(&mut self) -> &mut FeatureFields;
    fn as_element(&self) -> &dyn Element;
    fn into_element(self: Box<Self>) -> ElementPtr;
}

pub type FeaturePtr = Box<dyn Feature>;

/// Convert an element to a feature, or hand it back if it is not one
pub fn into_feature(element: ElementPtr) -> Result<FeaturePtr, ElementPtr> {
    match element.dom_type() {
        KmlDomType::Placemark => downcast::<Placemark>(element).map(|f| f as FeaturePtr),
        KmlDomType::Folder => downcast::<Folder>(element).map(|f| f as FeaturePtr),
        KmlDomType::Document => downcast::<Document>(element).map(|f| f as FeaturePtr),
        _ => Err(element),
    }
}

/// Simple children shared by all features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFields {
    object: ObjectFields,
    name: Option<String>,
    visibility: Option<bool>,
    open: Option<bool>,
    address: Option<String>,
    description: Option<String>,
    style_url: Option<String>,
}

impl FeatureFields {
    pub fn object(&self) -> &ObjectFields {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut ObjectFields {
        &mut self.object
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }

    pub fn visibility(&self) -> Option<bool> {
        self.visibility
    }

    pub fn has_visibility(&self) -> bool {
        self.visibility.is_some()
    }

    pub fn set_visibility(&mut self, visibility: bool) {
        self.visibility = Some(visibility);
    }

    pub fn clear_visibility(&mut self) {
        self.visibility = None;
    }

    pub fn open(&self) -> Option<bool> {
        self.open
    }

    pub fn has_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = Some(open);
    }

    pub fn clear_open(&mut self) {
        self.open = None;
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }

    pub fn clear_address(&mut self) {
        self.address = None;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn clear_description(&mut self) {
        self.description = None;
    }

    pub fn style_url(&self) -> Option<&str> {
        self.style_url.as_deref()
    }

    pub fn has_style_url(&self) -> bool {
        self.style_url.is_some()
    }

    pub fn set_style_url(&mut self, style_url: impl Into<String>) {
        self.style_url = Some(style_url.into());
    }

    pub fn clear_style_url(&mut self) {
        self.style_url = None;
    }

    pub(crate) fn add_element(&mut self, base: &mut ElementBase, element: ElementPtr) {
        let taken = match element.dom_type() {
            KmlDomType::Name => extract_string(element.as_ref(), &mut self.name),
            KmlDomType::Visibility => extract_bool(element.as_ref(), &mut self.visibility),
            KmlDomType::Open => extract_bool(element.as_ref(), &mut self.open),
            KmlDomType::Address => extract_string(element.as_ref(), &mut self.address),
            KmlDomType::Description => extract_string(element.as_ref(), &mut self.description),
            KmlDomType::StyleUrl => extract_string(element.as_ref(), &mut self.style_url),
            _ => false,
        };
        if !taken {
            self.object.add_element(base, element);
        }
    }

    pub(crate) fn parse_attributes(&mut self, base: &mut ElementBase, attributes: Attributes) {
        self.object.parse_attributes(base, attributes);
    }

    pub(crate) fn get_attributes(&self, base: &ElementBase, attributes: &mut Attributes) {
        self.object.get_attributes(base, attributes);
    }

    pub(crate) fn serialize(&self, serializer: &mut dyn Serializer) {
        if let Some(name) = &self.name {
            serializer.save_string_field_by_id(KmlDomType::Name, name);
        }
        if let Some(visibility) = self.visibility {
            serializer.save_bool_field_by_id(KmlDomType::Visibility, visibility);
        }
        if let Some(open) = self.open {
            serializer.save_bool_field_by_id(KmlDomType::Open, open);
        }
        if let Some(address) = &self.address {
            serializer.save_string_field_by_id(KmlDomType::Address, address);
        }
        if let Some(description) = &self.description {
            serializer.save_string_field_by_id(KmlDomType::Description, description);
        }
        if let Some(style_url) = &self.style_url {
            serializer.save_string_field_by_id(KmlDomType::StyleUrl, style_url);
        }
    }
}
