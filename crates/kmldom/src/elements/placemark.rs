use kmlbase::Attributes;

use super::feature::{self, Feature, FeatureFields};
use super::geometry::{into_geometry, GeometryPtr};
use crate::element::{begin_element, Element, ElementBase, ElementPtr};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;

/// `<Placemark>`: a feature with at most one geometry.
#[derive(Debug)]
pub struct Placemark {
    base: ElementBase,
    feature: FeatureFields,
    geometry: Option<GeometryPtr>,
}

impl Placemark {
    pub(crate) fn new() -> Self {
        Self {
            base: ElementBase::new(KmlDomType::Placemark),
            feature: FeatureFields::default(),
            geometry: None,
        }
    }

    pub fn geometry(&self) -> Option<&GeometryPtr> {
        self.geometry.as_ref()
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Replace the geometry. `None` clears it.
    ///
    /// A geometry that already has a parent is handed back.
    pub fn set_geometry(&mut self, geometry: Option<GeometryPtr>) -> Result<(), GeometryPtr> {
        self.base.set_complex_child(geometry, &mut self.geometry)
    }

    pub fn clear_geometry(&mut self) {
        self.geometry = None;
    }
}

impl Element for Placemark {
    crate::impl_element_base!();

    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::Placemark || feature::is_a(dom_type)
    }

    fn add_element(&mut self, element: ElementPtr) {
        // The first geometry wins; later ones fall through
        let element = if self.geometry.is_none() && element.is_a(KmlDomType::Geometry) {
            match into_geometry(element) {
                Ok(geometry) => match self.set_geometry(Some(geometry)) {
                    Ok(()) => return,
                    Err(geometry) => geometry.into_element(),
                },
                Err(element) => element,
            }
        } else {
            element
        };
        self.feature.add_element(&mut self.base, element);
    }

    fn parse_attributes(&mut self, attributes: Attributes) {
        self.feature.parse_attributes(&mut self.base, attributes);
    }

    fn get_attributes(&self, attributes: &mut Attributes) {
        self.feature.get_attributes(&self.base, attributes);
    }

    fn serialize(&self, serializer: &mut dyn Serializer) {
        begin_element(self, serializer);
        self.feature.serialize(serializer);
        if let Some(geometry) = &self.geometry {
            serializer.save_element(geometry.as_element());
        }
        self.base.serialize_unknown(serializer);
        serializer.end_by_id(self.dom_type());
    }
}

impl Feature for Placemark {
    fn feature(&self) -> &FeatureFields {
        &self.feature
    }

    fn feature_mut(&mut self) -> &mut FeatureFields {
        &mut self.feature
    }

    fn as_element(&self) -> &dyn Element {
        self
    }

    fn into_element(self: Box<Self>) -> ElementPtr {
        self
    }
}
