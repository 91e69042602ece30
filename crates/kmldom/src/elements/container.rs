//! Containers: `<Document>` and `<Folder>`.

use kmlbase::Attributes;

use super::feature::{self, into_feature, Feature, FeatureFields, FeaturePtr};
use crate::element::{begin_element, Element, ElementBase, ElementPtr};
use crate::kml22::KmlDomType;
use crate::serializer::Serializer;

pub(crate) fn is_a(dom_type: KmlDomType) -> bool {
    dom_type == KmlDomType::Container || feature::is_a(dom_type)
}

/// The `Container` layer: an ordered list of child features.
#[derive(Debug, Default)]
pub struct ContainerFields {
    feature: FeatureFields,
    features: Vec<FeaturePtr>,
}

impl ContainerFields {
    pub fn feature(&self) -> &FeatureFields {
        &self.feature
    }

    pub fn feature_mut(&mut self) -> &mut FeatureFields {
        &mut self.feature
    }

    pub fn features(&self) -> &[FeaturePtr] {
        &self.features
    }

    pub fn feature_at(&self, index: usize) -> Option<&dyn Feature> {
        self.features.get(index).map(|f| &**f)
    }

    pub(crate) fn add_feature(
        &mut self,
        base: &ElementBase,
        feature: FeaturePtr,
    ) -> Result<(), FeaturePtr> {
        base.add_complex_child(Some(feature), &mut self.features)
    }

    pub(crate) fn add_element(&mut self, base: &mut ElementBase, element: ElementPtr) {
        if !element.is_a(KmlDomType::Feature) {
            self.feature.add_element(base, element);
            return;
        }
        let rejected = match into_feature(element) {
            Ok(feature) => match self.add_feature(base, feature) {
                Ok(()) => return,
                Err(feature) => feature.into_element(),
            },
            Err(element) => element,
        };
        self.feature.add_element(base, rejected);
    }

    pub(crate) fn parse_attributes(&mut self, base: &mut ElementBase, attributes: Attributes) {
        self.feature.parse_attributes(base, attributes);
    }

    pub(crate) fn get_attributes(&self, base: &ElementBase, attributes: &mut Attributes) {
        self.feature.get_attributes(base, attributes);
    }

    pub(crate) fn serialize(&self, serializer: &mut dyn Serializer) {
        self.feature.serialize(serializer);
        for feature in &self.features {
            serializer.save_element(feature.as_element());
        }
    }
}

/// A feature that holds other features
pub trait Container: Feature {
    fn container(&self) -> &ContainerFields;
    fn container_mut(&mut self) -> &mut ContainerFields;

    /// Append a child feature.
    ///
    /// A feature that already has a parent is handed back.
    fn add_feature(&mut self, feature: FeaturePtr) -> Result<(), FeaturePtr>;
}

macro_rules! container_element {
    ($name:ident, $dom_type:expr) => {
        #[derive(Debug)]
        pub struct $name {
            base: ElementBase,
            container: ContainerFields,
        }

        impl $name {
            pub(crate) fn new() -> Self {
                Self {
                    base: ElementBase::new($dom_type),
                    container: ContainerFields::default(),
                }
            }
        }

        impl Element for $name {
            crate::impl_element_base!();

            fn is_a(&self, dom_type: KmlDomType) -> bool {
                dom_type == $dom_type || is_a(dom_type)
            }

            fn add_element(&mut self, element: ElementPtr) {
                self.container.add_element(&mut self.base, element);
            }

            fn parse_attributes(&mut self, attributes: Attributes) {
                self.container.parse_attributes(&mut self.base, attributes);
            }

            fn get_attributes(&self, attributes: &mut Attributes) {
                self.container.get_attributes(&self.base, attributes);
            }

            fn serialize(&self, serializer: &mut dyn Serializer) {
                begin_element(self, serializer);
                self.container.serialize(serializer);
                self.base.serialize_unknown(serializer);
                serializer.end_by_id(self.dom_type());
            }
        }

        impl Feature for $name {
            fn feature(&self) -> &FeatureFields {
                &self.container.feature
            }

            fn feature_mut(&mut self) -> &mut FeatureFields {
                &mut self.container.feature
            }

            fn as_element(&self) -> &dyn Element {
                self
            }

            fn into_element(self: Box<Self>) -> ElementPtr {
                self
            }
        }

        impl Container for $name {
            fn container(&self) -> &ContainerFields {
                &self.container
            }

            fn container_mut(&mut self) -> &mut ContainerFields {
                &mut self.container
            }

            fn add_feature(&mut self, feature: FeaturePtr) -> Result<(), FeaturePtr> {
                self.container.add_feature(&self.base, feature)
            }
        }
    };
}

container_element!(Document, KmlDomType::Document);
container_element!(Folder, KmlDomType::Folder);
