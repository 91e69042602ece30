//! The concrete KML element catalog.
//!
//! Concrete elements are built from layers that mirror the KML schema's
//! type hierarchy. Each layer is a plain struct (`ObjectFields`,
//! `FeatureFields`, `ContainerFields`, `GeometryFields`) that recognizes its
//! own children and attributes and passes everything else down, ending at
//! the element's [`ElementBase`](crate::ElementBase).

mod container;
mod feature;
mod geometry;
mod kml;
mod object;
mod placemark;

pub use container::{Container, ContainerFields, Document, Folder};
pub use feature::{into_feature, Feature, FeatureFields, FeaturePtr};
pub use geometry::{
    into_geometry, Coordinates, Geometry, GeometryFields, GeometryPtr, LineString, Point, Vec3,
};
pub use kml::Kml;
pub use object::ObjectFields;
pub use placemark::Placemark;

use crate::element::Element;

// Simple-child extraction. A value is taken only if the field is still
// empty, the child carries nothing but its text, and the conversion
// succeeds; otherwise the caller passes the child on so it is kept as
// misplaced with its attributes and children.

fn accepts(element: &dyn Element, filled: bool) -> bool {
    !filled && element.base().is_plain()
}

pub(crate) fn extract_string(element: &dyn Element, field: &mut Option<String>) -> bool {
    if !accepts(element, field.is_some()) {
        return false;
    }
    let mut value = String::new();
    if element.try_set_string(&mut value) {
        *field = Some(value);
        return true;
    }
    false
}

pub(crate) fn extract_bool(element: &dyn Element, field: &mut Option<bool>) -> bool {
    if !accepts(element, field.is_some()) {
        return false;
    }
    let mut value = false;
    if element.try_set_bool(&mut value) {
        *field = Some(value);
        return true;
    }
    false
}

pub(crate) fn extract_enum<T: TryFrom<i32>>(element: &dyn Element, field: &mut Option<T>) -> bool {
    if !accepts(element, field.is_some()) {
        return false;
    }
    let mut id = 0;
    if !element.try_set_enum(&mut id) {
        return false;
    }
    match T::try_from(id) {
        Ok(value) => {
            *field = Some(value);
            true
        }
        Err(_) => false,
    }
}
