//! Geometries and their coordinate lists.

use std::fmt;

use kmlbase::Attributes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::object::{self, ObjectFields};
use super::{extract_bool, extract_enum};
use crate::element::{
    begin_element, downcast, save_text_element, Element, ElementBase, ElementPtr,
};
use crate::kml22::{AltitudeMode, KmlDomType};
use crate::serializer::Serializer;

pub(crate) fn is_a(dom_type: KmlDomType) -> bool {
    dom_type == KmlDomType::Geometry || object::is_a(dom_type)
}

/// An element usable wherever KML expects a Geometry
pub trait Geometry: Element {
    fn geometry(&self) -> &GeometryFields;
    fn geometry_mut(&mut self) -> &mut GeometryFields;
    fn as_element(&self) -> &dyn Element;
    fn into_element(self: Box<Self>) -> ElementPtr;
}

pub type GeometryPtr = Box<dyn Geometry>;

/// Convert an element to a geometry, or hand it back if it is not one
pub fn into_geometry(element: ElementPtr) -> Result<GeometryPtr, ElementPtr> {
    match element.dom_type() {
        KmlDomType::Point => downcast::<Point>(element).map(|g| g as GeometryPtr),
        KmlDomType::LineString => downcast::<LineString>(element).map(|g| g as GeometryPtr),
        _ => Err(element),
    }
}

/// The `Geometry` layer shared by points and line strings.
#[derive(Debug, Default)]
pub struct GeometryFields {
    object: ObjectFields,
    extrude: Option<bool>,
    altitude_mode: Option<AltitudeMode>,
    coordinates: Option<Box<Coordinates>>,
}

impl GeometryFields {
    pub fn object(&self) -> &ObjectFields {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut ObjectFields {
        &mut self.object
    }

    pub fn extrude(&self) -> Option<bool> {
        self.extrude
    }

    pub fn has_extrude(&self) -> bool {
        self.extrude.is_some()
    }

    pub fn set_extrude(&mut self, extrude: bool) {
        self.extrude = Some(extrude);
    }

    pub fn clear_extrude(&mut self) {
        self.extrude = None;
    }

    /// The altitude mode, `clampToGround` when unset
    pub fn altitude_mode(&self) -> AltitudeMode {
        self.altitude_mode.unwrap_or_default()
    }

    pub fn has_altitude_mode(&self) -> bool {
        self.altitude_mode.is_some()
    }

    pub fn set_altitude_mode(&mut self, altitude_mode: AltitudeMode) {
        self.altitude_mode = Some(altitude_mode);
    }

    pub fn clear_altitude_mode(&mut self) {
        self.altitude_mode = None;
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_deref()
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn clear_coordinates(&mut self) {
        self.coordinates = None;
    }

    pub(crate) fn set_coordinates(
        &mut self,
        base: &ElementBase,
        coordinates: Option<Box<Coordinates>>,
    ) -> Result<(), Box<Coordinates>> {
        base.set_complex_child(coordinates, &mut self.coordinates)
    }

    pub(crate) fn add_element(&mut self, base: &mut ElementBase, element: ElementPtr) {
        let element = match element.dom_type() {
            KmlDomType::Extrude if extract_bool(element.as_ref(), &mut self.extrude) => return,
            KmlDomType::AltitudeMode
                if extract_enum(element.as_ref(), &mut self.altitude_mode) =>
            {
                return
            }
            KmlDomType::Coordinates if self.coordinates.is_none() => {
                match downcast::<Coordinates>(element) {
                    Ok(coordinates) => match self.set_coordinates(base, Some(coordinates)) {
                        Ok(()) => return,
                        Err(coordinates) => coordinates as ElementPtr,
                    },
                    Err(element) => element,
                }
            }
            _ => element,
        };
        self.object.add_element(base, element);
    }

    pub(crate) fn parse_attributes(&mut self, base: &mut ElementBase, attributes: Attributes) {
        self.object.parse_attributes(base, attributes);
    }

    pub(crate) fn get_attributes(&self, base: &ElementBase, attributes: &mut Attributes) {
        self.object.get_attributes(base, attributes);
    }

    fn serialize_extrude(&self, serializer: &mut dyn Serializer) {
        if let Some(extrude) = self.extrude {
            serializer.save_bool_field_by_id(KmlDomType::Extrude, extrude);
        }
    }

    fn serialize_tail(&self, serializer: &mut dyn Serializer) {
        if let Some(altitude_mode) = self.altitude_mode {
            serializer.save_enum_field_by_id(KmlDomType::AltitudeMode, altitude_mode.into());
        }
        if let Some(coordinates) = &self.coordinates {
            serializer.save_element(&**coordinates);
        }
    }
}

/// `<Point>`
#[derive(Debug)]
pub struct Point {
    base: ElementBase,
    geometry: GeometryFields,
}

impl Point {
    pub(crate) fn new() -> Self {
        Self {
            base: ElementBase::new(KmlDomType::Point),
            geometry: GeometryFields::default(),
        }
    }

    /// Replace the coordinate list. A list that already has a parent is
    /// handed back.
    pub fn set_coordinates(
        &mut self,
        coordinates: Option<Box<Coordinates>>,
    ) -> Result<(), Box<Coordinates>> {
        self.geometry.set_coordinates(&self.base, coordinates)
    }
}

impl Element for Point {
    crate::impl_element_base!();

    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::Point || is_a(dom_type)
    }

    fn add_element(&mut self, element: ElementPtr) {
        self.geometry.add_element(&mut self.base, element);
    }

    fn parse_attributes(&mut self, attributes: Attributes) {
        self.geometry.parse_attributes(&mut self.base, attributes);
    }

    fn get_attributes(&self, attributes: &mut Attributes) {
        self.geometry.get_attributes(&self.base, attributes);
    }

    fn serialize(&self, serializer: &mut dyn Serializer) {
        begin_element(self, serializer);
        self.geometry.serialize_extrude(serializer);
        self.geometry.serialize_tail(serializer);
        self.base.serialize_unknown(serializer);
        serializer.end_by_id(self.dom_type());
    }
}

impl Geometry for Point {
    fn geometry(&self) -> &GeometryFields {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut GeometryFields {
        &mut self.geometry
    }

    fn as_element(&self) -> &dyn Element {
        self
    }

    fn into_element(self: Box<Self>) -> ElementPtr {
        self
    }
}

/// `<LineString>`
#[derive(Debug)]
pub struct LineString {
    base: ElementBase,
    geometry: GeometryFields,
    tessellate: Option<bool>,
}

impl LineString {
    pub(crate) fn new() -> Self {
        Self {
            base: ElementBase::new(KmlDomType::LineString),
            geometry: GeometryFields::default(),
            tessellate: None,
        }
    }

    pub fn tessellate(&self) -> Option<bool> {
        self.tessellate
    }

    pub fn has_tessellate(&self) -> bool {
        self.tessellate.is_some()
    }

    pub fn set_tessellate(&mut self, tessellate: bool) {
        self.tessellate = Some(tessellate);
    }

    pub fn clear_tessellate(&mut self) {
        self.tessellate = None;
    }

    pub fn set_coordinates(
        &mut self,
        coordinates: Option<Box<Coordinates>>,
    ) -> Result<(), Box<Coordinates>> {
        self.geometry.set_coordinates(&self.base, coordinates)
    }
}

impl Element for LineString {
    crate::impl_element_base!();

    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::LineString || is_a(dom_type)
    }

    fn add_element(&mut self, element: ElementPtr) {
        if element.dom_type() == KmlDomType::Tessellate
            && extract_bool(element.as_ref(), &mut self.tessellate)
        {
            return;
        }
        self.geometry.add_element(&mut self.base, element);
    }

    fn parse_attributes(&mut self, attributes: Attributes) {
        self.geometry.parse_attributes(&mut self.base, attributes);
    }

    fn get_attributes(&self, attributes: &mut Attributes) {
        self.geometry.get_attributes(&self.base, attributes);
    }

    fn serialize(&self, serializer: &mut dyn Serializer) {
        begin_element(self, serializer);
        self.geometry.serialize_extrude(serializer);
        if let Some(tessellate) = self.tessellate {
            serializer.save_bool_field_by_id(KmlDomType::Tessellate, tessellate);
        }
        self.geometry.serialize_tail(serializer);
        self.base.serialize_unknown(serializer);
        serializer.end_by_id(self.dom_type());
    }
}

impl Geometry for LineString {
    fn geometry(&self) -> &GeometryFields {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut GeometryFields {
        &mut self.geometry
    }

    fn as_element(&self) -> &dyn Element {
        self
    }

    fn into_element(self: Box<Self>) -> ElementPtr {
        self
    }
}

/// One coordinate tuple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
}

impl Vec3 {
    pub fn new(longitude: f64, latitude: f64, altitude: Option<f64>) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }

    /// Parse `lon,lat[,alt]`
    pub fn parse(tuple: &str) -> Option<Self> {
        let mut values = Vec::with_capacity(3);
        for component in tuple.split(',') {
            values.push(component.parse::<f64>().ok()?);
        }
        match values[..] {
            [longitude, latitude] => Some(Self::new(longitude, latitude, None)),
            [longitude, latitude, altitude] => Some(Self::new(longitude, latitude, Some(altitude))),
            _ => None,
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)?;
        if let Some(altitude) = self.altitude {
            write!(f, ",{}", altitude)?;
        }
        Ok(())
    }
}

// "1 , 2" and "1,2" are the same tuple
static COMMA_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("valid comma regex"));

/// `<coordinates>`: a whitespace-separated list of tuples.
///
/// Tuples that do not parse are kept as text and written after the points.
#[derive(Debug)]
pub struct Coordinates {
    base: ElementBase,
    points: Vec<Vec3>,
    skipped: Vec<String>,
}

impl Coordinates {
    pub(crate) fn new() -> Self {
        Self {
            base: ElementBase::new(KmlDomType::Coordinates),
            points: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add_point(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn add_latlng(&mut self, latitude: f64, longitude: f64) {
        self.points.push(Vec3::new(longitude, latitude, None));
    }

    pub fn add_latlngalt(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        self.points.push(Vec3::new(longitude, latitude, Some(altitude)));
    }

    /// Tuples from parsed text that were not valid coordinates
    pub fn skipped_tuples(&self) -> &[String] {
        &self.skipped
    }

    /// Remove all points and skipped tuples
    pub fn clear(&mut self) {
        self.points.clear();
        self.skipped.clear();
    }

    fn parse_tuples(&mut self, text: &str) {
        let normalized = COMMA_SPACING.replace_all(text, ",");
        for tuple in normalized.split_whitespace() {
            match Vec3::parse(tuple) {
                Some(point) => self.points.push(point),
                None => {
                    debug!(tuple, "kept malformed coordinate tuple as text");
                    self.skipped.push(tuple.to_string());
                }
            }
        }
    }
}

impl Element for Coordinates {
    crate::impl_element_base!();

    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::Coordinates || dom_type == KmlDomType::Unknown
    }

    fn set_char_data(&mut self, char_data: String) {
        self.parse_tuples(&char_data);
        self.base.set_char_data(char_data);
    }

    fn serialize(&self, serializer: &mut dyn Serializer) {
        let text = self
            .points
            .iter()
            .map(Vec3::to_string)
            .chain(self.skipped.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        save_text_element(self, serializer, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::KmlFactory;
    use crate::field::Field;
    use crate::serializer::serialize_raw;

    #[test]
    fn test_parse_tuples() {
        let mut coordinates = KmlFactory::get().create_coordinates();
        coordinates.set_char_data("\n  -122.1,37.2,10 -122.3 , 37.4\n\t1,2,3,4 west,north 5,6\n".into());

        assert_eq!(
            coordinates.points(),
            [
                Vec3::new(-122.1, 37.2, Some(10.0)),
                Vec3::new(-122.3, 37.4, None),
                Vec3::new(5.0, 6.0, None),
            ]
        );
        assert_eq!(coordinates.skipped_tuples(), ["1,2,3,4", "west,north"]);
    }

    #[test]
    fn test_serialize_keeps_skipped_tuples_and_unknown_children() {
        let mut coordinates = KmlFactory::get().create_coordinates();
        coordinates.add_element(Box::new(crate::unknown::UnknownElement::new("<x:q/>")));
        coordinates.set_char_data("1,2 west,north 3,4".into());
        assert_eq!(
            serialize_raw(&*coordinates),
            "<coordinates>1,2 3,4 west,north<x:q/></coordinates>"
        );

        coordinates.clear();
        assert!(coordinates.skipped_tuples().is_empty());
        assert_eq!(serialize_raw(&*coordinates), "<coordinates><x:q/></coordinates>");
    }

    #[test]
    fn test_serialize_coordinates() {
        let mut coordinates = KmlFactory::get().create_coordinates();
        coordinates.add_latlngalt(37.0, -122.0, 0.0);
        coordinates.add_latlng(38.5, -121.25);
        assert_eq!(
            serialize_raw(&*coordinates),
            "<coordinates>-122,37,0 -121.25,38.5</coordinates>"
        );

        coordinates.clear();
        assert!(coordinates.is_empty());
        assert_eq!(serialize_raw(&*coordinates), "<coordinates/>");
    }

    #[test]
    fn test_point_children() {
        let factory = KmlFactory::get();
        let mut point = factory.create_point();
        point.add_element(Box::new(Field::with_char_data(KmlDomType::Extrude, "1")));
        point.add_element(Box::new(Field::with_char_data(
            KmlDomType::AltitudeMode,
            "relativeToGround",
        )));
        let mut coordinates = factory.create_coordinates();
        coordinates.set_char_data("1,2".into());
        point.add_element(coordinates);
        point.add_element(factory.create_coordinates());

        let geometry = point.geometry();
        assert_eq!(geometry.extrude(), Some(true));
        assert_eq!(geometry.altitude_mode(), AltitudeMode::RelativeToGround);
        assert_eq!(geometry.coordinates().map(|c| c.len()), Some(1));
        assert_eq!(point.base().misplaced_elements().len(), 1);
    }

    #[test]
    fn test_altitude_mode_default() {
        let point = KmlFactory::get().create_point();
        assert!(!point.geometry().has_altitude_mode());
        assert_eq!(point.geometry().altitude_mode(), AltitudeMode::ClampToGround);
    }

    #[test]
    fn test_bad_altitude_mode_is_misplaced() {
        let mut point = KmlFactory::get().create_point();
        point.add_element(Box::new(Field::with_char_data(KmlDomType::AltitudeMode, "up")));
        assert!(!point.geometry().has_altitude_mode());
        assert_eq!(
            serialize_raw(&*point),
            "<Point><altitudeMode>up</altitudeMode></Point>"
        );
    }

    #[test]
    fn test_tessellate_only_on_line_string() {
        let factory = KmlFactory::get();
        let mut line = factory.create_line_string();
        line.add_element(Box::new(Field::with_char_data(KmlDomType::Tessellate, "1")));
        assert_eq!(line.tessellate(), Some(true));

        let mut point = factory.create_point();
        point.add_element(Box::new(Field::with_char_data(KmlDomType::Tessellate, "1")));
        assert_eq!(point.base().misplaced_elements().len(), 1);
    }

    #[test]
    fn test_line_string_serialize_order() {
        let factory = KmlFactory::get();
        let mut line = factory.create_line_string();
        line.geometry_mut().set_altitude_mode(AltitudeMode::Absolute);
        line.set_tessellate(false);
        line.geometry_mut().set_extrude(true);
        let mut coordinates = factory.create_coordinates();
        coordinates.add_latlng(1.0, 2.0);
        assert!(line.set_coordinates(Some(coordinates)).is_ok());

        assert_eq!(
            serialize_raw(&*line),
            "<LineString><extrude>1</extrude><tessellate>0</tessellate>\
             <altitudeMode>absolute</altitudeMode><coordinates>2,1</coordinates></LineString>"
        );
    }

    #[test]
    fn test_into_geometry() {
        let factory = KmlFactory::get();
        assert!(into_geometry(factory.create_line_string()).is_ok());
        let rejected = into_geometry(factory.create_coordinates()).unwrap_err();
        assert_eq!(rejected.dom_type(), KmlDomType::Coordinates);
    }
}
