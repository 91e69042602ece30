//! Type tags for the KML 2.2 elements known to this object model.

/// Closed enumeration of element kinds.
///
/// `Unknown` is the tag of content with no typed representation. `Object`,
/// `Feature`, `Container` and `Geometry` are abstract: no element reports
/// them as its type, but concrete elements answer `is_a` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KmlDomType {
    Unknown,

    // Abstract
    Object,
    Feature,
    Container,
    Geometry,

    // Complex
    Kml,
    Document,
    Folder,
    Placemark,
    Point,
    LineString,
    Coordinates,

    // Simple
    Name,
    Visibility,
    Open,
    Address,
    Description,
    StyleUrl,
    Extrude,
    Tessellate,
    AltitudeMode,
}

/// Values of `<altitudeMode>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum AltitudeMode {
    #[default]
    ClampToGround = 0,
    RelativeToGround = 1,
    Absolute = 2,
}

impl TryFrom<i32> for AltitudeMode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AltitudeMode::ClampToGround),
            1 => Ok(AltitudeMode::RelativeToGround),
            2 => Ok(AltitudeMode::Absolute),
            other => Err(other),
        }
    }
}

impl From<AltitudeMode> for i32 {
    fn from(mode: AltitudeMode) -> Self {
        mode as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude_mode_conversion() {
        assert_eq!(AltitudeMode::try_from(2), Ok(AltitudeMode::Absolute));
        assert_eq!(AltitudeMode::try_from(7), Err(7));
        assert_eq!(i32::from(AltitudeMode::RelativeToGround), 1);
    }
}
