//! Geometry coercion for the GeoSPARQL functions.
//!
//! Geometries travel through the engine as typed literals; the supported
//! serializations are WKT and GeoJSON. GML is a recognized serialization but
//! no cross-format coercion is attempted for it.

use crate::term::ExpressionTerm;
use crate::vocab::{geosparql, sf};
use geo::algorithm::HasDimensions;
use geo::{BoundingRect, Geometry, LineString, Point};
use geojson::GeoJson;
use oxrdf::NamedNodeRef;
use std::str::FromStr;
use wkt::{ToWkt, TryFromWkt};

/// Extracts a geometry from an evaluated term, dispatching on the datatype.
pub(crate) fn parse_geometry_literal(term: &ExpressionTerm) -> Option<Geometry> {
    let ExpressionTerm::OtherTypedLiteral { value, datatype } = term else {
        return None;
    };
    if *datatype == geosparql::WKT_LITERAL {
        parse_wkt_literal(value.trim())
    } else if *datatype == geosparql::GEO_JSON_LITERAL {
        parse_geo_json_literal(value.trim())
    } else {
        // geo:gmlLiteral falls through here on purpose
        None
    }
}

// Parse a WKT literal including reference system http://www.opengis.net/def/crs/OGC/1.3/CRS84
fn parse_wkt_literal(value: &str) -> Option<Geometry> {
    let mut value = value.trim_start();
    if let Some(rest) = value.strip_prefix('<') {
        // We have a reference system
        let (system, rest) = rest.split_once('>').unwrap_or((rest, ""));
        if system != "http://www.opengis.net/def/crs/OGC/1.3/CRS84" {
            // We only support CRS84
            return None;
        }
        value = rest.trim_start();
    }
    Geometry::try_from_wkt_str(value).ok()
}

fn parse_geo_json_literal(value: &str) -> Option<Geometry> {
    GeoJson::from_str(value).ok()?.try_into().ok()
}

/// Serializes a geometry back into a `geo:wktLiteral` value.
pub(crate) fn geometry_literal(geometry: &Geometry) -> ExpressionTerm {
    ExpressionTerm::OtherTypedLiteral {
        value: geometry.wkt_string(),
        datatype: geosparql::WKT_LITERAL.into(),
    }
}

/// The topological dimension: 0 for points, 1 for lines, 2 for areal
/// geometries. Collections take the maximum over their members.
pub(crate) fn dimension(geometry: &Geometry) -> i64 {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => 2,
        Geometry::GeometryCollection(collection) => {
            collection.iter().map(dimension).max().unwrap_or(0)
        }
    }
}

/// The minimum bounding rectangle, as min/max over all constituent
/// coordinates.
///
/// Degenerate boxes collapse: a zero-extent box is the original point, a
/// zero-width or zero-height box is the diagonal line; an empty geometry is
/// returned unchanged.
pub(crate) fn envelope(geometry: Geometry) -> Geometry {
    let Some(rect) = geometry.bounding_rect() else {
        return geometry;
    };
    let (min, max) = (rect.min(), rect.max());
    if min == max {
        return Point::new(min.x, min.y).into();
    }
    if min.x == max.x || min.y == max.y {
        return LineString::from(vec![(min.x, min.y), (max.x, max.y)]).into();
    }
    rect.to_polygon().into()
}

/// The Simple Features class of the geometry.
pub(crate) fn geometry_type(geometry: &Geometry) -> NamedNodeRef<'static> {
    match geometry {
        Geometry::Point(_) => sf::POINT,
        Geometry::Line(_) | Geometry::LineString(_) => sf::LINE_STRING,
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => sf::POLYGON,
        Geometry::MultiPoint(_) => sf::MULTI_POINT,
        Geometry::MultiLineString(_) => sf::MULTI_LINE_STRING,
        Geometry::MultiPolygon(_) => sf::MULTI_POLYGON,
        Geometry::GeometryCollection(_) => sf::GEOMETRY_COLLECTION,
    }
}

pub(crate) fn is_empty(geometry: &Geometry) -> bool {
    geometry.is_empty()
}
